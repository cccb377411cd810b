// Archivo: domain_stubs.rs
// Propósito: store de documentos en memoria para pruebas y wiring rápido.
// No es durable. Permite observar cuántas sesiones siguen abiertas, fijar el
// estado que reporta la colección e inyectar fallos del store.
use crate::document_store::{CollectionDescription, DocumentSession, DocumentStore, Precondition, WriteResult};
use crate::errors::{AdvertiseError, Result};
use crate::record::AdvertiseRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_COLLECTION: &str = "Advertisements";

struct Inner {
    collection: String,
    items: Mutex<HashMap<String, AdvertiseRecord>>,
    collection_status: Mutex<String>,
    failure: Mutex<Option<String>>,
    open_sessions: AtomicUsize,
}

impl Inner {
    fn lock<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>> {
        m.lock().map_err(|e| AdvertiseError::Storage(format!("Mutex '{}' poisoned: {}", name, e)))
    }

    fn check_failure(&self) -> Result<()> {
        match self.lock(&self.failure, "failure")?.as_ref() {
            Some(msg) => Err(AdvertiseError::Storage(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Store en memoria con una única colección.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    inner: Arc<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_collection(DEFAULT_COLLECTION)
    }

    pub fn with_collection(name: &str) -> Self {
        Self { inner: Arc::new(Inner { collection: name.to_string(),
                                       items: Mutex::new(HashMap::new()),
                                       collection_status: Mutex::new("ACTIVE".to_string()),
                                       failure: Mutex::new(None),
                                       open_sessions: AtomicUsize::new(0) }) }
    }

    /// Sesiones abiertas y todavía no liberadas.
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    /// Número de items almacenados.
    pub fn len(&self) -> usize {
        self.inner.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estado que devolverá `describe_collection` (p.ej. "CREATING").
    pub fn set_collection_status(&self, status: &str) {
        *self.inner.collection_status.lock().unwrap_or_else(|e| e.into_inner()) = status.to_string();
    }

    /// A partir de aquí toda operación de sesión falla con `Storage(msg)`.
    pub fn fail_with(&self, msg: &str) {
        *self.inner.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(msg.to_string());
    }

    pub fn clear_failure(&self) {
        *self.inner.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    type Session = InMemorySession;

    async fn open_session(&self) -> Result<InMemorySession> {
        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(InMemorySession { inner: self.inner.clone() })
    }
}

/// Sesión del store en memoria; al soltarla se descuenta del contador.
pub struct InMemorySession {
    inner: Arc<Inner>,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentSession for InMemorySession {
    async fn put(&self, record: &AdvertiseRecord) -> Result<()> {
        self.inner.check_failure()?;
        let mut items = self.inner.lock(&self.inner.items, "items")?;
        items.insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn put_if(&self, record: &AdvertiseRecord, precondition: Precondition) -> Result<WriteResult> {
        self.inner.check_failure()?;
        let mut items = self.inner.lock(&self.inner.items, "items")?;
        if !precondition.holds(items.get(record.id())) {
            return Ok(WriteResult::Conflict);
        }
        items.insert(record.id().to_string(), record.clone());
        Ok(WriteResult::Applied)
    }

    async fn get(&self, id: &str) -> Result<Option<AdvertiseRecord>> {
        self.inner.check_failure()?;
        let items = self.inner.lock(&self.inner.items, "items")?;
        Ok(items.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.check_failure()?;
        let mut items = self.inner.lock(&self.inner.items, "items")?;
        items.remove(id);
        Ok(())
    }

    async fn delete_if(&self, id: &str, precondition: Precondition) -> Result<WriteResult> {
        self.inner.check_failure()?;
        let mut items = self.inner.lock(&self.inner.items, "items")?;
        if !precondition.holds(items.get(id)) {
            return Ok(WriteResult::Conflict);
        }
        items.remove(id);
        Ok(WriteResult::Applied)
    }

    async fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
        self.inner.check_failure()?;
        if name != self.inner.collection {
            return Err(AdvertiseError::Storage(format!("colección '{}' no existe", name)));
        }
        let status = self.inner.lock(&self.inner.collection_status, "collection_status")?.clone();
        Ok(CollectionDescription { name: name.to_string(), status })
    }
}
