// Archivo: document_store.rs
// Propósito: contrato mínimo del store de documentos por clave que necesita
// el servicio de anuncios. Lo implementan el store en memoria (pruebas) y el
// store Diesel de `advert-persistence`.
use crate::errors::Result;
use crate::record::{AdvertiseRecord, AdvertiseStatus};
use async_trait::async_trait;

/// Metadatos de una colección/tabla devueltos por `describe_collection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescription {
    pub name: String,
    pub status: String,
}

/// Condición previa de una escritura condicional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// El item no debe existir.
    Absent,
    /// El item debe existir con este estado.
    StatusIs(AdvertiseStatus),
}

impl Precondition {
    /// Evalúa la condición contra el item actual (si existe).
    pub fn holds(&self, current: Option<&AdvertiseRecord>) -> bool {
        match (self, current) {
            (Precondition::Absent, None) => true,
            (Precondition::StatusIs(s), Some(rec)) => rec.status() == *s,
            _ => false,
        }
    }
}

/// Resultado de una escritura condicional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Applied,
    Conflict,
}

/// Fuente de sesiones. Cada operación del servicio abre una sesión, la usa
/// y la suelta; soltarla (drop) libera la conexión subyacente.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    type Session: DocumentSession;

    async fn open_session(&self) -> Result<Self::Session>;
}

/// Sesión acotada contra el store.
#[async_trait]
pub trait DocumentSession: Send + Sync {
    /// Crea o sobrescribe el item por clave.
    async fn put(&self, record: &AdvertiseRecord) -> Result<()>;

    /// Escribe el item sólo si `precondition` se cumple, de forma atómica.
    async fn put_if(&self, record: &AdvertiseRecord, precondition: Precondition) -> Result<WriteResult>;

    /// Lee un item por clave.
    async fn get(&self, id: &str) -> Result<Option<AdvertiseRecord>>;

    /// Borra el item por clave. Borrar algo inexistente no es un error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Borra el item sólo si `precondition` se cumple, de forma atómica.
    async fn delete_if(&self, id: &str, precondition: Precondition) -> Result<WriteResult>;

    /// Metadatos de la colección `name`.
    async fn describe_collection(&self, name: &str) -> Result<CollectionDescription>;
}
