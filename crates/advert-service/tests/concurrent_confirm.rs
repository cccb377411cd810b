// Interleaves a second confirmation between the load and the write of the
// confirmation under test, to pin down how each ConfirmMode behaves.
use advert_domain::{AdvertiseError, AdvertiseModel, AdvertiseRecord, AdvertiseStatus, CollectionDescription,
                    ConfirmAdvertise, DocumentSession, DocumentStore, FieldMapper, InMemoryDocumentStore,
                    InMemorySession, Precondition, Result, WriteResult};
use advert_service::{AdvertiseStorageService, ConfirmMode, ServiceConfig};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy)]
enum Interference {
  Delete,
  Promote,
}

struct RacingStore {
  inner: InMemoryDocumentStore,
  interference: Interference,
  fired: Arc<AtomicBool>,
}

struct RacingSession {
  session: InMemorySession,
  inner: InMemoryDocumentStore,
  interference: Interference,
  fired: Arc<AtomicBool>,
}

#[async_trait]
impl DocumentStore for RacingStore {
  type Session = RacingSession;

  async fn open_session(&self) -> Result<RacingSession> {
    Ok(RacingSession { session: self.inner.open_session().await?,
                       inner: self.inner.clone(),
                       interference: self.interference,
                       fired: self.fired.clone() })
  }
}

#[async_trait]
impl DocumentSession for RacingSession {
  async fn put(&self, record: &AdvertiseRecord) -> Result<()> {
    self.session.put(record).await
  }

  async fn put_if(&self, record: &AdvertiseRecord, precondition: Precondition) -> Result<WriteResult> {
    self.session.put_if(record, precondition).await
  }

  async fn get(&self, id: &str) -> Result<Option<AdvertiseRecord>> {
    let loaded = self.session.get(id).await?;
    if let Some(rec) = loaded.as_ref() {
      if !self.fired.swap(true, Ordering::SeqCst) {
        let other = self.inner.open_session().await?;
        match self.interference {
          Interference::Delete => other.delete(id).await?,
          Interference::Promote => {
            let mut promoted = rec.clone();
            promoted.activate();
            other.put(&promoted).await?
          }
        }
      }
    }
    Ok(loaded)
  }

  async fn delete(&self, id: &str) -> Result<()> {
    self.session.delete(id).await
  }

  async fn delete_if(&self, id: &str, precondition: Precondition) -> Result<WriteResult> {
    self.session.delete_if(id, precondition).await
  }

  async fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
    self.session.describe_collection(name).await
  }
}

/// Creates a pending record directly through the plain store, then returns a
/// service whose next load is raced by `interference`.
async fn setup(interference: Interference,
               mode: ConfirmMode)
               -> (InMemoryDocumentStore, AdvertiseStorageService<RacingStore, FieldMapper>, String) {
  let inner = InMemoryDocumentStore::new();
  let plain = AdvertiseStorageService::new(Arc::new(inner.clone()), Arc::new(FieldMapper), ServiceConfig::default());
  let id = plain.create(&AdvertiseModel::new("nora", "Cámara", "Réflex", 400.0)).await.unwrap();
  let racing = RacingStore { inner: inner.clone(), interference, fired: Arc::new(AtomicBool::new(false)) };
  let config = ServiceConfig { confirm_mode: mode, ..ServiceConfig::default() };
  (inner.clone(), AdvertiseStorageService::new(Arc::new(racing), Arc::new(FieldMapper), config), id)
}

#[tokio::test]
async fn conditional_promote_does_not_resurrect_deleted_record() {
  let (inner, svc, id) = setup(Interference::Delete, ConfirmMode::Conditional).await;
  assert!(matches!(svc.confirm(&ConfirmAdvertise::activate(&id)).await, Err(AdvertiseError::Conflict(_))));
  assert!(inner.is_empty());
  assert_eq!(inner.open_sessions(), 0);
}

#[tokio::test]
async fn conditional_rollback_loses_to_concurrent_promote() {
  let (_inner, svc, id) = setup(Interference::Promote, ConfirmMode::Conditional).await;
  assert!(matches!(svc.confirm(&ConfirmAdvertise::rollback(&id)).await, Err(AdvertiseError::Conflict(_))));
  let rec = svc.load(&id).await.unwrap().expect("promoted record must survive");
  assert_eq!(rec.status(), AdvertiseStatus::Active);
}

#[tokio::test]
async fn last_writer_wins_promote_recreates_deleted_record() {
  let (_inner, svc, id) = setup(Interference::Delete, ConfirmMode::LastWriterWins).await;
  svc.confirm(&ConfirmAdvertise::activate(&id)).await.unwrap();
  let rec = svc.load(&id).await.unwrap().expect("last writer recreates the item");
  assert_eq!(rec.status(), AdvertiseStatus::Active);
}

#[tokio::test]
async fn last_writer_wins_rollback_deletes_promoted_record() {
  let (inner, svc, id) = setup(Interference::Promote, ConfirmMode::LastWriterWins).await;
  svc.confirm(&ConfirmAdvertise::rollback(&id)).await.unwrap();
  assert!(svc.load(&id).await.unwrap().is_none());
  assert!(inner.is_empty());
}
