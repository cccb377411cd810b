//! Crate `advert-service` — ciclo de vida de anuncios sobre un store de
//! documentos por clave.
//!
//! Un anuncio se escribe primero como `Pending` (`create`) y después se
//! resuelve exactamente una vez (`confirm`): se promueve a `Active` o se
//! elimina (rollback). `check_health` consulta los metadatos de la colección.
//!
//! El mapper y el store se inyectan en el constructor; cada operación abre su
//! propia sesión contra el store y la libera al terminar.
//!
//! Ejemplo rápido:
//! ```rust
//! use advert_domain::{FieldMapper, InMemoryDocumentStore};
//! use advert_service::{AdvertiseStorageService, ServiceConfig};
//! use std::sync::Arc;
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let service = AdvertiseStorageService::new(store, Arc::new(FieldMapper), ServiceConfig::default());
//! ```
pub mod config;
pub mod lifecycle;
pub mod service;
pub mod storage;

pub use config::{ConfirmMode, ServiceConfig};
pub use lifecycle::Transition;
pub use service::{is_active_status, AdvertiseStorageService};
pub use storage::AdvertiseStorage;

pub use advert_domain::{AdvertiseError, AdvertiseModel, AdvertiseRecord, AdvertiseStatus, ConfirmAdvertise, Result};
