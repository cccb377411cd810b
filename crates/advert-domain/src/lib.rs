mod advertise;
mod document_store;
mod domain_stubs;
mod errors;
mod mapper;
mod record;

pub use advertise::{AdvertiseModel, ConfirmAdvertise};
pub use document_store::{CollectionDescription, DocumentSession, DocumentStore, Precondition, WriteResult};
pub use domain_stubs::{InMemoryDocumentStore, InMemorySession, DEFAULT_COLLECTION};
pub use errors::{AdvertiseError, Result};
pub use mapper::{AdvertiseMapper, FieldMapper};
pub use record::{AdvertiseAttributes, AdvertiseRecord, AdvertiseStatus};
