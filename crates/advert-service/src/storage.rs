// Archivo: storage.rs
// Propósito: contrato que consume la capa de API. Permite sustituir el
// servicio por un doble de prueba sin conocer el store ni el mapper.
use crate::service::AdvertiseStorageService;
use advert_domain::{AdvertiseMapper, AdvertiseModel, ConfirmAdvertise, DocumentStore, Result};
use async_trait::async_trait;

#[async_trait]
pub trait AdvertiseStorage: Send + Sync {
    /// Crea un anuncio pendiente y devuelve su id.
    async fn create(&self, model: &AdvertiseModel) -> Result<String>;

    /// Promueve o descarta un anuncio pendiente.
    async fn confirm(&self, request: &ConfirmAdvertise) -> Result<()>;

    async fn check_health(&self) -> Result<bool>;
}

#[async_trait]
impl<S, M> AdvertiseStorage for AdvertiseStorageService<S, M>
    where S: DocumentStore,
          M: AdvertiseMapper
{
    async fn create(&self, model: &AdvertiseModel) -> Result<String> {
        AdvertiseStorageService::create(self, model).await
    }

    async fn confirm(&self, request: &ConfirmAdvertise) -> Result<()> {
        AdvertiseStorageService::confirm(self, request).await
    }

    async fn check_health(&self) -> Result<bool> {
        AdvertiseStorageService::check_health(self).await
    }
}
