// Archivo: service.rs
// Propósito: `AdvertiseStorageService`, la capa que crea anuncios pendientes,
// los resuelve (promote / rollback) y reporta la salud del store. Se invoca
// desde handlers HTTP u otras capas externas.
use crate::config::{ConfirmMode, ServiceConfig};
use crate::lifecycle::Transition;
use advert_domain::{AdvertiseError, AdvertiseMapper, AdvertiseModel, AdvertiseRecord, ConfirmAdvertise, DocumentSession,
                    DocumentStore, Precondition, Result, WriteResult};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// `true` si el estado reportado por la colección es "active" (sin
/// distinguir mayúsculas).
pub fn is_active_status(status: &str) -> bool {
    status.eq_ignore_ascii_case("active")
}

/// Servicio de almacenamiento de anuncios.
///
/// No guarda estado mutable propio entre llamadas: cada operación abre una
/// sesión en el store, la usa y la suelta al salir (también en error).
pub struct AdvertiseStorageService<S, M>
    where S: DocumentStore,
          M: AdvertiseMapper
{
    store: Arc<S>,
    mapper: Arc<M>,
    config: ServiceConfig,
}

impl<S, M> AdvertiseStorageService<S, M>
    where S: DocumentStore,
          M: AdvertiseMapper
{
    pub fn new(store: Arc<S>, mapper: Arc<M>, config: ServiceConfig) -> Self {
        Self { store, mapper, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Crea el anuncio como `Pending` y devuelve el id generado. La escritura
    /// nunca sobrescribe un item existente.
    pub async fn create(&self, model: &AdvertiseModel) -> Result<String> {
        let attributes = self.mapper.to_attributes(model);
        let record = AdvertiseRecord::new_pending(Uuid::new_v4().to_string(), Utc::now(), attributes);
        let session = self.store.open_session().await?;
        match session.put_if(&record, Precondition::Absent).await? {
            WriteResult::Applied => {
                info!("anuncio {} creado como Pending", record.id());
                Ok(record.id().to_string())
            }
            WriteResult::Conflict => {
                warn!("colisión de id al crear anuncio {}", record.id());
                Err(AdvertiseError::Conflict(format!("el anuncio {} ya existe", record.id())))
            }
        }
    }

    /// Resuelve un anuncio: `Active` lo promueve, `Pending` lo elimina.
    ///
    /// Hace exactamente una lectura y luego, como mucho, una escritura o un
    /// borrado. Con `ConfirmMode::Conditional` la escritura/borrado sólo se
    /// aplica si el registro sigue en el estado leído.
    pub async fn confirm(&self, request: &ConfirmAdvertise) -> Result<()> {
        let session = self.store.open_session().await?;
        let mut record = session.get(&request.id)
                                .await?
                                .ok_or_else(|| AdvertiseError::NotFound(format!("anuncio {}", request.id)))?;
        let transition = Transition::resolve(&request.status).map_err(|e| {
                                                                 warn!("confirmación rechazada para {}: {}", request.id, e);
                                                                 e
                                                             })?;
        let observed = record.status();
        debug!("confirmando {} ({} -> {:?})", request.id, observed, transition);

        match transition {
            Transition::Promote => {
                record.activate();
                match self.config.confirm_mode {
                    ConfirmMode::LastWriterWins => session.put(&record).await?,
                    ConfirmMode::Conditional => {
                        let res = session.put_if(&record, Precondition::StatusIs(observed)).await?;
                        expect_applied(res, &request.id)?
                    }
                }
                info!("anuncio {} activado", request.id);
            }
            Transition::Rollback => {
                match self.config.confirm_mode {
                    ConfirmMode::LastWriterWins => session.delete(&request.id).await?,
                    ConfirmMode::Conditional => {
                        let res = session.delete_if(&request.id, Precondition::StatusIs(observed)).await?;
                        expect_applied(res, &request.id)?
                    }
                }
                info!("anuncio {} descartado (rollback)", request.id);
            }
        }
        Ok(())
    }

    /// Consulta los metadatos de la colección configurada. Un fallo de la
    /// consulta se propaga; no se traduce a `false`.
    pub async fn check_health(&self) -> Result<bool> {
        let session = self.store.open_session().await?;
        let description = session.describe_collection(&self.config.collection).await?;
        debug!("colección {} en estado {}", description.name, description.status);
        Ok(is_active_status(&description.status))
    }

    /// Registro tal como está en el store, en cualquier estado.
    pub async fn load(&self, id: &str) -> Result<Option<AdvertiseRecord>> {
        let session = self.store.open_session().await?;
        session.get(id).await
    }

    /// Anuncio visible para lectura: sólo los registros `Active`.
    pub async fn find_active(&self, id: &str) -> Result<AdvertiseModel> {
        match self.load(id).await? {
            Some(record) if record.is_active() => Ok(self.mapper.to_model(&record)),
            _ => Err(AdvertiseError::NotFound(format!("anuncio activo {}", id))),
        }
    }
}

fn expect_applied(result: WriteResult, id: &str) -> Result<()> {
    match result {
        WriteResult::Applied => Ok(()),
        WriteResult::Conflict => {
            warn!("confirmación concurrente detectada para {}", id);
            Err(AdvertiseError::Conflict(format!("el anuncio {} cambió durante la confirmación", id)))
        }
    }
}
