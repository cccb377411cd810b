// errors.rs
use thiserror::Error;

/// Errores del almacenamiento de anuncios.
///
/// - `NotFound`: la confirmación apunta a un id inexistente.
/// - `UnsupportedOperation`: el estado solicitado no es `Active` ni `Pending`.
/// - `Conflict`: una escritura condicional perdió la carrera.
/// - `Storage`: cualquier fallo del store subyacente (I/O, serialización...).
/// - `Config`: configuración inválida o incompleta.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdvertiseError {
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Operación no soportada: {0}")]
  UnsupportedOperation(String),
  #[error("Conflicto: {0}")]
  Conflict(String),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Error de configuración: {0}")]
  Config(String),
}

impl From<serde_json::Error> for AdvertiseError {
  fn from(e: serde_json::Error) -> Self {
    Self::Storage(format!("serialización: {}", e))
  }
}

/// Alias de resultado usado por las APIs del workspace.
pub type Result<T> = std::result::Result<T, AdvertiseError>;
