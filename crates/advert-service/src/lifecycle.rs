// Archivo: lifecycle.rs
// Propósito: máquina de estados de la confirmación.
//
//   Pending --confirm(Active)--> Active
//   Pending --confirm(Pending)--> (eliminado)
//
// Cualquier otro valor pedido se rechaza sin tocar el store.
use advert_domain::{AdvertiseError, AdvertiseStatus, Result};

/// Transición que aplica una confirmación sobre un registro existente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Reescribe el registro con estado `Active`.
    Promote,
    /// Elimina el registro del store.
    Rollback,
}

impl Transition {
    /// Resuelve el estado pedido en el cable. `Pending` se interpreta como
    /// señal de rollback, no como volver a pendiente.
    pub fn resolve(requested: &str) -> Result<Self> {
        match requested.parse::<AdvertiseStatus>() {
            Ok(AdvertiseStatus::Active) => Ok(Transition::Promote),
            Ok(AdvertiseStatus::Pending) => Ok(Transition::Rollback),
            Err(reason) => Err(AdvertiseError::UnsupportedOperation(reason)),
        }
    }

    /// Estado final en el store; `None` si el registro deja de existir.
    pub fn target(&self) -> Option<AdvertiseStatus> {
        match self {
            Transition::Promote => Some(AdvertiseStatus::Active),
            Transition::Rollback => None,
        }
    }
}
