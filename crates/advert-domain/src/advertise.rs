// advertise.rs
// Tipos de cara al cliente: el anuncio tal como llega por la API y la
// petición de confirmación que resuelve un anuncio pendiente.
use crate::record::AdvertiseStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anuncio tal como lo ve la capa de API. No lleva identificador: el id lo
/// asigna el servicio al crear el registro persistido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertiseModel {
  pub username: String,
  pub title: String,
  pub description: String,
  pub price: f64,
}

impl AdvertiseModel {
  pub fn new(username: impl Into<String>, title: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
    Self { username: username.into(), title: title.into(), description: description.into(), price }
  }
}

impl fmt::Display for AdvertiseModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Advertise(title: {}, username: {}, price: {})", self.title, self.username, self.price)
  }
}

/// Petición de confirmación de un anuncio pendiente.
///
/// `status` es el valor crudo recibido por la API. `Active` promueve el
/// registro; `Pending` NO significa "seguir pendiente" sino deshacer: el
/// registro se elimina. Cualquier otro valor se rechaza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmAdvertise {
  pub id: String,
  pub status: String,
}

impl ConfirmAdvertise {
  pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
    Self { id: id.into(), status: status.into() }
  }

  /// Petición que promueve el anuncio a `Active`.
  pub fn activate(id: impl Into<String>) -> Self {
    Self::new(id, AdvertiseStatus::Active.to_string())
  }

  /// Petición de rollback (se codifica como `Pending` en el cable).
  pub fn rollback(id: impl Into<String>) -> Self {
    Self::new(id, AdvertiseStatus::Pending.to_string())
  }
}
