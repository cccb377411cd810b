// record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estado de un registro persistido. El estado "eliminado" no existe como
/// valor: se representa por la ausencia del registro en el store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvertiseStatus {
  Pending,
  Active,
}

impl AdvertiseStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      AdvertiseStatus::Pending => "Pending",
      AdvertiseStatus::Active => "Active",
    }
  }
}

impl fmt::Display for AdvertiseStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AdvertiseStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "pending" => Ok(AdvertiseStatus::Pending),
      "active" => Ok(AdvertiseStatus::Active),
      _ => Err(format!("estado desconocido '{}'", s)),
    }
  }
}

/// Campos del anuncio que el mapper traslada al registro persistido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertiseAttributes {
  pub title: String,
  pub username: String,
  pub description: String,
  pub price: f64,
}

/// Registro persistido. `id` y `created_at` se fijan al construirlo y no
/// cambian; el único cambio permitido es `Pending -> Active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertiseRecord {
  id: String,
  created_at: DateTime<Utc>,
  status: AdvertiseStatus,
  #[serde(flatten)]
  attributes: AdvertiseAttributes,
}

impl AdvertiseRecord {
  /// Nuevo registro en estado `Pending`.
  pub fn new_pending(id: impl Into<String>, created_at: DateTime<Utc>, attributes: AdvertiseAttributes) -> Self {
    Self { id: id.into(), created_at, status: AdvertiseStatus::Pending, attributes }
  }

  /// Reconstruye un registro leído del almacenamiento.
  pub fn from_parts(id: impl Into<String>,
                    created_at: DateTime<Utc>,
                    status: AdvertiseStatus,
                    attributes: AdvertiseAttributes)
                    -> Self {
    Self { id: id.into(), created_at, status, attributes }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn status(&self) -> AdvertiseStatus {
    self.status
  }

  pub fn attributes(&self) -> &AdvertiseAttributes {
    &self.attributes
  }

  pub fn is_active(&self) -> bool {
    self.status == AdvertiseStatus::Active
  }

  /// Marca el registro como activo.
  pub fn activate(&mut self) {
    self.status = AdvertiseStatus::Active;
  }
}
