// Archivo: config.rs
// Propósito: configuración del servicio leída de variables de entorno
// (`.env` incluido vía dotenvy).
use advert_domain::{AdvertiseError, Result, DEFAULT_COLLECTION};
use std::fmt;
use std::str::FromStr;

/// Cómo se protege `confirm` frente a confirmaciones concurrentes del mismo id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmMode {
    /// Escritura/borrado condicionados al estado leído. Si otra confirmación
    /// se adelantó, la operación falla con `Conflict`.
    #[default]
    Conditional,
    /// Sin guarda: gana el último escritor y un promote puede recrear un
    /// registro ya borrado.
    LastWriterWins,
}

impl FromStr for ConfirmMode {
    type Err = AdvertiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conditional" => Ok(ConfirmMode::Conditional),
            "last-writer-wins" | "lww" => Ok(ConfirmMode::LastWriterWins),
            other => Err(AdvertiseError::Config(format!("ADVERT_CONFIRM_MODE inválido: '{}'", other))),
        }
    }
}

impl fmt::Display for ConfirmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmMode::Conditional => f.write_str("conditional"),
            ConfirmMode::LastWriterWins => f.write_str("last-writer-wins"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Colección/tabla consultada por `check_health`.
    pub collection: String,
    pub confirm_mode: ConfirmMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { collection: DEFAULT_COLLECTION.to_string(), confirm_mode: ConfirmMode::default() }
    }
}

impl ServiceConfig {
    /// Lee `ADVERT_TABLE` y `ADVERT_CONFIRM_MODE`; lo que falte toma el
    /// valor por defecto.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
        where F: Fn(&str) -> Option<String>
    {
        let mut config = Self::default();
        if let Some(table) = lookup("ADVERT_TABLE") {
            if table.trim().is_empty() {
                return Err(AdvertiseError::Config("ADVERT_TABLE está vacío".into()));
            }
            config.collection = table.trim().to_string();
        }
        if let Some(mode) = lookup("ADVERT_CONFIRM_MODE") {
            config.confirm_mode = mode.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ServiceConfig::default());
        assert_eq!(cfg.collection, "Advertisements");
        assert_eq!(cfg.confirm_mode, ConfirmMode::Conditional);
    }

    #[test]
    fn reads_table_and_mode() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("ADVERT_TABLE", "Ads"),
                                                      ("ADVERT_CONFIRM_MODE", "Last-Writer-Wins")])).unwrap();
        assert_eq!(cfg.collection, "Ads");
        assert_eq!(cfg.confirm_mode, ConfirmMode::LastWriterWins);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(ServiceConfig::from_lookup(lookup(&[("ADVERT_CONFIRM_MODE", "optimistic")])),
                         Err(AdvertiseError::Config(_))));
        assert!(matches!(ServiceConfig::from_lookup(lookup(&[("ADVERT_TABLE", "  ")])),
                         Err(AdvertiseError::Config(_))));
    }
}
