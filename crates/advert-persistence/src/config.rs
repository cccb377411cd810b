// config.rs
use advert_domain::{AdvertiseError, Result};

const DEFAULT_POOL_SIZE: u32 = 4;

/// Conexión a la base de datos: `ADVERT_DB_URL` (o `DATABASE_URL`) y
/// `ADVERT_DB_POOL_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
  pub database_url: String,
  pub pool_size: u32,
}

impl PersistenceConfig {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self { database_url: database_url.into(), pool_size: DEFAULT_POOL_SIZE }
  }

  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where F: Fn(&str) -> Option<String>
  {
    let url = lookup("ADVERT_DB_URL").or_else(|| lookup("DATABASE_URL"))
                                     .ok_or_else(|| AdvertiseError::Config("ADVERT_DB_URL / DATABASE_URL not set".into()))?;
    check_backend(&url)?;
    let pool_size = match lookup("ADVERT_DB_POOL_SIZE") {
      Some(raw) => match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => return Err(AdvertiseError::Config(format!("ADVERT_DB_POOL_SIZE inválido: '{}'", raw))),
      },
      None => DEFAULT_POOL_SIZE,
    };
    Ok(Self { database_url: url, pool_size })
  }
}

fn looks_like_postgres(url: &str) -> bool {
  let l = url.to_lowercase();
  l.starts_with("postgres://") || l.starts_with("postgresql://")
}

#[cfg(feature = "pg")]
fn check_backend(url: &str) -> Result<()> {
  if !looks_like_postgres(url) {
    return Err(AdvertiseError::Config("ADVERT_DB_URL does not look like Postgres URL".into()));
  }
  Ok(())
}

#[cfg(not(feature = "pg"))]
fn check_backend(url: &str) -> Result<()> {
  if looks_like_postgres(url) {
    return Err(AdvertiseError::Config("advert-persistence was compiled without 'pg' feature; enable the 'pg' \
                                       feature to use Postgres"
                                                               .into()));
  }
  Ok(())
}

#[cfg(all(test, not(feature = "pg")))]
mod tests {
  use super::*;

  #[test]
  fn url_fallback_and_pool_size() {
    let cfg = PersistenceConfig::from_lookup(|k| match k {
                                               "DATABASE_URL" => Some("/tmp/ads.db".into()),
                                               "ADVERT_DB_POOL_SIZE" => Some("8".into()),
                                               _ => None,
                                             }).unwrap();
    assert_eq!(cfg.database_url, "/tmp/ads.db");
    assert_eq!(cfg.pool_size, 8);

    let cfg = PersistenceConfig::from_lookup(|k| match k {
                                               "ADVERT_DB_URL" => Some("a.db".into()),
                                               "DATABASE_URL" => Some("b.db".into()),
                                               _ => None,
                                             }).unwrap();
    assert_eq!(cfg, PersistenceConfig::new("a.db"));
  }

  #[test]
  fn missing_or_invalid_values_are_config_errors() {
    assert!(matches!(PersistenceConfig::from_lookup(|_| None), Err(AdvertiseError::Config(_))));
    let bad_pool = PersistenceConfig::from_lookup(|k| match k {
                                                    "ADVERT_DB_URL" => Some("a.db".into()),
                                                    "ADVERT_DB_POOL_SIZE" => Some("0".into()),
                                                    _ => None,
                                                  });
    assert!(matches!(bad_pool, Err(AdvertiseError::Config(_))));
    let pg = PersistenceConfig::from_lookup(|k| (k == "ADVERT_DB_URL").then(|| "postgres://u@h/db".to_string()));
    assert!(matches!(pg, Err(AdvertiseError::Config(_))));
  }
}
