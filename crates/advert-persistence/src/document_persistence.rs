use crate::config::PersistenceConfig;
use crate::schema::advertisements;
use crate::schema::advertisements::dsl;
use advert_domain::{AdvertiseAttributes, AdvertiseError, AdvertiseRecord, AdvertiseStatus, CollectionDescription,
                    DocumentSession, DocumentStore, Precondition, Result, WriteResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Text};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;
use std::sync::{Arc, Mutex};
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
type DbPool = Pool<ConnectionManager<DbConn>>;
type DbPooled = PooledConnection<ConnectionManager<DbConn>>;
#[cfg(not(feature = "pg"))]
const TABLE_EXISTS_SQL: &str = "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND lower(name) = lower(?)";
#[cfg(feature = "pg")]
const TABLE_EXISTS_SQL: &str = "SELECT COUNT(*) AS n FROM information_schema.tables WHERE lower(table_name) = lower($1)";
const NANOS_PER_SEC: i64 = 1_000_000_000;

// Fila Diesel de la tabla `advertisements`
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = advertisements)]
struct AdvertisementRow {
  pub id: String,
  pub status: String,
  pub created_at_ts: i64,
  pub document: String,
}
impl AdvertisementRow {
  fn from_record(record: &AdvertiseRecord) -> Result<Self> {
    let ts = record.created_at()
                   .timestamp_nanos_opt()
                   .ok_or_else(|| AdvertiseError::Storage(format!("created_at fuera de rango en {}", record.id())))?;
    Ok(AdvertisementRow { id: record.id().to_string(),
                          status: record.status().to_string(),
                          created_at_ts: ts,
                          document: serde_json::to_string(record.attributes())? })
  }
  fn into_record(self) -> Result<AdvertiseRecord> {
    let status = self.status
                     .parse::<AdvertiseStatus>()
                     .map_err(|e| AdvertiseError::Storage(format!("fila {}: {}", self.id, e)))?;
    let secs = self.created_at_ts.div_euclid(NANOS_PER_SEC);
    let nanos = self.created_at_ts.rem_euclid(NANOS_PER_SEC) as u32;
    let created_at = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| {
                                                                   AdvertiseError::Storage(format!("fila {}: created_at_ts inválido",
                                                                                                   self.id))
                                                                 })?;
    let attributes: AdvertiseAttributes = serde_json::from_str(&self.document)?;
    Ok(AdvertiseRecord::from_parts(self.id, created_at, status, attributes))
  }
}
#[derive(Debug, QueryableByName)]
struct TableCount {
  #[diesel(sql_type = BigInt)]
  n: i64,
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(|e| AdvertiseError::Storage(format!("db: {}", e)))
}
fn applied_if(affected: usize) -> WriteResult {
  if affected == 1 {
    WriteResult::Applied
  } else {
    WriteResult::Conflict
  }
}
#[cfg(not(feature = "pg"))]
#[derive(Debug)]
struct SqliteBusyTimeout;
#[cfg(not(feature = "pg"))]
impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteBusyTimeout {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
    diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(conn)
                                                    .map(|_| ())
                                                    .map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Store Diesel que implementa `DocumentStore`. Cada sesión toma una conexión
/// del pool y la devuelve al soltarse.
#[derive(Clone)]
pub struct DieselDocumentStore {
  pool: Arc<DbPool>,
}
impl DieselDocumentStore {
  /// Crea el pool y aplica las migraciones embebidas.
  pub fn connect(config: &PersistenceConfig) -> Result<Self> {
    let manager = ConnectionManager::<DbConn>::new(config.database_url.as_str());
    let builder = Pool::builder().max_size(config.pool_size);
    #[cfg(not(feature = "pg"))]
    let builder = builder.connection_customizer(Box::new(SqliteBusyTimeout));
    let pool = builder.build(manager).map_err(|e| AdvertiseError::Storage(format!("pool: {}", e)))?;
    let store = DieselDocumentStore { pool: Arc::new(pool) };
    store.migrate()?;
    Ok(store)
  }
  fn conn_raw(&self) -> std::result::Result<DbPooled, r2d2::Error> {
    self.pool.get()
  }
  fn conn(&self) -> Result<DbPooled> {
    self.conn_raw().map_err(|e| AdvertiseError::Storage(format!("pool: {}", e)))
  }
  fn migrate(&self) -> Result<()> {
    let mut c = self.conn()?;
    #[cfg(not(feature = "pg"))]
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    c.run_pending_migrations(MIGRATIONS)
     .map_err(|e| AdvertiseError::Storage(format!("migraciones: {}", e)))?;
    Ok(())
  }
  /// Conexiones abiertas en el pool.
  pub fn connections(&self) -> u32 {
    self.pool.state().connections
  }
  /// Conexiones abiertas que nadie tiene en uso.
  pub fn idle_connections(&self) -> u32 {
    self.pool.state().idle_connections
  }
}
#[async_trait]
impl DocumentStore for DieselDocumentStore {
  type Session = DieselSession;
  async fn open_session(&self) -> Result<DieselSession> {
    let pool = self.pool.clone();
    let conn = tokio::task::spawn_blocking(move || pool.get())
                 .await
                 .map_err(|e| AdvertiseError::Storage(format!("tarea bloqueante: {}", e)))?
                 .map_err(|e| AdvertiseError::Storage(format!("pool: {}", e)))?;
    Ok(DieselSession { conn: Arc::new(Mutex::new(conn)) })
  }
}

/// Sesión acotada: posee una conexión del pool hasta que se suelta.
pub struct DieselSession {
  conn: Arc<Mutex<DbPooled>>,
}
impl DieselSession {
  // Ejecuta `f` con la conexión de la sesión fuera del runtime async.
  async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where T: Send + 'static,
          F: FnOnce(&mut DbConn) -> std::result::Result<T, DieselError> + Send + 'static
  {
    debug!("advertisements: {}", op);
    let conn = self.conn.clone();
    tokio::task::spawn_blocking(move || {
      let mut guard = conn.lock().map_err(|e| AdvertiseError::Storage(format!("Mutex 'conn' poisoned: {}", e)))?;
      map_db_err(f(&mut **guard))
    }).await
      .map_err(|e| AdvertiseError::Storage(format!("tarea bloqueante: {}", e)))?
  }
}
#[async_trait]
impl DocumentSession for DieselSession {
  async fn put(&self, record: &AdvertiseRecord) -> Result<()> {
    let row = AdvertisementRow::from_record(record)?;
    self.run("put", move |c| {
          c.transaction::<_, DieselError, _>(|c| {
             diesel::delete(dsl::advertisements.filter(dsl::id.eq(&row.id))).execute(c)?;
             diesel::insert_into(dsl::advertisements).values(&row).execute(c)?;
             Ok(())
           })
        })
        .await
  }
  async fn put_if(&self, record: &AdvertiseRecord, precondition: Precondition) -> Result<WriteResult> {
    let row = AdvertisementRow::from_record(record)?;
    match precondition {
      Precondition::Absent => {
        self.run("put_if absent", move |c| {
              match diesel::insert_into(dsl::advertisements).values(&row).execute(c) {
                Ok(_) => Ok(WriteResult::Applied),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(WriteResult::Conflict),
                Err(e) => Err(e),
              }
            })
            .await
      }
      Precondition::StatusIs(expected) => {
        let expected = expected.to_string();
        self.run("put_if status", move |c| {
              diesel::update(dsl::advertisements.filter(dsl::id.eq(&row.id)).filter(dsl::status.eq(&expected)))
                .set((dsl::status.eq(&row.status),
                      dsl::created_at_ts.eq(row.created_at_ts),
                      dsl::document.eq(&row.document)))
                .execute(c)
                .map(applied_if)
            })
            .await
      }
    }
  }
  async fn get(&self, id: &str) -> Result<Option<AdvertiseRecord>> {
    let id = id.to_string();
    let row = self.run("get", move |c| {
                    dsl::advertisements.filter(dsl::id.eq(&id)).first::<AdvertisementRow>(c).optional()
                  })
                  .await?;
    row.map(AdvertisementRow::into_record).transpose()
  }
  async fn delete(&self, id: &str) -> Result<()> {
    let id = id.to_string();
    self.run("delete", move |c| diesel::delete(dsl::advertisements.filter(dsl::id.eq(&id))).execute(c).map(|_| ()))
        .await
  }
  async fn delete_if(&self, id: &str, precondition: Precondition) -> Result<WriteResult> {
    let id = id.to_string();
    match precondition {
      Precondition::Absent => {
        self.run("delete_if absent", move |c| {
              let n: i64 = dsl::advertisements.filter(dsl::id.eq(&id)).count().get_result(c)?;
              Ok(if n == 0 { WriteResult::Applied } else { WriteResult::Conflict })
            })
            .await
      }
      Precondition::StatusIs(expected) => {
        let expected = expected.to_string();
        self.run("delete_if status", move |c| {
              diesel::delete(dsl::advertisements.filter(dsl::id.eq(&id)).filter(dsl::status.eq(&expected)))
                .execute(c)
                .map(applied_if)
            })
            .await
      }
    }
  }
  async fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
    let table = name.to_string();
    let count = self.run("describe", move |c| {
                      diesel::sql_query(TABLE_EXISTS_SQL).bind::<Text, _>(table).get_result::<TableCount>(c)
                    })
                    .await?;
    if count.n == 0 {
      return Err(AdvertiseError::Storage(format!("colección '{}' no existe", name)));
    }
    Ok(CollectionDescription { name: name.to_string(), status: "ACTIVE".to_string() })
  }
}

/// Crea el store desde las variables de entorno (ver `PersistenceConfig`).
pub fn new_from_env() -> Result<DieselDocumentStore> {
  let config = PersistenceConfig::from_env()?;
  DieselDocumentStore::connect(&config)
}
