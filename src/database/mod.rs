// Copyright 2023 Remi Bernotavicius

use diesel::connection::SimpleConnection as _;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

#[cfg(test)]
pub mod fixtures;
pub mod models;
pub mod query;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Turns on foreign key enforcement for every connection handed out by the pool. SQLite leaves it
/// off by default, and recipe deletion relies on it to drop ingredient associations.
#[derive(Debug)]
struct EnableForeignKeys;

impl CustomizeConnection<Connection, diesel::r2d2::Error> for EnableForeignKeys {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A pool of SQLite connections. Each operation checks a connection out with [`Database::get`]
/// and it goes back to the pool when dropped.
#[derive(Clone)]
pub struct Database {
    pool: Pool<ConnectionManager<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let url = path
            .as_ref()
            .to_str()
            .ok_or_else(|| format!("database path {:?} is not valid UTF-8", path.as_ref()))?;
        Self::build(url, 4)
    }

    /// Private database that lives as long as the pool. There is only ever one connection since
    /// every new `:memory:` connection would see an empty database.
    pub fn in_memory() -> crate::Result<Self> {
        Self::build(":memory:", 1)
    }

    fn build(url: &str, max_size: u32) -> crate::Result<Self> {
        let manager = ConnectionManager::<Connection>::new(url);
        let pool = Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(EnableForeignKeys))
            .build(manager)?;

        {
            let mut pooled = pool.get()?;
            let conn: &mut Connection = &mut pooled;
            for version in conn.run_pending_migrations(MIGRATIONS)? {
                log::info!("applied migration {version}");
            }
        }

        log::debug!("opened database at {url}");
        Ok(Self { pool })
    }

    pub fn get(&self) -> crate::Result<PooledConnection<ConnectionManager<Connection>>> {
        Ok(self.pool.get()?)
    }
}

#[test]
fn migrations() {
    let db = Database::in_memory().unwrap();
    let mut pooled = db.get().unwrap();
    let conn: &mut Connection = &mut pooled;

    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());
    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn foreign_keys_enforced() {
    use diesel::RunQueryDsl as _;

    let db = Database::in_memory().unwrap();
    let mut conn = db.get().unwrap();

    let result =
        diesel::sql_query("INSERT INTO recipes (name, practical_session_id) VALUES ('x', 42)")
            .execute(&mut *conn);
    assert!(result.is_err());
}
