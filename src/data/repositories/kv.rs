use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::data::models::StoreError;
use crate::schema::kv_entries;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// String key-value persistence used by the favorites store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteKvStore {
    pool: DbPool,
}

impl SqliteKvStore {
    /// Wraps the pool and makes sure the backing table exists.
    pub fn new(pool: DbPool) -> Result<Self, StoreError> {
        let mut conn = pool.get()?;
        diesel::sql_query(
            "CREATE TABLE IF NOT EXISTS kv_entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
        )
        .execute(&mut conn)?;
        Ok(SqliteKvStore { pool })
    }

    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| StoreError::Other(format!("Failed to create DB pool: {}", e)))?;
        Self::new(pool)
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.pool.get()?;
        let value = kv_entries::table
            .filter(kv_entries::key.eq(key))
            .select(kv_entries::value)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(kv_entries::table)
            .values((kv_entries::key.eq(key), kv_entries::value.eq(value)))
            .on_conflict(kv_entries::key)
            .do_update()
            .set(kv_entries::value.eq(value))
            .execute(&mut conn)?;
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
