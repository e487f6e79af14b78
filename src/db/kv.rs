use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::connection::Database;
use super::StoreError;

/// Bytes under well-known keys. Values are whole serialized collections, so
/// callers that mutate must serialize their own read-modify-write.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

pub struct SqliteKv {
    db: Database,
}

impl SqliteKv {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row(
                    "select value from kv_store where key = ?",
                    params![key],
                    |r| r.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let now = Utc::now().timestamp();
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into kv_store (key, value, updated_at)
                values (?1, ?2, ?3)
                on conflict(key) do update set
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )?;
            Ok(())
        })
    }
}
