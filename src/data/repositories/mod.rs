pub mod fetch;
pub mod kv;

pub use fetch::{BILINGUAL_FILE, FileJsonFetcher, HttpJsonFetcher, JsonFetcher, PROMPTS_FILE};
pub use kv::{DbPool, KeyValueStore, MemoryKvStore, SqliteKvStore};
