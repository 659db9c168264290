mod domain;
mod infrastructure;

pub mod database;
pub mod test_utils;

// Well-known storage slot names

pub const DRAFTS_SLOT_NAME: &str = "drafts";
pub const PUBLISHED_SLOT_NAME: &str = "published";
pub const TOKEN_SLOT_NAME: &str = "token";

// Persisted slots table and field names

pub const STORAGE_TABLE_NAME: &str = "storage_slots";
pub const SLOT_NAME_FIELD_NAME: &str = "name";
pub const SLOT_VALUE_FIELD_NAME: &str = "value";
pub const UPDATED_FIELD_NAME: &str = "updated_at";

// expose domain module

pub use domain::*;

// expose storage adapters

pub use infrastructure::memory::InMemoryStorage;
pub use infrastructure::postgres::PostgresStorage;
