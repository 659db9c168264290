use crate::database::Database;
use crate::domain::{SlotName, Storage, StorageError};
use crate::{SLOT_NAME_FIELD_NAME, SLOT_VALUE_FIELD_NAME, STORAGE_TABLE_NAME, UPDATED_FIELD_NAME};

/// Storage backed by one row per slot in `<schema>.storage_slots`.
/// The table is created by the migration tool.
#[derive(Clone, Debug)]
pub struct PostgresStorage {
    database: Database,
    statements: SlotStatements,
}

impl PostgresStorage {
    pub fn new(database: Database) -> Self {
        let statements = SlotStatements::new(database.database_schema());
        Self {
            database,
            statements,
        }
    }
}

/// SQL for the three slot operations, built once per schema
#[derive(Clone, Debug, PartialEq, Eq)]
struct SlotStatements {
    select: String,
    upsert: String,
    delete: String,
}

impl SlotStatements {
    fn new(schema: &str) -> Self {
        let table = format!("\"{}\".\"{}\"", schema, STORAGE_TABLE_NAME);

        let select = format!(
            "SELECT \"{}\" FROM {} WHERE \"{}\" = $1",
            SLOT_VALUE_FIELD_NAME, table, SLOT_NAME_FIELD_NAME
        );
        let upsert = format!(
            "INSERT INTO {table} (\"{name}\", \"{value}\", \"{updated}\") VALUES ($1, $2, now()) \
             ON CONFLICT (\"{name}\") DO UPDATE SET \"{value}\" = EXCLUDED.\"{value}\", \"{updated}\" = now()",
            table = table,
            name = SLOT_NAME_FIELD_NAME,
            value = SLOT_VALUE_FIELD_NAME,
            updated = UPDATED_FIELD_NAME,
        );
        let delete = format!("DELETE FROM {} WHERE \"{}\" = $1", table, SLOT_NAME_FIELD_NAME);

        Self {
            select,
            upsert,
            delete,
        }
    }
}

fn backend_error(err: sqlx::Error) -> StorageError {
    tracing::error!("{:?}", err);
    StorageError::Backend(err.to_string())
}

impl Storage for PostgresStorage {
    async fn get(&self, slot: &SlotName) -> Result<Option<String>, StorageError> {
        sqlx::query_scalar::<_, String>(&self.statements.select)
            .bind(slot.as_ref())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(backend_error)
    }

    async fn set(&self, slot: &SlotName, value: String) -> Result<(), StorageError> {
        sqlx::query(&self.statements.upsert)
            .bind(slot.as_ref())
            .bind(value)
            .execute(self.database.database_pool())
            .await
            .map(|_| ())
            .map_err(backend_error)
    }

    async fn delete(&self, slot: &SlotName) -> Result<(), StorageError> {
        sqlx::query(&self.statements.delete)
            .bind(slot.as_ref())
            .execute(self.database.database_pool())
            .await
            .map(|_| ())
            .map_err(backend_error)
    }
}
