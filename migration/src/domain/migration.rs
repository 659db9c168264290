use std::collections::HashSet;

use crate::domain::persistence::Persistence;
use crate::domain::tables::{Column, Table, storage_tables};

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

#[derive(Debug)]
pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = vec![
            format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", database_schema),
            create_table_ddl(database_schema, table),
        ];
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// Brings the database schema in line with what the storage adapter expects
pub struct Migration<P: Persistence> {
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    /// returns the number of applied steps
    pub async fn migrate(&self) -> Result<usize, anyhow::Error> {
        let existing = self.persistence.load().await?;
        let steps = migration_steps(self.persistence.database_schema(), storage_tables(), &existing);
        let count = steps.len();

        if count == 0 {
            tracing::info!("schema is up to date");
            return Ok(0);
        }

        self.persistence.apply_migration_steps(steps).await?;
        tracing::info!(steps = count, "schema migrated");
        Ok(count)
    }
}

/// One step per needed table missing from `existing`
pub fn migration_steps(
    database_schema: &str,
    needed: Vec<Table>,
    existing: &HashSet<String>,
) -> Vec<CreateTableStep> {
    needed
        .iter()
        .filter(|table| !existing.contains(&table.name))
        .map(|table| CreateTableStep::new(database_schema, table))
        .collect()
}

fn create_table_ddl(schema: &str, table: &Table) -> String {
    let columns: Vec<String> = table.columns.iter().map(column_ddl).collect();
    let pk_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|column| column.primary_key)
        .map(|column| format!("\"{}\"", column.name))
        .collect();

    format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema,
        table.name,
        columns.join(",\n    "),
        pk_columns.join(",")
    )
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(&format!(" DEFAULT {}", default_value));
    }
    sql
}
