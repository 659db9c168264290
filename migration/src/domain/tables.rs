use artconnect_common::{
    SLOT_NAME_FIELD_NAME, SLOT_VALUE_FIELD_NAME, STORAGE_TABLE_NAME, UPDATED_FIELD_NAME,
};

/// Represents table in a database, used for ddl generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Represents one column in the database table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(
        name: T,
        column_type: T,
        not_null: bool,
        default_value: Option<T>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null,
            primary_key: false,
            default_value: default_value.map(T::into),
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: T) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null: false,
            primary_key: true,
            default_value: None,
        }
    }
}

/// Tables the storage adapter expects: one row per named slot
pub fn storage_tables() -> Vec<Table> {
    vec![Table::new(
        STORAGE_TABLE_NAME,
        vec![
            Column::primary_key(SLOT_NAME_FIELD_NAME, "TEXT"),
            Column::new(SLOT_VALUE_FIELD_NAME, "TEXT", true, None),
            Column::new(UPDATED_FIELD_NAME, "TIMESTAMP", true, Some("now()")),
        ],
    )]
}
