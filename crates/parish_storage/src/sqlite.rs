//! SQLite relational backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::record::{FieldMap, RawRecord};
use crate::schema::{ColumnSpec, ColumnType, TableSpec};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;

/// A SQLite-backed storage backend.
///
/// Each entity kind gets one table, created from the [`TableSpec`]s
/// supplied at open. Every table carries `id TEXT PRIMARY KEY` plus
/// `created_at`/`updated_at` text columns, followed by the kind-specific
/// columns the descriptor lists.
///
/// A transaction is held open at all times: `upsert` and `remove`
/// execute inside it, and [`persist`](StorageBackend::persist) commits
/// before opening the next one. Closing the backend rolls back whatever
/// was staged.
pub struct SqliteBackend {
    conn: Connection,
    specs: Vec<TableSpec>,
    closed: bool,
}

impl SqliteBackend {
    /// Opens a database file, creating the schema if needed.
    ///
    /// With `reset` set, every spec'd table is dropped and recreated
    /// first. This is the test-environment mode; it destroys all data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: &Path, specs: &[TableSpec], reset: bool) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, specs, reset)
    }

    /// Opens an in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory(specs: &[TableSpec]) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, specs, false)
    }

    fn from_connection(conn: Connection, specs: &[TableSpec], reset: bool) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;

        if reset {
            for spec in specs {
                conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quoted(spec.table)))?;
            }
        }
        for spec in specs {
            conn.execute_batch(&create_sql(spec))?;
        }

        conn.execute_batch("BEGIN")?;

        Ok(Self {
            conn,
            specs: specs.to_vec(),
            closed: false,
        })
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    fn spec_for(&self, kind: &str) -> StorageResult<&TableSpec> {
        self.specs
            .iter()
            .find(|spec| spec.kind == kind)
            .ok_or_else(|| StorageError::UnknownKind(kind.to_owned()))
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("tables", &self.specs.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

fn quoted(name: &str) -> String {
    format!("\"{name}\"")
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Integer | ColumnType::Bool => "INTEGER",
        ColumnType::Real => "REAL",
    }
}

fn create_sql(spec: &TableSpec) -> String {
    let mut columns = vec![
        "\"id\" TEXT PRIMARY KEY".to_owned(),
        "\"created_at\" TEXT NOT NULL".to_owned(),
        "\"updated_at\" TEXT NOT NULL".to_owned(),
    ];
    for column in spec.columns {
        let constraint = if column.required { " NOT NULL" } else { "" };
        columns.push(format!(
            "{} {}{constraint}",
            quoted(column.name),
            sql_type(column.ty)
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(spec.table),
        columns.join(", ")
    )
}

fn insert_sql(spec: &TableSpec) -> String {
    let mut names = vec!["\"id\"".to_owned(), "\"created_at\"".to_owned(), "\"updated_at\"".to_owned()];
    names.extend(spec.columns.iter().map(|c| quoted(c.name)));
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
        quoted(spec.table),
        names.join(", "),
        placeholders.join(", ")
    )
}

fn select_sql(spec: &TableSpec) -> String {
    let mut names = vec!["\"id\"".to_owned(), "\"created_at\"".to_owned(), "\"updated_at\"".to_owned()];
    names.extend(spec.columns.iter().map(|c| quoted(c.name)));
    format!("SELECT {} FROM {}", names.join(", "), quoted(spec.table))
}

fn required_text(record: &RawRecord, field: &str) -> StorageResult<String> {
    record
        .fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            StorageError::Corrupted(format!(
                "record {} is missing text field `{field}`",
                record.key()
            ))
        })
}

fn to_sql_value(column: &ColumnSpec, value: Option<&Value>) -> StorageResult<SqlValue> {
    let missing = || {
        StorageError::Corrupted(format!(
            "required column `{}` is missing or has the wrong type",
            column.name
        ))
    };

    let value = match value {
        None | Some(Value::Null) => {
            return if column.required {
                Err(missing())
            } else {
                Ok(SqlValue::Null)
            };
        }
        Some(value) => value,
    };

    match column.ty {
        ColumnType::Text => value
            .as_str()
            .map(|s| SqlValue::Text(s.to_owned()))
            .ok_or_else(missing),
        ColumnType::Integer => value.as_i64().map(SqlValue::Integer).ok_or_else(missing),
        ColumnType::Real => value.as_f64().map(SqlValue::Real).ok_or_else(missing),
        ColumnType::Bool => value
            .as_bool()
            .map(|b| SqlValue::Integer(i64::from(b)))
            .ok_or_else(missing),
    }
}

impl StorageBackend for SqliteBackend {
    fn load_all(&self) -> StorageResult<Vec<RawRecord>> {
        self.ensure_open()?;

        let mut records = Vec::new();
        for spec in &self.specs {
            let mut stmt = self.conn.prepare(&select_sql(spec))?;
            let mut rows = stmt.query([])?;

            while let Some(row) = rows.next()? {
                let id: String = row.get(0)?;
                let created_at: String = row.get(1)?;
                let updated_at: String = row.get(2)?;

                let mut fields = FieldMap::new();
                fields.insert("type_tag".to_owned(), Value::String(spec.kind.to_owned()));
                fields.insert("id".to_owned(), Value::String(id.clone()));
                fields.insert("created_at".to_owned(), Value::String(created_at));
                fields.insert("updated_at".to_owned(), Value::String(updated_at));

                for (i, column) in spec.columns.iter().enumerate() {
                    let idx = 3 + i;
                    let value = match column.ty {
                        ColumnType::Text => {
                            row.get::<_, Option<String>>(idx)?.map(Value::String)
                        }
                        ColumnType::Integer => {
                            row.get::<_, Option<i64>>(idx)?.map(Value::from)
                        }
                        ColumnType::Real => row.get::<_, Option<f64>>(idx)?.map(Value::from),
                        ColumnType::Bool => {
                            row.get::<_, Option<i64>>(idx)?.map(|v| Value::Bool(v != 0))
                        }
                    };
                    if let Some(value) = value {
                        fields.insert(column.name.to_owned(), value);
                    }
                }

                records.push(RawRecord::new(spec.kind, id, fields));
            }
        }
        Ok(records)
    }

    fn upsert(&mut self, record: &RawRecord) -> StorageResult<()> {
        self.ensure_open()?;
        let spec = self.spec_for(&record.kind)?;

        let mut values = vec![
            SqlValue::Text(record.id.clone()),
            SqlValue::Text(required_text(record, "created_at")?),
            SqlValue::Text(required_text(record, "updated_at")?),
        ];
        for column in spec.columns {
            values.push(to_sql_value(column, record.fields.get(column.name))?);
        }

        self.conn
            .execute(&insert_sql(spec), params_from_iter(values))?;
        Ok(())
    }

    fn remove(&mut self, kind: &str, id: &str) -> StorageResult<()> {
        self.ensure_open()?;
        let spec = self.spec_for(kind)?;
        self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", quoted(spec.table)),
            params![id],
        )?;
        Ok(())
    }

    fn persist(&mut self) -> StorageResult<()> {
        self.ensure_open()?;
        self.conn.execute_batch("COMMIT")?;
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn close(&mut self) -> StorageResult<()> {
        if !self.closed {
            // Discard staged mutations; committed state stays durable
            let _ = self.conn.execute_batch("ROLLBACK");
            self.closed = true;
        }
        Ok(())
    }
}
