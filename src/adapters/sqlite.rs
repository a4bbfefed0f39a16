use crate::core::reports::{ColumnKind, ReportQuery};
use crate::core::{ReportSource, Row, Value};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags, ToSql};
use std::path::{Path, PathBuf};

/// Read-only SQLite access. Every fetch opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, message: impl Into<String>) -> ReportError {
        ReportError::DataStoreUnavailable {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }

    fn open(&self) -> Result<Connection> {
        // SQLite would otherwise create an empty file
        if !self.path.is_file() {
            return Err(self.unavailable("database file does not exist"));
        }
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| self.unavailable(e.to_string()))
    }

    /// Checks that the database can be opened and read.
    pub async fn ping(&self) -> Result<()> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = source.open()?;
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(|e| source.unavailable(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| self.unavailable(format!("blocking task failed: {}", e)))?
    }

    fn fetch_blocking(&self, query: &ReportQuery) -> Result<Vec<Row>> {
        let conn = self.open()?;
        // The header and schema are first read here, not at open
        let mut stmt = conn.prepare(&query.sql).map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::NotADatabase | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                self.unavailable(e.to_string())
            }
            _ => ReportError::Query(e),
        })?;
        let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
            let mut out = Row::new();
            for (idx, column) in query.columns.iter().enumerate() {
                let value = convert(row.get_ref(idx)?, column.kind);
                out.push(column.name, value);
            }
            Ok(out)
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[async_trait]
impl ReportSource for SqliteSource {
    async fn fetch(&self, query: &ReportQuery) -> Result<Vec<Row>> {
        let source = self.clone();
        let query = query.clone();
        tokio::task::spawn_blocking(move || source.fetch_blocking(&query))
            .await
            .map_err(|e| self.unavailable(format!("blocking task failed: {}", e)))?
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::ToSqlOutput;
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Integer(v) => ToSqlOutput::from(*v),
            Value::Real(v) => ToSqlOutput::from(*v),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Boolean(b) => ToSqlOutput::from(*b),
        })
    }
}

fn convert(raw: ValueRef<'_>, kind: ColumnKind) -> Value {
    match (raw, kind) {
        (ValueRef::Null, _) => Value::Null,
        (ValueRef::Integer(v), ColumnKind::Flag) => Value::Boolean(v != 0),
        (ValueRef::Integer(v), ColumnKind::Real) => Value::Real(v as f64),
        (ValueRef::Real(v), _) => Value::Real(v),
        (ValueRef::Integer(v), ColumnKind::Text) => Value::Integer(v),
        (ValueRef::Text(bytes), _) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        (ValueRef::Blob(bytes), _) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}
