//! Bulk import of the agent platform CSV dump.
//!
//! An import is destructive: it drops every table, recreates the schema and loads one CSV file
//! per table from the given folder. The reset and the load run in one transaction, so a failed
//! import leaves the database exactly as it was and a successful one always starts from empty
//! tables. Importing the same folder twice therefore yields the same state.
//!
//! File layout:
//! - one file per table, named as in [`crate::db::schema::TABLES`] (`User.csv`, `BaseModel.csv`, ...)
//! - the first row is a header and is skipped
//! - fields are positional in table column order
//! - a field equal to the configured NULL token is loaded as SQL NULL
//!
//! Missing files are skipped and leave their table empty.

use std::fmt;
use std::path::{Path, PathBuf};

use sqlx::{Connection, PgConnection};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::db::errors::DbError;
use crate::db::schema::{self, TableSchema, TABLES};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}, line {line}: expected {expected} fields, found {found}", .path.display())]
    FieldCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to load {table}, line {line}: {source}")]
    Row {
        table: &'static str,
        line: u64,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<sqlx::Error> for ImportError {
    fn from(err: sqlx::Error) -> Self {
        ImportError::Database(err.into())
    }
}

/// One parsed CSV record: its line number and the values to bind, `None` meaning NULL.
type Record = (u64, Vec<Option<String>>);

/// Rows loaded per table, in load order. Tables whose file was absent are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub tables: Vec<(&'static str, usize)>,
}

impl ImportSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|(name, _)| *name == table).map(|(_, rows)| *rows)
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.tables.iter().map(|(name, rows)| format!("{name}={rows}")).collect();
        write!(f, "{}", parts.join(" "))
    }
}

pub struct Importer<'c> {
    db: &'c mut PgConnection,
    null_token: String,
}

impl<'c> Importer<'c> {
    pub fn new(db: &'c mut PgConnection, null_token: impl Into<String>) -> Self {
        Self {
            db,
            null_token: null_token.into(),
        }
    }

    /// Reset the schema and load every CSV file present in `folder`, atomically.
    #[instrument(skip(self, folder), fields(folder = %folder.display()), err)]
    pub async fn run(&mut self, folder: &Path) -> Result<ImportSummary, ImportError> {
        if !folder.is_dir() {
            return Err(ImportError::NotADirectory {
                path: folder.to_path_buf(),
            });
        }

        // Parse everything up front so a malformed file fails before any DDL runs
        let mut pending = Vec::new();
        for table in TABLES {
            let path = folder.join(table.file_name);
            if !path.is_file() {
                debug!(table = table.name, path = %path.display(), "no file, leaving table empty");
                continue;
            }
            let records = self.read_records(table, &path)?;
            pending.push((table, records));
        }

        let mut tx = self.db.begin().await?;
        schema::reset(&mut tx).await?;

        let mut summary = ImportSummary::default();
        for (table, records) in pending {
            let rows = load_table(&mut tx, table, records).await?;
            summary.tables.push((table.name, rows));
        }

        tx.commit().await?;

        info!(rows = summary.total_rows(), %summary, "import complete");
        Ok(summary)
    }

    fn read_records(&self, table: &TableSchema, path: &Path) -> Result<Vec<Record>, ImportError> {
        let csv_error = |source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        let expected = table.columns.len();
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != expected {
                return Err(ImportError::FieldCount {
                    path: path.to_path_buf(),
                    line,
                    expected,
                    found: record.len(),
                });
            }

            let values = record
                .iter()
                .map(|field| (field != self.null_token).then(|| field.to_string()))
                .collect();
            records.push((line, values));
        }

        Ok(records)
    }
}

async fn load_table(conn: &mut PgConnection, table: &'static TableSchema, records: Vec<Record>) -> Result<usize, ImportError> {
    let statement = table.insert_statement();
    let rows = records.len();

    for (line, values) in records {
        let mut query = sqlx::query(&statement);
        for value in values {
            query = query.bind(value);
        }
        query.execute(&mut *conn).await.map_err(|e| ImportError::Row {
            table: table.name,
            line,
            source: e.into(),
        })?;
    }

    debug!(table = table.name, rows, "table loaded");
    Ok(rows)
}
