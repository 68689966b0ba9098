//! Navigation store errors
//!
//! Statement failures carry the table and the operation that failed, so a
//! broken import can be traced to the write that broke it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What a failed statement was doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Read,
    Insert,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Read => "read from",
            Self::Insert => "insert into",
            Self::Delete => "delete from",
        })
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Empty path, or its directory could not be created
    #[error("Unusable database path {path}: {reason}")]
    UnusablePath { path: PathBuf, reason: String },

    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Per-connection PRAGMA could not be applied
    #[error("Failed to apply '{pragma}': {source}")]
    PragmaFailed {
        pragma: &'static str,
        source: libsql::Error,
    },

    /// Table or index creation failed
    #[error("Failed to create {object}: {source}")]
    SchemaFailed {
        object: &'static str,
        source: libsql::Error,
    },

    #[error("Failed to {operation} {table}: {source}")]
    StatementFailed {
        operation: StoreOperation,
        table: &'static str,
        source: libsql::Error,
    },

    /// The whole batch was rolled back; `index` is `None` when BEGIN or
    /// COMMIT itself failed
    #[error("Batch rolled back at {}: {source}", describe_batch_step(.index, .table))]
    BatchRolledBack {
        index: Option<usize>,
        table: Option<&'static str>,
        source: libsql::Error,
    },

    #[error(transparent)]
    Libsql(#[from] libsql::Error),
}

fn describe_batch_step(index: &Option<usize>, table: &Option<&'static str>) -> String {
    match (*index, *table) {
        (Some(index), Some(table)) => format!("statement {} ({})", index, table),
        (Some(index), None) => format!("statement {}", index),
        (None, _) => "transaction control".to_string(),
    }
}

impl DatabaseError {
    pub fn unusable_path(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::UnusablePath {
            path,
            reason: reason.into(),
        }
    }

    /// `map_err` adapter for a failed statement against `table`
    pub fn statement(
        operation: StoreOperation,
        table: &'static str,
    ) -> impl FnOnce(libsql::Error) -> Self {
        move |source| Self::StatementFailed {
            operation,
            table,
            source,
        }
    }

    pub fn pragma(pragma: &'static str) -> impl FnOnce(libsql::Error) -> Self {
        move |source| Self::PragmaFailed { pragma, source }
    }

    pub fn schema(object: &'static str) -> impl FnOnce(libsql::Error) -> Self {
        move |source| Self::SchemaFailed { object, source }
    }

    /// Table the failing statement touched, when known
    pub fn table(&self) -> Option<&'static str> {
        match self {
            Self::StatementFailed { table, .. } => Some(*table),
            Self::BatchRolledBack { table, .. } => *table,
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<StoreOperation> {
        match self {
            Self::StatementFailed { operation, .. } => Some(*operation),
            Self::BatchRolledBack { index: Some(_), .. } => Some(StoreOperation::Insert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_failure_names_table_and_operation() {
        let err = DatabaseError::statement(StoreOperation::Delete, "sub_menus")(
            libsql::Error::Misuse("locked".to_string()),
        );
        assert_eq!(err.table(), Some("sub_menus"));
        assert_eq!(err.operation(), Some(StoreOperation::Delete));
        assert!(err.to_string().starts_with("Failed to delete from sub_menus: "));
    }

    #[test]
    fn test_batch_step_description() {
        assert_eq!(describe_batch_step(&Some(2), &Some("cards")), "statement 2 (cards)");
        assert_eq!(describe_batch_step(&None, &None), "transaction control");

        let err = DatabaseError::BatchRolledBack {
            index: None,
            table: None,
            source: libsql::Error::Misuse("commit".to_string()),
        };
        assert_eq!(err.operation(), None);
        assert!(err.table().is_none());
    }
}
