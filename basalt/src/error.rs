use thiserror::Error;

use crate::operator::Arity;

pub type BasaltResult<T> = Result<T, BasaltError>;

#[derive(Debug, Error)]
pub enum BasaltError {
    /// A resolved property was read from a plan that still carries raw names.
    #[error("can't read {0} of an unbound plan")]
    UnboundAccess(String),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("{operator} expects {expected} inputs, but got {actual}")]
    Arity {
        operator: String,
        expected: Arity,
        actual: usize,
    },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl BasaltError {
    pub fn unbound<S: Into<String>>(what: S) -> Self {
        BasaltError::UnboundAccess(what.into())
    }

    pub fn unsupported<S: Into<String>>(what: S) -> Self {
        BasaltError::UnsupportedOperation(what.into())
    }

    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            BasaltError::Resolution(e) => Some(e),
            _ => None,
        }
    }
}

/// Failures of the binder. Every variant names the object it failed on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("table {name} not found")]
    TableNotFound { name: String },
    #[error("table {name} is ambiguous, candidates: {candidates:?}")]
    AmbiguousTable {
        name: String,
        candidates: Vec<String>,
    },
    #[error("{name} is a {found}, expected {expected}")]
    WrongObjectKind {
        name: String,
        expected: String,
        found: String,
    },
    #[error("invalid table name {name}")]
    InvalidTableName { name: String },
    #[error("no database selected to resolve {name}")]
    NoCurrentDatabase { name: String },
    #[error("column {name} not found")]
    ColumnNotFound { name: String },
    #[error("column {name} is ambiguous, candidates: {candidates:?}")]
    AmbiguousColumn {
        name: String,
        candidates: Vec<String>,
    },
    #[error("column {column} of {table} is specified more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("{} partition {partition} not found in {table}", namespace(.temporary))]
    PartitionNotFound {
        table: String,
        partition: String,
        temporary: bool,
    },
    #[error("table {table} does not support partial update")]
    PartialUpdateNotSupported { table: String },
    #[error("partial update of {table} must include key column {column}")]
    MissingKeyColumn { table: String, column: String },
    #[error("{table} expects {expected} columns, but the query produces {actual}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },
    #[error("{expr} is not allowed in {context}")]
    UnexpectedExpression { expr: String, context: String },
}

impl ResolutionError {
    /// The qualified name or path the binder failed to resolve.
    pub fn path(&self) -> &str {
        match self {
            ResolutionError::TableNotFound { name }
            | ResolutionError::AmbiguousTable { name, .. }
            | ResolutionError::WrongObjectKind { name, .. }
            | ResolutionError::InvalidTableName { name }
            | ResolutionError::NoCurrentDatabase { name }
            | ResolutionError::ColumnNotFound { name }
            | ResolutionError::AmbiguousColumn { name, .. } => name,
            ResolutionError::DuplicateColumn { column, .. }
            | ResolutionError::MissingKeyColumn { column, .. } => column,
            ResolutionError::PartitionNotFound { partition, .. } => partition,
            ResolutionError::PartialUpdateNotSupported { table }
            | ResolutionError::ColumnCountMismatch { table, .. } => table,
            ResolutionError::UnexpectedExpression { expr, .. } => expr,
        }
    }
}

fn namespace(temporary: &bool) -> &'static str {
    if *temporary {
        "temporary"
    } else {
        "regular"
    }
}
