//! Catalog contract consumed by the binder.
//!
//! Storage and caching of metadata belong to the surrounding engine. The binder only needs to
//! turn a fully qualified name into a table handle, and a partition name into a partition
//! handle. Lookups are synchronous and expected to be served from memory.

mod memory;
pub use memory::*;
mod table;
pub use table::*;

use std::fmt::{Debug, Display, Formatter};

/// Fully qualified table name: `catalog.database.table`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    catalog: String,
    database: String,
    table: String,
}

impl QualifiedName {
    pub fn new<C, D, T>(catalog: C, database: D, table: T) -> Self
    where
        C: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            catalog: catalog.into(),
            database: database.into(),
            table: table.into(),
        }
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn parts(&self) -> Vec<String> {
        vec![
            self.catalog.clone(),
            self.database.clone(),
            self.table.clone(),
        ]
    }

    /// Compares ignoring ASCII case.
    pub fn eq_ignore_case(&self, other: &QualifiedName) -> bool {
        self.catalog.eq_ignore_ascii_case(&other.catalog)
            && self.database.eq_ignore_ascii_case(&other.database)
            && self.table.eq_ignore_ascii_case(&other.table)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.database, self.table)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    /// More than one object matches, carries the names of all candidates.
    Ambiguous(Vec<String>),
}

/// Metadata lookup used during binding.
pub trait Catalog: Debug + Send + Sync {
    fn table(&self, name: &QualifiedName) -> Result<TableRef, LookupError>;

    fn partition(
        &self,
        table: &TableDesc,
        name: &str,
        temporary: bool,
    ) -> Option<PartitionDesc> {
        table.partition(name, temporary).cloned()
    }
}
