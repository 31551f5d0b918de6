use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::RwLock;

use crate::catalog::{Catalog, LookupError, QualifiedName, TableDesc, TableRef};

/// A catalog kept entirely in memory.
///
/// Names are matched case insensitively unless the catalog is created with
/// [`MemoryCatalog::case_sensitive`]. An exact match always wins, otherwise several tables whose
/// names only differ in case make the lookup ambiguous.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<HashMap<QualifiedName, TableRef>>,
    case_sensitive: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            case_sensitive: true,
        }
    }

    /// Registers a table, replacing any table with the same name.
    pub fn register_table(&self, table: TableDesc) -> TableRef {
        let table = Arc::new(table);
        self.tables
            .write()
            .insert(table.name().clone(), table.clone());
        table
    }

    pub fn deregister_table(&self, name: &QualifiedName) -> Option<TableRef> {
        self.tables.write().remove(name)
    }

    pub fn table_names(&self) -> Vec<QualifiedName> {
        self.tables.read().keys().cloned().sorted().collect()
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, name: &QualifiedName) -> Result<TableRef, LookupError> {
        let tables = self.tables.read();
        if let Some(table) = tables.get(name) {
            return Ok(table.clone());
        }

        if self.case_sensitive {
            return Err(LookupError::NotFound);
        }

        let mut candidates = tables
            .values()
            .filter(|t| t.name().eq_ignore_case(name))
            .sorted_by_key(|t| t.name().clone())
            .collect::<Vec<_>>();

        match candidates.len() {
            0 => Err(LookupError::NotFound),
            1 => Ok(candidates.remove(0).clone()),
            _ => Err(LookupError::Ambiguous(
                candidates.iter().map(|t| t.name().to_string()).collect(),
            )),
        }
    }
}
