use std::fmt::Debug;
use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{Catalog, MemoryCatalog};
use crate::error::{BasaltError, BasaltResult};
use crate::expr::{ExprId, ExprIdGenerator};

/// Name of the catalog holding regular tables.
pub const INTERNAL_CATALOG: &str = "internal";

/// Per session settings consulted during binding.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionVariables {
    pub current_catalog: String,
    pub current_database: Option<String>,
    /// Whether column names are compared case sensitively.
    pub case_sensitive: bool,
}

impl Default for SessionVariables {
    fn default() -> Self {
        Self {
            current_catalog: INTERNAL_CATALOG.to_string(),
            current_database: None,
            case_sensitive: false,
        }
    }
}

impl SessionVariables {
    pub fn from_json(json: &str) -> BasaltResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            BasaltError::unsupported(format!("invalid session variables: {}", e))
        })
    }

    pub fn with_current_database<S: Into<String>>(mut self, database: S) -> Self {
        self.current_database = Some(database.into());
        self
    }
}

/// Context for optimization. Includes access to catalog, session variables.
///
/// Cloning shares the catalog and the expression id generator, so ids stay unique across
/// clones of one statement's context.
#[derive(Clone, Debug)]
pub struct OptimizerContext {
    pub catalog: Arc<dyn Catalog>,
    pub session: SessionVariables,
    expr_id_gen: Arc<ExprIdGenerator>,
}

impl Default for OptimizerContext {
    fn default() -> Self {
        Self::new(Arc::new(MemoryCatalog::default()), SessionVariables::default())
    }
}

impl OptimizerContext {
    pub fn new(catalog: Arc<dyn Catalog>, session: SessionVariables) -> Self {
        Self {
            catalog,
            session,
            expr_id_gen: Arc::new(ExprIdGenerator::new()),
        }
    }

    pub fn next_expr_id(&self) -> ExprId {
        self.expr_id_gen.next_id()
    }

    pub fn expr_id_gen(&self) -> &ExprIdGenerator {
        &self.expr_id_gen
    }
}
