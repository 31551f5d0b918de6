use std::fmt::Formatter;

use itertools::Itertools;

use crate::error::BasaltResult;
use crate::operator::{Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

/// A relation referenced by name, as written in the query.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct UnboundRelation {
    name_parts: Vec<String>,
}

impl UnboundRelation {
    pub fn new<I, S>(name_parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name_parts: name_parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name_parts(&self) -> &[String] {
        &self.name_parts
    }
}

impl OperatorTrait for UnboundRelation {
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn is_unbound(&self) -> bool {
        true
    }

    fn derive_logical_prop(&self, _inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        Ok(LogicalProperty::Unbound)
    }
}

impl DisplayFields for UnboundRelation {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("name", &format_args!("{}", self.name_parts.iter().join(".")))
            .finish()
    }
}
