use std::fmt::Formatter;

use crate::error::BasaltResult;
use crate::operator::{input_prop, Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Limit {
    limit: usize,
    offset: usize,
}

impl Limit {
    pub fn new(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn with_offset(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl OperatorTrait for Limit {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        let input = input_prop(inputs, 0)?;
        input.output()?;
        Ok(input.clone())
    }
}

impl DisplayFields for Limit {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("limit", &self.limit);
        if self.offset > 0 {
            s.field("offset", &self.offset);
        }
        s.finish()
    }
}
