use std::fmt::Formatter;

use itertools::Itertools;

use crate::error::BasaltResult;
use crate::expr::ScalarExpr;
use crate::operator::{input_prop, Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Projection {
    exprs: Vec<ScalarExpr>,
}

impl Projection {
    pub fn new<I: IntoIterator<Item = ScalarExpr>>(exprs: I) -> Self {
        Self {
            exprs: exprs.into_iter().collect(),
        }
    }

    pub fn exprs(&self) -> &[ScalarExpr] {
        &self.exprs
    }
}

impl OperatorTrait for Projection {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn is_unbound(&self) -> bool {
        self.exprs.iter().any(ScalarExpr::is_unbound)
    }

    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Ok(self.exprs.iter().collect())
    }

    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        if self.is_unbound() {
            return Ok(LogicalProperty::Unbound);
        }
        input_prop(inputs, 0)?.output()?;
        let output = self.exprs.iter().map(ScalarExpr::to_slot).try_collect()?;
        Ok(LogicalProperty::new(output))
    }
}

impl DisplayFields for Projection {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("exprs", &format_args!("[{}]", self.exprs.iter().join(", ")))
            .finish()
    }
}
