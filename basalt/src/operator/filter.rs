use std::fmt::Formatter;

use crate::error::BasaltResult;
use crate::expr::ScalarExpr;
use crate::operator::{input_prop, Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Filter {
    predicate: ScalarExpr,
}

impl Filter {
    pub fn new(predicate: ScalarExpr) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &ScalarExpr {
        &self.predicate
    }
}

impl OperatorTrait for Filter {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn is_unbound(&self) -> bool {
        self.predicate.is_unbound()
    }

    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Ok(vec![&self.predicate])
    }

    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        if self.is_unbound() {
            return Ok(LogicalProperty::Unbound);
        }
        let input = input_prop(inputs, 0)?;
        input.output()?;
        Ok(input.clone())
    }
}

impl DisplayFields for Filter {
    fn display(&self, fmt: &mut Formatter) -> std::fmt::Result {
        fmt.debug_struct("")
            .field("predicate", &format_args!("{}", self.predicate))
            .finish()
    }
}
