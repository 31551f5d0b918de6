use std::fmt::Formatter;

use datafusion_expr::JoinType;

use crate::error::BasaltResult;
use crate::expr::{ScalarExpr, Slot};
use crate::operator::{input_prop, Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Join {
    join_type: JoinType,
    condition: Option<ScalarExpr>,
}

impl Join {
    pub fn new(join_type: JoinType, condition: Option<ScalarExpr>) -> Self {
        Self {
            join_type,
            condition,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> Option<&ScalarExpr> {
        self.condition.as_ref()
    }
}

fn nullable(slots: &[Slot]) -> impl Iterator<Item = Slot> + '_ {
    slots.iter().map(|s| s.with_nullable(true))
}

impl OperatorTrait for Join {
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn is_unbound(&self) -> bool {
        self.condition.as_ref().map_or(false, ScalarExpr::is_unbound)
    }

    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Ok(self.condition.iter().collect())
    }

    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        if self.is_unbound() {
            return Ok(LogicalProperty::Unbound);
        }
        let left = input_prop(inputs, 0)?.output()?;
        let right = input_prop(inputs, 1)?.output()?;

        let output: Vec<Slot> = match self.join_type {
            JoinType::Inner => left.iter().chain(right).cloned().collect(),
            JoinType::Left => left.iter().cloned().chain(nullable(right)).collect(),
            JoinType::Right => nullable(left).chain(right.iter().cloned()).collect(),
            JoinType::Full => nullable(left).chain(nullable(right)).collect(),
            JoinType::LeftSemi | JoinType::LeftAnti => left.to_vec(),
            JoinType::RightSemi | JoinType::RightAnti => right.to_vec(),
        };
        Ok(LogicalProperty::new(output))
    }
}

impl DisplayFields for Join {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("join_type", &self.join_type);
        if let Some(condition) = &self.condition {
            s.field("condition", &format_args!("{}", condition));
        }
        s.finish()
    }
}
