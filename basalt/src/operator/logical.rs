use enum_as_inner::EnumAsInner;
use std::fmt::{Display, Formatter};

use crate::error::BasaltResult;
use crate::expr::ScalarExpr;
use crate::operator::{Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;
use crate::operator::{
    Filter, Join, Limit, Projection, TableScan, TableSink, UnboundRelation, UnboundTableSink,
};
use enum_dispatch::enum_dispatch;
use strum_macros::AsRefStr;

/// Logical relational operator.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EnumAsInner, AsRefStr)]
#[enum_dispatch(OperatorTrait, DisplayFields)]
pub enum LogicalOperator {
    LogicalUnboundRelation(UnboundRelation),
    LogicalUnboundTableSink(UnboundTableSink),
    LogicalScan(TableScan),
    LogicalFilter(Filter),
    LogicalProjection(Projection),
    LogicalJoin(Join),
    LogicalLimit(Limit),
    LogicalTableSink(TableSink),
}

impl LogicalOperator {
    pub fn name(&self) -> &str {
        self.as_ref()
    }

    pub fn is_sink(&self) -> bool {
        matches!(
            self,
            LogicalOperator::LogicalUnboundTableSink(_) | LogicalOperator::LogicalTableSink(_)
        )
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}
