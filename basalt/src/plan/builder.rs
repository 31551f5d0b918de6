use std::sync::Arc;

use datafusion_expr::JoinType;

use crate::catalog::TableRef;
use crate::expr::{ExprIdGenerator, ScalarExpr};
use crate::operator::LogicalOperator::{
    LogicalFilter, LogicalJoin, LogicalLimit, LogicalProjection, LogicalScan, LogicalTableSink,
    LogicalUnboundRelation, LogicalUnboundTableSink,
};
use crate::operator::{
    Filter, Join, Limit, LogicalOperator, Projection, TableScan, TableSink, UnboundRelation,
    UnboundTableSink,
};
use crate::plan::{PlanNode, PlanNodeRef};

/// Builds a plan bottom up, each call puts a new root on top of the current one.
///
/// Every method supplies exactly the inputs its operator expects.
pub struct LogicalPlanBuilder {
    root: PlanNodeRef,
}

impl LogicalPlanBuilder {
    fn leaf(operator: LogicalOperator) -> Self {
        Self {
            root: Arc::new(PlanNode::new_unchecked(operator, vec![])),
        }
    }

    fn reset_root(self, operator: LogicalOperator) -> Self {
        Self {
            root: Arc::new(PlanNode::new_unchecked(operator, vec![self.root])),
        }
    }

    pub fn unbound_relation<I, S>(name_parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::leaf(LogicalUnboundRelation(UnboundRelation::new(name_parts)))
    }

    /// Scan of `table`, allocating one slot per column from `ids`.
    pub fn scan(table: TableRef, ids: &ExprIdGenerator) -> Self {
        let qualifier = table.name().parts();
        Self::leaf(LogicalScan(TableScan::new(table, qualifier, ids)))
    }

    pub fn filter(self, predicate: ScalarExpr) -> Self {
        self.reset_root(LogicalFilter(Filter::new(predicate)))
    }

    pub fn project<I: IntoIterator<Item = ScalarExpr>>(self, exprs: I) -> Self {
        self.reset_root(LogicalProjection(Projection::new(exprs)))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.reset_root(LogicalLimit(Limit::new(limit)))
    }

    pub fn offset_limit(self, offset: usize, limit: usize) -> Self {
        self.reset_root(LogicalLimit(Limit::with_offset(limit, offset)))
    }

    /// Joins the current root (left) with `right`.
    pub fn join(self, join_type: JoinType, condition: Option<ScalarExpr>, right: PlanNodeRef) -> Self {
        let join = Join::new(join_type, condition);
        Self {
            root: Arc::new(PlanNode::new_unchecked(
                LogicalJoin(join),
                vec![self.root, right],
            )),
        }
    }

    pub fn sink(self, sink: UnboundTableSink) -> Self {
        self.reset_root(LogicalUnboundTableSink(sink))
    }

    pub fn table_sink(self, sink: TableSink) -> Self {
        self.reset_root(LogicalTableSink(sink))
    }

    pub fn build(self) -> PlanNodeRef {
        self.root
    }
}

impl From<PlanNodeRef> for LogicalPlanBuilder {
    fn from(root: PlanNodeRef) -> Self {
        Self { root }
    }
}
