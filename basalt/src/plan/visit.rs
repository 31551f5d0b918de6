//! Double dispatch over plan nodes.
//!
//! [`accept`] selects the `visit_*` method matching the node's operator and hands it the node,
//! the typed payload and the caller's context. Every `visit_*` method falls back to
//! [`PlanVisitor::visit`], so a visitor only overrides the variants it cares about.

use crate::error::BasaltResult;
use crate::operator::LogicalOperator::*;
use crate::operator::{
    Filter, Join, Limit, Projection, TableScan, TableSink, UnboundRelation, UnboundTableSink,
};
use crate::plan::PlanNodeRef;

pub trait PlanVisitor {
    /// Context
    type C;
    type R;

    fn visit(&mut self, plan: &PlanNodeRef, context: &mut Self::C) -> BasaltResult<Self::R>;

    fn visit_unbound_relation(
        &mut self,
        plan: &PlanNodeRef,
        _relation: &UnboundRelation,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_unbound_table_sink(
        &mut self,
        plan: &PlanNodeRef,
        _sink: &UnboundTableSink,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_scan(
        &mut self,
        plan: &PlanNodeRef,
        _scan: &TableScan,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_filter(
        &mut self,
        plan: &PlanNodeRef,
        _filter: &Filter,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_projection(
        &mut self,
        plan: &PlanNodeRef,
        _projection: &Projection,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_join(
        &mut self,
        plan: &PlanNodeRef,
        _join: &Join,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_limit(
        &mut self,
        plan: &PlanNodeRef,
        _limit: &Limit,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }

    fn visit_table_sink(
        &mut self,
        plan: &PlanNodeRef,
        _sink: &TableSink,
        context: &mut Self::C,
    ) -> BasaltResult<Self::R> {
        self.visit(plan, context)
    }
}

/// Dispatches `plan` to the visitor method of its operator and returns the result unchanged.
pub fn accept<V>(plan: &PlanNodeRef, visitor: &mut V, context: &mut V::C) -> BasaltResult<V::R>
where
    V: PlanVisitor + ?Sized,
{
    match plan.operator() {
        LogicalUnboundRelation(relation) => visitor.visit_unbound_relation(plan, relation, context),
        LogicalUnboundTableSink(sink) => visitor.visit_unbound_table_sink(plan, sink, context),
        LogicalScan(scan) => visitor.visit_scan(plan, scan, context),
        LogicalFilter(filter) => visitor.visit_filter(plan, filter, context),
        LogicalProjection(projection) => visitor.visit_projection(plan, projection, context),
        LogicalJoin(join) => visitor.visit_join(plan, join, context),
        LogicalLimit(limit) => visitor.visit_limit(plan, limit, context),
        LogicalTableSink(sink) => visitor.visit_table_sink(plan, sink, context),
    }
}

/// Method form of [`accept`].
pub trait Accept {
    fn accept<V: PlanVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut V::C,
    ) -> BasaltResult<V::R>;
}

impl Accept for PlanNodeRef {
    fn accept<V: PlanVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut V::C,
    ) -> BasaltResult<V::R> {
        accept(self, visitor, context)
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::{JoinType, Operator};

    use crate::error::BasaltResult;
    use crate::expr::{binary_expr, col, lit};
    use crate::operator::{Limit, UnboundRelation};
    use crate::plan::{Accept, LogicalPlanBuilder, PlanNodeRef, PlanVisitor};

    /// Collects leaf names and sums limits, everything else just recurses.
    #[derive(Default)]
    struct Collector {
        relations: Vec<String>,
    }

    impl PlanVisitor for Collector {
        type C = usize;
        type R = ();

        fn visit(&mut self, plan: &PlanNodeRef, context: &mut usize) -> BasaltResult<()> {
            for input in plan.inputs() {
                input.accept(self, context)?;
            }
            Ok(())
        }

        fn visit_unbound_relation(
            &mut self,
            _plan: &PlanNodeRef,
            relation: &UnboundRelation,
            _context: &mut usize,
        ) -> BasaltResult<()> {
            self.relations.push(relation.name_parts().join("."));
            Ok(())
        }

        fn visit_limit(
            &mut self,
            plan: &PlanNodeRef,
            limit: &Limit,
            context: &mut usize,
        ) -> BasaltResult<()> {
            *context += limit.limit();
            self.visit(plan, context)
        }
    }

    struct Depth;

    impl PlanVisitor for Depth {
        type C = ();
        type R = usize;

        fn visit(&mut self, plan: &PlanNodeRef, context: &mut ()) -> BasaltResult<usize> {
            let mut depth = 0;
            for input in plan.inputs() {
                depth = depth.max(input.accept(self, context)?);
            }
            Ok(depth + 1)
        }
    }

    #[test]
    fn test_dispatch_by_variant() {
        let right = LogicalPlanBuilder::unbound_relation(["db1", "t2"])
            .limit(3)
            .build();
        let plan = LogicalPlanBuilder::unbound_relation(["t1"])
            .filter(binary_expr(col("c1"), Operator::Gt, lit(1i64)))
            .join(JoinType::Inner, None, right)
            .limit(10)
            .build();

        let mut collector = Collector::default();
        let mut total_limit = 0;
        plan.accept(&mut collector, &mut total_limit).unwrap();

        assert_eq!(vec!["t1".to_string(), "db1.t2".to_string()], collector.relations);
        assert_eq!(13, total_limit);
        assert_eq!(4, plan.accept(&mut Depth, &mut ()).unwrap());
    }
}
