//! Name resolution.
//!
//! The binder turns a plan carrying raw names into a plan carrying resolved objects: table
//! names become [`TableScan`]s over catalog tables, column names become slots of the inputs'
//! output, and an [`UnboundTableSink`] becomes a [`TableSink`] over the target table.
//!
//! Binding runs in post order, inputs before their parent, and replaces nodes as a whole. A
//! bound node whose inputs came back unchanged is returned as the identical [`PlanNodeRef`],
//! so a bound plan binds to itself. Once an input is replaced, the parent's expressions are
//! resolved again against the new input, bound slots included. The first failure aborts
//! binding and nothing partially bound escapes.

mod expr;
mod sink;

use std::sync::Arc;

use log::debug;

use crate::binder::expr::{Clause, ExprBinder};
use crate::catalog::{LookupError, QualifiedName, TableKind, TableRef};
use crate::error::{BasaltResult, ResolutionError};
use crate::expr::Slot;
use crate::operator::LogicalOperator::{LogicalFilter, LogicalJoin, LogicalProjection, LogicalScan};
use crate::operator::{
    Filter, Join, LogicalOperator, Projection, TableScan, TableSink, UnboundRelation,
    UnboundTableSink,
};
use crate::optimizer::OptimizerContext;
use crate::plan::{Accept, PlanNode, PlanNodeRef, PlanVisitor};

/// Binds `plan` with a fresh [`Binder`] over `context`.
pub fn bind(plan: &PlanNodeRef, context: &OptimizerContext) -> BasaltResult<PlanNodeRef> {
    Binder::new(context.clone()).bind(plan)
}

pub struct Binder {
    context: OptimizerContext,
}

impl Binder {
    pub fn new(context: OptimizerContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OptimizerContext {
        &self.context
    }

    pub fn bind(&mut self, plan: &PlanNodeRef) -> BasaltResult<PlanNodeRef> {
        plan.accept(self, &mut ())
    }

    fn bind_inputs(&mut self, plan: &PlanNodeRef) -> BasaltResult<Vec<PlanNodeRef>> {
        plan.inputs().iter().map(|input| self.bind(input)).collect()
    }

    /// The node itself is bound and none of its inputs was replaced.
    fn is_unchanged(plan: &PlanNodeRef, inputs: &[PlanNodeRef]) -> bool {
        !plan.is_unbound()
            && plan
                .inputs()
                .iter()
                .zip(inputs)
                .all(|(old, new)| Arc::ptr_eq(old, new))
    }

    fn new_node(operator: LogicalOperator, inputs: Vec<PlanNodeRef>) -> BasaltResult<PlanNodeRef> {
        Ok(Arc::new(PlanNode::try_new(operator, inputs)?))
    }

    /// Expands a user supplied name to `catalog.database.table`.
    pub(crate) fn qualify(&self, name_parts: &[String]) -> BasaltResult<QualifiedName> {
        let session = &self.context.session;
        match name_parts {
            [table] => match &session.current_database {
                Some(database) => Ok(QualifiedName::new(
                    session.current_catalog.as_str(),
                    database.as_str(),
                    table.as_str(),
                )),
                None => Err(ResolutionError::NoCurrentDatabase {
                    name: table.clone(),
                }
                .into()),
            },
            [database, table] => Ok(QualifiedName::new(
                session.current_catalog.as_str(),
                database.as_str(),
                table.as_str(),
            )),
            [catalog, database, table] => Ok(QualifiedName::new(
                catalog.as_str(),
                database.as_str(),
                table.as_str(),
            )),
            _ => Err(ResolutionError::InvalidTableName {
                name: name_parts.join("."),
            }
            .into()),
        }
    }

    pub(crate) fn resolve_table(&self, name_parts: &[String]) -> BasaltResult<TableRef> {
        let name = self.qualify(name_parts)?;
        let table = self.context.catalog.table(&name).map_err(|e| match e {
            LookupError::NotFound => ResolutionError::TableNotFound {
                name: name.to_string(),
            },
            LookupError::Ambiguous(candidates) => ResolutionError::AmbiguousTable {
                name: name.to_string(),
                candidates,
            },
        })?;
        debug!("Resolved table {} to {}", name_parts.join("."), table.name());
        Ok(table)
    }

    fn expr_binder<'a>(&'a self, input: &'a [Slot]) -> ExprBinder<'a> {
        ExprBinder::new(
            input,
            self.context.session.case_sensitive,
            self.context.expr_id_gen(),
        )
    }
}

impl PlanVisitor for Binder {
    type C = ();
    type R = PlanNodeRef;

    /// Nodes which carry no names of their own only need their inputs bound.
    fn visit(&mut self, plan: &PlanNodeRef, _context: &mut ()) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        if Self::is_unchanged(plan, &inputs) {
            return Ok(plan.clone());
        }
        plan.with_inputs(inputs)
    }

    fn visit_unbound_relation(
        &mut self,
        _plan: &PlanNodeRef,
        relation: &UnboundRelation,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let table = self.resolve_table(relation.name_parts())?;
        if table.kind() == TableKind::View {
            return Err(ResolutionError::WrongObjectKind {
                name: table.name().to_string(),
                expected: "table".to_string(),
                found: table.kind().to_string(),
            }
            .into());
        }

        let qualifier = table.name().parts();
        let scan = TableScan::new(table, qualifier, self.context.expr_id_gen());
        Self::new_node(LogicalScan(scan), vec![])
    }

    fn visit_unbound_table_sink(
        &mut self,
        plan: &PlanNodeRef,
        sink: &UnboundTableSink,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        sink::bind_table_sink(self, sink, inputs)
    }

    /// A bound sink is revisited when its output expressions were replaced or its input was
    /// rebound.
    fn visit_table_sink(
        &mut self,
        plan: &PlanNodeRef,
        sink: &TableSink,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        if Self::is_unchanged(plan, &inputs) {
            return Ok(plan.clone());
        }
        sink::rebind_table_sink(self, sink, inputs)
    }

    fn visit_filter(
        &mut self,
        plan: &PlanNodeRef,
        filter: &Filter,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        if Self::is_unchanged(plan, &inputs) {
            return Ok(plan.clone());
        }
        let predicate = {
            let input = inputs[0].output()?;
            self.expr_binder(input)
                .bind(filter.predicate(), Clause::Filter)?
        };
        Self::new_node(LogicalFilter(Filter::new(predicate)), inputs)
    }

    fn visit_projection(
        &mut self,
        plan: &PlanNodeRef,
        projection: &Projection,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        if Self::is_unchanged(plan, &inputs) {
            return Ok(plan.clone());
        }
        let exprs = {
            let input = inputs[0].output()?;
            self.expr_binder(input).bind_projection(projection.exprs())?
        };
        Self::new_node(LogicalProjection(Projection::new(exprs)), inputs)
    }

    fn visit_join(
        &mut self,
        plan: &PlanNodeRef,
        join: &Join,
        _context: &mut (),
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = self.bind_inputs(plan)?;
        if Self::is_unchanged(plan, &inputs) {
            return Ok(plan.clone());
        }
        let condition = match join.condition() {
            Some(condition) => {
                let mut input = inputs[0].output()?.to_vec();
                input.extend_from_slice(inputs[1].output()?);
                Some(
                    self.expr_binder(&input)
                        .bind(condition, Clause::JoinCondition)?,
                )
            }
            None => None,
        };
        Self::new_node(LogicalJoin(Join::new(join.join_type(), condition)), inputs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datafusion_expr::JoinType;
    use datafusion_expr::Operator::{Eq, Gt};

    use crate::binder::{bind, Binder};
    use crate::error::{BasaltError, ResolutionError};
    use crate::expr::{binary_expr, col, lit, star, ExprId};
    use crate::operator::LogicalOperator::{
        LogicalFilter, LogicalJoin, LogicalProjection, LogicalScan,
    };
    use crate::operator::{Filter, Projection};
    use crate::optimizer::{OptimizerContext, SessionVariables};
    use crate::plan::{explain_to_string, LogicalPlanBuilder, PlanNode};
    use crate::test_utils::{build_catalog_for_test, build_context_for_test, table_for_test};

    fn resolution_error(err: BasaltError) -> ResolutionError {
        match err {
            BasaltError::Resolution(e) => e,
            e => panic!("expected resolution error, got {:?}", e),
        }
    }

    #[test]
    fn test_bind_relation_names() {
        let context = build_context_for_test();

        for name in [vec!["t1"], vec!["db1", "t1"], vec!["internal", "db1", "T1"]] {
            let plan = LogicalPlanBuilder::unbound_relation(name).build();
            let bound = bind(&plan, &context).unwrap();

            let scan = bound.operator().as_logical_scan().unwrap();
            assert_eq!(1, scan.table().id());
            assert_eq!(3, bound.output().unwrap().len());
            assert!(!bound.has_unbound());
        }

        let plan = LogicalPlanBuilder::unbound_relation(["db2", "t1"]).build();
        let bound = bind(&plan, &context).unwrap();
        assert_eq!(7, bound.operator().as_logical_scan().unwrap().table().id());
    }

    #[test]
    fn test_bind_relation_errors() {
        let context = build_context_for_test();
        let bind_name = |parts: Vec<&str>| {
            let plan = LogicalPlanBuilder::unbound_relation(parts).build();
            resolution_error(bind(&plan, &context).unwrap_err())
        };

        assert_eq!(
            ResolutionError::TableNotFound {
                name: "internal.db1.t9".to_string()
            },
            bind_name(vec!["t9"])
        );
        assert_eq!(
            ResolutionError::InvalidTableName {
                name: "a.b.c.d".to_string()
            },
            bind_name(vec!["a", "b", "c", "d"])
        );
        assert_eq!(
            ResolutionError::WrongObjectKind {
                name: "internal.db1.v1".to_string(),
                expected: "table".to_string(),
                found: "view".to_string(),
            },
            bind_name(vec!["v1"])
        );

        let no_db = OptimizerContext::new(build_catalog_for_test(), SessionVariables::default());
        let plan = LogicalPlanBuilder::unbound_relation(["t1"]).build();
        assert_eq!(
            ResolutionError::NoCurrentDatabase {
                name: "t1".to_string()
            },
            resolution_error(bind(&plan, &no_db).unwrap_err())
        );
    }

    #[test]
    fn test_bind_is_idempotent() {
        let context = build_context_for_test();
        let plan = LogicalPlanBuilder::unbound_relation(["t1"])
            .filter(binary_expr(col("c1"), Gt, lit(1i64)))
            .limit(10)
            .build();

        let bound = bind(&plan, &context).unwrap();
        let rebound = bind(&bound, &context).unwrap();
        assert!(Arc::ptr_eq(&bound, &rebound));

        let scan_plan = LogicalPlanBuilder::scan(
            table_for_test(&context, "db1", "t2"),
            context.expr_id_gen(),
        )
        .limit(3)
        .build();
        assert!(Arc::ptr_eq(
            &scan_plan,
            &Binder::new(context.clone()).bind(&scan_plan).unwrap()
        ));
    }

    #[test]
    fn test_bind_filter_and_limit() {
        let context = build_context_for_test();
        let plan = LogicalPlanBuilder::unbound_relation(["t1"])
            .filter(binary_expr(col("t1.c1"), Gt, lit(1i64)))
            .limit(10)
            .build();

        let bound = bind(&plan, &context).unwrap();
        let filter = bound.inputs()[0].operator().as_logical_filter().unwrap();
        let scan_output = bound.inputs()[0].inputs()[0].output().unwrap();
        assert_eq!(
            vec![&scan_output[0]],
            filter.predicate().input_slots()
        );
        assert_eq!(scan_output, bound.output().unwrap());

        let expected = "\
LogicalLimit { limit: 10 }
└─ LogicalFilter { predicate: t1.c1#0 > 1 }
   └─ LogicalScan { table: internal.db1.t1, output: [t1.c1#0, t1.c2#1, t1.c3#2] }
";
        assert_eq!(expected, explain_to_string(&bound).unwrap());
    }

    #[test]
    fn test_bind_join_across_databases() {
        let context = build_context_for_test();
        let right = LogicalPlanBuilder::unbound_relation(["db2", "t1"]).build();
        let plan = LogicalPlanBuilder::unbound_relation(["t1"])
            .join(
                JoinType::Left,
                Some(binary_expr(col("db1.t1.c1"), Eq, col("db2.t1.c1"))),
                right.clone(),
            )
            .project(vec![star()])
            .build();

        let bound = bind(&plan, &context).unwrap();
        let join = &bound.inputs()[0];
        assert!(matches!(join.operator(), LogicalJoin(_)));
        assert!(matches!(join.inputs()[0].operator(), LogicalScan(_)));

        let output = bound.output().unwrap();
        assert_eq!(5, output.len());
        // Right side of a left join becomes nullable.
        assert!(!output[0].nullable());
        assert!(output[3].nullable());
        assert!(output[4].nullable());

        let ambiguous = LogicalPlanBuilder::unbound_relation(["t1"])
            .join(
                JoinType::Inner,
                Some(binary_expr(col("t1.c1"), Eq, lit(1i64))),
                right,
            )
            .build();
        assert!(matches!(
            resolution_error(bind(&ambiguous, &context).unwrap_err()),
            ResolutionError::AmbiguousColumn { .. }
        ));
    }

    #[test]
    fn test_projection_names_and_ids() {
        let context = build_context_for_test();
        let plan = LogicalPlanBuilder::unbound_relation(["t2"])
            .project(vec![col("c4"), col("c1").alias("k")])
            .filter(binary_expr(col("k"), Gt, lit(0i64)))
            .build();

        let bound = bind(&plan, &context).unwrap();
        let output = bound.output().unwrap();
        assert_eq!(
            vec!["c4", "k"],
            output.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        // Scan slots take ids 0 and 1, the alias gets the next one.
        assert_eq!(ExprId(1), output[0].id());
        assert_eq!(ExprId(2), output[1].id());
        assert!(matches!(bound.operator(), LogicalFilter(_)));
    }

    #[test]
    fn test_first_error_wins() {
        let context = build_context_for_test();
        let right = LogicalPlanBuilder::unbound_relation(["t8"]).build();
        let plan = LogicalPlanBuilder::unbound_relation(["t9"])
            .join(JoinType::Inner, None, right)
            .build();

        assert_eq!(
            ResolutionError::TableNotFound {
                name: "internal.db1.t9".to_string()
            },
            resolution_error(bind(&plan, &context).unwrap_err())
        );
    }

    #[test]
    fn test_bound_slots_follow_their_input() {
        let context = build_context_for_test();
        let scan = LogicalPlanBuilder::scan(
            table_for_test(&context, "db1", "t1"),
            context.expr_id_gen(),
        )
        .build();
        let c1 = scan.output().unwrap()[0].clone();
        let mixed = binary_expr(c1.clone().into(), Eq, col("c2"));

        // Over the scan that produced it, the bound slot still resolves.
        let over_scan = Arc::new(
            PlanNode::try_new(LogicalFilter(Filter::new(mixed.clone())), vec![scan.clone()])
                .unwrap(),
        );
        let filter = bind(&over_scan, &context).unwrap();
        assert!(!filter.has_unbound());
        assert!(Arc::ptr_eq(&scan, &filter.inputs()[0]));
        assert_eq!(
            vec![c1.id(), scan.output().unwrap()[1].id()],
            filter
                .operator()
                .as_logical_filter()
                .unwrap()
                .predicate()
                .input_slots()
                .iter()
                .map(|s| s.id())
                .collect::<Vec<_>>()
        );

        // Bound subtrees are reused as they are.
        let projection = Arc::new(
            PlanNode::try_new(
                LogicalProjection(Projection::new(vec![col("c3")])),
                vec![filter.clone()],
            )
            .unwrap(),
        );
        let bound = bind(&projection, &context).unwrap();
        assert!(Arc::ptr_eq(&filter, &bound.inputs()[0]));

        // A rebound relation hands out fresh ids, the old slot is gone.
        let over_relation = LogicalPlanBuilder::unbound_relation(["t1"])
            .filter(mixed)
            .build();
        assert_eq!(
            ResolutionError::ColumnNotFound {
                name: c1.to_string()
            },
            resolution_error(bind(&over_relation, &context).unwrap_err())
        );
    }
}
