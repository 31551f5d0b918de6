use std::convert::TryFrom;
use std::sync::Arc;
use std::thread;

use arrow_schema::DataType;
use datafusion_expr::Operator::{Eq, Gt, Lt};
use datafusion_expr::JoinType;

use basalt::binder::bind;
use basalt::catalog::{ColumnDesc, MemoryCatalog, PartitionDesc, QualifiedName, TableDesc, TableKind};
use basalt::error::{BasaltError, ResolutionError};
use basalt::expr::{binary_expr, col, lit, star};
use basalt::memo::{Memo, SharedMemo};
use basalt::operator::LogicalOperator::{LogicalLimit, LogicalUnboundTableSink};
use basalt::operator::{DmlCommandType, Limit, UnboundTableSink};
use basalt::optimizer::{OptimizerContext, SessionVariables};
use basalt::plan::{bfs_iter, explain_to_string, LogicalPlanBuilder, PlanNodeRef};
use basalt::rules::{MergeFilterRule, MergeLimitRule, RuleImpl};

fn shop_context() -> OptimizerContext {
    let catalog = MemoryCatalog::new();
    catalog.register_table(TableDesc::new(
        10,
        QualifiedName::new("internal", "shop", "orders"),
        TableKind::Olap,
        vec![
            ColumnDesc::key("a", DataType::Int64),
            ColumnDesc::new("b", DataType::Utf8, true),
            ColumnDesc::new("c", DataType::Float64, true),
        ],
    ));
    catalog.register_table(
        TableDesc::new(
            11,
            QualifiedName::new("internal", "shop", "archive"),
            TableKind::Olap,
            vec![
                ColumnDesc::key("a", DataType::Int64),
                ColumnDesc::new("b", DataType::Utf8, true),
                ColumnDesc::new("c", DataType::Float64, true),
            ],
        )
        .with_partitions(vec![
            PartitionDesc::new(1, "p2023"),
            PartitionDesc::temporary(2, "p2023"),
            PartitionDesc::temporary(3, "staging"),
        ]),
    );

    let session = SessionVariables::from_json(r#"{"current_database": "shop"}"#).unwrap();
    OptimizerContext::new(Arc::new(catalog), session)
}

fn archive_sink(partitions: &[&str], temporary: bool) -> UnboundTableSink {
    UnboundTableSink::new(
        vec!["archive".to_string()],
        vec![],
        vec![],
        partitions.iter().map(|p| p.to_string()).collect(),
    )
    .with_temporary_partition(temporary)
    .with_dml_command_type(DmlCommandType::Insert)
}

fn insert_select(sink: UnboundTableSink) -> PlanNodeRef {
    LogicalPlanBuilder::unbound_relation(["orders"])
        .filter(binary_expr(col("a"), Gt, lit(100i64)))
        .project(vec![star()])
        .sink(sink)
        .build()
}

#[test]
fn insert_select_binds_completely() {
    let context = shop_context();
    let plan = insert_select(archive_sink(&[], false));

    // Reads of the unbound plan fail, every time.
    assert!(matches!(plan.output(), Err(BasaltError::UnboundAccess(_))));
    assert!(matches!(plan.output(), Err(BasaltError::UnboundAccess(_))));

    let bound = bind(&plan, &context).unwrap();
    assert!(bfs_iter(&bound).all(|node| !node.is_unbound()));

    let sink = bound.operator().as_logical_table_sink().unwrap();
    assert_eq!(
        vec!["a", "b", "c"],
        sink.columns().iter().map(|c| c.name()).collect::<Vec<_>>()
    );
    assert_eq!(DmlCommandType::Insert, sink.dml_command_type());
    assert_eq!(3, bound.output().unwrap().len());

    // Binding a bound plan hands back the same tree.
    let rebound = bind(&bound, &context).unwrap();
    assert!(Arc::ptr_eq(&bound, &rebound));
}

#[test]
fn sink_partitions_follow_namespace() {
    let context = shop_context();

    let regular = bind(&insert_select(archive_sink(&["p2023"], false)), &context).unwrap();
    let ids = |plan: &PlanNodeRef| {
        plan.operator()
            .as_logical_table_sink()
            .unwrap()
            .partitions()
            .iter()
            .map(|p| p.id())
            .collect::<Vec<_>>()
    };
    assert_eq!(vec![1], ids(&regular));

    let temporary = bind(
        &insert_select(archive_sink(&["p2023", "staging"], true)),
        &context,
    )
    .unwrap();
    assert_eq!(vec![2, 3], ids(&temporary));

    let err = bind(&insert_select(archive_sink(&["staging"], false)), &context).unwrap_err();
    assert_eq!(
        Some(&ResolutionError::PartitionNotFound {
            table: "internal.shop.archive".to_string(),
            partition: "staging".to_string(),
            temporary: false,
        }),
        err.as_resolution()
    );
    assert_eq!("staging", err.as_resolution().unwrap().path());
}

#[test]
fn sink_identity_ignores_flags() {
    let a = insert_select(archive_sink(&["p2023"], false));
    let b = insert_select(
        archive_sink(&["p2023"], true)
            .with_partial_update(true)
            .with_dml_command_type(DmlCommandType::Load),
    );
    assert_eq!(a, b);

    let mut memo = Memo::new();
    let group_a = memo.insert(&a).unwrap();
    let group_b = memo.insert(&b).unwrap();
    assert_eq!(group_a, group_b);

    let c = insert_select(archive_sink(&["p2024"], false));
    assert_ne!(a, c);
    assert!(matches!(c.operator(), LogicalUnboundTableSink(_)));
}

#[test]
fn unbound_sink_rejects_output_exprs() {
    let plan = insert_select(archive_sink(&[], false));
    assert!(matches!(
        plan.with_output_exprs(vec![col("a")]),
        Err(BasaltError::UnboundAccess(_))
    ));
    assert!(matches!(
        plan.expressions(),
        Err(BasaltError::UnsupportedOperation(_))
    ));
}

#[test]
fn memo_explores_bound_plan() {
    let context = shop_context();
    let plan = LogicalPlanBuilder::unbound_relation(["orders"])
        .filter(binary_expr(col("a"), Gt, lit(1i64)))
        .filter(binary_expr(col("a"), Lt, lit(10i64)))
        .limit(20)
        .limit(5)
        .build();
    let bound = bind(&plan, &context).unwrap();

    let mut memo = Memo::try_from(&bound).unwrap();
    assert_eq!(5, memo.group_count());
    memo.explore(&[
        RuleImpl::from(MergeLimitRule::new()),
        RuleImpl::from(MergeFilterRule::new()),
    ])
    .unwrap();

    // Merged limit and merged filter are alternatives in the groups of the outer operators.
    assert_eq!(5, memo.group_count());
    let root = memo.root_group_id().unwrap();
    assert_eq!(2, memo[root].expr_count());
    assert_eq!(
        2,
        memo.group_ids()
            .into_iter()
            .filter(|g| memo[*g].expr_count() == 2)
            .count()
    );
    assert_eq!(
        bound.output().unwrap(),
        memo[root].logical_prop().output().unwrap()
    );

    let best = memo.copy_out(root).unwrap();
    assert_eq!(&LogicalLimit(Limit::new(5)), best.operator());
    assert!(bfs_iter(&best).all(|node| node.group_expr().is_some()));
    assert_eq!(bound.output().unwrap(), best.output().unwrap());
}

#[test]
fn concurrent_inserts_share_groups() {
    let shared = SharedMemo::default();
    let right = LogicalPlanBuilder::unbound_relation(["archive"]).build();
    let plan = LogicalPlanBuilder::unbound_relation(["orders"])
        .join(
            JoinType::Inner,
            Some(binary_expr(col("orders.a"), Eq, col("archive.a"))),
            right,
        )
        .limit(3)
        .build();

    let groups = thread::scope(|s| {
        (0..4)
            .map(|_| {
                let shared = shared.clone();
                let plan = plan.clone();
                s.spawn(move || shared.insert(&plan).unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert!(groups.iter().all(|g| *g == groups[0]));
    assert_eq!(4, shared.with_memo(|memo| memo.group_count()));
}

#[test]
fn explain_bound_insert() {
    let context = shop_context();
    let bound = bind(&insert_select(archive_sink(&["p2023"], false)), &context).unwrap();

    let expected = "\
LogicalTableSink { table: internal.shop.archive, columns: [a, b, c], partitions: [p2023], temporary: false, dml: INSERT }
└─ LogicalProjection { exprs: [orders.a#0, orders.b#1, orders.c#2] }
   └─ LogicalFilter { predicate: orders.a#0 > 100 }
      └─ LogicalScan { table: internal.shop.orders, output: [orders.a#0, orders.b#1, orders.c#2] }
";
    assert_eq!(expected, explain_to_string(&bound).unwrap());
}
