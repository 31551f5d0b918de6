use std::sync::Arc;

use log::debug;

use crate::binder::expr::Clause;
use crate::binder::Binder;
use crate::catalog::{ColumnDesc, PartitionDesc, TableKind, TableRef};
use crate::error::{BasaltError, BasaltResult, ResolutionError};
use crate::expr::ScalarExpr;
use crate::operator::LogicalOperator::LogicalTableSink;
use crate::operator::{TableSink, UnboundTableSink};
use crate::plan::{PlanNode, PlanNodeRef};

/// Turns an [`UnboundTableSink`] over the already bound `inputs` into a [`TableSink`].
pub(super) fn bind_table_sink(
    binder: &Binder,
    sink: &UnboundTableSink,
    inputs: Vec<PlanNodeRef>,
) -> BasaltResult<PlanNodeRef> {
    let table = binder.resolve_table(sink.name_parts())?;
    if table.kind() != TableKind::Olap {
        return Err(ResolutionError::WrongObjectKind {
            name: table.name().to_string(),
            expected: TableKind::Olap.to_string(),
            found: table.kind().to_string(),
        }
        .into());
    }

    let case_sensitive = binder.context().session.case_sensitive;
    let columns = bind_columns(&table, sink.col_names(), case_sensitive)?;

    if sink.is_partial_update() {
        check_partial_update(&table, &columns)?;
    }

    let partitions = bind_partitions(binder, &table, sink)?;

    let output_exprs = match inputs.first() {
        Some(child) => child
            .output()?
            .iter()
            .cloned()
            .map(ScalarExpr::from)
            .collect::<Vec<_>>(),
        None => vec![],
    };
    check_width(&table, &columns, &output_exprs)?;

    debug!(
        "Bound sink into {} with {} columns and {} partitions",
        table.name(),
        columns.len(),
        partitions.len()
    );

    let bound = TableSink::new(table, columns, partitions, output_exprs)
        .with_hints(sink.hints().to_vec())
        .with_temporary_partition(sink.is_temporary_partition())
        .with_partial_update(sink.is_partial_update())
        .with_dml_command_type(sink.dml_command_type());
    Ok(Arc::new(PlanNode::try_new(LogicalTableSink(bound), inputs)?))
}

/// Resolves the output expressions of an already bound sink against its rebound input.
pub(super) fn rebind_table_sink(
    binder: &Binder,
    sink: &TableSink,
    inputs: Vec<PlanNodeRef>,
) -> BasaltResult<PlanNodeRef> {
    let output_exprs = {
        let child = inputs
            .first()
            .map(|child| child.output())
            .transpose()?
            .unwrap_or(&[]);
        let exprs = binder.expr_binder(child);
        sink.output_exprs()
            .iter()
            .map(|e| exprs.bind(e, Clause::SinkOutput))
            .collect::<BasaltResult<Vec<_>>>()?
    };
    check_width(sink.table(), sink.columns(), &output_exprs)?;

    debug!(
        "Rebound {} output expressions of sink into {}",
        output_exprs.len(),
        sink.table().name()
    );
    let bound = sink.with_output_exprs(output_exprs);
    Ok(Arc::new(PlanNode::try_new(LogicalTableSink(bound), inputs)?))
}

fn check_width(
    table: &TableRef,
    columns: &[ColumnDesc],
    output_exprs: &[ScalarExpr],
) -> BasaltResult<()> {
    if output_exprs.len() != columns.len() {
        return Err(ResolutionError::ColumnCountMismatch {
            table: table.name().to_string(),
            expected: columns.len(),
            actual: output_exprs.len(),
        }
        .into());
    }
    Ok(())
}

/// Target columns in the order given, or every column when no list is given.
fn bind_columns(
    table: &TableRef,
    col_names: &[String],
    case_sensitive: bool,
) -> BasaltResult<Vec<ColumnDesc>> {
    if col_names.is_empty() {
        return Ok(table.columns().to_vec());
    }

    let mut columns: Vec<ColumnDesc> = Vec::with_capacity(col_names.len());
    for name in col_names {
        let column = table
            .column(name, case_sensitive)
            .ok_or_else(|| ResolutionError::ColumnNotFound { name: name.clone() })?;
        if columns.iter().any(|c| c.name() == column.name()) {
            return Err(ResolutionError::DuplicateColumn {
                table: table.name().to_string(),
                column: name.clone(),
            }
            .into());
        }
        columns.push(column.clone());
    }
    Ok(columns)
}

fn check_partial_update(table: &TableRef, columns: &[ColumnDesc]) -> BasaltResult<()> {
    if !table.supports_partial_update() {
        return Err(ResolutionError::PartialUpdateNotSupported {
            table: table.name().to_string(),
        }
        .into());
    }

    match table
        .key_columns()
        .find(|key| !columns.iter().any(|c| c.name() == key.name()))
    {
        Some(missing) => Err(ResolutionError::MissingKeyColumn {
            table: table.name().to_string(),
            column: missing.name().to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Partitions are looked up in the temporary namespace when the sink says so, in the regular
/// one otherwise.
fn bind_partitions(
    binder: &Binder,
    table: &TableRef,
    sink: &UnboundTableSink,
) -> BasaltResult<Vec<PartitionDesc>> {
    let temporary = sink.is_temporary_partition();
    sink.partitions()
        .iter()
        .map(|name| {
            binder
                .context()
                .catalog
                .partition(table, name, temporary)
                .ok_or_else(|| {
                    BasaltError::from(ResolutionError::PartitionNotFound {
                        table: table.name().to_string(),
                        partition: name.clone(),
                        temporary,
                    })
                })
        })
        .collect()
}
