use std::fmt::Formatter;
use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::catalog::{ColumnDesc, PartitionDesc, TableRef};
use crate::error::BasaltResult;
use crate::expr::ScalarExpr;
use crate::operator::{input_prop, Arity, DisplayFields, DmlCommandType, OperatorTrait};
use crate::properties::LogicalProperty;

/// Bound write into a resolved table.
///
/// `output_exprs` has one expression per target column, in the order of `columns`. Identity
/// covers table, columns, hints, partitions and `output_exprs`. The pass-through flags don't
/// take part, as for [`crate::operator::UnboundTableSink`].
#[derive(Clone, Debug)]
pub struct TableSink {
    table: TableRef,
    columns: Vec<ColumnDesc>,
    partitions: Vec<PartitionDesc>,
    temporary_partition: bool,
    hints: Vec<String>,
    partial_update: bool,
    dml_command_type: DmlCommandType,
    output_exprs: Vec<ScalarExpr>,
}

impl TableSink {
    pub fn new(
        table: TableRef,
        columns: Vec<ColumnDesc>,
        partitions: Vec<PartitionDesc>,
        output_exprs: Vec<ScalarExpr>,
    ) -> Self {
        Self {
            table,
            columns,
            partitions,
            temporary_partition: false,
            hints: vec![],
            partial_update: false,
            dml_command_type: DmlCommandType::None,
            output_exprs,
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_temporary_partition(mut self, temporary_partition: bool) -> Self {
        self.temporary_partition = temporary_partition;
        self
    }

    pub fn with_partial_update(mut self, partial_update: bool) -> Self {
        self.partial_update = partial_update;
        self
    }

    pub fn with_dml_command_type(mut self, dml_command_type: DmlCommandType) -> Self {
        self.dml_command_type = dml_command_type;
        self
    }

    pub fn with_output_exprs(&self, output_exprs: Vec<ScalarExpr>) -> Self {
        Self {
            output_exprs,
            ..self.clone()
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDesc] {
        &self.columns
    }

    pub fn partitions(&self) -> &[PartitionDesc] {
        &self.partitions
    }

    pub fn is_temporary_partition(&self) -> bool {
        self.temporary_partition
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn is_partial_update(&self) -> bool {
        self.partial_update
    }

    pub fn dml_command_type(&self) -> DmlCommandType {
        self.dml_command_type
    }

    pub fn output_exprs(&self) -> &[ScalarExpr] {
        &self.output_exprs
    }
}

impl PartialEq for TableSink {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
            && self.columns == other.columns
            && self.hints == other.hints
            && self.partitions == other.partitions
            && self.output_exprs == other.output_exprs
    }
}

impl Eq for TableSink {}

impl Hash for TableSink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.hash(state);
        self.columns.hash(state);
        self.hints.hash(state);
        self.partitions.hash(state);
        self.output_exprs.hash(state);
    }
}

impl OperatorTrait for TableSink {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn is_unbound(&self) -> bool {
        self.output_exprs.iter().any(ScalarExpr::is_unbound)
    }

    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Ok(self.output_exprs.iter().collect())
    }

    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        if self.is_unbound() {
            return Ok(LogicalProperty::Unbound);
        }
        input_prop(inputs, 0)?.output()?;
        let output = self
            .output_exprs
            .iter()
            .map(ScalarExpr::to_slot)
            .try_collect()?;
        Ok(LogicalProperty::new(output))
    }
}

impl DisplayFields for TableSink {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("table", &format_args!("{}", self.table.name()));
        s.field(
            "columns",
            &format_args!("[{}]", self.columns.iter().map(ColumnDesc::name).join(", ")),
        );
        if !self.partitions.is_empty() {
            s.field(
                "partitions",
                &format_args!(
                    "[{}]",
                    self.partitions.iter().map(PartitionDesc::name).join(", ")
                ),
            );
            s.field("temporary", &self.temporary_partition);
        }
        if self.partial_update {
            s.field("partial_update", &true);
        }
        if self.dml_command_type != DmlCommandType::None {
            s.field("dml", &format_args!("{}", self.dml_command_type));
        }
        s.finish()
    }
}
