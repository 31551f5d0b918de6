use std::fmt::Formatter;
use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::error::{BasaltError, BasaltResult};
use crate::expr::ScalarExpr;
use crate::operator::{Arity, DisplayFields, DmlCommandType, OperatorTrait};
use crate::properties::LogicalProperty;

/// Write of the child's rows into a table referenced by name.
///
/// Equality and hashing only consider the target name, the column list, the hints and the
/// partition names. Two sinks differing only in `temporary_partition`, `partial_update` or
/// `dml_command_type` are equal and deduplicate to one memo group expression.
#[derive(Clone, Debug)]
pub struct UnboundTableSink {
    name_parts: Vec<String>,
    col_names: Vec<String>,
    hints: Vec<String>,
    temporary_partition: bool,
    partitions: Vec<String>,
    partial_update: bool,
    dml_command_type: DmlCommandType,
}

impl UnboundTableSink {
    pub fn new(
        name_parts: Vec<String>,
        col_names: Vec<String>,
        hints: Vec<String>,
        partitions: Vec<String>,
    ) -> Self {
        Self {
            name_parts,
            col_names,
            hints,
            temporary_partition: false,
            partitions,
            partial_update: false,
            dml_command_type: DmlCommandType::None,
        }
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

    pub fn name_parts(&self) -> &[String] {
        &self.name_parts
    }

    /// Target columns, empty means all columns of the table.
    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn is_temporary_partition(&self) -> bool {
        self.temporary_partition
    }

    pub fn partitions(&self) -> &[String] {
        &self.partitions
    }

    pub fn is_partial_update(&self) -> bool {
        self.partial_update
    }

    pub fn dml_command_type(&self) -> DmlCommandType {
        self.dml_command_type
    }
}

impl PartialEq for UnboundTableSink {
    fn eq(&self, other: &Self) -> bool {
        self.name_parts == other.name_parts
            && self.col_names == other.col_names
            && self.hints == other.hints
            && self.partitions == other.partitions
    }
}

impl Eq for UnboundTableSink {}

impl Hash for UnboundTableSink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name_parts.hash(state);
        self.col_names.hash(state);
        self.hints.hash(state);
        self.partitions.hash(state);
    }
}

impl OperatorTrait for UnboundTableSink {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn is_unbound(&self) -> bool {
        true
    }

    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Err(BasaltError::unsupported(
            "UnboundTableSink doesn't support expressions()",
        ))
    }

    fn derive_logical_prop(&self, _inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        Ok(LogicalProperty::Unbound)
    }
}

impl DisplayFields for UnboundTableSink {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("name", &format_args!("{}", self.name_parts.iter().join(".")));
        if !self.col_names.is_empty() {
            s.field("columns", &self.col_names);
        }
        if !self.partitions.is_empty() {
            s.field("partitions", &self.partitions);
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
