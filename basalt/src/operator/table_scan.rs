use std::fmt::Formatter;

use crate::catalog::TableRef;
use crate::error::BasaltResult;
use crate::expr::{display_slots, ExprIdGenerator, Slot};
use crate::operator::{Arity, DisplayFields, OperatorTrait};
use crate::properties::LogicalProperty;

/// Scan of a resolved table.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableScan {
    table: TableRef,
    qualifier: Vec<String>,
    output: Vec<Slot>,
}

impl TableScan {
    /// Creates a scan producing one fresh slot per table column, qualified by `qualifier`.
    pub fn new(table: TableRef, qualifier: Vec<String>, ids: &ExprIdGenerator) -> Self {
        let output = table
            .columns()
            .iter()
            .map(|c| {
                Slot::new(ids.next_id(), c.name(), c.data_type().clone(), c.nullable())
                    .with_qualifier(qualifier.clone())
            })
            .collect();

        Self {
            table,
            qualifier,
            output,
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn qualifier(&self) -> &[String] {
        &self.qualifier
    }

    pub fn output(&self) -> &[Slot] {
        &self.output
    }
}

impl OperatorTrait for TableScan {
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn derive_logical_prop(&self, _inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty> {
        Ok(LogicalProperty::new(self.output.clone()))
    }
}

impl DisplayFields for TableScan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("table", &format_args!("{}", self.qualifier.join(".")))
            .field("output", &format_args!("{}", display_slots(&self.output)))
            .finish()
    }
}
