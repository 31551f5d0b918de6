use std::sync::Arc;

use arrow_schema::{Field, Schema};

use crate::error::{BasaltError, BasaltResult};
use crate::expr::{ExprId, Slot};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LogicalProperty {
    /// Stands in for the properties of a plan whose names are not resolved yet. Every read of
    /// the output fails.
    Unbound,
    Resolved { output: Arc<Vec<Slot>> },
}

impl LogicalProperty {
    pub fn new(output: Vec<Slot>) -> Self {
        LogicalProperty::Resolved {
            output: Arc::new(output),
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, LogicalProperty::Unbound)
    }

    pub fn output(&self) -> BasaltResult<&[Slot]> {
        match self {
            LogicalProperty::Unbound => Err(BasaltError::unbound("output")),
            LogicalProperty::Resolved { output } => Ok(output.as_slice()),
        }
    }

    pub fn output_expr_ids(&self) -> BasaltResult<Vec<ExprId>> {
        Ok(self.output()?.iter().map(Slot::id).collect())
    }

    pub fn schema(&self) -> BasaltResult<Schema> {
        let fields = self
            .output()?
            .iter()
            .map(|s| Field::new(s.name(), s.data_type().clone(), s.nullable()))
            .collect::<Vec<_>>();
        Ok(Schema::new(fields))
    }
}
