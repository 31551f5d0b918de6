//! Contains relational operators such as scan, filter, join, sink, etc.
//!
//! The operator set is closed: [`LogicalOperator`] lists every variant, and per operator
//! behavior is expressed as traits dispatched over the enum. Operators whose payload still
//! references objects or columns by raw name are unbound, see [`OperatorTrait::is_unbound`].
//!
//! An operator only holds its own payload. Inputs live in [`crate::plan::PlanNode`] or, inside
//! a memo, are referenced by group id.

use std::fmt::Formatter;

use derive_more::Display;
use enum_dispatch::enum_dispatch;

use crate::error::{BasaltError, BasaltResult};
use crate::expr::ScalarExpr;
use crate::properties::LogicalProperty;

/// Number of inputs an operator accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Arity {
    #[display(fmt = "exactly {}", _0)]
    Exact(usize),
    #[display(fmt = "at least {}", _0)]
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

#[enum_dispatch]
pub trait OperatorTrait {
    fn arity(&self) -> Arity;

    /// Whether some payload field is still a raw name.
    fn is_unbound(&self) -> bool {
        false
    }

    /// Scalar expressions held by this operator.
    fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        Ok(vec![])
    }

    /// Derives output from the resolved properties of inputs.
    ///
    /// Must be pure. Unbound operators return [`LogicalProperty::Unbound`] without looking at
    /// their inputs.
    fn derive_logical_prop(&self, inputs: &[&LogicalProperty]) -> BasaltResult<LogicalProperty>;
}

#[enum_dispatch]
pub trait DisplayFields {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}

fn input_prop<'a>(
    inputs: &[&'a LogicalProperty],
    idx: usize,
) -> BasaltResult<&'a LogicalProperty> {
    inputs
        .get(idx)
        .copied()
        .ok_or_else(|| BasaltError::unsupported(format!("missing logical property of input {}", idx)))
}

mod logical;
pub use logical::*;
mod dml;
pub use dml::*;
mod unbound_relation;
pub use unbound_relation::*;
mod unbound_table_sink;
pub use unbound_table_sink::*;
mod table_scan;
pub use table_scan::*;
mod filter;
pub use filter::*;
mod projection;
pub use projection::*;
mod join;
pub use join::*;
mod limit;
pub use limit::*;
mod table_sink;
pub use table_sink::*;
