//! Scalar expressions carried by operators.
//!
//! The parser front-end produces expressions that reference columns by name
//! ([`ScalarExpr::UnboundSlot`], [`ScalarExpr::UnboundStar`], [`ScalarExpr::UnboundAlias`]). The
//! binder replaces them with [`ScalarExpr::SlotRef`] and [`ScalarExpr::Alias`], which carry
//! resolved [`Slot`]s.

mod slot;
pub use slot::*;

use std::fmt::{Display, Formatter};

use arrow_schema::DataType;
use datafusion_common::ScalarValue;
use datafusion_expr::Operator;
use enum_as_inner::EnumAsInner;
use itertools::Itertools;

use crate::error::{BasaltError, BasaltResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumAsInner)]
pub enum ScalarExpr {
    /// Column reference by name parts, e.g. `["t1", "c1"]`.
    UnboundSlot(Vec<String>),
    /// `*` or `t1.*`, carrying the qualifier.
    UnboundStar(Vec<String>),
    UnboundAlias {
        child: Box<ScalarExpr>,
        name: String,
    },
    SlotRef(Slot),
    Literal(ScalarValue),
    Binary {
        left: Box<ScalarExpr>,
        op: Operator,
        right: Box<ScalarExpr>,
    },
    Alias {
        child: Box<ScalarExpr>,
        name: String,
        id: ExprId,
    },
}

/// Column reference parsed from a dotted name, e.g. `col("t1.c1")`.
pub fn col(name: &str) -> ScalarExpr {
    ScalarExpr::UnboundSlot(name.split('.').map(str::to_string).collect())
}

pub fn star() -> ScalarExpr {
    ScalarExpr::UnboundStar(vec![])
}

pub fn qualified_star(qualifier: &str) -> ScalarExpr {
    ScalarExpr::UnboundStar(qualifier.split('.').map(str::to_string).collect())
}

pub fn lit<T: Into<ScalarValue>>(value: T) -> ScalarExpr {
    ScalarExpr::Literal(value.into())
}

pub fn binary_expr(left: ScalarExpr, op: Operator, right: ScalarExpr) -> ScalarExpr {
    ScalarExpr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

pub fn and(left: ScalarExpr, right: ScalarExpr) -> ScalarExpr {
    binary_expr(left, Operator::And, right)
}

/// Comparison and boolean connectives produce `Boolean`.
fn is_predicate(op: &Operator) -> bool {
    matches!(
        op,
        Operator::Eq
            | Operator::NotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq
            | Operator::And
            | Operator::Or
            | Operator::IsDistinctFrom
            | Operator::IsNotDistinctFrom
    )
}

impl ScalarExpr {
    pub fn alias<S: Into<String>>(self, name: S) -> ScalarExpr {
        ScalarExpr::UnboundAlias {
            child: Box::new(self),
            name: name.into(),
        }
    }

    pub fn is_unbound(&self) -> bool {
        match self {
            ScalarExpr::UnboundSlot(_)
            | ScalarExpr::UnboundStar(_)
            | ScalarExpr::UnboundAlias { .. } => true,
            ScalarExpr::SlotRef(_) | ScalarExpr::Literal(_) => false,
            ScalarExpr::Binary { left, right, .. } => left.is_unbound() || right.is_unbound(),
            ScalarExpr::Alias { child, .. } => child.is_unbound(),
        }
    }

    pub fn data_type(&self) -> BasaltResult<DataType> {
        match self {
            ScalarExpr::SlotRef(slot) => Ok(slot.data_type().clone()),
            ScalarExpr::Literal(value) => Ok(value.get_datatype()),
            ScalarExpr::Binary { left, op, .. } => {
                if is_predicate(op) {
                    Ok(DataType::Boolean)
                } else {
                    left.data_type()
                }
            }
            ScalarExpr::Alias { child, .. } => child.data_type(),
            _ => Err(BasaltError::unbound(format!("data type of {}", self))),
        }
    }

    pub fn nullable(&self) -> BasaltResult<bool> {
        match self {
            ScalarExpr::SlotRef(slot) => Ok(slot.nullable()),
            ScalarExpr::Literal(value) => Ok(value.is_null()),
            ScalarExpr::Binary { left, right, .. } => Ok(left.nullable()? || right.nullable()?),
            ScalarExpr::Alias { child, .. } => child.nullable(),
            _ => Err(BasaltError::unbound(format!("nullability of {}", self))),
        }
    }

    /// The slot a named expression produces.
    ///
    /// Only slot references and aliases are named, anything else must be aliased by the binder
    /// before it can become an output column.
    pub fn to_slot(&self) -> BasaltResult<Slot> {
        match self {
            ScalarExpr::SlotRef(slot) => Ok(slot.clone()),
            ScalarExpr::Alias { child, name, id } => Ok(Slot::new(
                *id,
                name.clone(),
                child.data_type()?,
                child.nullable()?,
            )),
            e if e.is_unbound() => Err(BasaltError::unbound(format!("output slot of {}", e))),
            e => Err(BasaltError::unsupported(format!(
                "{} is not a named expression",
                e
            ))),
        }
    }

    /// Slots referenced anywhere in this expression.
    pub fn input_slots(&self) -> Vec<&Slot> {
        let mut slots = vec![];
        self.collect_slots(&mut slots);
        slots
    }

    fn collect_slots<'a>(&'a self, slots: &mut Vec<&'a Slot>) {
        match self {
            ScalarExpr::SlotRef(slot) => slots.push(slot),
            ScalarExpr::Binary { left, right, .. } => {
                left.collect_slots(slots);
                right.collect_slots(slots);
            }
            ScalarExpr::Alias { child, .. } | ScalarExpr::UnboundAlias { child, .. } => {
                child.collect_slots(slots)
            }
            _ => {}
        }
    }
}

impl From<Slot> for ScalarExpr {
    fn from(slot: Slot) -> Self {
        ScalarExpr::SlotRef(slot)
    }
}

impl Display for ScalarExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarExpr::UnboundSlot(parts) => write!(f, "'{}", parts.iter().join(".")),
            ScalarExpr::UnboundStar(qualifier) if qualifier.is_empty() => write!(f, "*"),
            ScalarExpr::UnboundStar(qualifier) => write!(f, "{}.*", qualifier.iter().join(".")),
            ScalarExpr::UnboundAlias { child, name } => write!(f, "{} AS '{}", child, name),
            ScalarExpr::SlotRef(slot) => write!(f, "{}", slot),
            ScalarExpr::Literal(value) => write!(f, "{}", value),
            ScalarExpr::Binary { left, op, right } => write!(f, "{} {} {}", left, op, right),
            ScalarExpr::Alias { child, name, id } => write!(f, "{} AS {}{}", child, name, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use arrow_schema::DataType;
    use datafusion_expr::Operator;

    use crate::error::BasaltError;
    use crate::expr::{and, binary_expr, col, lit, ExprId, ScalarExpr, Slot};

    fn slot(id: u32, name: &str, data_type: DataType, nullable: bool) -> ScalarExpr {
        Slot::new(ExprId(id), name, data_type, nullable).into()
    }

    #[test]
    fn test_unbound_detection() {
        let bound = binary_expr(
            slot(0, "c1", DataType::Int64, false),
            Operator::Gt,
            lit(10i64),
        );
        assert!(!bound.is_unbound());

        let mixed = and(bound.clone(), binary_expr(col("t1.c2"), Operator::Eq, lit(1i64)));
        assert!(mixed.is_unbound());
        assert!(col("c1").alias("x").is_unbound());
    }

    #[test]
    fn test_derive_type_and_nullability() {
        let plus = binary_expr(
            slot(0, "c1", DataType::Int64, false),
            Operator::Plus,
            slot(1, "c2", DataType::Int64, true),
        );
        assert_eq!(DataType::Int64, plus.data_type().unwrap());
        assert!(plus.nullable().unwrap());

        let cmp = binary_expr(
            slot(0, "c1", DataType::Int64, false),
            Operator::Lt,
            lit(3i64),
        );
        assert_eq!(DataType::Boolean, cmp.data_type().unwrap());
        assert!(!cmp.nullable().unwrap());
    }

    #[test]
    fn test_to_slot() {
        let alias = ScalarExpr::Alias {
            child: Box::new(lit("a")),
            name: "x".to_string(),
            id: ExprId(7),
        };
        let s = alias.to_slot().unwrap();
        assert_eq!(ExprId(7), s.id());
        assert_eq!("x", s.name());
        assert_eq!(&DataType::Utf8, s.data_type());

        assert!(matches!(
            lit(1i64).to_slot(),
            Err(BasaltError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            col("c1").to_slot(),
            Err(BasaltError::UnboundAccess(_))
        ));
    }

    #[test]
    fn test_display() {
        let expr = binary_expr(col("t1.c1"), Operator::Eq, lit(1i64)).alias("flag");
        assert_eq!("'t1.c1 = 1 AS 'flag", expr.to_string());
    }
}
