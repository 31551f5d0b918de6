use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};

use arrow_schema::DataType;
use derive_more::Display;
use itertools::Itertools;

/// Identity of an expression producing a column. Unique within a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "#{}", _0)]
pub struct ExprId(pub u32);

/// Statement scoped [`ExprId`] allocator.
#[derive(Debug, Default)]
pub struct ExprIdGenerator {
    next: AtomicU32,
}

impl ExprIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ExprId {
        ExprId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// One resolved output column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    id: ExprId,
    name: String,
    qualifier: Vec<String>,
    data_type: DataType,
    nullable: bool,
}

impl Slot {
    pub fn new<S: Into<String>>(id: ExprId, name: S, data_type: DataType, nullable: bool) -> Self {
        Self {
            id,
            name: name.into(),
            qualifier: vec![],
            data_type,
            nullable,
        }
    }

    pub fn with_qualifier(mut self, qualifier: Vec<String>) -> Self {
        self.qualifier = qualifier;
        self
    }

    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self {
            nullable,
            ..self.clone()
        }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifier(&self) -> &[String] {
        &self.qualifier
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Whether `name_parts` (`[.., qualifier, name]`) refers to this slot.
    ///
    /// The qualifier given by the user may be a suffix of the slot's qualifier, so `t1.c1`
    /// matches a column of `internal.db1.t1`.
    pub fn matches(&self, name_parts: &[String], case_sensitive: bool) -> bool {
        let eq = |a: &str, b: &str| {
            if case_sensitive {
                a == b
            } else {
                a.eq_ignore_ascii_case(b)
            }
        };

        match name_parts.split_last() {
            Some((name, qualifier)) => {
                eq(name, &self.name)
                    && qualifier.len() <= self.qualifier.len()
                    && self.qualifier[self.qualifier.len() - qualifier.len()..]
                        .iter()
                        .zip(qualifier)
                        .all(|(a, b)| eq(a, b))
            }
            None => false,
        }
    }

    /// Whether the slot is covered by `qualifier.*`.
    pub fn matches_qualifier(&self, qualifier: &[String], case_sensitive: bool) -> bool {
        qualifier.len() <= self.qualifier.len()
            && self.qualifier[self.qualifier.len() - qualifier.len()..]
                .iter()
                .zip(qualifier)
                .all(|(a, b)| {
                    if case_sensitive {
                        a == b
                    } else {
                        a.eq_ignore_ascii_case(b)
                    }
                })
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(table) = self.qualifier.last() {
            write!(f, "{}.", table)?;
        }
        write!(f, "{}{}", self.name, self.id)
    }
}

/// Renders a slot list as `[a#0, b#1]`.
pub fn display_slots(slots: &[Slot]) -> String {
    format!("[{}]", slots.iter().join(", "))
}
