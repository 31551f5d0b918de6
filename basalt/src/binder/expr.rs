use itertools::Itertools;

use crate::error::{BasaltResult, ResolutionError};
use crate::expr::{ExprIdGenerator, ScalarExpr, Slot};

/// Where an expression appears. Stars and aliases are only allowed in projections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Clause {
    Filter,
    JoinCondition,
    Projection,
    SinkOutput,
}

impl Clause {
    fn name(&self) -> &'static str {
        match self {
            Clause::Filter => "filter",
            Clause::JoinCondition => "join condition",
            Clause::Projection => "projection",
            Clause::SinkOutput => "sink output",
        }
    }
}

/// Resolves expressions against the output slots of the bound inputs.
pub(crate) struct ExprBinder<'a> {
    input: &'a [Slot],
    case_sensitive: bool,
    ids: &'a ExprIdGenerator,
}

impl<'a> ExprBinder<'a> {
    pub(crate) fn new(input: &'a [Slot], case_sensitive: bool, ids: &'a ExprIdGenerator) -> Self {
        Self {
            input,
            case_sensitive,
            ids,
        }
    }

    /// Binds a projection list. Stars expand in place and every item comes out named.
    pub(crate) fn bind_projection(&self, exprs: &[ScalarExpr]) -> BasaltResult<Vec<ScalarExpr>> {
        let mut bound = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                ScalarExpr::UnboundStar(qualifier) => bound.extend(self.expand_star(qualifier)?),
                ScalarExpr::UnboundAlias { child, name } => bound.push(ScalarExpr::Alias {
                    child: Box::new(self.bind(child, Clause::Projection)?),
                    name: name.clone(),
                    id: self.ids.next_id(),
                }),
                expr => {
                    let resolved = self.bind(expr, Clause::Projection)?;
                    match resolved {
                        ScalarExpr::SlotRef(_) | ScalarExpr::Alias { .. } => bound.push(resolved),
                        other => bound.push(ScalarExpr::Alias {
                            child: Box::new(other),
                            name: column_name(expr),
                            id: self.ids.next_id(),
                        }),
                    }
                }
            }
        }
        Ok(bound)
    }

    /// Binds a single expression. Stars and aliases are rejected here, even inside projections,
    /// since only top level projection items may carry them.
    pub(crate) fn bind(&self, expr: &ScalarExpr, clause: Clause) -> BasaltResult<ScalarExpr> {
        match expr {
            ScalarExpr::UnboundSlot(name_parts) => self.resolve_slot(name_parts).map(Into::into),
            ScalarExpr::UnboundStar(_) | ScalarExpr::UnboundAlias { .. } => {
                Err(ResolutionError::UnexpectedExpression {
                    expr: expr.to_string(),
                    context: clause.name().to_string(),
                }
                .into())
            }
            ScalarExpr::Binary { left, op, right } => Ok(ScalarExpr::Binary {
                left: Box::new(self.bind(left, clause)?),
                op: *op,
                right: Box::new(self.bind(right, clause)?),
            }),
            ScalarExpr::Alias { child, name, id } => Ok(ScalarExpr::Alias {
                child: Box::new(self.bind(child, clause)?),
                name: name.clone(),
                id: *id,
            }),
            ScalarExpr::SlotRef(slot) => self.lookup_slot(slot).map(Into::into),
            ScalarExpr::Literal(_) => Ok(expr.clone()),
        }
    }

    /// A bound slot stays valid only while the input still produces its id.
    fn lookup_slot(&self, slot: &Slot) -> BasaltResult<Slot> {
        self.input
            .iter()
            .find(|s| s.id() == slot.id())
            .cloned()
            .ok_or_else(|| {
                ResolutionError::ColumnNotFound {
                    name: slot.to_string(),
                }
                .into()
            })
    }

    fn resolve_slot(&self, name_parts: &[String]) -> BasaltResult<Slot> {
        let candidates = self
            .input
            .iter()
            .filter(|slot| slot.matches(name_parts, self.case_sensitive))
            .unique_by(|slot| slot.id())
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [slot] => Ok((*slot).clone()),
            [] => Err(ResolutionError::ColumnNotFound {
                name: name_parts.join("."),
            }
            .into()),
            _ => Err(ResolutionError::AmbiguousColumn {
                name: name_parts.join("."),
                candidates: candidates.iter().map(|s| s.to_string()).collect(),
            }
            .into()),
        }
    }

    fn expand_star(&self, qualifier: &[String]) -> BasaltResult<Vec<ScalarExpr>> {
        let slots = self
            .input
            .iter()
            .filter(|slot| slot.matches_qualifier(qualifier, self.case_sensitive))
            .cloned()
            .map(ScalarExpr::from)
            .collect::<Vec<_>>();

        if slots.is_empty() && !qualifier.is_empty() {
            return Err(ResolutionError::ColumnNotFound {
                name: format!("{}.*", qualifier.join(".")),
            }
            .into());
        }
        Ok(slots)
    }
}

/// Output name of an unnamed projection item, the item's text without binder markup.
fn column_name(expr: &ScalarExpr) -> String {
    match expr {
        ScalarExpr::UnboundSlot(name_parts) => name_parts.join("."),
        ScalarExpr::UnboundStar(qualifier) if qualifier.is_empty() => "*".to_string(),
        ScalarExpr::UnboundStar(qualifier) => format!("{}.*", qualifier.join(".")),
        ScalarExpr::SlotRef(slot) => slot.name().to_string(),
        ScalarExpr::Literal(value) => value.to_string(),
        ScalarExpr::Binary { left, op, right } => {
            format!("{} {} {}", column_name(left), op, column_name(right))
        }
        ScalarExpr::Alias { name, .. } | ScalarExpr::UnboundAlias { name, .. } => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use arrow_schema::DataType;
    use datafusion_expr::Operator::Plus;

    use crate::binder::expr::{Clause, ExprBinder};
    use crate::error::{BasaltError, ResolutionError};
    use crate::expr::{binary_expr, col, lit, qualified_star, star, ExprId, ExprIdGenerator, Slot};

    fn input() -> Vec<Slot> {
        let q = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        vec![
            Slot::new(ExprId(0), "c1", DataType::Int64, false)
                .with_qualifier(q(&["internal", "db1", "t1"])),
            Slot::new(ExprId(1), "c2", DataType::Utf8, true)
                .with_qualifier(q(&["internal", "db1", "t1"])),
            Slot::new(ExprId(2), "c1", DataType::Int64, false)
                .with_qualifier(q(&["internal", "db1", "t2"])),
        ]
    }

    #[test]
    fn test_resolve_columns() {
        let slots = input();
        let ids = ExprIdGenerator::new();
        let binder = ExprBinder::new(&slots, false, &ids);

        let bound = binder.bind(&col("C2"), Clause::Filter).unwrap();
        assert_eq!(ExprId(1), bound.as_slot_ref().unwrap().id());

        let bound = binder.bind(&col("t2.c1"), Clause::Filter).unwrap();
        assert_eq!(ExprId(2), bound.as_slot_ref().unwrap().id());

        let err = binder.bind(&col("c1"), Clause::Filter).unwrap_err();
        match err {
            BasaltError::Resolution(ResolutionError::AmbiguousColumn { name, candidates }) => {
                assert_eq!("c1", name);
                assert_eq!(vec!["t1.c1#0", "t2.c1#2"], candidates);
            }
            e => panic!("unexpected error {:?}", e),
        }

        assert_eq!(
            Some(&ResolutionError::ColumnNotFound {
                name: "t1.c9".to_string()
            }),
            binder
                .bind(&col("t1.c9"), Clause::Filter)
                .unwrap_err()
                .as_resolution()
        );
    }

    #[test]
    fn test_case_sensitive_resolution() {
        let slots = input();
        let ids = ExprIdGenerator::new();
        let binder = ExprBinder::new(&slots, true, &ids);

        assert!(binder.bind(&col("t1.C2"), Clause::Filter).is_err());
        assert!(binder.bind(&col("t1.c2"), Clause::Filter).is_ok());
    }

    #[test]
    fn test_bind_projection() {
        let slots = input();
        let ids = ExprIdGenerator::new();
        let binder = ExprBinder::new(&slots, false, &ids);

        let bound = binder
            .bind_projection(&[
                qualified_star("t1"),
                binary_expr(col("t2.c1"), Plus, lit(1i64)),
                col("c2").alias("x"),
            ])
            .unwrap();

        let names = bound
            .iter()
            .map(|e| e.to_slot().unwrap().name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(vec!["c1", "c2", "t2.c1 + 1", "x"], names);
        assert_eq!(ExprId(0), bound[2].to_slot().unwrap().id());
        assert_eq!(ExprId(1), bound[3].to_slot().unwrap().id());

        assert_eq!(3, binder.bind_projection(&[star()]).unwrap().len());
    }

    #[test]
    fn test_star_outside_projection() {
        let slots = input();
        let ids = ExprIdGenerator::new();
        let binder = ExprBinder::new(&slots, false, &ids);

        let err = binder.bind(&star(), Clause::Filter).unwrap_err();
        assert_eq!(
            Some(&ResolutionError::UnexpectedExpression {
                expr: "*".to_string(),
                context: "filter".to_string(),
            }),
            err.as_resolution()
        );

        assert!(binder.bind_projection(&[qualified_star("t3")]).is_err());
    }

    #[test]
    fn test_bound_slot_must_exist_in_input() {
        let slots = input();
        let ids = ExprIdGenerator::new();
        let binder = ExprBinder::new(&slots, false, &ids);

        let known = binary_expr(slots[1].clone().into(), Plus, col("t2.c1"));
        let bound = binder.bind(&known, Clause::Filter).unwrap();
        assert!(!bound.is_unbound());

        let stale = Slot::new(ExprId(42), "c1", DataType::Int64, false);
        let err = binder
            .bind(&binary_expr(stale.into(), Plus, col("c2")), Clause::Filter)
            .unwrap_err();
        assert!(matches!(
            err.as_resolution(),
            Some(ResolutionError::ColumnNotFound { .. })
        ));
    }
}
