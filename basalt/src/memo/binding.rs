use std::vec::IntoIter;

use itertools::Itertools;

use crate::memo::{GroupExprId, GroupId, Memo};
use crate::rules::{OptExpression, Pattern};

/// Every way a [`Pattern`] matches the memo at one group expression.
///
/// Pattern children are tried against every logical expression of the corresponding input
/// group, so the bindings are the cartesian product of the per-input matches, ordered by group
/// expression id. Inputs below a pattern leaf come back as group handles.
pub struct Binding<'a> {
    root: GroupExprId,
    pattern: &'a Pattern,
    memo: &'a Memo,
}

impl<'a> Binding<'a> {
    pub fn new(group_expr_id: GroupExprId, pattern: &'a Pattern, memo: &'a Memo) -> Self {
        Self {
            root: group_expr_id,
            pattern,
            memo,
        }
    }
}

impl<'a> IntoIterator for Binding<'a> {
    type Item = OptExpression;
    type IntoIter = IntoIter<OptExpression>;

    fn into_iter(self) -> Self::IntoIter {
        bind_group_expr(self.memo, self.root, self.pattern).into_iter()
    }
}

fn bind_group_expr(
    memo: &Memo,
    group_expr_id: GroupExprId,
    pattern: &Pattern,
) -> Vec<OptExpression> {
    let group_expr = match memo.group_expr(group_expr_id) {
        Some(e) if e.matches_without_children(pattern) => e,
        _ => return vec![],
    };

    if pattern.is_leaf() {
        let inputs = group_expr
            .inputs()
            .iter()
            .map(|group_id| OptExpression::with_group_handle(*group_id))
            .collect::<Vec<_>>();
        return vec![OptExpression::with_expr_handle(group_expr_id, inputs)];
    }

    pattern
        .children()
        .iter()
        .zip(group_expr.inputs())
        .map(|(child, group_id)| bind_group(memo, *group_id, child).into_iter())
        .multi_cartesian_product()
        .map(|inputs| OptExpression::with_expr_handle(group_expr_id, inputs))
        .collect()
}

fn bind_group(memo: &Memo, group_id: GroupId, pattern: &Pattern) -> Vec<OptExpression> {
    memo[group_id]
        .logical_group_expr_ids()
        .into_iter()
        .flat_map(|group_expr_id| bind_group_expr(memo, group_expr_id, pattern))
        .collect()
}
