//! Rewrite rules over the memo.
//!
//! A rule defines an equivalent transformation of a plan fragment. Rules here are exploration
//! rules: they produce alternatives which keep the output of the matched group unchanged, and
//! the memo records every alternative in the same group.
//!
//! ## Pattern
//!
//! A pattern defines which fragments a rule operates on, so the rule never walks plans or
//! groups itself. [`MergeLimitRule`] uses this pattern:
//! ```no
//! static ref MERGE_LIMIT_PATTERN: Pattern = Pattern::node(is_limit, [Pattern::leaf(is_limit)]);
//! ```
//!
//! The memo binds the pattern into [`OptExpression`]s and hands them to the rule, and the rule
//! returns new [`OptExpression`]s which the memo inserts into the matched group:
//!```no
//! [GroupExprId(0, 0) Limit(10)]                          [Operator Limit(5)]
//!              |                                                  |
//!              |                  MergeLimitRule                  |
//! [GroupExprId(1, 0) Limit(5)]       -------->               [GroupId(2)]
//!              |
//!         [GroupId(2)]
//! ```
mod pattern;
pub use pattern::*;
mod opt_expr;
pub use opt_expr::*;
mod filter;
pub use filter::*;
mod limit;
pub use limit::*;

use std::fmt::{Debug, Formatter};

use enum_dispatch::enum_dispatch;
use enumset::EnumSetType;
use std::convert::AsRef;
use strum_macros::AsRefStr;

use crate::error::BasaltResult;
use crate::memo::Memo;

pub type OptExprVec = Vec<OptExpression>;

#[derive(Default)]
pub struct RuleResult {
    exprs: OptExprVec,
}

impl RuleResult {
    pub fn new() -> Self {
        Self { exprs: vec![] }
    }

    pub fn add(&mut self, new_expr: OptExpression) {
        self.exprs.push(new_expr);
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn results(self) -> impl Iterator<Item = OptExpression> {
        self.exprs.into_iter()
    }
}

/// A rule should only focus on providing equivalent transformations of optimizer expressions.
#[enum_dispatch(RuleImpl)]
pub trait Rule {
    /// Apply a rule to a bound fragment. A fragment the rule can't improve yields no result.
    fn apply(
        &self,
        input: OptExpression,
        memo: &Memo,
        result: &mut RuleResult,
    ) -> BasaltResult<()>;

    /// Pattern for rule.
    fn pattern(&self) -> &Pattern;

    /// Use to identify each rule.
    ///
    /// This is used to avoid applying same rule repeatedly to same group expression.
    fn rule_id(&self) -> RuleId;

    /// Use to identify applying order of rules.
    fn rule_promise(&self) -> RulePromise;
}

#[enum_dispatch]
#[derive(Clone, AsRefStr)]
pub enum RuleImpl {
    MergeLimitRule,
    MergeFilterRule,
}

#[derive(EnumSetType, Debug)]
pub enum RuleId {
    MergeLimit,
    MergeFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RulePromise {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Debug for RuleImpl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_ref())
    }
}
