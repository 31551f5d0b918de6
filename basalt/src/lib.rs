//! Logical plan core of a query optimizer.
//!
//! A statement enters as a tree of [`plan::PlanNode`]s whose leaves and sink still carry raw
//! names. Such a plan is *unbound*: it can be built, compared, printed and memoized, but its
//! output columns are unknown and reading them fails with
//! [`error::BasaltError::UnboundAccess`]. The [`binder`] resolves names against a
//! [`catalog::Catalog`] and produces a *bound* plan, whose nodes derive their
//! [`properties::LogicalProperty`] lazily and cache it.
//!
//! The [`memo`] stores plans as groups of logically equivalent expressions. Rewrite rules from
//! [`rules`] add alternatives to groups, and the memo merges groups found to be equal.
//!
//! ## Design
//!
//! * [`operator`] Relational operators, bound and unbound.
//! * [`expr`] Scalar expressions and slots.
//! * [`plan`] Immutable plan nodes, builder, explain and visitor dispatch.
//! * [`binder`] Name resolution.
//! * [`catalog`] Catalog contract and an in-memory catalog.
//! * [`memo`] Groups, group expressions, rule application.
//! * [`rules`] Patterns, bindings and rewrite rules.
//! * [`properties`] Logical properties.
//!
//! ## Reference
//!
//! 1. Graefe, G., 1995. The cascades framework for query optimization. IEEE Data Eng. Bull., 18(3),
//! pp.19-29.
//! 2. Columnbia Project, https://github.com/yongwen/columbia

#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;

pub mod binder;
pub mod catalog;
pub mod error;
pub mod expr;
pub mod memo;
pub mod operator;
pub mod optimizer;
pub mod plan;
pub mod properties;
pub mod rules;

#[cfg(test)]
mod test_utils;
