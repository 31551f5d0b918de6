//! Dynamic programming table of logically equivalent expressions.
//!
//! A [`Memo`] stores plans as [`Group`]s. Every group holds a set of [`GroupExpr`]s which produce
//! the same result, and every group expression references its inputs by [`GroupId`] rather than
//! by node. Inserting a plan canonicalizes it bottom up: two structurally equal subtrees always
//! land in the same group.
//!
//! Rules never touch groups directly. They receive [`OptExpression`]s bound from a [`Pattern`]
//! and hand back alternatives, which [`Memo::insert_opt_expression`] adds to the matched group.
//! When an alternative already lives in another group, the two groups are marked duplicated and
//! folded together by [`Memo::merge_duplicate_groups`] once no binding refers to them anymore.

mod binding;
pub use binding::*;
mod shared;
pub use shared::*;

use std::cmp::{max, min};
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt::{Debug, Display, Formatter};
use std::mem::take;
use std::ops::{Index, IndexMut};

use enumset::EnumSet;
use itertools::Itertools;
use log::{debug, info, trace};
use prettytable::Table;
use smallvec::SmallVec;

use crate::error::{BasaltError, BasaltResult};
use crate::operator::{LogicalOperator, OperatorTrait};
use crate::plan::{PlanNode, PlanNodeRef};
use crate::properties::LogicalProperty;
use crate::rules::OptExprNode::{ExprHandleNode, GroupHandleNode, OperatorNode};
use crate::rules::{OptExpression, Pattern, Rule, RuleId, RuleImpl, RuleResult};

pub struct Memo {
    /// Used to avoid insert duplicate group expression.
    group_exprs: HashMap<GroupExprKey, GroupExprId>,
    groups: HashMap<GroupId, Group>,
    root_group_id: Option<GroupId>,
    next_group_id: GroupId,

    /// Records which group expression has been merged to.
    ///
    /// When group `a` is merged into group `b`, every expression of `a` gets a new id in `b`.
    /// Ids handed out before the merge are resolved through this map.
    merged_group_expr: HashMap<GroupExprId, GroupExprId>,

    /// Records which group has been merged into.
    merged_groups: HashMap<GroupId, GroupId>,

    /// Found duplicated but not merged groups.
    ///
    /// Duplicates are found while rule results are inserted, when bindings into the groups may
    /// still be alive. They are only merged in [`Memo::merge_duplicate_groups`]. The larger
    /// group id is always merged into the smaller one.
    duplicated_groups: HashMap<GroupId, GroupId>,
}

impl Default for Memo {
    fn default() -> Self {
        Self {
            group_exprs: HashMap::new(),
            groups: HashMap::new(),
            root_group_id: None,
            next_group_id: GroupId(0),
            merged_group_expr: HashMap::new(),
            merged_groups: HashMap::new(),
            duplicated_groups: HashMap::new(),
        }
    }
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_group_id(&self) -> Option<GroupId> {
        self.root_group_id.map(|id| self.resolve_group_id(id))
    }

    pub fn set_root_group_id(&mut self, group_id: GroupId) {
        self.root_group_id = Some(group_id);
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group ids in ascending order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.keys().copied().sorted().collect()
    }

    /// Looks up a group, following merges.
    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.get(&self.resolve_group_id(group_id))
    }

    /// Looks up a group expression, following merges.
    pub fn group_expr(&self, group_expr_id: GroupExprId) -> Option<&GroupExpr> {
        let id = self.resolve_group_expr_id(group_expr_id);
        self.groups
            .get(&id.group_id)
            .and_then(|g| g.logical_group_exprs.get(&id))
    }

    /// Group expression id of a structurally equal expression, if present.
    pub fn lookup(&self, key: &GroupExprKey) -> Option<GroupExprId> {
        self.group_exprs.get(key).copied()
    }

    /// Inserts a plan tree, children first, and returns the group of its root.
    ///
    /// Nodes structurally equal to an existing group expression reuse it, so inserting the same
    /// tree twice yields the same group. The root group of the memo is not changed.
    pub fn insert(&mut self, plan: &PlanNodeRef) -> BasaltResult<GroupId> {
        self.insert_plan_node(plan).map(|id| id.group_id)
    }

    fn insert_plan_node(&mut self, plan: &PlanNode) -> BasaltResult<GroupExprId> {
        let inputs = plan
            .inputs()
            .iter()
            .map(|input| self.insert_plan_node(input).map(|id| id.group_id))
            .collect::<BasaltResult<SmallVec<_>>>()?;

        let key = GroupExprKey {
            operator: plan.operator().clone(),
            inputs,
        };
        self.insert_group_expression(key, None)
    }

    /// Insert a rule result into memo and return group expression id.
    ///
    /// Parts of the result which are extracted from the original expression and remain
    /// unchanged keep their original group expression id.
    ///
    /// # Guarantee
    ///
    /// This method only creates groups and group expressions, never removes any. Duplicated
    /// groups found during insertion are only marked and ***never merged*** here, since bindings
    /// found by the caller may still refer to them.
    pub fn insert_opt_expression(
        &mut self,
        opt_expr: &OptExpression,
        target_group: Option<GroupId>,
    ) -> BasaltResult<GroupExprId> {
        match opt_expr.node() {
            ExprHandleNode(group_expr_id) => {
                let existing = self.resolve_group_expr_id(*group_expr_id);
                if let Some(target_group_id) = target_group.map(|g| self.resolve_group_id(g)) {
                    if existing.group_id != target_group_id {
                        self.mark_duplicated_group(target_group_id, existing.group_id);
                    }
                }
                Ok(existing)
            }
            OperatorNode(operator) => {
                let inputs = opt_expr
                    .inputs()
                    .iter()
                    .map(|input| match input.node() {
                        GroupHandleNode(group_id) => Ok(self.resolve_group_id(*group_id)),
                        _ => self
                            .insert_opt_expression(input, None)
                            .map(|id| id.group_id),
                    })
                    .collect::<BasaltResult<SmallVec<_>>>()?;

                let key = GroupExprKey {
                    operator: operator.clone(),
                    inputs,
                };
                let target_group = target_group.map(|g| self.resolve_group_id(g));
                self.insert_group_expression(key, target_group)
            }
            GroupHandleNode(group_id) => Err(BasaltError::unsupported(format!(
                "group handle {} can't be inserted as an expression",
                group_id
            ))),
        }
    }

    fn insert_group_expression(
        &mut self,
        key: GroupExprKey,
        target_group: Option<GroupId>,
    ) -> BasaltResult<GroupExprId> {
        let existing_group_expr_id = self.group_exprs.get(&key).copied();

        match (existing_group_expr_id, target_group) {
            (Some(existing), Some(target_group_id)) => {
                if existing.group_id != target_group_id {
                    self.mark_duplicated_group(target_group_id, existing.group_id);
                }
                Ok(existing)
            }
            (Some(existing), None) => Ok(existing),
            (None, Some(target_group_id)) => {
                let group = self.groups.get_mut(&target_group_id).ok_or_else(|| {
                    BasaltError::unsupported(format!("group {} not found", target_group_id))
                })?;
                let new_group_expr_id = group.insert_group_expr(GroupExpr::new(key.clone()));
                trace!("Inserted {} into group {}", key.operator, target_group_id);
                self.group_exprs.insert(key, new_group_expr_id);
                Ok(new_group_expr_id)
            }
            (None, None) => {
                let logical_prop = self.derive_logical_prop(&key)?;
                let new_group_id = self.new_group(logical_prop);
                let new_group_expr_id =
                    self[new_group_id].insert_group_expr(GroupExpr::new(key.clone()));
                debug!("Created group {} for {}", new_group_id, key.operator);
                self.group_exprs.insert(key, new_group_expr_id);
                Ok(new_group_expr_id)
            }
        }
    }

    /// Logical property of a new group, computed once from the properties of its inputs.
    ///
    /// The unbound sentinel propagates: a group over an unbound input is unbound as well.
    fn derive_logical_prop(&self, key: &GroupExprKey) -> BasaltResult<LogicalProperty> {
        if key.operator.is_unbound() {
            return Ok(LogicalProperty::Unbound);
        }

        let inputs = key
            .inputs
            .iter()
            .map(|group_id| &self[*group_id].logical_prop)
            .collect::<Vec<_>>();
        if inputs.iter().any(|p| p.is_unbound()) {
            return Ok(LogicalProperty::Unbound);
        }
        key.operator.derive_logical_prop(&inputs)
    }

    /// Applies `rule` to the group expression and inserts every result into its group.
    ///
    /// Returns the number of new group expressions. A rule is applied at most once to a group
    /// expression.
    pub fn apply_rule(&mut self, rule: &RuleImpl, group_expr_id: GroupExprId) -> BasaltResult<usize> {
        let group_expr_id = self.resolve_group_expr_id(group_expr_id);
        let rule_id = rule.rule_id();
        match self.group_expr(group_expr_id) {
            Some(group_expr) if group_expr.is_rule_applied(rule_id) => return Ok(0),
            Some(_) => {}
            None => {
                return Err(BasaltError::unsupported(format!(
                    "group expression {} not found",
                    group_expr_id
                )))
            }
        }

        let bindings = Binding::new(group_expr_id, rule.pattern(), self)
            .into_iter()
            .collect::<Vec<_>>();

        let mut result = RuleResult::new();
        for opt_expr in bindings {
            rule.apply(opt_expr, self, &mut result)?;
        }

        let before = self.group_exprs.len();
        for opt_expr in result.results() {
            self.insert_opt_expression(&opt_expr, Some(group_expr_id.group_id))?;
        }
        let count = self.group_exprs.len() - before;

        self[group_expr_id].set_rule_applied(rule_id);
        debug!(
            "Applied {:?} to {}, {} new expressions",
            rule, group_expr_id, count
        );
        Ok(count)
    }

    /// Applies `rules` to every logical group expression until no new expression shows up, then
    /// merges duplicated groups.
    pub fn explore(&mut self, rules: &[RuleImpl]) -> BasaltResult<()> {
        loop {
            let mut changed = false;
            for group_id in self.group_ids() {
                let group_expr_ids = match self.groups.get(&group_id) {
                    Some(group) => group.logical_group_expr_ids(),
                    None => continue,
                };
                for group_expr_id in group_expr_ids {
                    for rule in rules {
                        changed |= self.apply_rule(rule, group_expr_id)? > 0;
                    }
                }
            }

            changed |= !self.duplicated_groups.is_empty();
            self.merge_duplicate_groups();
            if !changed {
                break;
            }
        }

        self.groups.values_mut().for_each(|g| g.explored = true);
        info!("Explored memo with {} groups", self.groups.len());
        Ok(())
    }

    /// Process `duplicated_groups` and merge them.
    ///
    /// Merging may reveal further duplicates, e.g. two expressions whose inputs only differed
    /// in the merged groups. Those are merged as well until none is left.
    pub fn merge_duplicate_groups(&mut self) {
        while !self.duplicated_groups.is_empty() {
            let found = take(&mut self.duplicated_groups);
            let mapping = found
                .keys()
                .map(|src| {
                    let mut dest = *src;
                    while let Some(next) = found.get(&dest) {
                        dest = *next;
                    }
                    (*src, dest)
                })
                .collect::<HashMap<GroupId, GroupId>>();

            for (src, dest) in mapping.iter().sorted() {
                self.merge_group(*src, *dest);
            }

            // Update group reference of all group expressions
            self.groups
                .values_mut()
                .for_each(|group| group.merge_group_mappings(&mapping));

            self.rebuild_group_expr_keys();
        }
    }

    /// Rebuilds the key index from the groups.
    ///
    /// An expression equal to an older one of the same group is dropped, one equal to an
    /// expression of another group marks both groups duplicated.
    fn rebuild_group_expr_keys(&mut self) {
        let mut group_exprs: HashMap<GroupExprKey, GroupExprId> =
            HashMap::with_capacity(self.group_exprs.len());
        let mut removed = vec![];
        let mut duplicated = vec![];

        for group_id in self.group_ids() {
            for group_expr_id in self[group_id].logical_group_expr_ids() {
                let key = self[group_expr_id].key.clone();
                match group_exprs.get(&key).copied() {
                    Some(existing) if existing.group_id == group_id => {
                        removed.push((group_expr_id, existing))
                    }
                    Some(existing) => duplicated.push((existing.group_id, group_id)),
                    None => {
                        group_exprs.insert(key, group_expr_id);
                    }
                }
            }
        }
        self.group_exprs = group_exprs;

        for (group_expr_id, existing) in removed {
            self[group_expr_id.group_id]
                .logical_group_exprs
                .remove(&group_expr_id);
            self.merged_group_expr.insert(group_expr_id, existing);
        }
        for (a, b) in duplicated {
            self.mark_duplicated_group(a, b);
        }
    }

    fn merge_group(&mut self, src: GroupId, dest: GroupId) {
        if !self.groups.contains_key(&dest) {
            return;
        }
        let src_group = match self.groups.remove(&src) {
            Some(group) => group,
            None => return,
        };

        if let Some(dest_group) = self.groups.get_mut(&dest) {
            for (group_expr_id, group_expr) in src_group
                .logical_group_exprs
                .into_iter()
                .sorted_by_key(|(id, _)| *id)
            {
                let new_group_expr_id = dest_group.next_group_expr_id();
                dest_group
                    .logical_group_exprs
                    .insert(new_group_expr_id, group_expr);
                self.merged_group_expr
                    .insert(group_expr_id, new_group_expr_id);
            }

            dest_group.explored &= src_group.explored;
            if dest_group.logical_prop.is_unbound() {
                dest_group.logical_prop = src_group.logical_prop;
            }
        }

        info!("Merged group {} into group {}", src, dest);
        self.merged_groups.insert(src, dest);
    }

    /// Mark `src_group_id` and `dest_group_id` are duplicated.
    fn mark_duplicated_group(&mut self, src_group_id: GroupId, dest_group_id: GroupId) {
        let a = self.find_duplicated(src_group_id);
        let b = self.find_duplicated(dest_group_id);
        if a == b {
            return;
        }

        // We always merge large group id into small group id.
        let (src, dest) = (max(a, b), min(a, b));
        debug!("Found duplicated groups {} and {}", src, dest);
        self.duplicated_groups.insert(src, dest);
    }

    fn find_duplicated(&self, mut group_id: GroupId) -> GroupId {
        while let Some(dest) = self.duplicated_groups.get(&group_id) {
            group_id = *dest;
        }
        group_id
    }

    fn new_group(&mut self, logical_prop: LogicalProperty) -> GroupId {
        let new_group_id = self.next_group_id;
        self.next_group_id.0 += 1;
        self.groups
            .insert(new_group_id, Group::new(new_group_id, logical_prop));
        new_group_id
    }

    /// Follows merges from a possibly stale group id.
    fn resolve_group_id(&self, mut group_id: GroupId) -> GroupId {
        while !self.groups.contains_key(&group_id) {
            match self.merged_groups.get(&group_id) {
                Some(dest) => group_id = *dest,
                None => break,
            }
        }
        group_id
    }

    /// Follows merges from a possibly stale group expression id.
    fn resolve_group_expr_id(&self, mut group_expr_id: GroupExprId) -> GroupExprId {
        while self
            .groups
            .get(&group_expr_id.group_id)
            .map_or(true, |g| !g.logical_group_exprs.contains_key(&group_expr_id))
        {
            match self.merged_group_expr.get(&group_expr_id) {
                Some(dest) => group_expr_id = *dest,
                None => break,
            }
        }
        group_expr_id
    }

    /// Extracts a plan rooted at `group_id`.
    ///
    /// Each group contributes its first expression which doesn't lead back into a group on the
    /// current path. Nodes carry their group expression id and the group's logical property.
    pub fn copy_out(&self, group_id: GroupId) -> BasaltResult<PlanNodeRef> {
        let mut path = HashSet::new();
        self.copy_out_group(self.resolve_group_id(group_id), &mut path)
    }

    fn copy_out_group(
        &self,
        group_id: GroupId,
        path: &mut HashSet<GroupId>,
    ) -> BasaltResult<PlanNodeRef> {
        let group = self.groups.get(&group_id).ok_or_else(|| {
            BasaltError::unsupported(format!("group {} not found", group_id))
        })?;

        path.insert(group_id);
        let mut ret = None;
        for group_expr_id in group.logical_group_expr_ids() {
            let group_expr = &group[group_expr_id];
            if group_expr.inputs().iter().any(|g| path.contains(g)) {
                continue;
            }

            let inputs = group_expr
                .inputs()
                .iter()
                .map(|g| self.copy_out_group(*g, path))
                .collect::<BasaltResult<Vec<_>>>();
            if let Ok(inputs) = inputs {
                ret = Some(PlanNode::new_memo_node(
                    group_expr.operator().clone(),
                    inputs,
                    group_expr_id,
                    group.logical_prop.clone(),
                ));
                break;
            }
        }
        path.remove(&group_id);

        match ret {
            Some(node) => node,
            None => Err(BasaltError::unsupported(format!(
                "no acyclic expression in group {}",
                group_id
            ))),
        }
    }
}

/// Builds a memo rooted at the plan's group.
impl TryFrom<&PlanNodeRef> for Memo {
    type Error = BasaltError;

    fn try_from(plan: &PlanNodeRef) -> BasaltResult<Self> {
        let mut memo = Memo::new();
        let root_group_id = memo.insert(plan)?;
        memo.root_group_id = Some(root_group_id);
        Ok(memo)
    }
}

impl Index<GroupId> for Memo {
    type Output = Group;

    fn index(&self, index: GroupId) -> &Group {
        self.groups.get(&index).unwrap()
    }
}

impl IndexMut<GroupId> for Memo {
    fn index_mut(&mut self, index: GroupId) -> &mut Self::Output {
        self.groups.get_mut(&index).unwrap()
    }
}

impl Index<GroupExprId> for Memo {
    type Output = GroupExpr;

    fn index(&self, index: GroupExprId) -> &Self::Output {
        &self[index.group_id][index]
    }
}

impl IndexMut<GroupExprId> for Memo {
    fn index_mut(&mut self, index: GroupExprId) -> &mut Self::Output {
        &mut self[index.group_id][index]
    }
}

impl Debug for Memo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "Groups in memo:")?;
        writeln!(f)?;

        for group_id in self.group_ids() {
            writeln!(f, "{:?}", self[group_id])?;
        }

        // Print merged group expressions
        {
            writeln!(f, "Merged group expressions:")?;
            let mut table = Table::new();
            table.add_row(row![
                "Source Group Expression Id",
                "Target Group Expression Id"
            ]);
            for (src, dest) in self.merged_group_expr.iter().sorted() {
                table.add_row(row![src, dest]);
            }

            writeln!(f, "{}", table)?;
        }

        // Print merged groups
        {
            writeln!(f, "Merged groups:")?;
            let mut table = Table::new();
            table.add_row(row!["Source Group Id", "Target Group Id"]);
            for (src, dest) in self.merged_groups.iter().sorted() {
                table.add_row(row![src, dest]);
            }

            writeln!(f, "{}", table)?;
        }

        // Print found duplicated groups
        {
            writeln!(f, "Duplicated groups:")?;
            let mut table = Table::new();
            table.add_row(row!["Source Group Id", "Target Group Id"]);
            for (src, dest) in self.duplicated_groups.iter().sorted() {
                table.add_row(row![src, dest]);
            }

            writeln!(f, "{}", table)?;
        }

        writeln!(f)
    }
}

/// A group id is an index of `groups` in `Memo`.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Ord, PartialOrd)]
pub struct GroupId(pub usize);

impl Debug for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A group expression id is an index of `logical_group_exprs` in `Group`.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Ord, PartialOrd)]
pub struct GroupExprId {
    pub group_id: GroupId,
    pub expr_id: usize,
}

impl Debug for GroupExprId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}.{:?}", self.group_id, self.expr_id)
    }
}

impl Display for GroupExprId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}.{:?}", self.group_id, self.expr_id)
    }
}

impl GroupExprId {
    pub fn new(group_id: GroupId, expr_id: usize) -> Self {
        Self { group_id, expr_id }
    }
}

/// A group contains a set of logically equivalent `GroupExpression`s.
pub struct Group {
    group_id: GroupId,
    /// Shared by all expressions in the group.
    logical_prop: LogicalProperty,
    logical_group_exprs: HashMap<GroupExprId, GroupExpr>,

    /// All logical expression has been explored.
    explored: bool,

    next_expr_id: usize,
}

impl Debug for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Group {:?}:", &self.group_id.0)?;

        let mut table = Table::new();
        table.add_row(row!["Group Expression Id", "Operator", "Inputs"]);
        for group_expr_id in self.logical_group_expr_ids() {
            let group_expr = &self[group_expr_id];
            table.add_row(row![
                group_expr_id.expr_id,
                format!("{}", group_expr.key.operator),
                format!("{:?}", group_expr.key.inputs)
            ]);
        }

        writeln!(f, "{}", table)
    }
}

impl Index<GroupExprId> for Group {
    type Output = GroupExpr;

    fn index(&self, index: GroupExprId) -> &Self::Output {
        self.logical_group_exprs.get(&index).unwrap()
    }
}

impl IndexMut<GroupExprId> for Group {
    fn index_mut(&mut self, index: GroupExprId) -> &mut Self::Output {
        self.logical_group_exprs.get_mut(&index).unwrap()
    }
}

impl Group {
    fn new(group_id: GroupId, logical_prop: LogicalProperty) -> Self {
        Self {
            group_id,
            logical_prop,
            logical_group_exprs: HashMap::new(),
            explored: false,
            next_expr_id: 0,
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn logical_prop(&self) -> &LogicalProperty {
        &self.logical_prop
    }

    pub fn is_explored(&self) -> bool {
        self.explored
    }

    /// Expression ids in insertion order.
    pub fn logical_group_expr_ids(&self) -> Vec<GroupExprId> {
        self.logical_group_exprs.keys().copied().sorted().collect()
    }

    /// Number of group expressions.
    pub fn expr_count(&self) -> usize {
        self.logical_group_exprs.len()
    }

    fn insert_group_expr(&mut self, group_expr: GroupExpr) -> GroupExprId {
        let group_expr_id = self.next_group_expr_id();
        self.logical_group_exprs.insert(group_expr_id, group_expr);
        group_expr_id
    }

    fn next_group_expr_id(&mut self) -> GroupExprId {
        let expr_id = self.next_expr_id;
        self.next_expr_id += 1;
        GroupExprId {
            group_id: self.group_id,
            expr_id,
        }
    }

    fn merge_group_mappings(&mut self, merge_group_mapping: &HashMap<GroupId, GroupId>) {
        self.logical_group_exprs
            .values_mut()
            .for_each(|group_expr| group_expr.update_group_ids(merge_group_mapping));
    }
}

/// Identity of a group expression: operator plus input groups.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GroupExprKey {
    pub operator: LogicalOperator,
    pub inputs: SmallVec<[GroupId; 2]>,
}

pub struct GroupExpr {
    /// Can be used to uniquely identify a group expression.
    ///
    /// Input group ids are only rewritten when groups are merged.
    key: GroupExprKey,

    /// Rules already applied to this group expression.
    applied_rules: EnumSet<RuleId>,
}

impl GroupExpr {
    fn new(key: GroupExprKey) -> Self {
        Self {
            key,
            applied_rules: EnumSet::new(),
        }
    }

    pub fn key(&self) -> &GroupExprKey {
        &self.key
    }

    pub fn is_rule_applied(&self, rule_id: RuleId) -> bool {
        self.applied_rules.contains(rule_id)
    }

    pub fn input_group_ids(&self) -> impl Iterator<Item = GroupId> {
        self.key.inputs.clone().into_iter()
    }

    fn set_rule_applied(&mut self, rule_id: RuleId) {
        self.applied_rules |= rule_id;
    }

    pub fn matches_without_children(&self, pattern: &Pattern) -> bool {
        pattern.matches(self.operator()) && pattern.accepts_inputs(self.key.inputs.len())
    }

    pub fn operator(&self) -> &LogicalOperator {
        &self.key.operator
    }

    pub fn inputs(&self) -> &[GroupId] {
        &self.key.inputs
    }

    /// Update input group ids using merged group mapping.
    fn update_group_ids(&mut self, merge_group_mapping: &HashMap<GroupId, GroupId>) {
        self.key.inputs = self
            .key
            .inputs
            .iter()
            .map(|group_id| *merge_group_mapping.get(group_id).unwrap_or(group_id))
            .collect();
    }
}
