use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::mem::swap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{BasaltError, BasaltResult};
use crate::expr::{ScalarExpr, Slot};
use crate::memo::GroupExprId;
use crate::operator::{LogicalOperator, OperatorTrait, Projection};
use crate::properties::LogicalProperty;

mod builder;
pub use builder::*;
mod explain;
pub use explain::*;
mod visit;
pub use visit::*;

pub type PlanNodeRef = Arc<PlanNode>;

/// One node in a plan.
///
/// Nodes are immutable. Every `with_*` method returns a new node and leaves `self` untouched,
/// so subtrees can be shared freely between plans and threads.
///
/// Equality and hashing consider only the operator and the inputs. The memo back reference
/// and the cached logical property are metadata.
#[derive(Debug)]
pub struct PlanNode {
    operator: LogicalOperator,
    inputs: Vec<PlanNodeRef>,
    group_expr: Option<GroupExprId>,
    logical_prop: OnceCell<LogicalProperty>,
}

impl PartialEq for PlanNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.inputs == other.inputs
    }
}

impl Eq for PlanNode {}

impl Hash for PlanNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operator.hash(state);
        self.inputs.hash(state);
    }
}

fn check_arity(operator: &LogicalOperator, inputs: &[PlanNodeRef]) -> BasaltResult<()> {
    let expected = operator.arity();
    if expected.accepts(inputs.len()) {
        Ok(())
    } else {
        Err(BasaltError::Arity {
            operator: operator.name().to_string(),
            expected,
            actual: inputs.len(),
        })
    }
}

impl PlanNode {
    /// Creates a node, failing if `inputs` doesn't match the operator's arity.
    pub fn try_new(operator: LogicalOperator, inputs: Vec<PlanNodeRef>) -> BasaltResult<Self> {
        check_arity(&operator, &inputs)?;
        Ok(Self::new_unchecked(operator, inputs))
    }

    /// Caller guarantees arity.
    pub(crate) fn new_unchecked(operator: LogicalOperator, inputs: Vec<PlanNodeRef>) -> Self {
        Self {
            operator,
            inputs,
            group_expr: None,
            logical_prop: OnceCell::new(),
        }
    }

    /// Node copied out of a memo group.
    pub(crate) fn new_memo_node(
        operator: LogicalOperator,
        inputs: Vec<PlanNodeRef>,
        group_expr: GroupExprId,
        logical_prop: LogicalProperty,
    ) -> BasaltResult<PlanNodeRef> {
        check_arity(&operator, &inputs)?;
        Ok(Arc::new(Self {
            operator,
            inputs,
            group_expr: Some(group_expr),
            logical_prop: OnceCell::with_value(logical_prop),
        }))
    }

    pub fn operator(&self) -> &LogicalOperator {
        &self.operator
    }

    pub fn inputs(&self) -> &[PlanNodeRef] {
        &self.inputs
    }

    pub fn input(&self, idx: usize) -> Option<&PlanNodeRef> {
        self.inputs.get(idx)
    }

    /// The memo expression this node was copied out of, if any.
    pub fn group_expr(&self) -> Option<GroupExprId> {
        self.group_expr
    }

    pub fn is_unbound(&self) -> bool {
        self.operator.is_unbound()
    }

    /// Whether any node of this subtree is unbound.
    pub fn has_unbound(&self) -> bool {
        self.is_unbound() || self.inputs.iter().any(|i| i.has_unbound())
    }

    /// Logical property of this node, derived on first access.
    ///
    /// Unbound nodes yield [`LogicalProperty::Unbound`] without looking at their inputs. A
    /// failed derivation is not cached, so each call derives again and fails again.
    pub fn logical_prop(&self) -> BasaltResult<&LogicalProperty> {
        self.logical_prop.get_or_try_init(|| {
            if self.operator.is_unbound() {
                return Ok(LogicalProperty::Unbound);
            }
            let inputs = self
                .inputs
                .iter()
                .map(|i| i.logical_prop())
                .collect::<BasaltResult<Vec<_>>>()?;
            self.operator.derive_logical_prop(&inputs)
        })
    }

    pub fn output(&self) -> BasaltResult<&[Slot]> {
        self.logical_prop()?.output()
    }

    pub fn expressions(&self) -> BasaltResult<Vec<&ScalarExpr>> {
        self.operator.expressions()
    }

    /// Same operator and memo reference over new inputs. Cached properties are dropped.
    pub fn with_inputs(&self, inputs: Vec<PlanNodeRef>) -> BasaltResult<PlanNodeRef> {
        check_arity(&self.operator, &inputs)?;
        Ok(Arc::new(Self {
            operator: self.operator.clone(),
            inputs,
            group_expr: self.group_expr,
            logical_prop: OnceCell::new(),
        }))
    }

    /// Same operator and inputs with a new memo reference. Computed properties carry over.
    pub fn with_group_expr(&self, group_expr: Option<GroupExprId>) -> PlanNodeRef {
        Arc::new(Self {
            operator: self.operator.clone(),
            inputs: self.inputs.clone(),
            group_expr,
            logical_prop: self.logical_prop.clone(),
        })
    }

    /// Replaces memo reference, cached property and inputs at once. The operator is kept as is.
    pub fn with_group_expr_logical_prop_inputs(
        &self,
        group_expr: Option<GroupExprId>,
        logical_prop: Option<LogicalProperty>,
        inputs: Vec<PlanNodeRef>,
    ) -> BasaltResult<PlanNodeRef> {
        check_arity(&self.operator, &inputs)?;
        let cell = match logical_prop {
            Some(prop) => OnceCell::with_value(prop),
            None => OnceCell::new(),
        };
        Ok(Arc::new(Self {
            operator: self.operator.clone(),
            inputs,
            group_expr,
            logical_prop: cell,
        }))
    }

    /// Replaces the expressions naming the node's output.
    ///
    /// Only projections and bound sinks have such expressions.
    pub fn with_output_exprs(&self, exprs: Vec<ScalarExpr>) -> BasaltResult<PlanNodeRef> {
        let operator = match &self.operator {
            LogicalOperator::LogicalProjection(_) => {
                LogicalOperator::LogicalProjection(Projection::new(exprs))
            }
            LogicalOperator::LogicalTableSink(sink) => {
                LogicalOperator::LogicalTableSink(sink.with_output_exprs(exprs))
            }
            LogicalOperator::LogicalUnboundTableSink(_) => {
                return Err(BasaltError::unbound(
                    "output expressions, could not call with_output_exprs on UnboundTableSink",
                ))
            }
            op => {
                return Err(BasaltError::unsupported(format!(
                    "{} has no output expressions",
                    op.name()
                )))
            }
        };

        Ok(Arc::new(Self {
            operator,
            inputs: self.inputs.clone(),
            group_expr: self.group_expr,
            logical_prop: OnceCell::new(),
        }))
    }
}

/// Breadth first iterator of a plan tree.
///
/// Shared subtrees are visited once.
struct BFSPlanNodeIter {
    visited: HashSet<*const PlanNode>,
    cur_level: Vec<PlanNodeRef>,
    next_level: Vec<PlanNodeRef>,
}

impl Iterator for BFSPlanNodeIter {
    type Item = PlanNodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur_level.is_empty() {
            swap(&mut self.cur_level, &mut self.next_level);
            self.cur_level.reverse();
        }

        if let Some(p) = self.cur_level.pop() {
            for input in &p.inputs {
                if self.visited.insert(Arc::as_ptr(input)) {
                    self.next_level.push(input.clone());
                }
            }

            Some(p)
        } else {
            None
        }
    }
}

pub fn bfs_iter(root: &PlanNodeRef) -> impl Iterator<Item = PlanNodeRef> {
    let mut visited = HashSet::new();
    visited.insert(Arc::as_ptr(root));

    BFSPlanNodeIter {
        cur_level: vec![root.clone()],
        next_level: vec![],
        visited,
    }
}
