use std::fmt::{Debug, Formatter};
use std::ops::Index;

use crate::error::{BasaltError, BasaltResult};
use crate::memo::{GroupExprId, GroupId, Memo};
use crate::operator::LogicalOperator;
use crate::rules::OptExprNode::{ExprHandleNode, GroupHandleNode, OperatorNode};
use crate::rules::OptExprVec;

/// One node in [`OptExpression`].
#[derive(Clone, PartialEq)]
pub enum OptExprNode {
    OperatorNode(LogicalOperator),
    ExprHandleNode(GroupExprId),
    GroupHandleNode(GroupId),
}

impl Debug for OptExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorNode(op) => write!(f, "OperatorNode: {}", op),
            ExprHandleNode(handle) => write!(f, "ExprHandleNode: {:?}", handle),
            GroupHandleNode(handle) => write!(f, "GroupHandleNode: {:?}", handle),
        }
    }
}

impl From<LogicalOperator> for OptExprNode {
    fn from(t: LogicalOperator) -> Self {
        OperatorNode(t)
    }
}

/// Expression tree matching a rule pattern. Used as input/output of a rule.
///
/// When used as input, nodes are expression handles down to the pattern's leaves and group
/// handles below them. When used as output, a node created by the rule is an operator, and a
/// node taken over from the input keeps its handle.
#[derive(Clone, PartialEq)]
pub struct OptExpression {
    node: OptExprNode,
    inputs: OptExprVec,
}

impl OptExpression {
    pub fn with_operator<I>(operator: LogicalOperator, inputs: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self {
            node: OperatorNode(operator),
            inputs: inputs.into_iter().collect(),
        }
    }

    pub fn with_expr_handle<I>(group_expr_id: GroupExprId, inputs: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self {
            node: ExprHandleNode(group_expr_id),
            inputs: inputs.into_iter().collect(),
        }
    }

    /// Creates an opt expression with group handle.
    ///
    /// Note that group handle can only be leaf node, so it never has inputs.
    pub fn with_group_handle(group_id: GroupId) -> Self {
        Self {
            node: GroupHandleNode(group_id),
            inputs: vec![],
        }
    }

    /// Replaces this node by `operator`, keeping the inputs.
    pub fn clone_with_inputs(&self, operator: LogicalOperator) -> Self {
        Self {
            node: OperatorNode(operator),
            inputs: self.inputs.clone(),
        }
    }

    pub fn inputs(&self) -> &[Self] {
        &self.inputs
    }

    pub fn node(&self) -> &OptExprNode {
        &self.node
    }

    pub fn get_operator<'a>(&'a self, memo: &'a Memo) -> BasaltResult<&'a LogicalOperator> {
        match &self.node {
            ExprHandleNode(group_expr_id) => memo
                .group_expr(*group_expr_id)
                .map(|e| e.operator())
                .ok_or_else(|| {
                    BasaltError::unsupported(format!(
                        "group expression {} not found",
                        group_expr_id
                    ))
                }),
            OperatorNode(op) => Ok(op),
            GroupHandleNode(_) => Err(BasaltError::unsupported(
                "Can't get operator from group handle!",
            )),
        }
    }

    fn format(&self, f: &mut Formatter<'_>, level: usize) -> std::fmt::Result {
        let prefix = if level > 0 {
            let mut buffer = String::with_capacity(2 * level);
            for _ in 0..(level - 1) {
                buffer.push_str("  ");
            }
            buffer.push_str("--");
            buffer
        } else {
            "".to_string()
        };

        match &self.node {
            ExprHandleNode(handle) => writeln!(f, "{}{:?}", prefix, handle),
            GroupHandleNode(handle) => writeln!(f, "{}{:?}", prefix, handle),
            OperatorNode(operator) => writeln!(f, "{}{}", prefix, operator),
        }?;
        for input in &self.inputs {
            input.format(f, level + 1)?;
        }

        Ok(())
    }
}

impl Debug for OptExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format(f, 0)
    }
}

/// Creates a leaf opt expression from operator.
impl From<LogicalOperator> for OptExpression {
    fn from(op: LogicalOperator) -> Self {
        OptExpression::with_operator(op, vec![])
    }
}

/// Index of inputs.
impl Index<usize> for OptExpression {
    type Output = OptExpression;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inputs[index]
    }
}
