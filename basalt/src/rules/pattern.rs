use crate::operator::LogicalOperator::{LogicalFilter, LogicalJoin, LogicalLimit};
use crate::operator::{LogicalOperator, OperatorTrait};

pub type OperatorMatcher = fn(&LogicalOperator) -> bool;

/// Shape of the plan fragment a rule rewrites.
///
/// Every pattern node tests one operator. A node without children ends the match: whatever
/// sits below it reaches the rule as group handles. `Limit` over `Limit` reads
/// ```
/// use basalt::rules::{is_limit, Pattern};
///
/// Pattern::node(is_limit, [Pattern::leaf(is_limit)]);
/// ```
///
/// Unbound operators match as well unless the node is restricted with [`Pattern::bound`].
#[derive(Clone)]
pub struct Pattern {
    matcher: OperatorMatcher,
    bound_only: bool,
    children: Vec<Pattern>,
}

impl Pattern {
    pub fn leaf(matcher: OperatorMatcher) -> Self {
        Self {
            matcher,
            bound_only: false,
            children: vec![],
        }
    }

    pub fn node<I: IntoIterator<Item = Pattern>>(matcher: OperatorMatcher, children: I) -> Self {
        Self {
            matcher,
            bound_only: false,
            children: children.into_iter().collect(),
        }
    }

    /// Rejects operators which still carry unresolved names.
    pub fn bound(mut self) -> Self {
        self.bound_only = true;
        self
    }

    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Tests the operator alone, children are matched by the binding.
    pub fn matches(&self, operator: &LogicalOperator) -> bool {
        !(self.bound_only && operator.is_unbound()) && (self.matcher)(operator)
    }

    /// A leaf accepts any number of inputs, an inner node one per child.
    pub fn accepts_inputs(&self, count: usize) -> bool {
        self.is_leaf() || self.children.len() == count
    }
}

pub fn any(_: &LogicalOperator) -> bool {
    true
}

pub fn is_filter(operator: &LogicalOperator) -> bool {
    matches!(operator, LogicalFilter(_))
}

pub fn is_join(operator: &LogicalOperator) -> bool {
    matches!(operator, LogicalJoin(_))
}

pub fn is_limit(operator: &LogicalOperator) -> bool {
    matches!(operator, LogicalLimit(_))
}

pub fn is_sink(operator: &LogicalOperator) -> bool {
    operator.is_sink()
}
