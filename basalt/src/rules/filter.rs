use crate::error::{BasaltError, BasaltResult};
use crate::expr::and;
use crate::memo::Memo;
use crate::operator::Filter;
use crate::operator::LogicalOperator::LogicalFilter;
use crate::rules::RuleId::MergeFilter;
use crate::rules::RulePromise::Medium;
use crate::rules::{is_filter, OptExpression, Pattern, Rule, RuleId, RulePromise, RuleResult};

lazy_static! {
    static ref MERGE_FILTER_PATTERN: Pattern =
        Pattern::node(is_filter, [Pattern::leaf(is_filter)]);
}

/// Replaces `Filter(p)` over `Filter(q)` by `Filter(p AND q)` over the inner filter's input.
#[derive(Clone, Default)]
pub struct MergeFilterRule {}

impl MergeFilterRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for MergeFilterRule {
    fn apply(
        &self,
        input: OptExpression,
        memo: &Memo,
        result: &mut RuleResult,
    ) -> BasaltResult<()> {
        if let (LogicalFilter(outer), LogicalFilter(inner)) =
            (input.get_operator(memo)?, input[0].get_operator(memo)?)
        {
            let predicate = and(outer.predicate().clone(), inner.predicate().clone());
            result.add(input[0].clone_with_inputs(LogicalFilter(Filter::new(predicate))));
            Ok(())
        } else {
            Err(BasaltError::unsupported("Pattern miss matched"))
        }
    }

    fn pattern(&self) -> &Pattern {
        &MERGE_FILTER_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        MergeFilter
    }

    fn rule_promise(&self) -> RulePromise {
        Medium
    }
}
