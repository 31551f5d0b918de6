use std::cmp::min;

use crate::error::{BasaltError, BasaltResult};
use crate::memo::Memo;
use crate::operator::Limit;
use crate::operator::LogicalOperator::LogicalLimit;
use crate::rules::RuleId::MergeLimit;
use crate::rules::RulePromise::Low;
use crate::rules::{is_limit, OptExpression, Pattern, Rule, RuleId, RulePromise, RuleResult};

lazy_static! {
    static ref MERGE_LIMIT_PATTERN: Pattern =
        Pattern::node(is_limit, [Pattern::leaf(is_limit)]);
}

/// Replaces `Limit(a)` over `Limit(b)` by `Limit(min(a, b))` over the inner limit's input.
///
/// Limits with an offset are left alone.
#[derive(Clone, Default)]
pub struct MergeLimitRule {}

impl MergeLimitRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for MergeLimitRule {
    fn apply(
        &self,
        input: OptExpression,
        memo: &Memo,
        result: &mut RuleResult,
    ) -> BasaltResult<()> {
        if let (LogicalLimit(outer), LogicalLimit(inner)) =
            (input.get_operator(memo)?, input[0].get_operator(memo)?)
        {
            if outer.offset() > 0 || inner.offset() > 0 {
                return Ok(());
            }

            let new_limit = min(outer.limit(), inner.limit());
            result.add(input[0].clone_with_inputs(LogicalLimit(Limit::new(new_limit))));
            Ok(())
        } else {
            Err(BasaltError::unsupported("Pattern miss matched"))
        }
    }

    fn pattern(&self) -> &Pattern {
        &MERGE_LIMIT_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        MergeLimit
    }

    fn rule_promise(&self) -> RulePromise {
        Low
    }
}
