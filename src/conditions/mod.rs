//! Condition compilation.
//!
//! A condition compiles to one boolean [`Expr`]: either a plain check or a
//! self-contained immediately invoked function that loops over cards.
//! Groups combine their conditions with the group operator and every group
//! of a rule must hold.

mod suit;

pub use suit::SuitSubject;

use tracing::debug;

use crate::core::Result;
use crate::lua::Expr;
use crate::model::{Condition, ConditionGroup, ConditionKind, GroupOperator, Rule};
use crate::resolve::ResolveContext;

/// Compile one condition of `rule`.
pub fn compile_condition(rule: &Rule, condition: &Condition, ctx: &mut ResolveContext<'_>) -> Result<Expr> {
    let owner = rule.id.as_str();
    let expr = match &condition.kind {
        ConditionKind::CardSuit(params) => suit::compile(SuitSubject::Played, params, rule.trigger, owner, ctx)?,
        ConditionKind::DiscardedCardSuit(params) => {
            suit::compile(SuitSubject::Discarded, params, rule.trigger, owner, ctx)?
        }
    };
    debug!(rule = %rule.id, kind = condition.kind.tag(), negate = condition.negate, "compiled condition");
    Ok(if condition.negate { expr.not() } else { expr })
}

/// Compile a group with its operator. `None` for an empty group.
pub fn compile_group(rule: &Rule, group: &ConditionGroup, ctx: &mut ResolveContext<'_>) -> Result<Option<Expr>> {
    if group.conditions.is_empty() {
        return Ok(None);
    }
    let exprs = group
        .conditions
        .iter()
        .map(|condition| compile_condition(rule, condition, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(match group.operator {
        GroupOperator::And => Expr::all_of(exprs),
        GroupOperator::Or => Expr::any_of(exprs),
    }))
}

/// Compile every group of a rule, AND-ed together. `None` when the rule has
/// no conditions and therefore always fires.
pub fn compile_rule_conditions(rule: &Rule, ctx: &mut ResolveContext<'_>) -> Result<Option<Expr>> {
    let mut groups = Vec::new();
    for group in &rule.groups {
        if let Some(expr) = compile_group(rule, group, ctx)? {
            groups.push(expr);
        }
    }
    Ok(if groups.is_empty() {
        None
    } else {
        Some(Expr::all_of(groups))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompilerConfig;
    use crate::lua::Renderer;
    use crate::model::{Joker, SuitCondition, SuitSelection, Trigger};
    use crate::resolve::ConfigNamespace;

    fn suit(name: &str) -> Condition {
        Condition::new(ConditionKind::CardSuit(SuitCondition::new(SuitSelection::specific(name))))
    }

    fn compile_all(rule: &Rule) -> Option<String> {
        let joker = Joker::new("j1", "fan");
        let config = CompilerConfig::new("m");
        let mut ns = ConfigNamespace::new();
        let mut ctx = ResolveContext::new(&joker, &config, &mut ns);
        compile_rule_conditions(rule, &mut ctx)
            .unwrap()
            .map(|e| Renderer::default().expr(&e))
    }

    #[test]
    fn test_no_conditions() {
        let rule = Rule::new("r1", Trigger::HandPlayed);
        assert_eq!(compile_all(&rule), None);

        let rule = rule.with_group(ConditionGroup::new(GroupOperator::Or));
        assert_eq!(compile_all(&rule), None);
    }

    #[test]
    fn test_negation() {
        let rule = Rule::new("r1", Trigger::CardScored).with_condition(suit("Hearts").negated());
        assert_eq!(
            compile_all(&rule).as_deref(),
            Some(r#"not context.other_card:is_suit("Hearts")"#)
        );
    }

    #[test]
    fn test_group_operators() {
        let rule = Rule::new("r1", Trigger::CardScored)
            .with_group(
                ConditionGroup::new(GroupOperator::Or)
                    .with(suit("Hearts"))
                    .with(suit("Spades")),
            )
            .with_condition(suit("Clubs").negated());
        assert_eq!(
            compile_all(&rule).as_deref(),
            Some(
                r#"(context.other_card:is_suit("Hearts") or context.other_card:is_suit("Spades")) and not context.other_card:is_suit("Clubs")"#
            )
        );
    }
}
