//! Compiler driver.
//!
//! Compilation runs in two phases:
//! 1. Every rule of every joker compiles on its own. Each joker owns a
//!    [`ConfigNamespace`]; hook requests are collected on the side.
//! 2. The [`HookRegistry`] merges all requests once, one patch per
//!    category.
//!
//! A rule either compiles completely or not at all. The namespace is
//! checkpointed before each rule and restored when it fails, and the
//! failed rule's hook requests are dropped. Other rules keep compiling.
//!
//! ```
//! use joker_forge::compiler::Compiler;
//! use joker_forge::core::CompilerConfig;
//! use joker_forge::model::{Effect, EffectKind, FreeRerolls, Joker, Rule, Trigger};
//!
//! let joker = Joker::new("joker-1", "reroller").with_rule(
//!     Rule::new("rule-1", Trigger::Passive)
//!         .with_effect(Effect::new("effect-1", EffectKind::FreeRerolls(FreeRerolls { amount: 1.0 }))),
//! );
//! let output = Compiler::new(CompilerConfig::new("mymod")).compile(&[joker]).unwrap();
//! assert_eq!(output.jokers[0].rules.len(), 1);
//! assert!(output.hooks.is_empty());
//! ```

mod fragment;

pub use fragment::{CompileOutput, EffectFragment, FragmentBody, JokerOutput, RuleFragment};

use tracing::{debug, error, info};

use crate::conditions::compile_rule_conditions;
use crate::core::{CompileError, CompilerConfig, EffectId, Result, RuleFailure};
use crate::effects::compile_effect;
use crate::hooks::{HookRegistry, HookRequest};
use crate::lua::Renderer;
use crate::model::{Joker, RawJoker, Rule};
use crate::resolve::{ConfigNamespace, ResolveContext};

/// A rule that compiled, with the hook requests it files.
struct CompiledRule {
    fragment: RuleFragment,
    hooks: Vec<HookRequest>,
}

type RuleResult = std::result::Result<CompiledRule, (Option<EffectId>, CompileError)>;

/// Compiles jokers into Lua fragments and hook patches.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
    renderer: Renderer,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        let renderer = Renderer::new(config.indent_width);
        Self { config, renderer }
    }

    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile typed jokers.
    ///
    /// Rule-level errors are reported in [`JokerOutput::failures`]; only a
    /// joker whose own variables collide, or a failed merge, fails the whole
    /// compilation.
    pub fn compile(&self, jokers: &[Joker]) -> Result<CompileOutput> {
        self.compile_with(jokers.iter().map(|joker| (joker.clone(), Vec::new())))
    }

    /// Validate and compile raw jokers. Rules that fail validation are
    /// reported like rules that fail compilation.
    pub fn compile_raw(&self, jokers: &[RawJoker]) -> Result<CompileOutput> {
        self.compile_with(jokers.iter().map(RawJoker::validate))
    }

    fn compile_with(&self, jokers: impl Iterator<Item = (Joker, Vec<RuleFailure>)>) -> Result<CompileOutput> {
        let mut registry = HookRegistry::default();
        let mut outputs = Vec::new();
        for (joker, failures) in jokers {
            outputs.push(self.compile_joker(&joker, failures, &mut registry)?);
        }

        let hooks = registry.merge(&self.config, &self.renderer)?;
        let failed = outputs.iter().map(|j| j.failures.len()).sum::<usize>();
        info!(jokers = outputs.len(), hooks = hooks.len(), failed, "compilation finished");
        Ok(CompileOutput {
            jokers: outputs,
            hooks,
        })
    }

    fn compile_joker(
        &self,
        joker: &Joker,
        mut failures: Vec<RuleFailure>,
        registry: &mut HookRegistry,
    ) -> Result<JokerOutput> {
        let mut namespace = ConfigNamespace::for_joker(joker)?;
        let mut rules = Vec::new();

        for rule in &joker.rules {
            let checkpoint = namespace.clone();
            let mut ctx = ResolveContext::new(joker, &self.config, &mut namespace);
            match self.compile_rule(rule, &mut ctx, registry) {
                Ok(compiled) => {
                    for request in compiled.hooks {
                        registry.submit(request)?;
                    }
                    debug!(joker = %joker.key, rule = %rule.id, "compiled rule");
                    rules.push(compiled.fragment);
                }
                Err((effect, cause)) => {
                    namespace = checkpoint;
                    let mut failure = RuleFailure::new(joker.id.clone(), rule.id.clone(), cause);
                    if let Some(effect) = effect {
                        failure = failure.in_effect(effect);
                    }
                    error!(joker = %joker.key, %failure, "rule aborted");
                    failures.push(failure);
                }
            }
        }

        Ok(JokerOutput {
            key: joker.key.clone(),
            config: namespace.into_variables(),
            rules,
            failures,
        })
    }

    fn compile_rule(&self, rule: &Rule, ctx: &mut ResolveContext<'_>, registry: &HookRegistry) -> RuleResult {
        let condition = compile_rule_conditions(rule, ctx).map_err(|e| (None, e))?;

        let mut effects = Vec::with_capacity(rule.effects.len());
        let mut hooks = Vec::new();
        for effect in &rule.effects {
            let in_effect = |e| (Some(effect.id.clone()), e);
            let mut compiled = compile_effect(effect, rule.trigger, ctx).map_err(in_effect)?;
            if let Some(request) = compiled.hook.take() {
                registry.check(&request).map_err(in_effect)?;
                hooks.push(request);
            }
            effects.push(EffectFragment::render(compiled, &self.renderer));
        }

        Ok(CompiledRule {
            fragment: RuleFragment {
                rule_id: rule.id.clone(),
                trigger: rule.trigger,
                condition: condition.map(|c| self.renderer.expr(&c)),
                effects,
            },
            hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JokerKey;
    use crate::model::{
        Condition, ConditionKind, DiscountItems, EditHand, Effect, EffectKind, FreeRerolls, HandOperation,
        ModifyBlind, BlindOperation, ParamValue, SuitCondition, SuitSelection, Trigger, UserVariable,
    };
    use crate::resolve::ConfigVariable;

    fn compiler() -> Compiler {
        Compiler::new(CompilerConfig::new("m"))
    }

    fn edit_hand(id: &str, value: impl Into<ParamValue>) -> Effect {
        Effect::new(id, EffectKind::EditHand(EditHand::new(HandOperation::Add, value)))
    }

    #[test]
    fn test_failed_rule_rolls_back_namespace() {
        let joker = Joker::new("j1", "fan")
            .with_rule(
                Rule::new("bad", Trigger::RoundEnd)
                    .with_effect(edit_hand("e1", 1))
                    .with_effect(Effect::new("e2", EffectKind::FreeRerolls(FreeRerolls::default()))),
            )
            .with_rule(Rule::new("good", Trigger::RoundEnd).with_effect(edit_hand("e3", 2)));

        let output = compiler().compile(&[joker]).unwrap();
        let joker = &output.jokers[0];
        assert_eq!(joker.rules.len(), 1);
        assert_eq!(joker.failures.len(), 1);
        assert_eq!(joker.failures[0].effect, Some(EffectId::new("e2")));
        // the failed rule's `hands` claim is gone, so the good rule gets it
        assert_eq!(joker.config, vec![ConfigVariable::new("hands", 2.0)]);
    }

    #[test]
    fn test_failed_rule_drops_hook_requests() {
        let joker = Joker::new("j1", "coupon").with_rule(
            Rule::new("r1", Trigger::Passive)
                .with_effect(Effect::new("e1", EffectKind::DiscountItems(DiscountItems::default())))
                .with_effect(Effect::new(
                    "e2",
                    EffectKind::ModifyBlindRequirement(ModifyBlind::new(BlindOperation::Add, 1)),
                )),
        );
        let output = compiler().compile(&[joker]).unwrap();
        assert!(output.hooks.is_empty());
        assert!(matches!(
            output.jokers[0].failures[0].error,
            CompileError::MissingTriggerClassShape { .. }
        ));
    }

    #[test]
    fn test_hooks_merge_across_jokers() {
        let discount = |id: &str, key: &str| {
            Joker::new(id, key).with_rule(
                Rule::new(format!("{}-r", id), Trigger::Passive)
                    .with_effect(Effect::new(format!("{}-e", id), EffectKind::DiscountItems(DiscountItems::default()))),
            )
        };
        let output = compiler().compile(&[discount("a", "first"), discount("b", "second")]).unwrap();
        assert_eq!(output.hooks.len(), 1);
        assert_eq!(
            output.hooks[0].owners,
            vec![JokerKey::new("first"), JokerKey::new("second")]
        );
        assert!(output.hook("Card:set_cost").is_some());
    }

    #[test]
    fn test_rule_fragment_contents() {
        let joker = Joker::new("j1", "fan")
            .with_variable(UserVariable::number("bonus", 4.0))
            .with_rule(
                Rule::new("r1", Trigger::CardScored)
                    .with_condition(Condition::new(ConditionKind::CardSuit(SuitCondition::new(
                        SuitSelection::specific("Hearts"),
                    ))))
                    .with_effect(edit_hand("e1", ParamValue::named("bonus"))),
            );
        let output = compiler().compile(&[joker]).unwrap();
        let fan = output.joker("fan").unwrap();
        let rule = fan.rule("r1").unwrap();
        assert_eq!(rule.condition.as_deref(), Some(r#"context.other_card:is_suit("Hearts")"#));
        assert_eq!(rule.effects[0].kind, "edit_hand");
        assert!(matches!(rule.effects[0].body, FragmentBody::Deferred { .. }));
        assert_eq!(
            rule.effects[0].message.as_deref(),
            Some(r#""+" .. tostring(card.ability.extra.bonus) .. " Hand""#)
        );
        assert_eq!(fan.config_value("bonus"), Some(4.0));
        assert_eq!(fan.config.len(), 1);
    }

    #[test]
    fn test_duplicate_user_variables_fail_compilation() {
        let joker = Joker::new("j1", "fan")
            .with_variable(UserVariable::number("x", 1.0))
            .with_variable(UserVariable::number("x", 2.0));
        assert_eq!(
            compiler().compile(&[joker]),
            Err(CompileError::DuplicateConfigVariable("x".into()))
        );
    }
}
