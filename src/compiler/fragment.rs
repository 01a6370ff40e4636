//! Rendered compiler output.

use serde::{Deserialize, Serialize};

use crate::core::{EffectId, JokerKey, RuleFailure, RuleId};
use crate::effects::{CompiledEffect, EffectShape};
use crate::hooks::HookPatch;
use crate::lua::{Block, Expr, Renderer, Stmt};
use crate::model::Trigger;
use crate::resolve::ConfigVariable;

/// Everything one compilation produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompileOutput {
    pub jokers: Vec<JokerOutput>,
    /// One merged patch per hook category that received requests.
    pub hooks: Vec<HookPatch>,
}

impl CompileOutput {
    #[must_use]
    pub fn joker(&self, key: &str) -> Option<&JokerOutput> {
        self.jokers.iter().find(|j| j.key.as_str() == key)
    }

    /// Every aborted rule, joker by joker.
    pub fn failures(&self) -> impl Iterator<Item = &RuleFailure> {
        self.jokers.iter().flat_map(|j| j.failures.iter())
    }

    #[must_use]
    pub fn hook(&self, target: &str) -> Option<&HookPatch> {
        self.hooks.iter().find(|h| h.target == target)
    }
}

/// Output for one joker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JokerOutput {
    pub key: JokerKey,
    /// Contents of `config.extra`, user variables first.
    pub config: Vec<ConfigVariable>,
    /// Rules that compiled, in authoring order.
    pub rules: Vec<RuleFragment>,
    pub failures: Vec<RuleFailure>,
}

impl JokerOutput {
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&RuleFragment> {
        self.rules.iter().find(|r| r.rule_id.as_str() == id)
    }

    /// Declared value of a config variable.
    #[must_use]
    pub fn config_value(&self, name: &str) -> Option<f64> {
        self.config.iter().find(|v| v.name == name).map(|v| v.value)
    }
}

/// Output for one rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleFragment {
    pub rule_id: RuleId,
    pub trigger: Trigger,
    /// Boolean expression; `None` when the rule always fires.
    pub condition: Option<String>,
    pub effects: Vec<EffectFragment>,
}

/// Output for one effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectFragment {
    pub effect_id: EffectId,
    pub kind: String,
    pub body: FragmentBody,
    /// `message` entry of the return table.
    pub message: Option<String>,
    /// `colour` entry of the return table, e.g. `G.C.GREEN`.
    pub colour: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FragmentBody {
    /// `function() ... return true end`, the `func` of the return table.
    Immediate { func: String },
    /// Statements to run before the return table.
    Deferred { pre_return: String },
    Passive {
        add_to_deck: String,
        remove_from_deck: String,
    },
}

impl FragmentBody {
    /// The text a test or assembler runs for this shape, in order.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            Self::Immediate { func } => vec![func.as_str()],
            Self::Deferred { pre_return } => vec![pre_return.as_str()],
            Self::Passive {
                add_to_deck,
                remove_from_deck,
            } => vec![add_to_deck.as_str(), remove_from_deck.as_str()],
        }
    }
}

impl EffectFragment {
    pub(crate) fn render(effect: CompiledEffect, renderer: &Renderer) -> Self {
        let body = match effect.shape {
            EffectShape::Immediate(block) => {
                let body: Block = block.with(Stmt::ret(true.into()));
                FragmentBody::Immediate {
                    func: renderer.expr(&Expr::function(body)),
                }
            }
            EffectShape::Deferred(block) => FragmentBody::Deferred {
                pre_return: renderer.block(&block),
            },
            EffectShape::Passive {
                add_to_deck,
                remove_from_deck,
            } => FragmentBody::Passive {
                add_to_deck: renderer.block(&add_to_deck),
                remove_from_deck: renderer.block(&remove_from_deck),
            },
        };
        Self {
            effect_id: effect.effect_id,
            kind: effect.kind.to_string(),
            body,
            message: effect.message.map(|m| renderer.expr(&m)),
            colour: effect.colour.map(|c| c.path().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Colour;

    #[test]
    fn test_immediate_gets_return_true() {
        let effect = CompiledEffect {
            effect_id: EffectId::new("e1"),
            kind: "free_rerolls",
            shape: EffectShape::Immediate(Block::new().with(Stmt::call("f", Vec::new()))),
            message: None,
            colour: Some(Colour::Green),
            config: Vec::new(),
            hook: None,
        };
        let fragment = EffectFragment::render(effect, &Renderer::default());
        assert_eq!(
            fragment.body,
            FragmentBody::Immediate {
                func: "function()\n    f()\n    return true\nend".into()
            }
        );
        assert_eq!(fragment.colour.as_deref(), Some("G.C.GREEN"));
    }

    #[test]
    fn test_body_serializes_with_shape_tag() {
        let body = FragmentBody::Deferred {
            pre_return: "x = 1".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["shape"], "deferred");
        assert_eq!(json["pre_return"], "x = 1");
    }
}
