//! Compile errors.
//!
//! Every variant is fatal for the rule being compiled: the driver aborts
//! that rule, reports it, and keeps compiling the others. Values that
//! resolve to nothing are not errors; the resolver substitutes a zero
//! literal instead.

use serde::Serialize;
use thiserror::Error;

use crate::hooks::HookCategory;
use crate::model::TriggerClass;

use super::ids::{EffectId, JokerId, RuleId};

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileError {
    #[error("unknown condition kind `{0}`")]
    UnknownConditionKind(String),

    #[error("unknown effect kind `{0}`")]
    UnknownEffectKind(String),

    #[error("unknown hook category `{0}`")]
    UnknownHookCategory(String),

    #[error("unknown trigger `{0}`")]
    UnknownTrigger(String),

    #[error("effect `{kind}` has no statement shape for {class} triggers")]
    MissingTriggerClassShape {
        kind: &'static str,
        class: TriggerClass,
    },

    #[error("hook request filed under {category} carries {found} parameters")]
    HookParamsMismatch {
        category: HookCategory,
        found: HookCategory,
    },

    #[error("config variable `{0}` is already declared")]
    DuplicateConfigVariable(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl CompileError {
    /// Shorthand for [`CompileError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// A rule that was aborted, and where.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{rule} of {joker} failed: {error}")]
pub struct RuleFailure {
    pub joker: JokerId,
    pub rule: RuleId,
    /// The effect being compiled when the rule failed, if any.
    pub effect: Option<EffectId>,
    #[source]
    pub error: CompileError,
}

impl RuleFailure {
    pub fn new(joker: JokerId, rule: RuleId, error: CompileError) -> Self {
        Self {
            joker,
            rule,
            effect: None,
            error,
        }
    }

    #[must_use]
    pub fn in_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }
}
