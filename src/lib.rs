//! # joker-forge
//!
//! Compiles declaratively authored jokers (trigger + conditions + effects)
//! into Lua fragments for the SMODS mod runtime.
//!
//! ## Design Principles
//!
//! 1. **Typed at the Boundary**: The editor's loose parameter bags are
//!    validated once into closed variants (`model::raw`). Generators never
//!    coerce values.
//!
//! 2. **IR, Not Strings**: Generators build a small Lua IR; a single
//!    renderer produces text.
//!
//! 3. **Collect, Then Merge**: Effects that patch shared runtime functions
//!    only file requests. The hook registry merges them once, after every
//!    rule of every joker has compiled.
//!
//! 4. **Fail Per Rule**: A failing rule is reported and skipped; it leaves
//!    no config variables or hook requests behind.
//!
//! ## Modules
//!
//! - `core`: ids, configuration, errors
//! - `lua`: Lua IR and renderer
//! - `model`: jokers, rules, conditions, effects, raw parameter bags
//! - `resolve`: value resolution and per-joker config namespaces
//! - `conditions`: condition compiler
//! - `effects`: effect compiler
//! - `hooks`: hook requests, templates and the merge pass
//! - `compiler`: the two-phase driver

pub mod core;
pub mod lua;
pub mod model;
pub mod resolve;
pub mod conditions;
pub mod effects;
pub mod hooks;
pub mod compiler;

// Re-export commonly used types
pub use crate::core::{
    CompileError, CompilerConfig, Result, RuleFailure,
    EffectId, JokerId, JokerKey, RuleId,
};

pub use crate::model::{
    Condition, ConditionGroup, ConditionKind, Effect, EffectKind,
    Joker, ParamValue, RawJoker, Rule, Trigger, TriggerClass, UserVariable,
};

pub use crate::resolve::{ConfigNamespace, ConfigVariable, ResolveContext, ResolvedValue};

pub use crate::effects::{compile_effect, CompiledEffect, EffectShape};

pub use crate::hooks::{HookCategory, HookPatch, HookRegistry, HookRequest};

pub use crate::compiler::{
    CompileOutput, Compiler, EffectFragment, FragmentBody, JokerOutput, RuleFragment,
};
