//! The authored model.
//!
//! Jokers own rules; a rule has a trigger, condition groups and effects.
//! The compiler treats all of it as an immutable snapshot.
//!
//! - [`trigger`]: activation points and trigger classes
//! - [`condition`] / [`effect`]: closed kinds with typed parameters
//! - [`rule`]: rules, groups, jokers, user variables
//! - [`raw`]: the JSON parameter bags the editor produces

pub mod condition;
pub mod effect;
pub mod raw;
pub mod rule;
pub mod trigger;
pub mod value;

pub use condition::{
    CardScope, Condition, ConditionKind, Quantifier, Suit, SuitCondition, SuitGroup, SuitList,
    SuitSelection,
};
pub use effect::{
    BlindOperation, CombineSuits, ConsumableSet, ConsumableTarget, CreateJoker, DestroyConsumable,
    DiscountItems, DiscountMethod, DiscountTarget, Duration, EditHand, Effect, EffectKind,
    FreeRerolls, HandOperation, JokerSelection, ModifyBlind, Rarity, NEGATIVE_EDITION,
};
pub use raw::{RawCondition, RawConditionGroup, RawEffect, RawJoker, RawRule, RawUserVariable};
pub use rule::{ConditionGroup, GroupOperator, Joker, Rule, UserVariable, VariableKind};
pub use trigger::{CardSource, Trigger, TriggerClass};
pub use value::{ParamValue, GAME_VAR_PREFIX, RANGE_PREFIX};
