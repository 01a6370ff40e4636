//! Effect compilation.
//!
//! An effect compiles to one of three statement shapes, chosen by the
//! class of the rule's trigger:
//! - [`EffectShape::Immediate`]: the body of a `func = function() ... end`
//!   callback, run synchronously outside scoring
//! - [`EffectShape::Deferred`]: statements run before the scoring return
//!   table, with the status message carried in that table
//! - [`EffectShape::Passive`]: an `add_to_deck` / `remove_from_deck` pair
//!
//! ## Design Philosophy
//!
//! Every side effect is paired with a status message and a colour. Passive
//! pairs are exact inverses: additive changes record the delta they
//! actually applied and revert exactly that, "set" changes snapshot the
//! previous value and restore it. A kind compiled under a class it has no
//! shape for fails instead of guessing.

mod consumables;
mod create_joker;
mod destroy_consumable;
mod edit_hand;
mod modify_blind;
mod passive;

pub use consumables::{consumable_key, consumable_keys};

use tracing::debug;

use crate::core::{CompileError, EffectId, Result};
use crate::hooks::HookRequest;
use crate::lua::{Block, Expr, Stmt};
use crate::model::{Effect, EffectKind, ParamValue, Trigger, TriggerClass};
use crate::resolve::{ConfigVariable, ResolveContext, ValueRequest, VALUE_SUFFIXES};

/// Status text colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    Green,
    Red,
    Blue,
}

impl Colour {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Green => "G.C.GREEN",
            Self::Red => "G.C.RED",
            Self::Blue => "G.C.BLUE",
        }
    }

    #[must_use]
    pub fn expr(self) -> Expr {
        Expr::path(self.path())
    }
}

/// Statements of a compiled effect.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectShape {
    /// Callback body; the callback's `return true` is added on rendering.
    Immediate(Block),
    /// Pre-return statements of a scoring callback.
    Deferred(Block),
    Passive {
        add_to_deck: Block,
        remove_from_deck: Block,
    },
}

impl EffectShape {
    #[must_use]
    pub const fn class(&self) -> TriggerClass {
        match self {
            Self::Immediate(_) => TriggerClass::Immediate,
            Self::Deferred(_) => TriggerClass::Scoring,
            Self::Passive { .. } => TriggerClass::Passive,
        }
    }
}

/// One compiled effect.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledEffect {
    pub effect_id: EffectId,
    pub kind: &'static str,
    pub shape: EffectShape,
    /// Message for the return table. Only deferred shapes carry one; the
    /// immediate shapes show their own status text.
    pub message: Option<Expr>,
    pub colour: Option<Colour>,
    /// Variables this effect declared, in declaration order.
    pub config: Vec<ConfigVariable>,
    /// Shared-function patch this effect needs.
    pub hook: Option<HookRequest>,
}

/// What a kind compiler produces; ids and config are filled in by
/// [`compile_effect`].
#[derive(Debug)]
pub(crate) struct Emitted {
    pub shape: EffectShape,
    pub message: Option<Expr>,
    pub colour: Option<Colour>,
    pub hook: Option<HookRequest>,
}

impl Emitted {
    fn new(shape: EffectShape) -> Self {
        Self {
            shape,
            message: None,
            colour: None,
            hook: None,
        }
    }

    fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    fn with_message(mut self, message: Option<Expr>) -> Self {
        self.message = message;
        self
    }

    fn with_hook(mut self, hook: HookRequest) -> Self {
        self.hook = Some(hook);
        self
    }

    /// The shape for a triggered class: status text leads the immediate
    /// body, the deferred body leaves it to the return table.
    fn triggered(class: TriggerClass, setup: Block, status: (Expr, Colour), body: Block) -> Self {
        let (message, colour) = status;
        match class {
            TriggerClass::Scoring => {
                let mut block = setup;
                block.append(body);
                Self::new(EffectShape::Deferred(block))
                    .with_message(Some(message))
                    .with_colour(colour)
            }
            _ => {
                let mut block = setup;
                block.push(status_text(message, colour));
                block.append(body);
                Self::new(EffectShape::Immediate(block)).with_colour(colour)
            }
        }
    }
}

/// Compile one effect of a rule with the given trigger.
pub fn compile_effect(effect: &Effect, trigger: Trigger, ctx: &mut ResolveContext<'_>) -> Result<CompiledEffect> {
    let class = trigger.class();
    let kind = effect.kind.tag();
    let mark = ctx.mark();

    let emitted = match &effect.kind {
        EffectKind::CreateJoker(params) => create_joker::compile(effect, params, class, ctx)?,
        EffectKind::DestroyConsumable(params) => destroy_consumable::compile(effect, params, class, ctx)?,
        EffectKind::EditHand(params) => edit_hand::compile(effect, params, class, ctx)?,
        EffectKind::ModifyBlindRequirement(params) => modify_blind::compile(effect, params, class, ctx)?,
        EffectKind::DiscountItems(params) => passive::discount_items(effect, params, class, ctx)?,
        EffectKind::FreeRerolls(params) => passive::free_rerolls(effect, params, class)?,
        EffectKind::CombineSuits(params) => passive::combine_suits(effect, params, class, ctx)?,
    };

    let config = ctx.declared_since(mark);
    debug!(
        effect = %effect.id,
        kind,
        %class,
        declared = config.len(),
        hook = emitted.hook.is_some(),
        "compiled effect"
    );

    Ok(CompiledEffect {
        effect_id: effect.id.clone(),
        kind,
        shape: emitted.shape,
        message: emitted.message,
        colour: emitted.colour,
        config,
        hook: emitted.hook,
    })
}

fn missing_shape(effect: &Effect, class: TriggerClass) -> CompileError {
    CompileError::MissingTriggerClassShape {
        kind: effect.kind.tag(),
        class,
    }
}

/// `card_eval_status_text(context.blueprint_card or card, "extra", nil, nil, nil, {message = ..., colour = ...})`
pub(crate) fn status_text(message: Expr, colour: Colour) -> Stmt {
    Stmt::call(
        "card_eval_status_text",
        vec![
            Expr::path("context.blueprint_card").or(Expr::path("card")),
            Expr::str("extra"),
            Expr::Nil,
            Expr::Nil,
            Expr::Nil,
            Expr::record([("message", message), ("colour", colour.expr())]),
        ],
    )
}

/// The custom message if the effect has one, else the default.
fn message_or(effect: &Effect, default: Expr) -> Expr {
    effect
        .custom_message
        .as_deref()
        .map_or(default, Expr::str)
}

/// `prefix .. tostring(value) .. suffix`
fn amount_message(prefix: &str, value: &Expr, suffix: &str) -> Expr {
    Expr::concat(vec![
        Expr::str(prefix),
        Expr::call("tostring", vec![value.clone()]),
        Expr::str(suffix),
    ])
}

/// `G.E_MANAGER:add_event(Event({func = function() ... end}))`
pub(crate) fn event(body: Block) -> Stmt {
    Stmt::Call(Expr::path("G.E_MANAGER").method(
        "add_event",
        vec![Expr::call("Event", vec![Expr::record([("func", Expr::function(body))])])],
    ))
}

/// A resolved effect quantity.
struct Quantity {
    /// Slot the value was declared under.
    slot: String,
    /// Binds a random draw once, so the mutation and its message agree.
    setup: Block,
    value: Expr,
}

/// Claim a slot from `base` and resolve `value` into it.
fn quantity(
    ctx: &mut ResolveContext<'_>,
    base: &str,
    suffixes: &[&str],
    value: &ParamValue,
    owner: &EffectId,
) -> Result<Quantity> {
    let slot = ctx.claim(base, suffixes);
    let resolved = ctx.resolve(value, ValueRequest::declared(&slot, owner.as_str()))?;
    if resolved.is_stable() {
        return Ok(Quantity {
            slot,
            setup: Block::new(),
            value: resolved.expr(),
        });
    }
    let local = format!("{}_value", slot);
    Ok(Quantity {
        setup: Block::new().with(Stmt::local(local.clone(), resolved.expr())),
        value: Expr::path(local),
        slot,
    })
}

/// Claim with the plain value suffixes.
fn value_quantity(
    ctx: &mut ResolveContext<'_>,
    base: &str,
    value: &ParamValue,
    owner: &EffectId,
) -> Result<Quantity> {
    quantity(ctx, base, VALUE_SUFFIXES, value, owner)
}
