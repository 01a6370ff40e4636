//! `create_joker`: add a joker to the joker area.
//!
//! Creation is scheduled as an event. Unless the joker brings its own slot
//! (negative edition) or slots are ignored, the slot is reserved up front
//! through `G.GAME.joker_buffer` so two creations in one evaluation cannot
//! both take the last slot.

use crate::core::{CompilerConfig, Result};
use crate::lua::{Block, Expr, Stmt};
use crate::model::{CreateJoker, Effect, JokerSelection, Rarity, TriggerClass};
use crate::resolve::ResolveContext;

use super::{event, message_or, missing_shape, status_text, Colour, EffectShape, Emitted};

const CREATED: &str = "created_joker";
const JOKER_BUFFER: &str = "G.GAME.joker_buffer";

pub(super) fn compile(
    effect: &Effect,
    params: &CreateJoker,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    let creation = event(creation_body(params, ctx.config()));
    let mut block = Block::new();

    if params.skips_slot_check() {
        block.push(Stmt::local(CREATED, true.into()));
        block.push(creation);
    } else {
        let has_room = Expr::path("G.jokers.cards")
            .len()
            .plus(Expr::path(JOKER_BUFFER))
            .lt(Expr::path("G.jokers.config.card_limit"));
        block.push(Stmt::local(CREATED, false.into()));
        block.push(Stmt::if_then(
            has_room,
            Block::new()
                .with(Stmt::assign(CREATED, true.into()))
                .with(Stmt::assign(JOKER_BUFFER, Expr::path(JOKER_BUFFER).plus(Expr::num(1.0))))
                .with(creation),
        ));
    }

    let plus_joker = || Expr::call("localize", vec![Expr::str("k_plus_joker")]);
    match class {
        TriggerClass::Scoring => {
            let message = match &effect.custom_message {
                Some(custom) => Expr::str(custom.as_str()),
                None => Expr::path(CREATED).and(plus_joker()).or(Expr::Nil),
            };
            Ok(Emitted::new(EffectShape::Deferred(block))
                .with_message(Some(message))
                .with_colour(Colour::Blue))
        }
        TriggerClass::Immediate => {
            block.push(Stmt::if_then(
                Expr::path(CREATED),
                Block::new().with(status_text(message_or(effect, plus_joker()), Colour::Blue)),
            ));
            Ok(Emitted::new(EffectShape::Immediate(block)).with_colour(Colour::Blue))
        }
        TriggerClass::Passive => Err(missing_shape(effect, class)),
    }
}

/// `SMODS.add_card` arguments.
fn card_spec(selection: &JokerSelection, config: &CompilerConfig) -> Expr {
    let mut fields = vec![("set", Expr::str("Joker"))];
    match selection {
        JokerSelection::Random => {}
        JokerSelection::Specific(key) => fields.push(("key", Expr::str(key.as_str()))),
        JokerSelection::OfRarity(rarity) => {
            let name = match rarity {
                Rarity::Common => "Common".to_string(),
                Rarity::Uncommon => "Uncommon".to_string(),
                Rarity::Rare => "Rare".to_string(),
                Rarity::Legendary => "Legendary".to_string(),
                Rarity::Custom(custom) => config.rarity_key(custom),
            };
            fields.push(("rarity", Expr::str(name)));
        }
    }
    Expr::record(fields)
}

fn creation_body(params: &CreateJoker, config: &CompilerConfig) -> Block {
    let card = || Expr::path("joker_card");
    let mut body = Block::new().with(Stmt::local(
        "joker_card",
        Expr::call("SMODS.add_card", vec![card_spec(&params.selection, config)]),
    ));

    let mut decorate = Block::new();
    if let Some(edition) = &params.edition {
        decorate.push(Stmt::Call(
            card().method("set_edition", vec![Expr::str(edition.as_str()), true.into()]),
        ));
    }
    if let Some(sticker) = &params.sticker {
        decorate.push(Stmt::Call(
            card().method("add_sticker", vec![Expr::str(sticker.as_str()), true.into()]),
        ));
    }
    if !decorate.is_empty() {
        body.push(Stmt::if_then(card(), decorate));
    }

    if !params.skips_slot_check() {
        body.push(Stmt::assign(JOKER_BUFFER, Expr::num(0.0)));
    }
    body.with(Stmt::ret(true.into()))
}
