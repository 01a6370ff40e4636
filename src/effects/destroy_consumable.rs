//! `destroy_consumable`: dissolve one held consumable.

use crate::core::Result;
use crate::lua::{Block, Expr, Stmt};
use crate::model::{ConsumableTarget, DestroyConsumable, Effect, TriggerClass};
use crate::resolve::ResolveContext;

use super::consumables::consumable_key;
use super::{event, message_or, missing_shape, status_text, Colour, EffectShape, Emitted};

const TARGETS: &str = "target_cards";
const CHOSEN: &str = "card_to_destroy";

/// The destruction shows its own status text in both triggered shapes, and
/// only when something was destroyed.
pub(super) fn compile(
    effect: &Effect,
    params: &DestroyConsumable,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    if class == TriggerClass::Passive {
        return Err(missing_shape(effect, class));
    }

    let insert = Stmt::call("table.insert", vec![Expr::path(TARGETS), Expr::path("consumable")]);
    let filter = match &params.target {
        ConsumableTarget::Any => None,
        ConsumableTarget::OfSet { set, card } => {
            let of_set = Expr::path("consumable.ability.set").equals(Expr::str(set.set_name()));
            Some(match card {
                Some(name) => of_set.and(
                    Expr::path("consumable.config.center.key").equals(Expr::str(consumable_key(*set, name))),
                ),
                None => of_set,
            })
        }
    };
    let loop_body = match filter {
        Some(condition) => Block::new().with(Stmt::if_then(condition, Block::new().with(insert))),
        None => Block::new().with(insert),
    };

    let seed = ctx.seed("destroy_consumable", effect.id.as_str());
    let dissolve = event(
        Block::new()
            .with(Stmt::Call(Expr::path(CHOSEN).method("start_dissolve", Vec::new())))
            .with(Stmt::ret(true.into())),
    );
    let destroy = Block::new()
        .with(Stmt::local(
            CHOSEN,
            Expr::call(
                "pseudorandom_element",
                vec![Expr::path(TARGETS), Expr::call("pseudoseed", vec![Expr::str(seed)])],
            ),
        ))
        .with(dissolve)
        .with(status_text(
            message_or(effect, Expr::str("Destroyed Consumable!")),
            Colour::Red,
        ));

    let block = Block::new()
        .with(Stmt::local(TARGETS, Expr::Table(Vec::new())))
        .with(Stmt::for_ipairs("_", "consumable", Expr::path("G.consumeables.cards"), loop_body))
        .with(Stmt::if_then(
            Expr::path(TARGETS).len().gt(Expr::num(0.0)),
            destroy,
        ));

    let shape = match class {
        TriggerClass::Scoring => EffectShape::Deferred(block),
        _ => EffectShape::Immediate(block),
    };
    Ok(Emitted::new(shape).with_colour(Colour::Red))
}
