//! `edit_hand`: change the number of hands.

use crate::core::Result;
use crate::lua::{self, Block, Expr, Stmt};
use crate::model::{Duration, EditHand, Effect, HandOperation, TriggerClass};
use crate::resolve::{ConfigVariable, ResolveContext};

use super::{amount_message, message_or, quantity, value_quantity, Colour, EffectShape, Emitted};

const ROUND_HANDS: &str = "G.GAME.round_resets.hands";
const HANDS_LEFT: &str = "G.GAME.current_round.hands_left";

/// Passive slot suffixes: value, range bounds, applied delta, snapshot.
const PASSIVE_SUFFIXES: &[&str] = &["", "_min", "_max", "_applied", "_original"];

pub(super) fn compile(
    effect: &Effect,
    params: &EditHand,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    if class == TriggerClass::Passive {
        return passive(params, effect, ctx);
    }

    let q = value_quantity(ctx, "hands", &params.value, &effect.id)?;
    let v = q.value;
    let body = match params.duration {
        Duration::Permanent => permanent(params.operation, &v),
        Duration::Round => this_round(params.operation, &v),
    };
    let (message, colour) = match params.operation {
        HandOperation::Add => (amount_message("+", &v, " Hand"), Colour::Green),
        HandOperation::Subtract => (amount_message("-", &v, " Hand"), Colour::Red),
        HandOperation::Set => (amount_message("Set to ", &v, " Hands"), Colour::Blue),
    };

    Ok(Emitted::triggered(class, q.setup, (message_or(effect, message), colour), body))
}

fn permanent(operation: HandOperation, v: &Expr) -> Block {
    let hands = || Expr::path(ROUND_HANDS);
    let (new_total, eased) = match operation {
        HandOperation::Add => (hands().plus(v.clone()), v.clone()),
        HandOperation::Subtract => (hands().minus(v.clone()), v.clone().neg()),
        HandOperation::Set => (v.clone(), v.clone().minus(Expr::path(HANDS_LEFT))),
    };
    Block::new()
        .with(Stmt::assign(ROUND_HANDS, new_total))
        .with(Stmt::call("ease_hands_played", vec![eased]))
}

fn this_round(operation: HandOperation, v: &Expr) -> Block {
    let left = || Expr::path(HANDS_LEFT);
    let new_left = match operation {
        HandOperation::Add => left().plus(v.clone()),
        HandOperation::Subtract => left().minus(v.clone()),
        HandOperation::Set => v.clone(),
    };
    Block::new().with(Stmt::assign(HANDS_LEFT, new_left))
}

/// Hands granted while the joker is held. Duration does not apply.
fn passive(params: &EditHand, effect: &Effect, ctx: &mut ResolveContext<'_>) -> Result<Emitted> {
    let q = quantity(ctx, "hand_change", PASSIVE_SUFFIXES, &params.value, &effect.id)?;
    let applied_name = format!("{}_applied", q.slot);
    let applied = || lua::extra(&applied_name);
    let hands = || Expr::path(ROUND_HANDS);
    let recorded = || applied().or(Expr::num(0.0));

    let mut add_to_deck = q.setup;
    let remove_from_deck = match params.operation {
        HandOperation::Add => {
            ctx.declare(ConfigVariable::new(applied_name.clone(), 0.0))?;
            add_to_deck.push(Stmt::Assign(applied(), q.value));
            add_to_deck.push(Stmt::assign(ROUND_HANDS, hands().plus(applied())));
            Block::new()
                .with(Stmt::assign(ROUND_HANDS, hands().minus(recorded())))
                .with(Stmt::Assign(applied(), Expr::num(0.0)))
        }
        HandOperation::Subtract => {
            // The clamp may remove less than asked; record what it removed.
            ctx.declare(ConfigVariable::new(applied_name.clone(), 0.0))?;
            add_to_deck.push(Stmt::local("hands_before", hands()));
            add_to_deck.push(Stmt::assign(
                ROUND_HANDS,
                Expr::call("math.max", vec![Expr::num(1.0), hands().minus(q.value)]),
            ));
            add_to_deck.push(Stmt::Assign(applied(), Expr::path("hands_before").minus(hands())));
            Block::new()
                .with(Stmt::assign(ROUND_HANDS, hands().plus(recorded())))
                .with(Stmt::Assign(applied(), Expr::num(0.0)))
        }
        HandOperation::Set => {
            // Not declared: the snapshot must start out nil.
            let original = || lua::extra(&format!("{}_original", q.slot));
            add_to_deck.push(Stmt::Assign(original(), hands()));
            add_to_deck.push(Stmt::assign(ROUND_HANDS, q.value));
            Block::new().with(Stmt::if_then(
                original(),
                Block::new()
                    .with(Stmt::assign(ROUND_HANDS, original()))
                    .with(Stmt::Assign(original(), Expr::Nil)),
            ))
        }
    };

    Ok(Emitted::new(EffectShape::Passive {
        add_to_deck,
        remove_from_deck,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompilerConfig;
    use crate::lua::Renderer;
    use crate::model::{EffectKind, Joker, ParamValue};
    use crate::resolve::ConfigNamespace;

    fn run(params: EditHand, class: TriggerClass) -> (Emitted, Vec<ConfigVariable>) {
        let joker = Joker::new("j1", "fan");
        let config = CompilerConfig::new("m");
        let mut ns = ConfigNamespace::new();
        let mut ctx = ResolveContext::new(&joker, &config, &mut ns);
        let effect = Effect::new("effect-123456789", EffectKind::EditHand(params.clone()));
        let emitted = compile(&effect, &params, class, &mut ctx).unwrap();
        (emitted, ns.into_variables())
    }

    fn body(shape: &EffectShape) -> String {
        match shape {
            EffectShape::Immediate(b) | EffectShape::Deferred(b) => Renderer::default().block(b),
            EffectShape::Passive { .. } => panic!("not triggered"),
        }
    }

    #[test]
    fn test_immediate_add() {
        let (emitted, config) = run(EditHand::new(HandOperation::Add, 2), TriggerClass::Immediate);
        assert_eq!(
            body(&emitted.shape),
            r#"card_eval_status_text(context.blueprint_card or card, "extra", nil, nil, nil, {message = "+" .. tostring(card.ability.extra.hands) .. " Hand", colour = G.C.GREEN})
G.GAME.round_resets.hands = G.GAME.round_resets.hands + card.ability.extra.hands
ease_hands_played(card.ability.extra.hands)"#
        );
        assert_eq!(config, vec![ConfigVariable::new("hands", 2.0)]);
        assert_eq!(emitted.colour, Some(Colour::Green));
        assert!(emitted.message.is_none());
    }

    #[test]
    fn test_deferred_set_for_round() {
        let params = EditHand::new(HandOperation::Set, 3).with_duration(Duration::Round);
        let (emitted, _) = run(params, TriggerClass::Scoring);
        assert!(matches!(emitted.shape, EffectShape::Deferred(_)));
        assert_eq!(
            body(&emitted.shape),
            "G.GAME.current_round.hands_left = card.ability.extra.hands"
        );
        let message = Renderer::default().expr(&emitted.message.unwrap());
        assert_eq!(message, r#""Set to " .. tostring(card.ability.extra.hands) .. " Hands""#);
        assert_eq!(emitted.colour, Some(Colour::Blue));
    }

    #[test]
    fn test_range_is_drawn_once() {
        let (emitted, config) = run(
            EditHand::new(HandOperation::Subtract, ParamValue::range(1.0, 3.0)),
            TriggerClass::Immediate,
        );
        let text = body(&emitted.shape);
        assert!(text.starts_with(
            r#"local hands_value = pseudorandom("jf_hands_effect-1", card.ability.extra.hands_min, card.ability.extra.hands_max)"#
        ));
        assert!(text.contains("ease_hands_played(-hands_value)"));
        assert_eq!(text.matches("pseudorandom").count(), 1);
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_passive_subtract_records_delta() {
        let (emitted, config) = run(EditHand::new(HandOperation::Subtract, 2), TriggerClass::Passive);
        let EffectShape::Passive {
            add_to_deck,
            remove_from_deck,
        } = emitted.shape
        else {
            panic!("expected passive shape");
        };
        let r = Renderer::default();
        assert_eq!(
            r.block(&add_to_deck),
            "local hands_before = G.GAME.round_resets.hands
G.GAME.round_resets.hands = math.max(1, G.GAME.round_resets.hands - card.ability.extra.hand_change)
card.ability.extra.hand_change_applied = hands_before - G.GAME.round_resets.hands"
        );
        assert_eq!(
            r.block(&remove_from_deck),
            "G.GAME.round_resets.hands = G.GAME.round_resets.hands + (card.ability.extra.hand_change_applied or 0)
card.ability.extra.hand_change_applied = 0"
        );
        assert_eq!(
            config,
            vec![
                ConfigVariable::new("hand_change", 2.0),
                ConfigVariable::new("hand_change_applied", 0.0),
            ]
        );
    }

    #[test]
    fn test_passive_set_snapshots() {
        let (emitted, config) = run(EditHand::new(HandOperation::Set, 1), TriggerClass::Passive);
        let EffectShape::Passive { remove_from_deck, .. } = emitted.shape else {
            panic!("expected passive shape");
        };
        assert_eq!(
            Renderer::default().block(&remove_from_deck),
            "if card.ability.extra.hand_change_original then
    G.GAME.round_resets.hands = card.ability.extra.hand_change_original
    card.ability.extra.hand_change_original = nil
end"
        );
        assert!(config.iter().all(|v| !v.name.ends_with("_original")));
    }
}
