//! `modify_blind_requirement`: scale the current blind's chip target.

use crate::core::Result;
use crate::lua::{Block, Expr, Stmt};
use crate::model::{BlindOperation, Effect, ModifyBlind, TriggerClass};
use crate::resolve::ResolveContext;

use super::{amount_message, message_or, missing_shape, value_quantity, Colour, Emitted};

const BLIND_CHIPS: &str = "G.GAME.blind.chips";

pub(super) fn compile(
    effect: &Effect,
    params: &ModifyBlind,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    if class == TriggerClass::Passive {
        return Err(missing_shape(effect, class));
    }

    let q = value_quantity(ctx, "blind_size", &params.value, &effect.id)?;
    let v = q.value;
    let chips = || Expr::path(BLIND_CHIPS);
    let (target, prefix) = match params.operation {
        BlindOperation::Add => (chips().plus(v.clone()), "+"),
        BlindOperation::Subtract => (chips().minus(v.clone()), "-"),
        BlindOperation::Multiply => (chips().times(v.clone()), "X"),
        BlindOperation::Divide => (chips().over(v.clone()), "/"),
        BlindOperation::Set => (v.clone(), "Set to "),
    };

    let body = Block::new()
        .with(Stmt::assign(BLIND_CHIPS, target))
        .with(Stmt::assign(
            "G.GAME.blind.chip_text",
            Expr::call("number_format", vec![chips()]),
        ))
        .with(Stmt::Call(Expr::path("G.HUD_blind").method("recalculate", Vec::new())));

    let message = message_or(effect, amount_message(prefix, &v, " Blind Size"));
    Ok(Emitted::triggered(class, q.setup, (message, Colour::Green), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompileError, CompilerConfig};
    use crate::lua::Renderer;
    use crate::model::{EffectKind, Joker};
    use crate::resolve::ConfigNamespace;
    use crate::effects::EffectShape;

    fn run(params: ModifyBlind, class: TriggerClass) -> Result<Emitted> {
        let joker = Joker::new("j1", "fan");
        let config = CompilerConfig::new("m");
        let mut ns = ConfigNamespace::new();
        let mut ctx = ResolveContext::new(&joker, &config, &mut ns);
        let effect = Effect::new("e1", EffectKind::ModifyBlindRequirement(params.clone()));
        compile(&effect, &params, class, &mut ctx)
    }

    #[test]
    fn test_immediate_divide() {
        let emitted = run(ModifyBlind::new(BlindOperation::Divide, 2), TriggerClass::Immediate).unwrap();
        let EffectShape::Immediate(block) = emitted.shape else {
            panic!("expected immediate shape");
        };
        assert_eq!(
            Renderer::default().block(&block),
            r#"card_eval_status_text(context.blueprint_card or card, "extra", nil, nil, nil, {message = "/" .. tostring(card.ability.extra.blind_size) .. " Blind Size", colour = G.C.GREEN})
G.GAME.blind.chips = G.GAME.blind.chips / card.ability.extra.blind_size
G.GAME.blind.chip_text = number_format(G.GAME.blind.chips)
G.HUD_blind:recalculate()"#
        );
    }

    #[test]
    fn test_passive_has_no_shape() {
        assert!(matches!(
            run(ModifyBlind::new(BlindOperation::Multiply, 2), TriggerClass::Passive),
            Err(CompileError::MissingTriggerClassShape { kind: "modify_blind_requirement", .. })
        ));
    }
}
