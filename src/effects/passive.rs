//! Effects that only exist while the joker is held.

use crate::core::Result;
use crate::hooks::{HookParams, HookRequest};
use crate::lua::{Block, Expr, Stmt};
use crate::model::{CombineSuits, DiscountItems, Effect, FreeRerolls, TriggerClass};
use crate::resolve::ResolveContext;

use super::{event, missing_shape, EffectShape, Emitted};

fn require_passive(effect: &Effect, class: TriggerClass) -> Result<()> {
    if class == TriggerClass::Passive {
        Ok(())
    } else {
        Err(missing_shape(effect, class))
    }
}

/// Re-runs `set_cost` on every live card, next frame, so prices follow the
/// patched `Card:set_cost` as soon as the joker arrives or leaves.
fn refresh_costs() -> Block {
    let card = || Expr::path("v");
    let refresh = Stmt::if_then(
        Expr::path("v.set_cost"),
        Block::new().with(Stmt::Call(card().method("set_cost", Vec::new()))),
    );
    Block::new().with(event(
        Block::new()
            .with(Stmt::for_pairs("_", "v", Expr::path("G.I.CARD"), Block::new().with(refresh)))
            .with(Stmt::ret(true.into())),
    ))
}

pub(super) fn discount_items(
    effect: &Effect,
    params: &DiscountItems,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    require_passive(effect, class)?;
    let request = HookRequest::new(ctx.joker().key.clone(), HookParams::DiscountItems(params.clone()));
    Ok(Emitted::new(EffectShape::Passive {
        add_to_deck: refresh_costs(),
        remove_from_deck: refresh_costs(),
    })
    .with_hook(request))
}

pub(super) fn free_rerolls(effect: &Effect, params: &FreeRerolls, class: TriggerClass) -> Result<Emitted> {
    require_passive(effect, class)?;
    let change = |amount: f64| Block::new().with(Stmt::call("SMODS.change_free_rerolls", vec![Expr::num(amount)]));
    Ok(Emitted::new(EffectShape::Passive {
        add_to_deck: change(params.amount),
        remove_from_deck: change(-params.amount),
    }))
}

/// The whole effect lives in the `Card:is_suit` patch.
pub(super) fn combine_suits(
    effect: &Effect,
    params: &CombineSuits,
    class: TriggerClass,
    ctx: &mut ResolveContext<'_>,
) -> Result<Emitted> {
    require_passive(effect, class)?;
    let request = HookRequest::new(ctx.joker().key.clone(), HookParams::CombineSuits(params.clone()));
    Ok(Emitted::new(EffectShape::Passive {
        add_to_deck: Block::new(),
        remove_from_deck: Block::new(),
    })
    .with_hook(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompileError, CompilerConfig, JokerKey};
    use crate::hooks::HookCategory;
    use crate::lua::Renderer;
    use crate::model::{EffectKind, Joker, Suit};
    use crate::resolve::ConfigNamespace;

    #[test]
    fn test_free_rerolls_pair() {
        let params = FreeRerolls { amount: 2.0 };
        let effect = Effect::new("e1", EffectKind::FreeRerolls(params.clone()));
        let emitted = free_rerolls(&effect, &params, TriggerClass::Passive).unwrap();
        let EffectShape::Passive {
            add_to_deck,
            remove_from_deck,
        } = emitted.shape
        else {
            panic!("expected passive shape");
        };
        let r = Renderer::default();
        assert_eq!(r.block(&add_to_deck), "SMODS.change_free_rerolls(2)");
        assert_eq!(r.block(&remove_from_deck), "SMODS.change_free_rerolls(-2)");
    }

    #[test]
    fn test_discount_requests_hook() {
        let joker = Joker::new("j1", "coupon");
        let config = CompilerConfig::new("m");
        let mut ns = ConfigNamespace::new();
        let mut ctx = ResolveContext::new(&joker, &config, &mut ns);
        let params = DiscountItems::default();
        let effect = Effect::new("e1", EffectKind::DiscountItems(params.clone()));

        let emitted = discount_items(&effect, &params, TriggerClass::Passive, &mut ctx).unwrap();
        let hook = emitted.hook.unwrap();
        assert_eq!(hook.owner, JokerKey::new("coupon"));
        assert_eq!(hook.category, HookCategory::DiscountItems);

        let EffectShape::Passive { add_to_deck, .. } = emitted.shape else {
            panic!("expected passive shape");
        };
        assert!(Renderer::default()
            .block(&add_to_deck)
            .contains("for _, v in pairs(G.I.CARD) do\n            if v.set_cost then\n                v:set_cost()"));
    }

    #[test]
    fn test_passive_kinds_reject_triggers() {
        let joker = Joker::new("j1", "fan");
        let config = CompilerConfig::new("m");
        let mut ns = ConfigNamespace::new();
        let mut ctx = ResolveContext::new(&joker, &config, &mut ns);
        let params = CombineSuits {
            first: Suit::Hearts,
            second: Suit::Diamonds,
        };
        let effect = Effect::new("e1", EffectKind::CombineSuits(params.clone()));
        assert_eq!(
            combine_suits(&effect, &params, TriggerClass::Scoring, &mut ctx).unwrap_err(),
            CompileError::MissingTriggerClassShape {
                kind: "combine_suits",
                class: TriggerClass::Scoring,
            }
        );
    }
}
