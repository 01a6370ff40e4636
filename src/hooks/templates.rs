//! Patch templates, one per hook category.

use crate::core::{CompileError, Result};
use crate::lua::{Block, Expr, Stmt};
use crate::model::{CombineSuits, DiscountItems, DiscountMethod, DiscountTarget};

use super::request::{HookCategory, HookParams};

/// How one category patches its shared function.
///
/// The merger owns the common frame: it saves the original function,
/// declares the replacement, calls through to the original and gates every
/// request on its owner being held. A template only supplies what differs.
pub trait HookTemplate: Send + Sync {
    fn category(&self) -> HookCategory;

    /// Patched function in method syntax, e.g. `Card:set_cost`.
    fn target(&self) -> &'static str;

    /// Parameters after the implicit `self`.
    fn params(&self) -> &'static [&'static str] {
        &[]
    }

    /// Statements invoking the original through `reference`.
    fn call_through(&self, reference: &str) -> Block {
        Block::new().with(Stmt::Call(self.reference_call(reference)))
    }

    /// One owner's transformation, already known to be held.
    fn transform(&self, params: &HookParams) -> Result<Block>;

    /// Statements after every gated block.
    fn epilogue(&self) -> Block {
        Block::new()
    }

    /// `reference(self, params...)`
    fn reference_call(&self, reference: &str) -> Expr {
        let args = std::iter::once("self")
            .chain(self.params().iter().copied())
            .map(Expr::path)
            .collect();
        Expr::call(reference, args)
    }
}

fn mismatch(category: HookCategory, params: &HookParams) -> CompileError {
    CompileError::HookParamsMismatch {
        category,
        found: params.category(),
    }
}

/// `Card:set_cost`: shop prices.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetCostTemplate;

impl SetCostTemplate {
    /// Does the card belong to the discounted group?
    fn target_check(target: DiscountTarget) -> Expr {
        let set = || Expr::path("self.ability.set");
        let is_set = |name: &str| set().equals(Expr::str(name));
        let booster_of = |kind: &str| {
            is_set("Booster").and(Expr::path("self.config.center.kind").equals(Expr::str(kind)))
        };
        let any_set = |names: &[&str]| Expr::any_of(names.iter().map(|n| is_set(*n)));

        match target {
            DiscountTarget::Planet => is_set("Planet").or(booster_of("Celestial")),
            DiscountTarget::Tarot => is_set("Tarot").or(booster_of("Arcana")),
            DiscountTarget::Spectral => is_set("Spectral").or(booster_of("Spectral")),
            DiscountTarget::Standard => is_set("Enhanced").or(booster_of("Standard")),
            DiscountTarget::Jokers => is_set("Joker"),
            DiscountTarget::Vouchers => is_set("Voucher"),
            DiscountTarget::AllConsumables => any_set(&["Tarot", "Planet", "Spectral"]),
            DiscountTarget::AllCards => {
                any_set(&["Joker", "Tarot", "Planet", "Spectral", "Enhanced", "Booster"])
            }
            DiscountTarget::AllShopItems => any_set(&[
                "Joker", "Tarot", "Planet", "Spectral", "Enhanced", "Booster", "Voucher",
            ]),
        }
    }

    /// The new cost, computed from the current one.
    fn discounted_cost(method: DiscountMethod, amount: f64) -> Expr {
        let cost = || Expr::path("self.cost");
        match method {
            DiscountMethod::MakeFree => Expr::num(0.0),
            DiscountMethod::FlatReduction => {
                Expr::call("math.max", vec![Expr::num(0.0), cost().minus(Expr::num(amount))])
            }
            DiscountMethod::PercentageReduction => {
                let factor = Expr::num(1.0).minus(Expr::num(amount).over(Expr::num(100.0)));
                Expr::call(
                    "math.max",
                    vec![Expr::num(0.0), Expr::call("math.floor", vec![cost().times(factor)])],
                )
            }
        }
    }

    fn discount(params: &DiscountItems) -> Block {
        Block::new().with(Stmt::if_then(
            Self::target_check(params.target),
            Block::new().with(Stmt::assign(
                "self.cost",
                Self::discounted_cost(params.method, params.amount),
            )),
        ))
    }
}

impl HookTemplate for SetCostTemplate {
    fn category(&self) -> HookCategory {
        HookCategory::DiscountItems
    }

    fn target(&self) -> &'static str {
        "Card:set_cost"
    }

    fn transform(&self, params: &HookParams) -> Result<Block> {
        match params {
            HookParams::DiscountItems(discount) => Ok(Self::discount(discount)),
            other => Err(mismatch(self.category(), other)),
        }
    }

    /// Sell value follows the discounted cost.
    fn epilogue(&self) -> Block {
        let half_cost = Expr::call(
            "math.floor",
            vec![Expr::path("self.cost").over(Expr::num(2.0))],
        );
        Block::new()
            .with(Stmt::assign(
                "self.sell_cost",
                Expr::call("math.max", vec![Expr::num(1.0), half_cost])
                    .plus(Expr::path("self.ability.extra_value").or(Expr::num(0.0))),
            ))
            .with(Stmt::assign(
                "self.sell_cost_label",
                Expr::path("self.facing")
                    .equals(Expr::str("back"))
                    .and(Expr::str("?"))
                    .or(Expr::path("self.sell_cost")),
            ))
    }
}

/// `Card:is_suit`: suit checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsSuitTemplate;

const RESULT: &str = "ret";

impl IsSuitTemplate {
    fn combine(params: &CombineSuits) -> Block {
        let pair = |asked: &str, actual: &str| {
            Expr::path("suit")
                .equals(Expr::str(asked))
                .and(Expr::path("self.base.suit").equals(Expr::str(actual)))
        };
        let (a, b) = (params.first.name(), params.second.name());
        // Debuffed cards return nil, not false, and stay unmatched.
        let condition = Expr::path(RESULT)
            .equals(Expr::Bool(false))
            .and(pair(a, b).or(pair(b, a)));
        Block::new().with(Stmt::if_then(
            condition,
            Block::new().with(Stmt::assign(RESULT, Expr::Bool(true))),
        ))
    }
}

impl HookTemplate for IsSuitTemplate {
    fn category(&self) -> HookCategory {
        HookCategory::CombineSuits
    }

    fn target(&self) -> &'static str {
        "Card:is_suit"
    }

    fn params(&self) -> &'static [&'static str] {
        &["suit", "bypass_debuff", "flush_calc"]
    }

    fn call_through(&self, reference: &str) -> Block {
        Block::new().with(Stmt::local(RESULT, self.reference_call(reference)))
    }

    fn transform(&self, params: &HookParams) -> Result<Block> {
        match params {
            HookParams::CombineSuits(combine) => Ok(Self::combine(combine)),
            other => Err(mismatch(self.category(), other)),
        }
    }

    fn epilogue(&self) -> Block {
        Block::new().with(Stmt::ret(Expr::path(RESULT)))
    }
}

/// Templates for every category.
pub fn default_templates() -> Vec<Box<dyn HookTemplate>> {
    vec![Box::new(SetCostTemplate), Box::new(IsSuitTemplate)]
}
