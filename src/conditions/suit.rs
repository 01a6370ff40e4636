//! Suit conditions.
//!
//! Three independent axes decide the shape of the generated check:
//! 1. Single-card triggers test the card the runtime hands over and skip
//!    quantifier and scope entirely.
//! 2. Otherwise a candidate set is picked: `context.scoring_hand` for the
//!    scoring scope outside discard triggers, else `context.full_hand`.
//! 3. The quantifier folds matches over that set in a self-contained
//!    immediately invoked function.

use crate::core::Result;
use crate::lua::{Block, Expr, Stmt};
use crate::model::{CardScope, CardSource, ParamValue, Quantifier, SuitCondition, Trigger};
use crate::resolve::{ResolveContext, SuitMatch, ValueRequest};

const SCORING_HAND: &str = "context.scoring_hand";
const FULL_HAND: &str = "context.full_hand";

/// Which played cards a suit condition inspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuitSubject {
    /// `card_suit`: scope decides, discard triggers force the full set.
    Played,
    /// `discarded_card_suit`: always the full set.
    Discarded,
}

pub(crate) fn compile(
    subject: SuitSubject,
    params: &SuitCondition,
    trigger: Trigger,
    owner: &str,
    ctx: &mut ResolveContext<'_>,
) -> Result<Expr> {
    let suits = ctx.resolve_suit(&params.selection);

    match trigger.single_card_source() {
        Some(CardSource::OtherCard) => return Ok(suits.check(&Expr::path("context.other_card"))),
        Some(CardSource::Removed) => return Ok(any_removed(&suits)),
        None => {}
    }

    let cards = match subject {
        SuitSubject::Played if params.scope == CardScope::Scoring && !trigger.is_discard() => SCORING_HAND,
        _ => FULL_HAND,
    };

    let count = if params.quantifier.is_counting() {
        let raw = params.count.clone().unwrap_or(ParamValue::Number(1.0));
        ctx.resolve(&raw, ValueRequest::inline("count", owner))?.expr()
    } else {
        Expr::num(1.0)
    };

    Ok(fold(params.quantifier, cards, &suits, count))
}

/// Any card of `context.removed` matches.
fn any_removed(suits: &SuitMatch) -> Expr {
    let card = "removed_card";
    let hit = Stmt::if_then(suits.check(&Expr::path(card)), Block::new().with(Stmt::ret(true.into())));
    Expr::Iife(
        Block::new()
            .with(Stmt::for_ipairs("_", card, Expr::path("context.removed"), Block::new().with(hit)))
            .with(Stmt::ret(false.into())),
    )
}

fn fold(quantifier: Quantifier, cards: &str, suits: &SuitMatch, count: Expr) -> Expr {
    let check = suits.check(&Expr::path("c"));
    let over_cards = |body: Block| Stmt::for_ipairs("_", "c", Expr::path(cards), body);

    let body = match quantifier {
        Quantifier::AtLeastOne => Block::new()
            .with(Stmt::local("suit_found", false.into()))
            .with(over_cards(Block::new().with(Stmt::if_then(
                check,
                Block::new()
                    .with(Stmt::assign("suit_found", true.into()))
                    .with(Stmt::Break),
            ))))
            .with(Stmt::ret(Expr::path("suit_found"))),
        Quantifier::All => Block::new()
            .with(Stmt::local("all_match", true.into()))
            .with(over_cards(Block::new().with(Stmt::if_then(
                check.not(),
                Block::new()
                    .with(Stmt::assign("all_match", false.into()))
                    .with(Stmt::Break),
            ))))
            // An empty set never satisfies "all".
            .with(Stmt::ret(
                Expr::path("all_match").and(Expr::path(cards).len().gt(Expr::num(0.0))),
            )),
        Quantifier::Exactly | Quantifier::AtLeast | Quantifier::AtMost => {
            let matched = Expr::path("suit_count");
            let result = match quantifier {
                Quantifier::Exactly => matched.equals(count),
                Quantifier::AtLeast => matched.ge(count),
                // Zero matches never satisfies "at most".
                _ => matched.clone().le(count).and(matched.gt(Expr::num(0.0))),
            };
            Block::new()
                .with(Stmt::local("suit_count", Expr::num(0.0)))
                .with(over_cards(Block::new().with(Stmt::if_then(
                    check,
                    Block::new().with(Stmt::assign(
                        "suit_count",
                        Expr::path("suit_count").plus(Expr::num(1.0)),
                    )),
                ))))
                .with(Stmt::ret(result))
        }
    };
    Expr::Iife(body)
}
