//! Suit selections.

use tracing::warn;

use crate::lua::Expr;
use crate::model::{Joker, Suit, SuitList, SuitSelection};

/// What a suit selection compares a card against.
#[derive(Clone, Debug, PartialEq)]
pub enum SuitMatch {
    /// A suit chosen at runtime, read from a suit variable.
    Variable(Expr),
    /// Fixed suits; empty matches nothing.
    Suits(SuitList),
}

impl SuitMatch {
    /// A suit variable of the joker wins over a literal suit name.
    pub fn resolve(selection: &SuitSelection, joker: &Joker) -> SuitMatch {
        match selection {
            SuitSelection::Group(group) => Self::Suits(group.members()),
            SuitSelection::Specific(name) if joker.has_suit_variable(name) => Self::Variable(Expr::path(
                format!("G.GAME.current_round.{}_card.suit", name),
            )),
            SuitSelection::Specific(name) => match Suit::parse(name) {
                Some(suit) => Self::Suits(std::iter::once(suit).collect()),
                None => {
                    warn!(suit = %name, joker = %joker.key, "unknown suit matches nothing");
                    Self::Suits(SuitList::new())
                }
            },
        }
    }

    /// `card:is_suit(...)`, or-ed over every suit.
    #[must_use]
    pub fn check(&self, card: &Expr) -> Expr {
        let is_suit = |suit: Expr| card.clone().method("is_suit", vec![suit]);
        match self {
            Self::Variable(expr) => is_suit(expr.clone()),
            Self::Suits(suits) => Expr::any_of(suits.iter().map(|s| is_suit(Expr::str(s.name())))),
        }
    }
}
