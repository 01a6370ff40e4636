//! Game-state tokens.
//!
//! `GAMEVAR:<token>` reads live runtime state instead of a stored number.
//! An optional multiplier and offset scale it:
//! `GAMEVAR:money|0.5|2` is `G.GAME.dollars * 0.5 + 2`.

use crate::lua::Expr;
use crate::model::GAME_VAR_PREFIX;

/// How a token reads runtime state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// A numeric field.
    Field(&'static str),
    /// The length of a card list.
    Count(&'static str),
}

const TOKENS: &[(&str, Source)] = &[
    ("hand_size", Source::Field("G.hand.config.card_limit")),
    ("remaining_hands", Source::Field("G.GAME.current_round.hands_left")),
    ("remaining_discards", Source::Field("G.GAME.current_round.discards_left")),
    ("hands_played", Source::Field("G.GAME.current_round.hands_played")),
    ("money", Source::Field("G.GAME.dollars")),
    ("ante", Source::Field("G.GAME.round_resets.ante")),
    ("round", Source::Field("G.GAME.round")),
    ("joker_slots", Source::Field("G.jokers.config.card_limit")),
    ("consumable_slots", Source::Field("G.consumeables.config.card_limit")),
    ("joker_count", Source::Count("G.jokers.cards")),
    ("consumable_count", Source::Count("G.consumeables.cards")),
    ("deck_size", Source::Count("G.playing_cards")),
    ("cards_in_deck", Source::Count("G.deck.cards")),
    ("cards_in_hand", Source::Count("G.hand.cards")),
];

/// A parsed `GAMEVAR:` reference.
#[derive(Clone, Debug, PartialEq)]
pub struct GameVarRef<'a> {
    pub token: &'a str,
    pub multiplier: f64,
    pub offset: f64,
}

impl<'a> GameVarRef<'a> {
    /// Parse `GAMEVAR:<token>[|<multiplier>|<offset>]`. `None` unless the
    /// prefix is present; the token itself is not checked here.
    pub fn parse(text: &'a str) -> Option<GameVarRef<'a>> {
        let rest = text.strip_prefix(GAME_VAR_PREFIX)?;
        let mut parts = rest.split('|');
        let token = parts.next().unwrap_or_default().trim();
        let mut number = |default: f64| {
            parts
                .next()
                .and_then(|p| p.trim().parse::<f64>().ok())
                .unwrap_or(default)
        };
        let multiplier = number(1.0);
        let offset = number(0.0);
        Some(GameVarRef {
            token,
            multiplier,
            offset,
        })
    }

    /// Runtime expression, or `None` for an unknown token.
    pub fn expr(&self) -> Option<Expr> {
        let base = token_expr(self.token)?;
        let scaled = if self.multiplier == 1.0 {
            base
        } else {
            base.times(Expr::num(self.multiplier))
        };
        Some(if self.offset == 0.0 {
            scaled
        } else if self.offset < 0.0 {
            scaled.minus(Expr::num(-self.offset))
        } else {
            scaled.plus(Expr::num(self.offset))
        })
    }
}

/// Runtime expression for a bare token.
pub fn token_expr(token: &str) -> Option<Expr> {
    TOKENS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, source)| match source {
            Source::Field(path) => Expr::path(*path),
            Source::Count(list) => Expr::path(*list).len(),
        })
}

/// Every known token.
pub fn tokens() -> impl Iterator<Item = &'static str> {
    TOKENS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua::Renderer;

    fn render(text: &str) -> Option<String> {
        GameVarRef::parse(text)?.expr().map(|e| Renderer::default().expr(&e))
    }

    #[test]
    fn test_plain_tokens() {
        assert_eq!(render("GAMEVAR:money").as_deref(), Some("G.GAME.dollars"));
        assert_eq!(render("GAMEVAR:joker_count").as_deref(), Some("#G.jokers.cards"));
        assert_eq!(
            render("GAMEVAR:remaining_discards").as_deref(),
            Some("G.GAME.current_round.discards_left")
        );
    }

    #[test]
    fn test_multiplier_and_offset() {
        assert_eq!(render("GAMEVAR:money|0.5|2").as_deref(), Some("G.GAME.dollars * 0.5 + 2"));
        assert_eq!(render("GAMEVAR:joker_count|2").as_deref(), Some("#G.jokers.cards * 2"));
        assert_eq!(render("GAMEVAR:ante|1|-1").as_deref(), Some("G.GAME.round_resets.ante - 1"));
    }

    #[test]
    fn test_unknown_token() {
        let parsed = GameVarRef::parse("GAMEVAR:moon_phase").unwrap();
        assert_eq!(parsed.token, "moon_phase");
        assert!(parsed.expr().is_none());
        assert!(GameVarRef::parse("money").is_none());
    }

    #[test]
    fn test_every_token_resolves() {
        for token in tokens() {
            assert!(token_expr(token).is_some(), "{}", token);
        }
    }
}
