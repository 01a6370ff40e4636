//! Value classification and resolved values.

use serde::{Deserialize, Serialize};

use crate::lua::{self, Expr};
use crate::model::{ParamValue, RANGE_PREFIX};

use super::game_vars::GameVarRef;
use super::namespace::ConfigVariable;

/// Range bounds used when a descriptor omits one.
pub const DEFAULT_RANGE: (f64, f64) = (1.0, 5.0);

/// Where a resolved number comes from. Exactly one source per resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    /// A constant. With a slot it is read from `card.ability.extra.<slot>`,
    /// otherwise it is inlined.
    Literal { value: f64, slot: Option<String> },

    /// Live runtime state.
    GameState(Expr),

    /// A random draw between two stored bounds.
    Range {
        name: String,
        min: f64,
        max: f64,
        seed: String,
    },

    /// An existing variable of the joker.
    Named(String),
}

impl ResolvedValue {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::GameState(_) => "game_state",
            Self::Range { .. } => "range",
            Self::Named(_) => "named",
        }
    }

    /// Expression reading the value.
    #[must_use]
    pub fn expr(&self) -> Expr {
        match self {
            Self::Literal { slot: Some(slot), .. } => lua::extra(slot),
            Self::Literal { value, slot: None } => Expr::num(*value),
            Self::GameState(expr) => expr.clone(),
            Self::Range { name, seed, .. } => Expr::call(
                "pseudorandom",
                vec![
                    Expr::str(seed.as_str()),
                    lua::extra(&format!("{}_min", name)),
                    lua::extra(&format!("{}_max", name)),
                ],
            ),
            Self::Named(name) => lua::extra(name),
        }
    }

    /// Variables this value needs declared.
    #[must_use]
    pub fn config_variables(&self) -> Vec<ConfigVariable> {
        match self {
            Self::Literal {
                value,
                slot: Some(slot),
            } => vec![ConfigVariable::new(slot.clone(), *value)],
            Self::Range { name, min, max, .. } => vec![
                ConfigVariable::new(format!("{}_min", name), *min),
                ConfigVariable::new(format!("{}_max", name), *max),
            ],
            _ => Vec::new(),
        }
    }

    /// Does every evaluation of [`expr`](Self::expr) yield the same number
    /// (within one callback)? Ranges draw anew each time.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Range { .. })
    }
}

/// What to do with a literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralPolicy {
    /// Write the number into the expression (condition counts).
    #[default]
    Inline,
    /// Store the number in a config variable (effect quantities).
    Declared,
}

/// The value source a raw parameter names, before any name is claimed.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueSource<'a> {
    GameVar(GameVarRef<'a>),
    Range { min: f64, max: f64 },
    Named(&'a str),
    Number(f64),
    /// Matches none of the above.
    Unresolved,
}

impl<'a> ValueSource<'a> {
    /// Classify a raw value: game-state token, then range, then name, then
    /// number.
    pub fn classify(value: &'a ParamValue) -> ValueSource<'a> {
        let text = match value {
            ParamValue::Number(n) if n.is_finite() => return Self::Number(*n),
            ParamValue::Number(_) => return Self::Unresolved,
            ParamValue::Text(text) => text.trim(),
        };
        if let Some(game_var) = GameVarRef::parse(text) {
            return Self::GameVar(game_var);
        }
        if let Some(bounds) = text.strip_prefix(RANGE_PREFIX) {
            let (min, max) = parse_range(bounds);
            return Self::Range { min, max };
        }
        if lua::is_identifier(text) {
            return Self::Named(text);
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Unresolved,
        }
    }
}

/// `<min>|<max>`; a missing or malformed end takes its default.
fn parse_range(bounds: &str) -> (f64, f64) {
    let mut parts = bounds.split('|').map(|p| p.trim().parse::<f64>().ok());
    let min = parts.next().flatten().unwrap_or(DEFAULT_RANGE.0);
    let max = parts.next().flatten().unwrap_or(DEFAULT_RANGE.1);
    (min, max)
}
