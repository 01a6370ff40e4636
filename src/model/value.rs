//! Raw parameter values.
//!
//! Quantities arrive from the editor either as numbers or as strings that
//! encode a value source (`GAMEVAR:`, `RANGE:`, a variable name, or a
//! numeric string). Classification happens in the resolver; this type only
//! carries the value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of game-state tokens.
pub const GAME_VAR_PREFIX: &str = "GAMEVAR:";
/// Prefix of range descriptors.
pub const RANGE_PREFIX: &str = "RANGE:";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// `RANGE:<min>|<max>`
    pub fn range(min: f64, max: f64) -> Self {
        Self::Text(format!("{}{}|{}", RANGE_PREFIX, min, max))
    }

    /// `GAMEVAR:<token>`
    pub fn game_var(token: &str) -> Self {
        Self::Text(format!("{}{}", GAME_VAR_PREFIX, token))
    }

    /// Variable reference by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Text(name.into())
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}
