//! Identifiers for authored entities.
//!
//! The editor assigns every joker, rule and effect a stable string id
//! (usually a UUID). The compiler never invents ids; it only derives
//! names from them.
//!
//! ## Short IDs
//!
//! Generated random seeds embed the first 8 characters of the owning
//! entity's id, so two copies of the same effect kind never share a
//! random stream:
//!
//! ```
//! use joker_forge::core::EffectId;
//!
//! let id = EffectId::new("3f2a9c1e-77d0-4c1b-9a55-0b1e2d3c4f5a");
//! assert_eq!(id.short(), "3f2a9c1e");
//! ```

use serde::{Deserialize, Serialize};

/// Number of id characters embedded in generated seed names.
pub const SHORT_ID_LEN: usize = 8;

/// First [`SHORT_ID_LEN`] characters of an id (the whole id if shorter).
#[must_use]
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Unique identifier for an authored joker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokerId(pub String);

impl JokerId {
    /// Create a new joker ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JokerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joker({})", self.0)
    }
}

/// Unique identifier for a rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create a new rule ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters used in seed names.
    #[must_use]
    pub fn short(&self) -> &str {
        short_id(&self.0)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule({})", self.0)
    }
}

/// Unique identifier for an effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub String);

impl EffectId {
    /// Create a new effect ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters used in seed names.
    #[must_use]
    pub fn short(&self) -> &str {
        short_id(&self.0)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Object key of a joker inside its mod.
///
/// The runtime knows the joker as `j_<mod prefix>_<key>`; see
/// [`JokerKey::runtime_key`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokerKey(pub String);

impl JokerKey {
    /// Create a new joker key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified key used by `SMODS.find_card`.
    ///
    /// ```
    /// use joker_forge::core::JokerKey;
    ///
    /// assert_eq!(JokerKey::new("red_fan").runtime_key("mymod"), "j_mymod_red_fan");
    /// ```
    #[must_use]
    pub fn runtime_key(&self, mod_prefix: &str) -> String {
        format!("j_{}_{}", mod_prefix, self.0)
    }
}

impl std::fmt::Display for JokerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! impl_from_str {
    ($($ty:ident),*) => {$(
        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    )*};
}

impl_from_str!(JokerId, RuleId, EffectId, JokerKey);
