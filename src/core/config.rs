//! Compiler configuration.
//!
//! The export pipeline configures the compiler once per mod:
//! - `mod_prefix`: namespaces joker keys and custom rarities
//! - `seed_prefix`: leads every generated random seed name
//! - `indent_width`: spaces per indentation level in rendered Lua
//!
//! The compiler never hardcodes a mod prefix - pipelines provide it.

use serde::{Deserialize, Serialize};

use super::ids::JokerKey;

/// Default leading component of generated seed names.
pub const DEFAULT_SEED_PREFIX: &str = "jf";

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Complete compiler configuration.
///
/// Deserializable so pipelines can pass it alongside the project JSON;
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Mod prefix (`j_<prefix>_<key>`).
    pub mod_prefix: String,

    /// Leading component of generated seed names.
    pub seed_prefix: String,

    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            mod_prefix: "mod".to_string(),
            seed_prefix: DEFAULT_SEED_PREFIX.to_string(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl CompilerConfig {
    /// Create a configuration for the given mod prefix.
    pub fn new(mod_prefix: impl Into<String>) -> Self {
        Self {
            mod_prefix: mod_prefix.into(),
            ..Self::default()
        }
    }

    /// Set the seed prefix.
    #[must_use]
    pub fn with_seed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.seed_prefix = prefix.into();
        self
    }

    /// Set the indentation width.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Fully qualified runtime key for a joker of this mod.
    #[must_use]
    pub fn joker_key(&self, key: &JokerKey) -> String {
        key.runtime_key(&self.mod_prefix)
    }

    /// Key for a custom rarity defined by this mod.
    #[must_use]
    pub fn rarity_key(&self, rarity: &str) -> String {
        if self.mod_prefix.is_empty() {
            rarity.to_string()
        } else {
            format!("{}_{}", self.mod_prefix, rarity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CompilerConfig::new("fan")
            .with_seed_prefix("seed")
            .with_indent_width(2);

        assert_eq!(config.mod_prefix, "fan");
        assert_eq!(config.seed_prefix, "seed");
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = CompilerConfig::new("fan");
        assert_eq!(config.seed_prefix, DEFAULT_SEED_PREFIX);
        assert_eq!(config.indent_width, DEFAULT_INDENT_WIDTH);
    }

    #[test]
    fn test_joker_key() {
        let config = CompilerConfig::new("fan");
        assert_eq!(config.joker_key(&JokerKey::new("lucky")), "j_fan_lucky");
    }

    #[test]
    fn test_rarity_key() {
        assert_eq!(CompilerConfig::new("fan").rarity_key("mythic"), "fan_mythic");
        assert_eq!(CompilerConfig::new("").rarity_key("mythic"), "mythic");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CompilerConfig = serde_json::from_str(r#"{"mod_prefix": "fan"}"#).unwrap();
        assert_eq!(config, CompilerConfig::new("fan"));
    }
}
