//! Per-joker config variable names.
//!
//! Every copy of a joker carries its numbers in `card.ability.extra`. Two
//! effects of the same kind on one joker must not share a slot, so names
//! are claimed with a counter (`hands`, `hands2`, `hands3`, ...) and are
//! never overwritten.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{CompileError, Result};
use crate::model::{Joker, VariableKind};

/// Suffixes a value slot may need: the value itself, or a range's bounds.
pub const VALUE_SUFFIXES: &[&str] = &["", "_min", "_max"];

/// A number declared in `card.ability.extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigVariable {
    pub name: String,
    pub value: f64,
}

impl ConfigVariable {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Name allocator and declaration list for one joker.
///
/// Cloning is the checkpoint mechanism: the driver snapshots the namespace
/// before a rule and restores it if the rule fails, so an aborted rule
/// leaves no declarations behind.
#[derive(Clone, Debug, Default)]
pub struct ConfigNamespace {
    /// Names no claim may return.
    taken: FxHashSet<String>,
    /// Declared variables in declaration order.
    declared: Vec<ConfigVariable>,
    /// Name -> index into `declared`.
    index: FxHashMap<String, usize>,
}

impl ConfigNamespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace seeded with a joker's own variables. Numeric variables are
    /// declared with their initial values; every other kind only reserves
    /// its name.
    pub fn for_joker(joker: &Joker) -> Result<Self> {
        let mut ns = Self::new();
        for var in &joker.variables {
            ns.taken.insert(var.name.clone());
            if var.kind == VariableKind::Number {
                ns.declare(ConfigVariable::new(var.name.clone(), var.initial))?;
            }
        }
        Ok(ns)
    }

    /// Is the name reserved or declared?
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Claim the first of `base`, `base2`, `base3`, ... such that the name
    /// and every `name + suffix` are free, and reserve all of them.
    pub fn claim(&mut self, base: &str, suffixes: &[&str]) -> String {
        let free = |ns: &Self, name: &str| {
            !ns.taken.contains(name)
                && suffixes
                    .iter()
                    .all(|suffix| !ns.taken.contains(&format!("{}{}", name, suffix)))
        };

        let mut n = 1usize;
        let name = loop {
            let candidate = if n == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, n)
            };
            if free(self, &candidate) {
                break candidate;
            }
            n += 1;
        };

        self.taken.insert(name.clone());
        for suffix in suffixes {
            self.taken.insert(format!("{}{}", name, suffix));
        }
        name
    }

    /// Declare a variable. Declaring the same name twice is an error.
    pub fn declare(&mut self, var: ConfigVariable) -> Result<()> {
        if self.index.contains_key(&var.name) {
            return Err(CompileError::DuplicateConfigVariable(var.name));
        }
        self.taken.insert(var.name.clone());
        self.index.insert(var.name.clone(), self.declared.len());
        self.declared.push(var);
        Ok(())
    }

    /// Declared value of a variable.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.declared[i].value)
    }

    /// Number of declared variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    #[must_use]
    pub fn variables(&self) -> &[ConfigVariable] {
        &self.declared
    }

    #[must_use]
    pub fn into_variables(self) -> Vec<ConfigVariable> {
        self.declared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserVariable;

    #[test]
    fn test_claim_counts_up() {
        let mut ns = ConfigNamespace::new();
        assert_eq!(ns.claim("hands", VALUE_SUFFIXES), "hands");
        assert_eq!(ns.claim("hands", VALUE_SUFFIXES), "hands2");
        assert_eq!(ns.claim("hands", VALUE_SUFFIXES), "hands3");
        assert_eq!(ns.claim("blind_size", VALUE_SUFFIXES), "blind_size");
    }

    #[test]
    fn test_claim_reserves_suffixes() {
        let mut ns = ConfigNamespace::new();
        ns.declare(ConfigVariable::new("count_min", 1.0)).unwrap();
        // `count` itself is free, but its range bounds are not
        assert_eq!(ns.claim("count", VALUE_SUFFIXES), "count2");
        assert!(ns.contains("count2_max"));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut ns = ConfigNamespace::new();
        ns.declare(ConfigVariable::new("hands", 1.0)).unwrap();
        assert_eq!(
            ns.declare(ConfigVariable::new("hands", 2.0)),
            Err(CompileError::DuplicateConfigVariable("hands".into()))
        );
        assert_eq!(ns.value("hands"), Some(1.0));
    }

    #[test]
    fn test_user_variables_are_reserved() {
        let joker = Joker::new("j1", "fan")
            .with_variable(UserVariable::number("hands", 3.0))
            .with_variable(UserVariable::suit("lucky"));
        let mut ns = ConfigNamespace::for_joker(&joker).unwrap();

        assert_eq!(ns.variables(), &[ConfigVariable::new("hands", 3.0)]);
        assert!(ns.contains("lucky"));
        assert!(!ns.is_declared("lucky"));
        assert_eq!(ns.claim("hands", VALUE_SUFFIXES), "hands2");
        assert_eq!(ns.claim("lucky", &[""]), "lucky2");
    }

    #[test]
    fn test_clone_is_a_checkpoint() {
        let mut ns = ConfigNamespace::new();
        let checkpoint = ns.clone();
        ns.claim("hands", VALUE_SUFFIXES);
        ns.declare(ConfigVariable::new("hands", 1.0)).unwrap();

        let ns = checkpoint;
        assert!(ns.variables().is_empty());
        assert!(!ns.contains("hands"));
    }
}
