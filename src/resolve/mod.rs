//! Variable resolution.
//!
//! Turns a raw parameter value into one of four value sources and the
//! config variables it needs:
//!
//! | Raw value | Result |
//! |---|---|
//! | `GAMEVAR:<token>` | [`ResolvedValue::GameState`] |
//! | `RANGE:<min>\|<max>` | [`ResolvedValue::Range`], declares `<name>_min`/`<name>_max` |
//! | a variable name | [`ResolvedValue::Named`] |
//! | a number | [`ResolvedValue::Literal`], inlined or declared |
//!
//! ## Design Philosophy
//!
//! Resolution is total. A value that fits none of the classes (an unknown
//! game-state token, a name the joker never declared, garbage text)
//! resolves to zero and logs a warning rather than failing the rule.
//!
//! ## Example
//!
//! ```
//! use joker_forge::core::CompilerConfig;
//! use joker_forge::model::{Joker, ParamValue};
//! use joker_forge::resolve::{ConfigNamespace, ResolveContext, ValueRequest, VALUE_SUFFIXES};
//!
//! let joker = Joker::new("joker-1", "fan");
//! let config = CompilerConfig::new("mymod");
//! let mut namespace = ConfigNamespace::new();
//! let mut ctx = ResolveContext::new(&joker, &config, &mut namespace);
//!
//! let slot = ctx.claim("hands", VALUE_SUFFIXES);
//! let value = ctx
//!     .resolve(&ParamValue::range(1.0, 3.0), ValueRequest::declared(&slot, "3f2a9c1e-77d0"))
//!     .unwrap();
//! assert_eq!(value.config_variables().len(), 2);
//! assert_eq!(namespace.variables()[0].name, "hands_min");
//! ```

mod game_vars;
mod namespace;
mod suit;
mod value;

pub use game_vars::{token_expr, tokens, GameVarRef};
pub use namespace::{ConfigNamespace, ConfigVariable, VALUE_SUFFIXES};
pub use suit::SuitMatch;
pub use value::{LiteralPolicy, ResolvedValue, ValueSource, DEFAULT_RANGE};

use tracing::{debug, warn};

use crate::core::{short_id, CompilerConfig, Result};
use crate::model::{Joker, ParamValue, SuitSelection};

/// How one value should be resolved.
#[derive(Clone, Copy, Debug)]
pub struct ValueRequest<'a> {
    /// Slot name (declared) or base name for range bounds (inline).
    pub name: &'a str,
    /// Id of the entity the value belongs to; seeds embed its short form.
    pub owner: &'a str,
    pub policy: LiteralPolicy,
}

impl<'a> ValueRequest<'a> {
    /// Store literals and ranges under `name`, which the caller has already
    /// claimed with [`VALUE_SUFFIXES`].
    pub fn declared(name: &'a str, owner: &'a str) -> Self {
        Self {
            name,
            owner,
            policy: LiteralPolicy::Declared,
        }
    }

    /// Inline literals; ranges claim a slot derived from `base`.
    pub fn inline(base: &'a str, owner: &'a str) -> Self {
        Self {
            name: base,
            owner,
            policy: LiteralPolicy::Inline,
        }
    }
}

/// Resolution state for one joker.
pub struct ResolveContext<'a> {
    joker: &'a Joker,
    config: &'a CompilerConfig,
    namespace: &'a mut ConfigNamespace,
}

impl<'a> ResolveContext<'a> {
    pub fn new(joker: &'a Joker, config: &'a CompilerConfig, namespace: &'a mut ConfigNamespace) -> Self {
        Self {
            joker,
            config,
            namespace,
        }
    }

    #[must_use]
    pub fn joker(&self) -> &'a Joker {
        self.joker
    }

    #[must_use]
    pub fn config(&self) -> &'a CompilerConfig {
        self.config
    }

    /// Claim a fresh slot name; see [`ConfigNamespace::claim`].
    pub fn claim(&mut self, base: &str, suffixes: &[&str]) -> String {
        self.namespace.claim(base, suffixes)
    }

    /// Declare a variable the caller manages itself (snapshots, applied
    /// deltas).
    pub fn declare(&mut self, var: ConfigVariable) -> Result<()> {
        self.namespace.declare(var)
    }

    /// Position in the declaration list, for [`declared_since`](Self::declared_since).
    #[must_use]
    pub fn mark(&self) -> usize {
        self.namespace.len()
    }

    /// Variables declared after `mark`.
    #[must_use]
    pub fn declared_since(&self, mark: usize) -> Vec<ConfigVariable> {
        self.namespace.variables().get(mark..).unwrap_or_default().to_vec()
    }

    /// `<seed prefix>_<name>_<first 8 chars of owner id>`
    #[must_use]
    pub fn seed(&self, name: &str, owner: &str) -> String {
        format!("{}_{}_{}", self.config.seed_prefix, name, short_id(owner))
    }

    /// Resolve a value and declare whatever it needs.
    pub fn resolve(&mut self, value: &ParamValue, request: ValueRequest<'_>) -> Result<ResolvedValue> {
        let resolved = match ValueSource::classify(value) {
            ValueSource::GameVar(game_var) => match game_var.expr() {
                Some(expr) => ResolvedValue::GameState(expr),
                None => {
                    warn!(token = game_var.token, "unknown game variable, using 0");
                    self.literal(0.0, request)
                }
            },
            ValueSource::Range { min, max } => {
                let name = match request.policy {
                    LiteralPolicy::Declared => request.name.to_string(),
                    LiteralPolicy::Inline => self.namespace.claim(request.name, VALUE_SUFFIXES),
                };
                let seed = self.seed(&name, request.owner);
                ResolvedValue::Range { name, min, max, seed }
            }
            ValueSource::Named(name) if self.namespace.is_declared(name) => ResolvedValue::Named(name.to_string()),
            ValueSource::Named(name) => {
                warn!(variable = name, joker = %self.joker.key, "undeclared variable, using 0");
                self.literal(0.0, request)
            }
            ValueSource::Number(n) => self.literal(n, request),
            ValueSource::Unresolved => {
                warn!(value = %value, "unresolvable value, using 0");
                self.literal(0.0, request)
            }
        };

        for var in resolved.config_variables() {
            self.namespace.declare(var)?;
        }
        debug!(kind = resolved.tag(), slot = request.name, "resolved value");
        Ok(resolved)
    }

    fn literal(&self, value: f64, request: ValueRequest<'_>) -> ResolvedValue {
        let slot = match request.policy {
            LiteralPolicy::Declared => Some(request.name.to_string()),
            LiteralPolicy::Inline => None,
        };
        ResolvedValue::Literal { value, slot }
    }

    /// Resolve a suit selection against this joker's suit variables.
    #[must_use]
    pub fn resolve_suit(&self, selection: &SuitSelection) -> SuitMatch {
        SuitMatch::resolve(selection, self.joker)
    }
}
