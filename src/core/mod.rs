//! Core compiler types: identifiers, configuration, errors.
//!
//! Everything here is shared by the resolver, the condition and effect
//! compilers, the hook merger and the driver.

pub mod config;
pub mod error;
pub mod ids;

pub use config::{CompilerConfig, DEFAULT_INDENT_WIDTH, DEFAULT_SEED_PREFIX};
pub use error::{CompileError, Result, RuleFailure};
pub use ids::{short_id, EffectId, JokerId, JokerKey, RuleId, SHORT_ID_LEN};
