//! Intermediate representation for generated Lua.
//!
//! Generators build small expression trees and statement lists; a single
//! backend renders them to text:
//! - [`Expr`]: expressions (paths, calls, operators, tables, functions)
//! - [`Stmt`] / [`Block`]: statements and ordered statement lists
//! - [`Renderer`]: the text backend
//!
//! ## Example
//!
//! ```
//! use joker_forge::lua::{Block, Expr, Renderer, Stmt};
//!
//! let body = Block::new().with(Stmt::assign(
//!     "G.GAME.dollars",
//!     Expr::path("G.GAME.dollars").plus(Expr::num(5.0)),
//! ));
//! assert_eq!(Renderer::default().block(&body), "G.GAME.dollars = G.GAME.dollars + 5");
//! ```

mod ast;
mod render;

pub use ast::{BinOp, Block, Expr, Stmt, TableField, UnOp};
pub use render::Renderer;

/// `card.ability.extra.<name>`: per-copy persistent storage of the joker.
pub fn extra(name: &str) -> Expr {
    Expr::path(format!("card.ability.extra.{}", name))
}

/// Lua reserved words; never valid as field names in dotted access.
pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Is `name` usable as a Lua identifier (and therefore in a dotted path)?
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&name)
}
