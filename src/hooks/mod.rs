//! Hook merging.
//!
//! Some effects change shared runtime behavior (shop prices, suit checks)
//! by replacing a global function. Many jokers may want the same function,
//! so each effect only files a [`HookRequest`]; after every rule of every
//! joker has compiled, [`HookRegistry::merge`] emits one replacement per
//! category:
//!
//! ```lua
//! local card_set_cost_ref = Card.set_cost
//! function Card:set_cost()
//!     card_set_cost_ref(self)
//!     if next(SMODS.find_card("j_mymod_a")) then
//!         -- transformation of joker a
//!     end
//!     if next(SMODS.find_card("j_mymod_b")) then
//!         -- transformation of joker b
//!     end
//!     -- category epilogue
//! end
//! ```
//!
//! The original always runs first. Transformations apply in request order,
//! each seeing the result of the previous ones. A category nobody asked
//! for is left unpatched.

mod registry;
mod request;
mod templates;

pub use registry::{HookPatch, HookRegistry};
pub use request::{HookCategory, HookParams, HookRequest};
pub use templates::{default_templates, HookTemplate, IsSuitTemplate, SetCostTemplate};
