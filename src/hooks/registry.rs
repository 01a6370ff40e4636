//! Hook registry and merge pass.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CompileError, CompilerConfig, JokerKey, Result};
use crate::lua::{Block, Expr, Renderer, Stmt};

use super::request::{HookCategory, HookRequest};
use super::templates::{default_templates, HookTemplate};

/// The merged replacement of one shared function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HookPatch {
    pub category: HookCategory,
    /// Patched function, e.g. `Card:set_cost`.
    pub target: String,
    /// Owners with a gated block, in request order.
    pub owners: Vec<JokerKey>,
    /// Rendered Lua.
    pub source: String,
}

/// Collects hook requests from every rule, then merges them once.
///
/// Requests are kept per category in submission order, which is authoring
/// order when the driver compiles jokers and rules in order.
pub struct HookRegistry {
    templates: FxHashMap<HookCategory, Box<dyn HookTemplate>>,
    requests: FxHashMap<HookCategory, Vec<HookRequest>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::with_templates(default_templates())
    }
}

impl HookRegistry {
    /// A registry without templates; every submission fails until one is
    /// registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            templates: FxHashMap::default(),
            requests: FxHashMap::default(),
        }
    }

    pub fn with_templates(templates: Vec<Box<dyn HookTemplate>>) -> Self {
        let mut registry = Self::empty();
        for template in templates {
            registry.register(template);
        }
        registry
    }

    /// Register (or replace) the template of a category.
    pub fn register(&mut self, template: Box<dyn HookTemplate>) {
        self.templates.insert(template.category(), template);
    }

    /// Would [`submit`](Self::submit) accept the request? Fails for a
    /// category without a template and for parameters of another category.
    pub fn check(&self, request: &HookRequest) -> Result<()> {
        if !self.templates.contains_key(&request.category) {
            return Err(CompileError::UnknownHookCategory(request.category.tag().to_string()));
        }
        request.validate()
    }

    /// Add a request after [`check`](Self::check)ing it.
    pub fn submit(&mut self, request: HookRequest) -> Result<()> {
        self.check(&request)?;
        self.requests.entry(request.category).or_default().push(request);
        Ok(())
    }

    /// Number of pending requests in a category.
    #[must_use]
    pub fn pending(&self, category: HookCategory) -> usize {
        self.requests.get(&category).map_or(0, Vec::len)
    }

    /// Merge every category into one patch. Categories without requests
    /// produce no patch.
    pub fn merge(mut self, config: &CompilerConfig, renderer: &Renderer) -> Result<Vec<HookPatch>> {
        let mut patches = Vec::new();
        for category in HookCategory::ALL {
            let Some(requests) = self.requests.remove(&category) else {
                continue;
            };
            if requests.is_empty() {
                continue;
            }
            let Some(template) = self.templates.get(&category) else {
                return Err(CompileError::UnknownHookCategory(category.tag().to_string()));
            };
            let body = patch(template.as_ref(), &requests, config)?;
            debug!(%category, requests = requests.len(), "merged hook");
            patches.push(HookPatch {
                category,
                target: template.target().to_string(),
                owners: requests.into_iter().map(|r| r.owner).collect(),
                source: renderer.block(&body),
            });
        }
        Ok(patches)
    }
}

/// `card_set_cost_ref` for `Card:set_cost`.
fn reference_name(target: &str) -> String {
    format!("{}_ref", target.replace([':', '.'], "_").to_lowercase())
}

fn patch(template: &dyn HookTemplate, requests: &[HookRequest], config: &CompilerConfig) -> Result<Block> {
    let target = template.target();
    let reference = reference_name(target);

    let mut body = template.call_through(&reference);
    for request in requests {
        let held = Expr::call(
            "next",
            vec![Expr::call(
                "SMODS.find_card",
                vec![Expr::str(config.joker_key(&request.owner))],
            )],
        );
        body.push(Stmt::if_then(held, template.transform(&request.params)?));
    }
    body.append(template.epilogue());

    Ok(Block::new()
        .with(Stmt::local(reference, Expr::path(target.replace(':', "."))))
        .with(Stmt::Function {
            name: target.to_string(),
            params: template.params().iter().map(|p| p.to_string()).collect(),
            body,
        }))
}
