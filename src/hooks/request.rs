//! Hook categories and requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{CompileError, JokerKey, Result};
use crate::model::{CombineSuits, DiscountItems};

/// A shared runtime function that many jokers may patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HookCategory {
    /// Patches `Card:set_cost`.
    DiscountItems,
    /// Patches `Card:is_suit`.
    CombineSuits,
}

impl HookCategory {
    /// Every category, in patch emission order.
    pub const ALL: [HookCategory; 2] = [Self::DiscountItems, Self::CombineSuits];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::DiscountItems => "discount_items",
            Self::CombineSuits => "combine_suits",
        }
    }
}

impl fmt::Display for HookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HookCategory {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| CompileError::UnknownHookCategory(s.to_string()))
    }
}

impl TryFrom<String> for HookCategory {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<HookCategory> for String {
    fn from(category: HookCategory) -> Self {
        category.tag().to_string()
    }
}

/// Category-specific parameters of a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookParams {
    DiscountItems(DiscountItems),
    CombineSuits(CombineSuits),
}

impl HookParams {
    /// The category these parameters belong to.
    #[must_use]
    pub const fn category(&self) -> HookCategory {
        match self {
            Self::DiscountItems(_) => HookCategory::DiscountItems,
            Self::CombineSuits(_) => HookCategory::CombineSuits,
        }
    }
}

/// One owner's contribution to a patched function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HookRequest {
    /// Gates the transformation: it applies only while this joker is held.
    pub owner: JokerKey,
    pub category: HookCategory,
    pub params: HookParams,
}

impl HookRequest {
    /// Request filed under the category its parameters belong to.
    pub fn new(owner: JokerKey, params: HookParams) -> Self {
        Self {
            owner,
            category: params.category(),
            params,
        }
    }

    /// Request filed under an explicit category tag.
    pub fn tagged(owner: JokerKey, category: &str, params: HookParams) -> Result<Self> {
        let request = Self {
            owner,
            category: category.parse()?,
            params,
        };
        request.validate()?;
        Ok(request)
    }

    /// The parameters must belong to the category the request is filed under.
    pub fn validate(&self) -> Result<()> {
        let found = self.params.category();
        if found == self.category {
            Ok(())
        } else {
            Err(CompileError::HookParamsMismatch {
                category: self.category,
                found,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Suit;

    fn combine() -> HookParams {
        HookParams::CombineSuits(CombineSuits {
            first: Suit::Hearts,
            second: Suit::Spades,
        })
    }

    #[test]
    fn test_category_tags() {
        for category in HookCategory::ALL {
            assert_eq!(category.tag().parse::<HookCategory>(), Ok(category));
        }
        assert_eq!(
            "shuffle_deck".parse::<HookCategory>(),
            Err(CompileError::UnknownHookCategory("shuffle_deck".into()))
        );
    }

    #[test]
    fn test_tagged_requests() {
        let owner = JokerKey::new("fan");
        assert!(HookRequest::tagged(owner.clone(), "combine_suits", combine()).is_ok());
        assert_eq!(
            HookRequest::tagged(owner.clone(), "teleport", combine()),
            Err(CompileError::UnknownHookCategory("teleport".into()))
        );
        assert_eq!(
            HookRequest::tagged(owner, "discount_items", combine()),
            Err(CompileError::HookParamsMismatch {
                category: HookCategory::DiscountItems,
                found: HookCategory::CombineSuits,
            })
        );
    }

    #[test]
    fn test_unknown_category_fails_deserialization() {
        let json = r#"{"owner": "fan", "category": "teleport", "params": {"discount_items": {}}}"#;
        let err = serde_json::from_str::<HookRequest>(json).unwrap_err();
        assert!(err.to_string().contains("unknown hook category `teleport`"));

        let json = r#"{"owner": "fan", "category": "discount_items", "params": {"discount_items": {}}}"#;
        let request: HookRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.params, HookParams::DiscountItems(DiscountItems::default()));
    }
}
