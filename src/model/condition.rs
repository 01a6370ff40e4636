//! Condition kinds and their typed parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::value::ParamValue;

/// Member list of a suit selection. Groups have two members.
pub type SuitList = SmallVec<[Suit; 4]>;

/// The four vanilla suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Self::Hearts, Self::Diamonds, Self::Spades, Self::Clubs];

    /// Runtime name, as `Card:is_suit` expects it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hearts => "Hearts",
            Self::Diamonds => "Diamonds",
            Self::Spades => "Spades",
            Self::Clubs => "Clubs",
        }
    }

    /// Case-insensitive lookup by runtime name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Suit> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic suit grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitGroup {
    Red,
    Black,
}

impl SuitGroup {
    #[must_use]
    pub fn members(self) -> SuitList {
        match self {
            Self::Red => smallvec![Suit::Hearts, Suit::Diamonds],
            Self::Black => smallvec![Suit::Spades, Suit::Clubs],
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> Option<SuitGroup> {
        match tag {
            "red" => Some(Self::Red),
            "black" => Some(Self::Black),
            _ => None,
        }
    }
}

/// Which suits a condition looks for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitSelection {
    /// A suit name, or the name of a suit variable of the owning joker.
    Specific(String),
    Group(SuitGroup),
}

impl SuitSelection {
    pub fn specific(name: impl Into<String>) -> Self {
        Self::Specific(name.into())
    }
}

/// How many candidates must match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    #[default]
    AtLeastOne,
    /// Every candidate matches and there is at least one candidate.
    All,
    Exactly,
    AtLeast,
    /// At most `count` matches, and at least one.
    AtMost,
}

impl Quantifier {
    #[must_use]
    pub fn parse(tag: &str) -> Option<Quantifier> {
        match tag {
            "at_least_one" => Some(Self::AtLeastOne),
            "all" => Some(Self::All),
            "exactly" => Some(Self::Exactly),
            "at_least" => Some(Self::AtLeast),
            "at_most" => Some(Self::AtMost),
            _ => None,
        }
    }

    /// Does this quantifier compare against a count?
    #[must_use]
    pub const fn is_counting(self) -> bool {
        matches!(self, Self::Exactly | Self::AtLeast | Self::AtMost)
    }
}

/// Which subset of the played cards is inspected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardScope {
    #[default]
    Scoring,
    All,
}

/// Parameters shared by the suit condition kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuitCondition {
    pub selection: SuitSelection,
    #[serde(default)]
    pub quantifier: Quantifier,
    #[serde(default)]
    pub scope: CardScope,
    /// Used by counting quantifiers; defaults to 1.
    #[serde(default)]
    pub count: Option<ParamValue>,
}

impl SuitCondition {
    pub fn new(selection: SuitSelection) -> Self {
        Self {
            selection,
            quantifier: Quantifier::default(),
            scope: CardScope::default(),
            count: None,
        }
    }

    #[must_use]
    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: CardScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }
}

/// A condition kind with its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum ConditionKind {
    /// Suit of played, scored, held or destroyed cards.
    CardSuit(SuitCondition),
    /// Suit of the discarded cards.
    DiscardedCardSuit(SuitCondition),
}

impl ConditionKind {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::CardSuit(_) => "card_suit",
            Self::DiscardedCardSuit(_) => "discarded_card_suit",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self { kind, negate: false }
    }

    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}
