//! Effect kinds and their typed parameters.
//!
//! ## Design Philosophy
//!
//! Every effect kind is a closed variant carrying exactly the parameters it
//! needs, already defaulted. Loosely typed parameter bags stop at the raw
//! boundary (`model::raw`), so the effect compiler never coerces values.

use serde::{Deserialize, Serialize};

use crate::core::EffectId;

use super::condition::Suit;
use super::value::ParamValue;

/// An effect of a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    /// Replaces the default status text.
    #[serde(default)]
    pub custom_message: Option<String>,
}

impl Effect {
    pub fn new(id: impl Into<EffectId>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            custom_message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum EffectKind {
    // === Triggered ===
    CreateJoker(CreateJoker),
    DestroyConsumable(DestroyConsumable),
    EditHand(EditHand),
    ModifyBlindRequirement(ModifyBlind),

    // === Passive ===
    DiscountItems(DiscountItems),
    FreeRerolls(FreeRerolls),
    CombineSuits(CombineSuits),
}

impl EffectKind {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::CreateJoker(_) => "create_joker",
            Self::DestroyConsumable(_) => "destroy_consumable",
            Self::EditHand(_) => "edit_hand",
            Self::ModifyBlindRequirement(_) => "modify_blind_requirement",
            Self::DiscountItems(_) => "discount_items",
            Self::FreeRerolls(_) => "free_rerolls",
            Self::CombineSuits(_) => "combine_suits",
        }
    }
}

// ---------------------------------------------------------------------------
// create_joker
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    /// A rarity registered by the mod itself.
    Custom(String),
}

impl Rarity {
    /// Vanilla rarity by tag, anything else is a mod rarity.
    pub fn from_tag(tag: &str) -> Rarity {
        match tag.to_ascii_lowercase().as_str() {
            "common" => Self::Common,
            "uncommon" => Self::Uncommon,
            "rare" => Self::Rare,
            "legendary" => Self::Legendary,
            _ => Self::Custom(tag.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JokerSelection {
    #[default]
    Random,
    OfRarity(Rarity),
    /// Center key such as `j_joker`.
    Specific(String),
}

/// Edition applied to the created joker, e.g. `e_negative`.
pub const NEGATIVE_EDITION: &str = "e_negative";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJoker {
    #[serde(default)]
    pub selection: JokerSelection,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub sticker: Option<String>,
    /// Create even when the joker area is full.
    #[serde(default)]
    pub ignore_slots: bool,
}

impl CreateJoker {
    /// Negative jokers bring their own slot.
    #[must_use]
    pub fn skips_slot_check(&self) -> bool {
        self.ignore_slots || self.edition.as_deref() == Some(NEGATIVE_EDITION)
    }
}

// ---------------------------------------------------------------------------
// destroy_consumable
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableSet {
    Tarot,
    Planet,
    Spectral,
}

impl ConsumableSet {
    /// `card.ability.set` value.
    #[must_use]
    pub const fn set_name(self) -> &'static str {
        match self {
            Self::Tarot => "Tarot",
            Self::Planet => "Planet",
            Self::Spectral => "Spectral",
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> Option<ConsumableSet> {
        match tag {
            "tarot" => Some(Self::Tarot),
            "planet" => Some(Self::Planet),
            "spectral" => Some(Self::Spectral),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableTarget {
    /// Any held consumable.
    #[default]
    Any,
    /// A consumable of one set, optionally a specific card by name
    /// (`the_fool`, `pluto`, ...).
    OfSet {
        set: ConsumableSet,
        card: Option<String>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyConsumable {
    #[serde(default)]
    pub target: ConsumableTarget,
}

// ---------------------------------------------------------------------------
// edit_hand
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOperation {
    #[default]
    Add,
    Subtract,
    Set,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    /// Changes the per-round allowance.
    #[default]
    Permanent,
    /// Changes only the hands left this round.
    Round,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditHand {
    #[serde(default)]
    pub operation: HandOperation,
    #[serde(default)]
    pub duration: Duration,
    pub value: ParamValue,
}

impl EditHand {
    pub fn new(operation: HandOperation, value: impl Into<ParamValue>) -> Self {
        Self {
            operation,
            duration: Duration::default(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

// ---------------------------------------------------------------------------
// modify_blind_requirement
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlindOperation {
    Add,
    Subtract,
    #[default]
    Multiply,
    Divide,
    Set,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifyBlind {
    #[serde(default)]
    pub operation: BlindOperation,
    pub value: ParamValue,
}

impl ModifyBlind {
    pub fn new(operation: BlindOperation, value: impl Into<ParamValue>) -> Self {
        Self {
            operation,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// discount_items
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTarget {
    #[default]
    Planet,
    Tarot,
    Spectral,
    Standard,
    Jokers,
    Vouchers,
    AllConsumables,
    AllCards,
    AllShopItems,
}

impl DiscountTarget {
    pub const ALL: [DiscountTarget; 9] = [
        Self::Planet,
        Self::Tarot,
        Self::Spectral,
        Self::Standard,
        Self::Jokers,
        Self::Vouchers,
        Self::AllConsumables,
        Self::AllCards,
        Self::AllShopItems,
    ];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Tarot => "tarot",
            Self::Spectral => "spectral",
            Self::Standard => "standard",
            Self::Jokers => "jokers",
            Self::Vouchers => "vouchers",
            Self::AllConsumables => "all_consumables",
            Self::AllCards => "all_cards",
            Self::AllShopItems => "all_shop_items",
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> Option<DiscountTarget> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    /// Cost becomes 0.
    #[default]
    MakeFree,
    /// Cost minus `amount`, floored at 0.
    FlatReduction,
    /// Cost reduced by `amount` percent, rounded down, floored at 0.
    PercentageReduction,
}

impl DiscountMethod {
    #[must_use]
    pub fn parse(tag: &str) -> Option<DiscountMethod> {
        match tag {
            "make_free" => Some(Self::MakeFree),
            "flat_reduction" => Some(Self::FlatReduction),
            "percentage_reduction" => Some(Self::PercentageReduction),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscountItems {
    #[serde(default)]
    pub target: DiscountTarget,
    #[serde(default)]
    pub method: DiscountMethod,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

impl Default for DiscountItems {
    fn default() -> Self {
        Self {
            target: DiscountTarget::default(),
            method: DiscountMethod::default(),
            amount: default_amount(),
        }
    }
}

impl DiscountItems {
    pub fn new(target: DiscountTarget, method: DiscountMethod, amount: f64) -> Self {
        Self { target, method, amount }
    }
}

fn default_amount() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// free_rerolls / combine_suits
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreeRerolls {
    #[serde(default = "default_amount")]
    pub amount: f64,
}

impl Default for FreeRerolls {
    fn default() -> Self {
        Self { amount: default_amount() }
    }
}

/// Cards of either suit count as the other while the owner is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineSuits {
    pub first: Suit,
    pub second: Suit,
}
