//! Activation points and their trigger classes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CompileError;

/// When a rule fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    // === Scoring ===
    #[default]
    HandPlayed,
    CardScored,

    // === Single card, outside scoring ===
    CardHeldInHand,
    CardHeldInHandEndOfRound,
    CardDiscarded,
    CardDestroyed,

    // === Round flow ===
    HandDiscarded,
    BlindSelected,
    RoundEnd,

    // === No activation point ===
    Passive,
}

impl Trigger {
    pub const ALL: [Trigger; 10] = [
        Self::HandPlayed,
        Self::CardScored,
        Self::CardHeldInHand,
        Self::CardHeldInHandEndOfRound,
        Self::CardDiscarded,
        Self::CardDestroyed,
        Self::HandDiscarded,
        Self::BlindSelected,
        Self::RoundEnd,
        Self::Passive,
    ];

    /// Authoring tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::HandPlayed => "hand_played",
            Self::CardScored => "card_scored",
            Self::CardHeldInHand => "card_held_in_hand",
            Self::CardHeldInHandEndOfRound => "card_held_in_hand_end_of_round",
            Self::CardDiscarded => "card_discarded",
            Self::CardDestroyed => "card_destroyed",
            Self::HandDiscarded => "hand_discarded",
            Self::BlindSelected => "blind_selected",
            Self::RoundEnd => "round_end",
            Self::Passive => "passive",
        }
    }

    #[must_use]
    pub const fn class(self) -> TriggerClass {
        match self {
            Self::HandPlayed | Self::CardScored => TriggerClass::Scoring,
            Self::Passive => TriggerClass::Passive,
            _ => TriggerClass::Immediate,
        }
    }

    /// The single card the runtime hands to this trigger, if any.
    #[must_use]
    pub const fn single_card_source(self) -> Option<CardSource> {
        match self {
            Self::CardScored
            | Self::CardHeldInHand
            | Self::CardHeldInHandEndOfRound
            | Self::CardDiscarded => Some(CardSource::OtherCard),
            Self::CardDestroyed => Some(CardSource::Removed),
            _ => None,
        }
    }

    /// A multi-card trigger whose cards are never scored, so scope has no
    /// scoring subset to pick. `card_discarded` sees a single card instead.
    #[must_use]
    pub const fn is_discard(self) -> bool {
        matches!(self, Self::HandDiscarded)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Trigger {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| CompileError::UnknownTrigger(s.to_string()))
    }
}

/// Which statement shape an effect takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerClass {
    /// Inside hand scoring; mutations are deferred to the return table.
    Scoring,
    /// Outside scoring; mutations run in the callback body.
    Immediate,
    /// No trigger; apply on acquire, revert on loss.
    Passive,
}

impl fmt::Display for TriggerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scoring => "scoring",
            Self::Immediate => "immediate",
            Self::Passive => "passive",
        })
    }
}

/// Where a single-card trigger finds its card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardSource {
    /// `context.other_card`
    OtherCard,
    /// Every card of `context.removed`.
    Removed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_tags() {
        for trigger in Trigger::ALL {
            assert_eq!(trigger.tag().parse::<Trigger>(), Ok(trigger));
        }
        assert_eq!(
            "when_the_moon_rises".parse::<Trigger>(),
            Err(CompileError::UnknownTrigger("when_the_moon_rises".into()))
        );
    }

    #[test]
    fn test_classes() {
        assert_eq!(Trigger::HandPlayed.class(), TriggerClass::Scoring);
        assert_eq!(Trigger::CardScored.class(), TriggerClass::Scoring);
        assert_eq!(Trigger::BlindSelected.class(), TriggerClass::Immediate);
        assert_eq!(Trigger::CardDiscarded.class(), TriggerClass::Immediate);
        assert_eq!(Trigger::Passive.class(), TriggerClass::Passive);
    }

    #[test]
    fn test_single_card_sources() {
        assert_eq!(Trigger::CardScored.single_card_source(), Some(CardSource::OtherCard));
        assert_eq!(Trigger::CardDestroyed.single_card_source(), Some(CardSource::Removed));
        assert_eq!(Trigger::HandPlayed.single_card_source(), None);
        assert_eq!(Trigger::HandDiscarded.single_card_source(), None);
    }

    #[test]
    fn test_discard_triggers() {
        assert!(Trigger::HandDiscarded.is_discard());
        assert!(!Trigger::HandPlayed.is_discard());
        assert_eq!(Trigger::CardDiscarded.single_card_source(), Some(CardSource::OtherCard));
        assert!(!Trigger::CardDiscarded.is_discard());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Trigger::CardHeldInHandEndOfRound).unwrap();
        assert_eq!(json, "\"card_held_in_hand_end_of_round\"");
        assert_eq!(Trigger::default(), Trigger::HandPlayed);
    }
}
