//! Rules, condition groups and the owning joker.

use serde::{Deserialize, Serialize};

use crate::core::{JokerId, JokerKey, RuleId};

use super::condition::Condition;
use super::effect::Effect;
use super::trigger::Trigger;

/// How the conditions of one group combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new(operator: GroupOperator) -> Self {
        Self {
            operator,
            conditions: Vec::new(),
        }
    }

    /// Group holding a single condition.
    pub fn single(condition: Condition) -> Self {
        Self::new(GroupOperator::And).with(condition)
    }

    #[must_use]
    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// One authored behavior unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub groups: Vec<ConditionGroup>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Rule {
    pub fn new(id: impl Into<RuleId>, trigger: Trigger) -> Self {
        Self {
            id: id.into(),
            trigger,
            groups: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: ConditionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Add a single-condition group.
    #[must_use]
    pub fn with_condition(self, condition: Condition) -> Self {
        self.with_group(ConditionGroup::single(condition))
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Type of a user-declared joker variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Number,
    /// Stored as a card in `G.GAME.current_round.<name>_card`.
    Suit,
    Rank,
    PokerHand,
}

/// A variable the author declared on the joker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserVariable {
    pub name: String,
    #[serde(default)]
    pub kind: VariableKind,
    #[serde(default)]
    pub initial: f64,
}

impl UserVariable {
    pub fn number(name: impl Into<String>, initial: f64) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Number,
            initial,
        }
    }

    pub fn suit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Suit,
            initial: 0.0,
        }
    }
}

/// The owner of rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joker {
    pub id: JokerId,
    pub key: JokerKey,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub variables: Vec<UserVariable>,
}

impl Joker {
    pub fn new(id: impl Into<JokerId>, key: impl Into<JokerKey>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: String::new(),
            rules: Vec::new(),
            variables: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_variable(mut self, variable: UserVariable) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&UserVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Is `name` a suit variable of this joker?
    #[must_use]
    pub fn has_suit_variable(&self, name: &str) -> bool {
        self.variable(name).is_some_and(|v| v.kind == VariableKind::Suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::condition::{ConditionKind, SuitCondition, SuitSelection};

    fn hearts() -> Condition {
        Condition::new(ConditionKind::CardSuit(SuitCondition::new(SuitSelection::specific(
            "Hearts",
        ))))
    }

    #[test]
    fn test_with_condition_adds_single_groups() {
        let rule = Rule::new("r1", Trigger::HandPlayed);
        assert!(rule.groups.is_empty());

        let rule = rule.with_condition(hearts()).with_condition(hearts().negated());
        assert_eq!(rule.groups.len(), 2);
        assert_eq!(rule.groups[0].conditions, vec![hearts()]);
        assert_eq!(rule.groups[1].conditions, vec![hearts().negated()]);
    }

    #[test]
    fn test_suit_variable_lookup() {
        let joker = Joker::new("j1", "fan")
            .with_variable(UserVariable::number("chips", 10.0))
            .with_variable(UserVariable::suit("lucky_suit"));
        assert!(joker.has_suit_variable("lucky_suit"));
        assert!(!joker.has_suit_variable("chips"));
        assert!(!joker.has_suit_variable("Hearts"));
    }

    #[test]
    fn test_rule_defaults_from_json() {
        let rule: Rule = serde_json::from_str(r#"{"id": "r1"}"#).unwrap();
        assert_eq!(rule.trigger, Trigger::HandPlayed);
        assert!(rule.groups.is_empty());
    }
}
