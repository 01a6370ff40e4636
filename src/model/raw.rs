//! The authoring boundary.
//!
//! The editor stores conditions and effects as a kind tag plus a loosely
//! typed parameter bag. These raw shapes deserialize that JSON as-is and
//! are validated exactly once into the closed variants of the typed model.
//!
//! ## Recoveries
//!
//! Missing parameters take documented defaults. A few unknown tags also
//! recover (quantifier, card scope, blind operation, group operator,
//! discount method) and log a warning. Anything else that cannot be
//! interpreted aborts the rule with [`CompileError::InvalidParameter`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::core::{CompileError, EffectId, JokerId, JokerKey, Result, RuleFailure, RuleId};

use super::condition::{
    CardScope, Condition, ConditionKind, Quantifier, Suit, SuitCondition, SuitGroup, SuitSelection,
};
use super::effect::{
    BlindOperation, CombineSuits, ConsumableSet, ConsumableTarget, CreateJoker, DestroyConsumable,
    DiscountItems, DiscountMethod, DiscountTarget, Duration, EditHand, Effect, EffectKind,
    FreeRerolls, HandOperation, JokerSelection, ModifyBlind, Rarity,
};
use super::rule::{ConditionGroup, GroupOperator, Joker, Rule, UserVariable, VariableKind};
use super::trigger::Trigger;
use super::value::ParamValue;

/// Placeholder the editor uses for "no choice made".
const NONE_TAG: &str = "none";
/// Placeholder the editor uses for "pick at random".
const RANDOM_TAG: &str = "random";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJoker {
    pub id: String,
    pub object_key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RawRule>,
    #[serde(default)]
    pub user_variables: Vec<RawUserVariable>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    pub id: String,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub condition_groups: Vec<RawConditionGroup>,
    #[serde(default)]
    pub effects: Vec<RawEffect>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConditionGroup {
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub conditions: Vec<RawCondition>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCondition {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEffect {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub custom_message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserVariable {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub initial_value: Option<f64>,
}

impl RawJoker {
    /// Validate every rule. Rules that fail are left out of the joker and
    /// reported instead.
    pub fn validate(&self) -> (Joker, Vec<RuleFailure>) {
        let joker_id = JokerId::new(self.id.clone());
        let mut joker = Joker::new(joker_id.clone(), JokerKey::new(self.object_key.clone()))
            .with_name(self.name.clone());
        joker.variables = self.user_variables.iter().map(RawUserVariable::validate).collect();

        let mut failures = Vec::new();
        for raw in &self.rules {
            match raw.validate() {
                Ok(rule) => joker.rules.push(rule),
                Err((effect, error)) => {
                    let mut failure =
                        RuleFailure::new(joker_id.clone(), RuleId::new(raw.id.clone()), error);
                    if let Some(effect) = effect {
                        failure = failure.in_effect(effect);
                    }
                    failures.push(failure);
                }
            }
        }
        (joker, failures)
    }
}

impl RawUserVariable {
    pub fn validate(&self) -> UserVariable {
        let kind = match self.kind.as_deref().unwrap_or("number") {
            "number" => VariableKind::Number,
            "suit" => VariableKind::Suit,
            "rank" => VariableKind::Rank,
            "pokerhand" | "poker_hand" => VariableKind::PokerHand,
            other => {
                warn!(variable = %self.name, kind = other, "unknown variable type, using number");
                VariableKind::Number
            }
        };
        UserVariable {
            name: self.name.clone(),
            kind,
            initial: self.initial_value.unwrap_or(0.0),
        }
    }
}

impl RawRule {
    /// Validate into a typed rule. On failure, also names the offending
    /// effect when there is one.
    pub fn validate(&self) -> std::result::Result<Rule, (Option<EffectId>, CompileError)> {
        let trigger = match self.trigger.as_deref() {
            None | Some("") => Trigger::default(),
            Some(tag) => tag.parse().map_err(|e| (None, e))?,
        };
        let mut rule = Rule::new(RuleId::new(self.id.clone()), trigger);
        for group in &self.condition_groups {
            rule.groups.push(group.validate().map_err(|e| (None, e))?);
        }
        for effect in &self.effects {
            let typed = effect
                .validate()
                .map_err(|e| (Some(EffectId::new(effect.id.clone())), e))?;
            rule.effects.push(typed);
        }
        Ok(rule)
    }
}

impl RawConditionGroup {
    pub fn validate(&self) -> Result<ConditionGroup> {
        let operator = match self.operator.as_deref() {
            None | Some("and") => GroupOperator::And,
            Some("or") => GroupOperator::Or,
            Some(other) => {
                warn!(operator = other, "unknown group operator, using and");
                GroupOperator::And
            }
        };
        let conditions = self
            .conditions
            .iter()
            .map(RawCondition::validate)
            .collect::<Result<Vec<_>>>()?;
        Ok(ConditionGroup { operator, conditions })
    }
}

impl RawCondition {
    pub fn validate(&self) -> Result<Condition> {
        let params = Params(&self.params);
        let kind = match self.kind.as_str() {
            "card_suit" => ConditionKind::CardSuit(suit_condition(&params, true)?),
            "discarded_card_suit" => ConditionKind::DiscardedCardSuit(suit_condition(&params, false)?),
            other => return Err(CompileError::UnknownConditionKind(other.to_string())),
        };
        Ok(Condition {
            kind,
            negate: self.negate,
        })
    }
}

fn suit_condition(params: &Params<'_>, scoped: bool) -> Result<SuitCondition> {
    let selection = match params.text("suit_type").unwrap_or("specific") {
        "specific" => match params.text("specific_suit") {
            Some(name) => SuitSelection::specific(name),
            None => return Err(CompileError::invalid("specific_suit", "missing")),
        },
        "group" => {
            let tag = params.text("suit_group").unwrap_or_default();
            let group = SuitGroup::parse(tag)
                .ok_or_else(|| CompileError::invalid("suit_group", format!("unknown group `{}`", tag)))?;
            SuitSelection::Group(group)
        }
        other => {
            return Err(CompileError::invalid(
                "suit_type",
                format!("unknown selection `{}`", other),
            ))
        }
    };

    let quantifier = params.lenient("quantifier", Quantifier::parse, Quantifier::default());
    // Anything but "scoring" inspects the full hand.
    let scope = match params.text("card_scope") {
        Some("scoring") | None => CardScope::Scoring,
        Some(_) if !scoped => CardScope::Scoring,
        Some(_) => CardScope::All,
    };
    Ok(SuitCondition {
        selection,
        quantifier,
        scope,
        count: params.value("count"),
    })
}

impl RawEffect {
    pub fn validate(&self) -> Result<Effect> {
        let params = Params(&self.params);
        let kind = match self.kind.as_str() {
            "create_joker" => EffectKind::CreateJoker(create_joker(&params)),
            "destroy_consumable" => EffectKind::DestroyConsumable(destroy_consumable(&params)?),
            "edit_hand" => EffectKind::EditHand(edit_hand(&params)?),
            "modify_blind_requirement" => EffectKind::ModifyBlindRequirement(ModifyBlind {
                operation: params.lenient("operation", blind_operation, BlindOperation::default()),
                value: params.value("value").unwrap_or(ParamValue::Number(1.0)),
            }),
            "discount_items" => EffectKind::DiscountItems(discount_items(&params)?),
            "free_rerolls" => EffectKind::FreeRerolls(FreeRerolls {
                amount: params.amount("reroll_amount"),
            }),
            "combine_suits" => EffectKind::CombineSuits(combine_suits(&params)?),
            other => return Err(CompileError::UnknownEffectKind(other.to_string())),
        };
        Ok(Effect {
            id: EffectId::new(self.id.clone()),
            kind,
            custom_message: self.custom_message.clone().filter(|m| !m.is_empty()),
        })
    }
}

fn create_joker(params: &Params<'_>) -> CreateJoker {
    let selection = match (params.text("joker_type"), params.text("joker_key")) {
        (Some("specific"), Some(key)) => JokerSelection::Specific(key.to_string()),
        _ => match params.text("rarity") {
            None | Some(RANDOM_TAG) => JokerSelection::Random,
            Some(rarity) => JokerSelection::OfRarity(Rarity::from_tag(rarity)),
        },
    };
    CreateJoker {
        selection,
        edition: params.choice("edition"),
        sticker: params.choice("sticker"),
        ignore_slots: params.text("ignore_slots") == Some("ignore"),
    }
}

fn destroy_consumable(params: &Params<'_>) -> Result<DestroyConsumable> {
    let target = match params.text("consumable_type") {
        None | Some(RANDOM_TAG) => ConsumableTarget::Any,
        Some(tag) => {
            let set = ConsumableSet::parse(tag).ok_or_else(|| {
                CompileError::invalid("consumable_type", format!("unknown set `{}`", tag))
            })?;
            let card = match params.text("specific_card") {
                None | Some(RANDOM_TAG) => None,
                Some(card) => Some(card.to_string()),
            };
            ConsumableTarget::OfSet { set, card }
        }
    };
    Ok(DestroyConsumable { target })
}

fn edit_hand(params: &Params<'_>) -> Result<EditHand> {
    let operation = match params.text("operation") {
        None | Some("add") => HandOperation::Add,
        Some("subtract") => HandOperation::Subtract,
        Some("set") => HandOperation::Set,
        Some(other) => {
            return Err(CompileError::invalid("operation", format!("unknown operation `{}`", other)))
        }
    };
    let duration = match params.text("duration") {
        None | Some("permanent") => Duration::Permanent,
        Some("round") => Duration::Round,
        Some(other) => {
            return Err(CompileError::invalid("duration", format!("unknown duration `{}`", other)))
        }
    };
    Ok(EditHand {
        operation,
        duration,
        value: params.value("value").unwrap_or(ParamValue::Number(1.0)),
    })
}

fn blind_operation(tag: &str) -> Option<BlindOperation> {
    match tag {
        "add" => Some(BlindOperation::Add),
        "subtract" => Some(BlindOperation::Subtract),
        "multiply" => Some(BlindOperation::Multiply),
        "divide" => Some(BlindOperation::Divide),
        "set" => Some(BlindOperation::Set),
        _ => None,
    }
}

fn discount_items(params: &Params<'_>) -> Result<DiscountItems> {
    let target = match params.text("discount_type") {
        None => DiscountTarget::default(),
        Some(tag) => DiscountTarget::parse(tag).ok_or_else(|| {
            CompileError::invalid("discount_type", format!("unknown item type `{}`", tag))
        })?,
    };
    let method = params.lenient("discount_method", DiscountMethod::parse, DiscountMethod::default());
    Ok(DiscountItems {
        target,
        method,
        amount: params.amount("discount_amount"),
    })
}

fn combine_suits(params: &Params<'_>) -> Result<CombineSuits> {
    let suit = |name: &str| -> Result<Suit> {
        let tag = params.text(name).unwrap_or_default();
        Suit::parse(tag).ok_or_else(|| CompileError::invalid(name, format!("unknown suit `{}`", tag)))
    };
    let (first, second) = (suit("first_suit")?, suit("second_suit")?);
    if first == second {
        return Err(CompileError::invalid("second_suit", "must differ from first_suit"));
    }
    Ok(CombineSuits { first, second })
}

/// Read access to a parameter bag.
struct Params<'a>(&'a Map<String, Value>);

impl<'a> Params<'a> {
    /// A non-empty string parameter.
    fn text(&self, name: &str) -> Option<&'a str> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// A string parameter where the editor's `"none"` means unset.
    fn choice(&self, name: &str) -> Option<String> {
        self.text(name).filter(|s| *s != NONE_TAG).map(str::to_string)
    }

    /// A quantity, left for the resolver to classify.
    fn value(&self, name: &str) -> Option<ParamValue> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(ParamValue::Number),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(ParamValue::Text(s.clone())),
            // Kept verbatim; the resolver falls back to zero for it.
            other => Some(ParamValue::Text(other.to_string())),
        }
    }

    /// A plain amount. Missing or zero amounts mean 1.
    fn amount(&self, name: &str) -> f64 {
        match self.value(name).and_then(|v| v.as_number()) {
            Some(n) if n != 0.0 => n,
            Some(_) | None => 1.0,
        }
    }

    /// A tag that falls back to `default` when unknown.
    fn lenient<T>(&self, name: &str, parse: impl Fn(&str) -> Option<T>, default: T) -> T {
        match self.text(name) {
            None => default,
            Some(tag) => parse(tag).unwrap_or_else(|| {
                warn!(param = name, value = tag, "unknown value, using default");
                default
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn effect(kind: &str, params: Value) -> RawEffect {
        RawEffect {
            id: "e1".into(),
            kind: kind.into(),
            params: params.as_object().cloned().unwrap_or_default(),
            custom_message: None,
        }
    }

    fn condition(params: Value) -> RawCondition {
        RawCondition {
            id: "c1".into(),
            kind: "card_suit".into(),
            negate: false,
            params: params.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_suit_condition_defaults() {
        let cond = condition(json!({"specific_suit": "Hearts"})).validate().unwrap();
        let ConditionKind::CardSuit(suit) = cond.kind else {
            panic!("expected card_suit");
        };
        assert_eq!(suit.selection, SuitSelection::specific("Hearts"));
        assert_eq!(suit.quantifier, Quantifier::AtLeastOne);
        assert_eq!(suit.scope, CardScope::Scoring);
        assert_eq!(suit.count, None);
    }

    #[test]
    fn test_unknown_quantifier_recovers() {
        let cond = condition(json!({
            "suit_type": "group",
            "suit_group": "black",
            "quantifier": "most_of_them",
            "card_scope": "all_played",
        }))
        .validate()
        .unwrap();
        let ConditionKind::CardSuit(suit) = cond.kind else {
            panic!("expected card_suit");
        };
        assert_eq!(suit.quantifier, Quantifier::AtLeastOne);
        assert_eq!(suit.scope, CardScope::All);
        assert_eq!(suit.selection, SuitSelection::Group(SuitGroup::Black));
    }

    #[test]
    fn test_unknown_group_is_invalid() {
        let err = condition(json!({"suit_type": "group", "suit_group": "green"}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidParameter { ref name, .. } if name == "suit_group"));
    }

    #[test]
    fn test_unknown_kinds() {
        let mut cond = condition(json!({}));
        cond.kind = "moon_phase".into();
        assert_eq!(cond.validate(), Err(CompileError::UnknownConditionKind("moon_phase".into())));

        let err = effect("teleport", json!({})).validate().unwrap_err();
        assert_eq!(err, CompileError::UnknownEffectKind("teleport".into()));
    }

    #[test]
    fn test_create_joker_params() {
        let fx = effect(
            "create_joker",
            json!({"rarity": "rare", "edition": "e_negative", "sticker": "none"}),
        )
        .validate()
        .unwrap();
        let EffectKind::CreateJoker(params) = fx.kind else {
            panic!("expected create_joker");
        };
        assert_eq!(params.selection, JokerSelection::OfRarity(Rarity::Rare));
        assert_eq!(params.edition.as_deref(), Some("e_negative"));
        assert_eq!(params.sticker, None);
        assert!(!params.ignore_slots);

        let fx = effect(
            "create_joker",
            json!({"joker_type": "specific", "joker_key": "j_joker", "ignore_slots": "ignore"}),
        )
        .validate()
        .unwrap();
        let EffectKind::CreateJoker(params) = fx.kind else {
            panic!("expected create_joker");
        };
        assert_eq!(params.selection, JokerSelection::Specific("j_joker".into()));
        assert!(params.ignore_slots);
    }

    #[test]
    fn test_discount_defaults() {
        let fx = effect("discount_items", json!({"discount_amount": 0})).validate().unwrap();
        assert_eq!(fx.kind, EffectKind::DiscountItems(DiscountItems::default()));

        let fx = effect("discount_items", json!({"discount_method": "bribe", "discount_amount": 3}))
            .validate()
            .unwrap();
        let EffectKind::DiscountItems(params) = fx.kind else {
            panic!("expected discount_items");
        };
        assert_eq!(params.method, DiscountMethod::MakeFree);
        assert_eq!(params.amount, 3.0);

        let err = effect("discount_items", json!({"discount_type": "gift_cards"}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidParameter { ref name, .. } if name == "discount_type"));
    }

    #[test]
    fn test_blind_operation_recovers_to_multiply() {
        let fx = effect("modify_blind_requirement", json!({"operation": "exponent", "value": 2}))
            .validate()
            .unwrap();
        assert_eq!(
            fx.kind,
            EffectKind::ModifyBlindRequirement(ModifyBlind::new(BlindOperation::Multiply, 2))
        );
    }

    #[test]
    fn test_edit_hand_values() {
        let fx = effect("edit_hand", json!({"operation": "subtract", "duration": "round", "value": "RANGE:1|3"}))
            .validate()
            .unwrap();
        assert_eq!(
            fx.kind,
            EffectKind::EditHand(
                EditHand::new(HandOperation::Subtract, "RANGE:1|3").with_duration(Duration::Round)
            )
        );

        let err = effect("edit_hand", json!({"duration": "forever"})).validate().unwrap_err();
        assert!(matches!(err, CompileError::InvalidParameter { .. }));
    }

    #[test]
    fn test_combine_suits_requires_distinct_suits() {
        let fx = effect("combine_suits", json!({"first_suit": "Hearts", "second_suit": "spades"}))
            .validate()
            .unwrap();
        assert_eq!(
            fx.kind,
            EffectKind::CombineSuits(CombineSuits {
                first: Suit::Hearts,
                second: Suit::Spades
            })
        );
        assert!(effect("combine_suits", json!({"first_suit": "Hearts", "second_suit": "Hearts"}))
            .validate()
            .is_err());
    }

    #[test]
    fn test_joker_validation_isolates_rules() {
        let raw: RawJoker = serde_json::from_value(json!({
            "id": "joker-1",
            "objectKey": "fan",
            "userVariables": [{"name": "lucky", "type": "suit"}],
            "rules": [
                {"id": "ok", "effects": [{"id": "e1", "type": "free_rerolls", "params": {}}]},
                {"id": "bad-trigger", "trigger": "never"},
                {"id": "bad-effect", "effects": [{"id": "e9", "type": "teleport"}]},
            ]
        }))
        .unwrap();

        let (joker, failures) = raw.validate();
        assert_eq!(joker.rules.len(), 1);
        assert_eq!(joker.rules[0].trigger, Trigger::HandPlayed);
        assert!(joker.has_suit_variable("lucky"));

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].rule, RuleId::new("bad-trigger"));
        assert_eq!(failures[0].effect, None);
        assert_eq!(failures[1].effect, Some(EffectId::new("e9")));
    }
}
