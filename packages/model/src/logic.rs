//! Conditional logic schema.
//!
//! Rules are authored in the editor and evaluated at fill time. Every
//! reference (`field`, `target`, `value`) is a block id; nothing here checks
//! that the referenced block exists.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Conditions → actions pair. All conditions are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicRule {
    pub id: String,

    #[serde(default)]
    pub conditions: Vec<LogicCondition>,

    #[serde(default)]
    pub actions: Vec<LogicAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicCondition {
    pub id: String,

    /// Block whose answer is compared
    pub field: String,

    pub operator: Operator,

    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicAction {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ActionKind,

    pub target: String,

    /// Jump destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Comparison operator. Unrecognised names are kept and never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::Unknown(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Operator::GreaterThan | Operator::LessThan)
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            _ => Operator::Unknown(name),
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Action kind. Unrecognised kinds are kept and ignored at fill time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Show,
    Hide,
    Skip,
    Jump,
    Unknown(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Show => "show",
            ActionKind::Hide => "hide",
            ActionKind::Skip => "skip",
            ActionKind::Jump => "jump",
            ActionKind::Unknown(name) => name,
        }
    }

    pub fn is_visibility(&self) -> bool {
        matches!(self, ActionKind::Show | ActionKind::Hide)
    }
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "show" => ActionKind::Show,
            "hide" => ActionKind::Hide,
            "skip" => ActionKind::Skip,
            "jump" => ActionKind::Jump,
            _ => ActionKind::Unknown(name),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl LogicRule {
    /// True when the rule has actions and all of them target `block_id`
    pub fn only_targets(&self, block_id: &str) -> bool {
        !self.actions.is_empty() && self.actions.iter().all(|a| a.target == block_id)
    }
}

impl LogicCondition {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl LogicAction {
    pub fn new(id: impl Into<String>, kind: ActionKind, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
            value: None,
        }
    }

    pub fn jump(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ActionKind::Jump,
            target: from.into(),
            value: Some(to.into()),
        }
    }
}

// The authoring UI sometimes writes numbers or booleans into `value`.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_wire_shape() {
        let rule: LogicRule = serde_json::from_value(json!({
            "id": "r1",
            "conditions": [
                { "id": "c1", "field": "q1", "operator": "greater_than", "value": 18 }
            ],
            "actions": [
                { "id": "a1", "type": "jump", "target": "q1", "value": "q5" }
            ]
        }))
        .unwrap();

        assert_eq!(rule.conditions[0].operator, Operator::GreaterThan);
        assert_eq!(rule.conditions[0].value, "18");
        assert_eq!(rule.actions[0].kind, ActionKind::Jump);
        assert_eq!(rule.actions[0].value.as_deref(), Some("q5"));

        let out = serde_json::to_value(&rule).unwrap();
        assert_eq!(out["actions"][0]["type"], "jump");
        assert_eq!(out["conditions"][0]["value"], "18");
    }

    #[test]
    fn test_unknown_operator_and_action_survive_round_trip() {
        let rule: LogicRule = serde_json::from_value(json!({
            "id": "r1",
            "conditions": [{ "id": "c1", "field": "q1", "operator": "is_empty" }],
            "actions": [{ "id": "a1", "type": "require", "target": "q2" }]
        }))
        .unwrap();

        assert_eq!(rule.conditions[0].operator, Operator::Unknown("is_empty".into()));
        assert_eq!(rule.conditions[0].value, "");
        assert_eq!(rule.actions[0].kind, ActionKind::Unknown("require".into()));

        let out = serde_json::to_value(&rule).unwrap();
        assert_eq!(out["conditions"][0]["operator"], "is_empty");
        assert_eq!(out["actions"][0]["type"], "require");
    }

    #[test]
    fn test_only_targets() {
        let mut rule = LogicRule {
            id: "r1".into(),
            conditions: vec![],
            actions: vec![],
        };
        assert!(!rule.only_targets("q2"));

        rule.actions.push(LogicAction::new("a1", ActionKind::Show, "q2"));
        assert!(rule.only_targets("q2"));

        rule.actions.push(LogicAction::new("a2", ActionKind::Hide, "q3"));
        assert!(!rule.only_targets("q2"));
    }
}
