use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Info => write!(f, "info"),
        }
    }
}

/// Where in the form a diagnostic points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// Condition or action within the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl Location {
    pub fn rule(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            ..Default::default()
        }
    }

    pub fn rule_item(rule_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            item_id: Some(item_id.into()),
            ..Default::default()
        }
    }

    pub fn block(page_id: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self {
            block_id: Some(block_id.into()),
            page_id: Some(page_id.into()),
            ..Default::default()
        }
    }

    pub fn with_block(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("page", &self.page_id),
            ("block", &self.block_id),
            ("rule", &self.rule_id),
            ("item", &self.item_id),
        ]
        .into_iter()
        .filter_map(|(label, id)| id.as_ref().map(|id| format!("{} {}", label, id)))
        .collect();

        write!(f, "{}", parts.join(", "))
    }
}

/// A diagnostic message from the linter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level
    pub level: DiagnosticLevel,

    /// The rule that generated this diagnostic
    pub rule: String,

    /// Human-readable message
    pub message: String,

    /// Form element where the issue was found
    pub location: Location,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticLevel::Error, rule, message, location)
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticLevel::Warning, rule, message, location)
    }

    pub fn info(rule: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticLevel::Info, rule, message, location)
    }

    fn new(
        level: DiagnosticLevel,
        rule: impl Into<String>,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            level,
            rule: rule.into(),
            message: message.into(),
            location,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
