use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Palette block kinds. A type this crate does not know is kept verbatim so
/// that loading and saving a form never rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    ShortText,
    LongText,
    Email,
    Number,
    Phone,
    Url,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    Date,
    Rating,
    Scale,
    YesNo,
    FileUpload,
    Statement,
    Unknown(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::ShortText => "short_text",
            BlockType::LongText => "long_text",
            BlockType::Email => "email",
            BlockType::Number => "number",
            BlockType::Phone => "phone",
            BlockType::Url => "url",
            BlockType::MultipleChoice => "multiple_choice",
            BlockType::Checkboxes => "checkboxes",
            BlockType::Dropdown => "dropdown",
            BlockType::Date => "date",
            BlockType::Rating => "rating",
            BlockType::Scale => "scale",
            BlockType::YesNo => "yes_no",
            BlockType::FileUpload => "file_upload",
            BlockType::Statement => "statement",
            BlockType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlockType::Unknown(_))
    }

    /// Placeholder question shown when a block is dropped from the palette
    pub fn default_question(&self) -> &'static str {
        match self {
            BlockType::ShortText => "Short answer",
            BlockType::LongText => "Long answer",
            BlockType::Email => "Email address",
            BlockType::Number => "Number",
            BlockType::Phone => "Phone number",
            BlockType::Url => "Website",
            BlockType::MultipleChoice => "Multiple choice",
            BlockType::Checkboxes => "Checkboxes",
            BlockType::Dropdown => "Dropdown",
            BlockType::Date => "Date",
            BlockType::Rating => "Rating",
            BlockType::Scale => "Opinion scale",
            BlockType::YesNo => "Yes or no",
            BlockType::FileUpload => "File upload",
            BlockType::Statement => "Statement",
            BlockType::Unknown(_) => "Untitled",
        }
    }

    /// Whether the block collects its answer from a list of options
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            BlockType::MultipleChoice | BlockType::Checkboxes | BlockType::Dropdown
        )
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "short_text" => BlockType::ShortText,
            "long_text" => BlockType::LongText,
            "email" => BlockType::Email,
            "number" => BlockType::Number,
            "phone" => BlockType::Phone,
            "url" => BlockType::Url,
            "multiple_choice" => BlockType::MultipleChoice,
            "checkboxes" => BlockType::Checkboxes,
            "dropdown" => BlockType::Dropdown,
            "date" => BlockType::Date,
            "rating" => BlockType::Rating,
            "scale" => BlockType::Scale,
            "yes_no" => BlockType::YesNo,
            "file_upload" => BlockType::FileUpload,
            "statement" => BlockType::Statement,
            _ => BlockType::Unknown(name),
        }
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation attached to a block (min length, pattern, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A single question or content unit within a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Externally-addressable field identifier, unique within the form
    #[serde(default)]
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationRule>>,

    /// Type-specific fields (rating scale, placeholder, ...) carried opaquely
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Create a block the way the palette does: default question, options for
    /// choice blocks, no key yet.
    pub fn from_template(block_type: BlockType, id: impl Into<String>) -> Self {
        let options = block_type
            .has_options()
            .then(|| vec!["Option 1".to_string(), "Option 2".to_string()]);

        let question = block_type.default_question().to_string();

        Self {
            id: id.into(),
            block_type,
            question,
            description: String::new(),
            required: false,
            key: String::new(),
            options,
            validation: None,
            extra: Map::new(),
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Shallow-merge a patch into this block. `id` is never touched.
    pub fn merge(&mut self, patch: &BlockPatch) {
        if let Some(block_type) = &patch.block_type {
            self.block_type = block_type.clone();
        }
        if let Some(question) = &patch.question {
            self.question = question.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(key) = &patch.key {
            self.key = key.clone();
        }
        if let Some(options) = &patch.options {
            self.options = Some(options.clone());
        }
        if let Some(validation) = &patch.validation {
            self.validation = Some(validation.clone());
        }
        for (name, value) in &patch.extra {
            if name == "id" {
                continue;
            }
            if value.is_null() {
                self.extra.remove(name);
            } else {
                self.extra.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Partial block fields for `updateBlock`. Absent fields are left alone;
/// a `null` type-specific field removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationRule>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockPatch {
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Default::default()
        }
    }

    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_wire_shape() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "rating",
            "question": "How was it?",
            "required": true,
            "key": "how_was_it",
            "maxRating": 5
        }))
        .unwrap();

        assert_eq!(block.block_type, BlockType::Rating);
        assert!(block.required);
        assert_eq!(block.description, "");
        assert_eq!(block.extra.get("maxRating"), Some(&json!(5)));

        let out = serde_json::to_value(&block).unwrap();
        assert_eq!(out["type"], "rating");
        assert_eq!(out["maxRating"], 5);
        assert!(out.get("options").is_none());
    }

    #[test]
    fn test_unknown_block_type_survives_round_trip() {
        let block: Block =
            serde_json::from_value(json!({ "id": "b1", "type": "signature" })).unwrap();
        assert_eq!(block.block_type, BlockType::Unknown("signature".into()));
        assert!(!block.block_type.is_known());

        let out = serde_json::to_value(&block).unwrap();
        assert_eq!(out["type"], "signature");
    }

    #[test]
    fn test_template_has_options_for_choice_blocks() {
        let choice = Block::from_template(BlockType::Dropdown, "b1");
        assert_eq!(choice.options.as_ref().map(Vec::len), Some(2));

        let text = Block::from_template(BlockType::ShortText, "b2");
        assert!(text.options.is_none());
        assert_eq!(text.question, "Short answer");
        assert!(text.key.is_empty());
    }

    #[test]
    fn test_merge_is_shallow_and_keeps_id() {
        let mut block = Block::from_template(BlockType::ShortText, "b1");
        block.extra.insert("placeholder".into(), json!("Type here"));
        block.extra.insert("maxLength".into(), json!(40));

        let patch: BlockPatch = serde_json::from_value(json!({
            "id": "hijack",
            "question": "Your name",
            "required": true,
            "placeholder": null,
            "maxLength": 80
        }))
        .unwrap();
        block.merge(&patch);

        assert_eq!(block.id, "b1");
        assert_eq!(block.question, "Your name");
        assert!(block.required);
        assert!(block.extra.get("placeholder").is_none());
        assert_eq!(block.extra.get("maxLength"), Some(&json!(80)));
        assert_eq!(block.block_type, BlockType::ShortText);
    }
}
