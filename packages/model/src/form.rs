use crate::block::Block;
use crate::logic::LogicRule;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub pages: Vec<Page>,

    /// Theme settings, owned by the theme editor and carried opaquely
    #[serde(default)]
    pub theme: Map<String, Value>,

    #[serde(default)]
    pub logic: Logic,

    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// Ordered group of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logic {
    #[serde(default)]
    pub rules: Vec<LogicRule>,
}

/// Outbound integration endpoint. Managed outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,

    pub url: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Form {
    /// Create a form with a single empty page
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let page_id = format!("{}-page-1", id);

        Self {
            id,
            title: title.into(),
            description: String::new(),
            pages: vec![Page::new(page_id, "Page 1")],
            theme: Map::new(),
            logic: Logic::default(),
            webhooks: Vec::new(),
        }
    }

    /// Restore the "at least one page" invariant on a loaded snapshot.
    /// Returns true if the form had to be changed.
    pub fn normalize(&mut self) -> bool {
        if self.pages.is_empty() {
            let page_id = format!("{}-page-1", self.id);
            self.pages.push(Page::new(page_id, "Page 1"));
            return true;
        }
        false
    }

    pub fn find_page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn find_page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == page_id)
    }

    /// Locate a block as `(page index, block index)`
    pub fn locate_block(&self, block_id: &str) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(page_idx, page)| {
            page.blocks
                .iter()
                .position(|b| b.id == block_id)
                .map(|block_idx| (page_idx, block_idx))
        })
    }

    pub fn find_block(&self, block_id: &str) -> Option<&Block> {
        self.locate_block(block_id)
            .map(|(p, b)| &self.pages[p].blocks[b])
    }

    pub fn find_block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        let (p, b) = self.locate_block(block_id)?;
        Some(&mut self.pages[p].blocks[b])
    }

    pub fn contains_block(&self, block_id: &str) -> bool {
        self.locate_block(block_id).is_some()
    }

    /// Page that holds the given block
    pub fn page_of(&self, block_id: &str) -> Option<&Page> {
        self.locate_block(block_id).map(|(p, _)| &self.pages[p])
    }

    /// All blocks in document order (page order, then block order)
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    /// Default selection: first block of the first page that has one
    pub fn first_block_id(&self) -> Option<&str> {
        self.blocks().next().map(|b| b.id.as_str())
    }

    pub fn find_rule(&self, rule_id: &str) -> Option<&LogicRule> {
        self.logic.rules.iter().find(|r| r.id == rule_id)
    }

    /// Whether any page, block or rule already uses this id
    pub fn uses_id(&self, id: &str) -> bool {
        self.id == id
            || self.pages.iter().any(|p| p.id == id)
            || self.contains_block(id)
            || self.logic.rules.iter().any(|r| {
                r.id == id
                    || r.conditions.iter().any(|c| c.id == id)
                    || r.actions.iter().any(|a| a.id == id)
            })
    }

    /// Whether a block other than `except` already uses `key`
    pub fn key_taken(&self, key: &str, except: Option<&str>) -> bool {
        self.blocks()
            .any(|b| b.key == key && Some(b.id.as_str()) != except)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use serde_json::json;

    fn sample() -> Form {
        let mut form = Form::new("f1", "Survey");
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "a"));
        form.pages[0].blocks.push(Block::from_template(BlockType::Email, "b"));
        let mut second = Page::new("p2", "Second");
        second.blocks.push(Block::from_template(BlockType::Number, "c"));
        form.pages.push(second);
        form
    }

    #[test]
    fn test_locate_across_pages() {
        let form = sample();
        assert_eq!(form.locate_block("b"), Some((0, 1)));
        assert_eq!(form.locate_block("c"), Some((1, 0)));
        assert_eq!(form.locate_block("zzz"), None);
        assert_eq!(form.page_of("c").map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn test_blocks_in_document_order() {
        let form = sample();
        let ids: Vec<_> = form.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(form.first_block_id(), Some("a"));
        assert_eq!(form.block_count(), 3);
    }

    #[test]
    fn test_first_block_skips_empty_pages() {
        let mut form = sample();
        form.pages[0].blocks.clear();
        assert_eq!(form.first_block_id(), Some("c"));
    }

    #[test]
    fn test_normalize_adds_page() {
        let mut form: Form = serde_json::from_value(json!({ "id": "f9" })).unwrap();
        assert!(form.pages.is_empty());
        assert!(form.normalize());
        assert_eq!(form.pages.len(), 1);
        assert!(!form.normalize());
    }

    #[test]
    fn test_key_taken_ignores_self() {
        let mut form = sample();
        form.pages[0].blocks[0].key = "name".into();
        assert!(form.key_taken("name", None));
        assert!(!form.key_taken("name", Some("a")));
        assert!(form.key_taken("name", Some("b")));
    }

    #[test]
    fn test_unrecognised_names_are_written_back_unchanged() {
        let source = json!({
            "id": "f1",
            "title": "Survey",
            "pages": [{
                "id": "p1",
                "title": "Page 1",
                "blocks": [{ "id": "q1", "type": "signature", "question": "Sign here" }]
            }],
            "logic": {
                "rules": [{
                    "id": "r1",
                    "conditions": [{ "id": "c1", "field": "q1", "operator": "is_empty", "value": "" }],
                    "actions": [{ "id": "a1", "type": "require", "target": "q1" }]
                }]
            }
        });

        let form: Form = serde_json::from_value(source).unwrap();
        let out = serde_json::to_value(&form).unwrap();

        assert_eq!(out["pages"][0]["blocks"][0]["type"], "signature");
        assert_eq!(out["logic"]["rules"][0]["conditions"][0]["operator"], "is_empty");
        assert_eq!(out["logic"]["rules"][0]["actions"][0]["type"], "require");
    }
}
