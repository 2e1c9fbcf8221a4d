use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Show,
    Hide,
}

/// What the fired rules decided for one block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDecision {
    /// `None` when no fired rule touched visibility: the block keeps its base
    /// visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,

    #[serde(default)]
    pub skip: bool,

    /// Destination when the block is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_to: Option<String>,
}

/// Decision map produced by one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decisions {
    pub blocks: BTreeMap<String, BlockDecision>,

    /// Blocks that start hidden before any rule fires
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hidden_by_default: BTreeSet<String>,
}

impl Decisions {
    pub fn get(&self, block_id: &str) -> Option<&BlockDecision> {
        self.blocks.get(block_id)
    }

    pub(crate) fn entry(&mut self, block_id: &str) -> &mut BlockDecision {
        self.blocks.entry(block_id.to_string()).or_default()
    }

    /// Resolved visibility: a fired show/hide wins, otherwise the base
    pub fn visibility(&self, block_id: &str) -> Visibility {
        match self.get(block_id).and_then(|d| d.visibility) {
            Some(visibility) => visibility,
            None if self.hidden_by_default.contains(block_id) => Visibility::Hide,
            None => Visibility::Show,
        }
    }

    pub fn is_visible(&self, block_id: &str) -> bool {
        self.visibility(block_id) == Visibility::Show
    }

    pub fn is_skipped(&self, block_id: &str) -> bool {
        self.get(block_id).is_some_and(|d| d.skip)
    }

    pub fn jump_target(&self, block_id: &str) -> Option<&str> {
        self.get(block_id).and_then(|d| d.jump_to.as_deref())
    }

    /// A block the respondent actually lands on
    pub fn is_navigable(&self, block_id: &str) -> bool {
        self.is_visible(block_id) && !self.is_skipped(block_id)
    }
}
