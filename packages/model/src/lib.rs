//! # Blockform Model
//!
//! Typed document tree for a form: `Form → Page[] → Block[]` plus the
//! conditional logic rule set. Pure data; every writer lives in
//! `blockform-editor`.
//!
//! The serde shape of these types is the persisted wire contract shared with
//! the editor UI and the rule-authoring UI.

mod block;
mod form;
mod id_generator;
mod keys;
mod logic;
mod references;

pub use block::{Block, BlockPatch, BlockType, ValidationRule};
pub use form::{Form, Logic, Page, Webhook};
pub use id_generator::{get_form_seed, IdGenerator};
pub use keys::{slugify, unique_key};
pub use logic::{ActionKind, LogicAction, LogicCondition, LogicRule, Operator};
pub use references::{DanglingReference, ReferenceRole};
