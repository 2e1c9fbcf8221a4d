//! # Blockform Logic
//!
//! Fill-time evaluation of a form's conditional logic.
//!
//! ```text
//! answers ──► LogicEngine::evaluate ──► Decisions ──► Navigator
//!                (rules, in order)      (per block)    (next block)
//! ```
//!
//! Evaluation is pure and total: malformed answers make a condition false,
//! actions pointing at missing blocks are dropped, and nothing panics.
//! When rules disagree about a block, the later rule in `logic.rules` wins.

mod compare;
mod decisions;
mod engine;
mod navigator;

pub use compare::condition_holds;
pub use decisions::{BlockDecision, Decisions, Visibility};
pub use engine::{evaluate, Answers, BaseVisibility, EvaluationOptions, LogicEngine};
pub use navigator::Navigator;
