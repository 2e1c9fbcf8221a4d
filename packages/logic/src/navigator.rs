use crate::decisions::Decisions;
use blockform_model::Form;
use std::collections::HashSet;

/// Walks a form's blocks in fill order under a fixed set of decisions.
///
/// Fill order is page order then block order. Completing a block with a jump
/// goes to the jump destination; hidden and skipped blocks are passed over.
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    order: Vec<&'a str>,
    decisions: Decisions,
}

impl<'a> Navigator<'a> {
    pub fn new(form: &'a Form, decisions: Decisions) -> Self {
        Self {
            order: form.blocks().map(|b| b.id.as_str()).collect(),
            decisions,
        }
    }

    pub fn decisions(&self) -> &Decisions {
        &self.decisions
    }

    /// First block the respondent sees
    pub fn first(&self) -> Option<&'a str> {
        self.advance_from(0)
    }

    /// Block shown after completing `current`; `None` at the end of the form
    /// or when `current` is not part of it.
    pub fn next(&self, current: &str) -> Option<&'a str> {
        let index = self.position(current)?;

        let start = match self.decisions.jump_target(current) {
            Some(destination) => self.position(destination).unwrap_or(index + 1),
            None => index + 1,
        };

        self.advance_from(start)
    }

    /// Full sequence of blocks from the first to the end. Stops if a jump
    /// leads back to a block already on the path.
    pub fn path(&self) -> Vec<&'a str> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.first();

        while let Some(block_id) = current {
            if !seen.insert(block_id) {
                tracing::debug!(block_id, "Navigation cycle detected");
                break;
            }
            path.push(block_id);
            current = self.next(block_id);
        }

        path
    }

    fn position(&self, block_id: &str) -> Option<usize> {
        self.order.iter().position(|id| *id == block_id)
    }

    fn advance_from(&self, start: usize) -> Option<&'a str> {
        self.order
            .iter()
            .skip(start)
            .copied()
            .find(|id| self.decisions.is_navigable(id))
    }
}
