use crate::form::Form;
use crc32fast::Hasher;

/// Seed for a form's id generator: CRC32 of the form id
pub fn get_form_seed(form_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(form_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for pages, blocks and rules within a form
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(form_id: &str) -> Self {
        Self {
            seed: get_form_seed(form_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Next id that nothing in `form` uses yet. Loaded snapshots may already
    /// contain ids from an earlier session with the same seed.
    pub fn fresh_id(&mut self, form: &Form) -> String {
        loop {
            let id = self.new_id();
            if !form.uses_id(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockType};

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(get_form_seed("form-1"), get_form_seed("form-1"));
        assert_ne!(get_form_seed("form-1"), get_form_seed("form-2"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("form-1");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_fresh_id_skips_existing() {
        let mut form = Form::new("form-1", "Test");
        let seed = get_form_seed("form-1");
        form.pages[0]
            .blocks
            .push(Block::from_template(BlockType::ShortText, format!("{}-1", seed)));
        form.pages[0]
            .blocks
            .push(Block::from_template(BlockType::ShortText, format!("{}-2", seed)));

        let mut gen = IdGenerator::new("form-1");
        assert_eq!(gen.fresh_id(&form), format!("{}-3", seed));
    }
}
