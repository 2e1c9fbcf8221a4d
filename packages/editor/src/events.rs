//! Observer interface for the editing session.
//!
//! Listeners run synchronously, in subscription order, after the session
//! state they describe has been committed.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A structural change was applied (including undo/redo)
    Committed { version: u64, description: String },

    SelectionChanged {
        block_id: Option<String>,
        page_id: Option<String>,
    },

    DirtyChanged { dirty: bool },

    HistoryChanged { can_undo: bool, can_redo: bool },

    /// Ask the inspector to draw attention to a block (e.g. a required
    /// property is missing)
    AttentionRequested { block_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Registered listeners
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &format!("{} listeners", self.listeners.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_emit_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::default();

        let sink = seen.clone();
        let id = subscribers.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        subscribers.emit(&EditorEvent::DirtyChanged { dirty: true });
        assert_eq!(seen.borrow().len(), 1);

        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.emit(&EditorEvent::DirtyChanged { dirty: false });
        assert_eq!(seen.borrow().len(), 1);
        assert!(subscribers.is_empty());
    }
}
