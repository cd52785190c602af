//! Append-only conversation log.

use crate::protocol::ChatEvent;

/// Insertion-ordered record of everything the broadcast topic delivered.
///
/// Arrival order is preserved exactly: no reordering, no deduplication and
/// no size cap. A duplicate echo from the relay therefore shows up twice.
/// The log lives and dies with its session; nothing is persisted.
#[derive(Debug, Default)]
pub struct ConversationLog {
    events: Vec<ChatEvent>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: ChatEvent) {
        self.events.push(event);
    }

    /// Read-only view in arrival order.
    pub fn events(&self) -> &[ChatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatEvent> {
        self.events.iter()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Username;

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    #[test]
    fn preserves_arrival_order() {
        let mut log = ConversationLog::new();
        log.append(ChatEvent::chat(&alice(), "first"));
        log.append(ChatEvent::chat(&alice(), "second"));
        log.append(ChatEvent::chat(&alice(), "third"));

        let contents: Vec<&str> =
            log.iter().map(|event| event.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn keeps_duplicate_events() {
        let mut log = ConversationLog::new();
        let event = ChatEvent::chat(&alice(), "echo");
        log.append(event.clone());
        log.append(event);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn starts_empty() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.events().is_empty());
    }
}
