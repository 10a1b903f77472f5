//! Append-only conversation log for one session

use crate::llm::{Message, Role};

/// Ordered messages exchanged in one session.
///
/// Turns are recorded as (request, reply) pairs, so a reply always sits
/// directly after the request that produced it.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed turn
    pub fn record(&mut self, request: Message, reply: Message) {
        debug_assert_eq!(request.role(), Role::User);
        debug_assert_eq!(reply.role(), Role::Assistant);
        self.messages.push(request);
        self.messages.push(reply);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// History as it would look with `pending` appended, without recording it
    pub fn with_pending(&self, pending: &Message) -> Vec<Message> {
        let mut history = Vec::with_capacity(self.messages.len() + 1);
        history.extend_from_slice(&self.messages);
        history.push(pending.clone());
        history
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed turns
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }
}

pub fn render_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role(), m.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
