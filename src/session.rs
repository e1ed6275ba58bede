//! UI-agnostic chat session state
//!
//! Owns the conversation transcript and the single in-flight request guard.
//! Nothing here touches the terminal or the network, so the submission rules
//! can be tested without either.

use serde::{Deserialize, Serialize};

/// Fixed reply shown when a request fails for any reason.
pub const ERROR_REPLY: &str = "Sorry, something went wrong while processing your request.";

/// Greeting seeded into every new session.
pub const GREETING: &str =
    "Hello! I'm the community assistant. Ask me anything about dogs, cats, and other pets.";

/// A chat message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Ordered transcript plus the busy flag guarding concurrent submissions.
///
/// While a request is outstanding the last transcript entry is an assistant
/// placeholder that grows as stream updates arrive; every other entry is
/// immutable once appended.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    busy: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
            }],
            busy: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Accept a submission, or reject it as a no-op.
    ///
    /// Rejects when the trimmed text is empty or a request is already
    /// outstanding. On acceptance the user message and an empty assistant
    /// placeholder are both in the transcript before this returns, and the
    /// returned snapshot (history up to and including the user message, not
    /// the placeholder) is what goes on the wire.
    pub fn begin(&mut self, text: &str) -> Option<Vec<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() || self.busy {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
        });
        let outbound = self.messages.clone();

        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: String::new(),
        });
        self.busy = true;

        Some(outbound)
    }

    /// Replace the in-progress reply with the full accumulated text.
    ///
    /// The server emits the complete text so far on every update, so this is
    /// a full-text set rather than an append. Ignored when no request is
    /// outstanding.
    pub fn apply_update(&mut self, text: String) {
        if !self.busy {
            return;
        }
        if let Some(last) = self.messages.last_mut() {
            if last.role == ChatRole::Assistant {
                last.content = text;
            }
        }
    }

    /// Mark the outstanding request as finished, keeping whatever reply
    /// accumulated.
    pub fn complete(&mut self) {
        self.busy = false;
    }

    /// Mark the outstanding request as failed: the placeholder becomes the
    /// fixed error reply, replacing any partial content.
    pub fn fail(&mut self) {
        if let Some(last) = self.messages.last_mut() {
            if last.role == ChatRole::Assistant {
                last.content = ERROR_REPLY.to_string();
            }
        }
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_appends_user_then_placeholder() {
        let mut session = ChatSession::new();
        let outbound = session.begin("hello").expect("accepted");

        assert_eq!(session.messages().len(), 3); // greeting + user + placeholder
        assert_eq!(session.messages()[1].role, ChatRole::User);
        assert_eq!(session.messages()[1].content, "hello");
        assert_eq!(session.messages()[2].role, ChatRole::Assistant);
        assert_eq!(session.messages()[2].content, "");
        assert!(session.is_busy());

        // The placeholder is not part of the outbound payload.
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0].content, GREETING);
        assert_eq!(outbound[1].content, "hello");
    }

    #[test]
    fn begin_trims_input() {
        let mut session = ChatSession::new();
        session.begin("  hi there \n").expect("accepted");
        assert_eq!(session.messages()[1].content, "hi there");
    }

    #[test]
    fn empty_or_whitespace_submission_is_a_noop() {
        let mut session = ChatSession::new();
        assert!(session.begin("").is_none());
        assert!(session.begin("   \n\t ").is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_busy());
    }

    #[test]
    fn submission_while_busy_is_a_noop() {
        let mut session = ChatSession::new();
        session.begin("first").expect("accepted");
        assert!(session.begin("second").is_none());
        assert_eq!(session.messages().len(), 3);

        session.complete();
        assert!(session.begin("second").is_some());
    }

    #[test]
    fn updates_replace_rather_than_append() {
        let mut session = ChatSession::new();
        session.begin("question").expect("accepted");

        session.apply_update("Hi".to_string());
        session.apply_update("Hi there".to_string());
        session.complete();

        let reply = session.messages().last().expect("reply");
        assert_eq!(reply.content, "Hi there");
        assert!(!session.is_busy());
    }

    #[test]
    fn update_without_outstanding_request_is_ignored() {
        let mut session = ChatSession::new();
        session.apply_update("stray".to_string());
        assert_eq!(session.messages()[0].content, GREETING);
    }

    #[test]
    fn failure_yields_exactly_one_error_entry() {
        let mut session = ChatSession::new();
        session.begin("question").expect("accepted");
        session.apply_update("partial text".to_string());
        session.fail();

        let assistant_entries: Vec<_> = session
            .messages()
            .iter()
            .skip(1) // greeting
            .filter(|m| m.role == ChatRole::Assistant)
            .collect();
        assert_eq!(assistant_entries.len(), 1);
        assert_eq!(assistant_entries[0].content, ERROR_REPLY);
        assert!(!session.is_busy());
    }

    #[test]
    fn session_returns_to_ready_after_failure() {
        let mut session = ChatSession::new();
        session.begin("one").expect("accepted");
        session.fail();
        assert!(session.begin("two").is_some());
    }
}
