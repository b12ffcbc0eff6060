use serde::{Deserialize, Serialize};

use crate::ollama::{ChatMessage, Role};

/// A finalized line of the conversation as shown on screen.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
    /// Wall-clock label, `HH:MM`.
    pub stamp: String,
}

impl ChatEntry {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// The reply currently being streamed in.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingReply {
    pub content: String,
    pub stamp: String,
}

/// Finalized history plus at most one in-flight assistant reply.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatEntry>,
    pending: Option<PendingReply>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatEntry] {
        &self.messages
    }

    pub fn pending(&self) -> Option<&PendingReply> {
        self.pending.as_ref()
    }

    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// Append what the user typed. Blank prompts and prompts sent while a
    /// reply is still streaming are refused.
    pub fn push_user(&mut self, prompt: &str, stamp: impl Into<String>) -> bool {
        if prompt.trim().is_empty() || self.is_thinking() {
            return false;
        }
        self.messages.push(ChatEntry {
            role: Role::User,
            content: prompt.to_string(),
            stamp: stamp.into(),
        });
        true
    }

    pub fn needs_response(&self) -> bool {
        !self.is_thinking() && self.messages.last().is_some_and(ChatEntry::is_user)
    }

    pub fn begin_response(&mut self, stamp: impl Into<String>) {
        self.pending = Some(PendingReply {
            content: String::new(),
            stamp: stamp.into(),
        });
    }

    pub fn append_fragment(&mut self, fragment: &str) {
        match self.pending.as_mut() {
            Some(reply) => reply.content.push_str(fragment),
            None => log::warn!("dropping fragment with no reply in flight"),
        }
    }

    /// Settle the in-flight reply into history, even when it is empty
    /// because the stream failed before producing anything.
    pub fn finish_response(&mut self) {
        if let Some(reply) = self.pending.take() {
            self.messages.push(ChatEntry {
                role: Role::Assistant,
                content: reply.content,
                stamp: reply.stamp,
            });
        }
    }

    /// History sent to the server; never includes the in-flight reply.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|entry| ChatMessage {
                role: entry.role,
                content: entry.content.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_is_ignored() {
        let mut convo = Conversation::new();
        assert!(!convo.push_user("   \n", "09:00"));
        assert!(convo.messages().is_empty());
        assert!(!convo.needs_response());
    }

    #[test]
    fn user_message_asks_for_a_reply() {
        let mut convo = Conversation::new();
        assert!(convo.push_user("hello", "09:00"));
        assert!(convo.needs_response());
        assert_eq!(convo.transcript(), vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn fragments_accumulate_into_one_entry() {
        let mut convo = Conversation::new();
        convo.push_user("hi", "09:00");
        convo.begin_response("09:01");
        assert!(convo.is_thinking());
        assert!(!convo.needs_response());
        assert_eq!(convo.pending().unwrap().content, "");

        for piece in ["Hel", "lo", ", world"] {
            convo.append_fragment(piece);
        }
        assert_eq!(convo.pending().unwrap().content, "Hello, world");
        // the reply is not part of the history until it finishes
        assert_eq!(convo.transcript().len(), 1);

        convo.finish_response();
        assert!(!convo.is_thinking());
        assert!(!convo.needs_response());
        assert_eq!(
            convo.messages().last().unwrap(),
            &ChatEntry {
                role: Role::Assistant,
                content: "Hello, world".into(),
                stamp: "09:01".into(),
            }
        );
    }

    #[test]
    fn failed_stream_still_finalizes() {
        let mut convo = Conversation::new();
        convo.push_user("hi", "09:00");
        convo.begin_response("09:00");
        convo.finish_response();

        assert_eq!(convo.messages().len(), 2);
        assert_eq!(convo.messages()[1].content, "");
        assert!(!convo.messages()[1].is_user());
    }

    #[test]
    fn no_second_prompt_while_thinking() {
        let mut convo = Conversation::new();
        convo.push_user("one", "09:00");
        convo.begin_response("09:00");
        assert!(!convo.push_user("two", "09:00"));
        assert_eq!(convo.messages().len(), 1);
    }

    #[test]
    fn transcript_alternates_roles() {
        let mut convo = Conversation::new();
        convo.push_user("a", "");
        convo.begin_response("");
        convo.append_fragment("b");
        convo.finish_response();
        convo.push_user("c", "");

        assert_eq!(
            convo.transcript(),
            vec![
                ChatMessage::user("a"),
                ChatMessage::assistant("b"),
                ChatMessage::user("c"),
            ]
        );
    }

    #[test]
    fn stray_fragment_is_dropped() {
        let mut convo = Conversation::new();
        convo.append_fragment("orphan");
        convo.finish_response();
        assert!(convo.messages().is_empty());
    }
}
