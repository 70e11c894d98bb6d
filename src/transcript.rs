use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum MessageContent {
    Text(String),
    /// Rendered as a preformatted block (pretty-printed metrics).
    Preformatted(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Text(s) | MessageContent::Preformatted(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant_preformatted(text: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: MessageContent::Preformatted(text.into()),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            MessageContent::Text(text) => write!(f, "{}: {}", self.role.label(), text),
            MessageContent::Preformatted(text) => write!(f, "{}:\n{}", self.role.label(), text),
        }
    }
}

/// Ordered chat transcript. Messages are only appended, except for removal
/// by index on user request.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// Removes the message at `index`, keeping the rest in order.
    /// Out-of-range indices leave the transcript untouched.
    pub fn remove(&mut self, index: usize) -> Option<Message> {
        if index < self.messages.len() {
            Some(self.messages.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Transcript {
        let mut transcript = Transcript::new();
        transcript.extend((0..n).map(|i| Message::assistant(format!("m{}", i))));
        transcript
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut transcript = numbered(4);
        let removed = transcript.remove(1).unwrap();
        assert_eq!(removed.content.as_str(), "m1");
        let rest: Vec<&str> = transcript.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(rest, vec!["m0", "m2", "m3"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut transcript = numbered(2);
        assert!(transcript.remove(2).is_none());
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_display_uses_role_labels() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant_preformatted("{\n  \"a\": 1\n}"));
        assert_eq!(
            transcript.to_string(),
            "You: hi\nAssistant:\n{\n  \"a\": 1\n}\n"
        );
    }
}
