use crate::core::error::AgentError;
use crate::providers::{Message, Role};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const CLEARED: &str = "Conversation history cleared.";
pub const NO_HISTORY: &str = "No conversation history.";

/// Ordered, append-only record of the session's exchanges.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    /// Records one successful exchange: the user turn, then the reply.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.append(Role::User, user);
        self.append(Role::Assistant, assistant);
    }

    pub fn clear(&mut self) -> &'static str {
        self.messages.clear();
        CLEARED
    }

    pub fn render(&self) -> String {
        if self.is_empty() {
            return NO_HISTORY.to_string();
        }

        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the transcript as pretty JSON to `dir/conversation_<stamp>.txt`.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, AgentError> {
        self.persist_at(dir, Local::now())
    }

    pub fn persist_at(&self, dir: &Path, at: DateTime<Local>) -> Result<PathBuf, AgentError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("conversation_{}.txt", at.format("%Y%m%d_%H%M%S")));

        // create_new: an existing save from the same second is left untouched
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        serde_json::to_writer_pretty(file, &self.messages)?;

        tracing::debug!(path = %path.display(), messages = self.len(), "transcript saved");
        Ok(path)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
