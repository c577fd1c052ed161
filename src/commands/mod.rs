pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::core::error::AgentError;
use crate::providers::{LLMProvider, Message};
use crate::services::{WeatherClient, WikiClient};
use crate::store::Store;
use crate::transcript::Transcript;
use std::path::PathBuf;

pub use dispatcher::create_command_registry;

pub const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Clear,
    Save,
    History,
    Weather,
    Search,
    Note,
    Notes,
    Remind,
    Reminders,
    Quit,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::Help,
        Command::Clear,
        Command::Save,
        Command::History,
        Command::Weather,
        Command::Search,
        Command::Note,
        Command::Notes,
        Command::Remind,
        Command::Reminders,
        Command::Quit,
    ];

    /// Exact, case-sensitive token match.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == token)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Clear => "clear",
            Command::Save => "save",
            Command::History => "history",
            Command::Weather => "weather",
            Command::Search => "search",
            Command::Note => "note",
            Command::Notes => "notes",
            Command::Remind => "remind",
            Command::Reminders => "reminders",
            Command::Quit => "quit",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Command::Help => "/help - Show available commands",
            Command::Clear => "/clear - Clear conversation history",
            Command::Save => "/save - Save the conversation to a timestamped file",
            Command::History => "/history - Show the conversation so far",
            Command::Weather => "/weather [city] - Current weather (default: New York)",
            Command::Search => "/search <query> - Short Wikipedia summary of a topic",
            Command::Note => "/note <content> - Save a note",
            Command::Notes => "/notes - List saved notes",
            Command::Remind => "/remind <content> <due_date> - Set a reminder",
            Command::Reminders => "/reminders - List reminders",
            Command::Quit => "/quit - Exit the chat session (or type quit)",
        }
    }
}

/// Everything a turn can read or mutate, owned for the life of the session.
pub struct ChatState {
    pub transcript: Transcript,
    pub provider: Box<dyn LLMProvider>,
    pub weather: WeatherClient,
    pub wiki: WikiClient,
    pub store: Store,
    pub save_dir: PathBuf,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(
        provider: Box<dyn LLMProvider>,
        weather: WeatherClient,
        wiki: WikiClient,
        store: Store,
        save_dir: PathBuf,
    ) -> Self {
        Self {
            transcript: Transcript::new(),
            provider,
            weather,
            wiki,
            store,
            save_dir,
            should_continue: true,
        }
    }

    /// Sends the transcript plus `input` to the completion endpoint. Both
    /// turns are recorded only once the reply has arrived.
    pub async fn chat(&mut self, input: &str) -> Result<String, AgentError> {
        let mut messages = self.transcript.messages().to_vec();
        messages.push(Message::user(input));

        let reply = self.provider.get_response(&messages).await?;
        self.transcript.push_exchange(input, reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replays canned replies and records every request it receives.
    #[derive(Clone, Default)]
    pub struct ScriptedProvider {
        replies: Arc<Mutex<Vec<Result<String, String>>>>,
        pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
            let mut replies: Vec<_> = replies
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            replies.reverse();
            Self {
                replies: Arc::new(Mutex::new(replies)),
                requests: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn get_response(&self, messages: &[Message]) -> Result<String, AgentError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            match self.replies.lock().unwrap().pop() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(detail)) => Err(AgentError::Api(detail)),
                None => Err(AgentError::Api("no scripted reply".to_string())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// State whose HTTP clients point at `base` (a mock server, or an
    /// unroutable address when the test never reaches the network).
    pub fn state_with(provider: ScriptedProvider, base: &str, save_dir: PathBuf) -> ChatState {
        let timeout = Duration::from_secs(5);
        ChatState::new(
            Box::new(provider),
            WeatherClient::new(base.to_string(), Some("wkey".to_string()), timeout).unwrap(),
            WikiClient::new(base.to_string(), timeout).unwrap(),
            Store::open_in_memory().unwrap(),
            save_dir,
        )
    }
}
