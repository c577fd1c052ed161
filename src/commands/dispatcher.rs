use super::{
    COMMAND_PREFIX, ChatState, Command,
    handler::{
        ClearCommand, HelpCommand, HistoryCommand, NoteCommand, NotesCommand, QuitCommand,
        RemindCommand, RemindersCommand, SaveCommand, SearchCommand, WeatherCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::AgentError;
use std::sync::Arc;

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Quit,
    Command { token: &'a str, args: &'a str },
    Chat(&'a str),
}

/// Only a `/` in the very first column makes a command; `help` or
/// `  /help` on its own is chat text. `quit` must match the whole line.
pub fn parse_input(line: &str) -> Input<'_> {
    if line.trim().is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }

    match line.strip_prefix(COMMAND_PREFIX) {
        Some(rest) => {
            let rest = rest.trim_end();
            let (token, args) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            Input::Command {
                token,
                args: args.trim(),
            }
        }
        None => Input::Chat(line.trim()),
    }
}

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        token: &str,
        args: &str,
        state: &mut ChatState,
    ) -> Result<Option<String>, AgentError> {
        let command =
            Command::parse(token).ok_or_else(|| AgentError::UnknownCommand(token.to_string()))?;
        tracing::debug!(command = command.name(), "dispatch");
        self.registry.execute(command, args, state).await
    }

    pub fn get_command_names(&self) -> Vec<&'static str> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register(Command::Help, HelpCommand);
    registry.register(Command::Clear, ClearCommand);
    registry.register(Command::Save, SaveCommand);
    registry.register(Command::History, HistoryCommand);
    registry.register(Command::Weather, WeatherCommand);
    registry.register(Command::Search, SearchCommand);
    registry.register(Command::Note, NoteCommand);
    registry.register(Command::Notes, NotesCommand);
    registry.register(Command::Remind, RemindCommand);
    registry.register(Command::Reminders, RemindersCommand);
    registry.register(Command::Quit, QuitCommand);

    CommandDispatcher::new(Arc::new(registry))
}
