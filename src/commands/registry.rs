use super::{ChatState, Command};
use crate::commands::handler::CommandHandler;
use crate::core::error::AgentError;
use std::collections::HashMap;
use std::sync::Arc;

/// Command → handler table, filled once at startup.
pub struct CommandRegistry {
    handlers: HashMap<Command, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, command: Command, handler: C) {
        self.handlers.insert(command, Arc::new(handler));
    }

    pub async fn execute(
        &self,
        command: Command,
        args: &str,
        state: &mut ChatState,
    ) -> Result<Option<String>, AgentError> {
        let handler = self
            .handlers
            .get(&command)
            .ok_or_else(|| AgentError::UnknownCommand(command.name().to_string()))?;
        handler.execute(state, args).await
    }

    /// Registered command names, in `Command::ALL` order.
    pub fn get_command_names(&self) -> Vec<&'static str> {
        Command::ALL
            .iter()
            .filter(|c| self.handlers.contains_key(*c))
            .map(Command::name)
            .collect()
    }
}
