use crate::commands::dispatcher::{CommandDispatcher, Input, parse_input};
use crate::commands::ChatState;
use crate::core::error::AgentError;
use crate::display;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, BufRead};

/// Outcome of one line of input.
#[derive(Debug)]
pub enum Turn {
    /// Nothing to show (blank line)
    Skip,
    Command(String),
    Assistant(String),
    Failed(AgentError),
    Quit,
}

impl Turn {
    /// The text a user would see for this turn.
    pub fn text(&self) -> Option<String> {
        match self {
            Turn::Command(text) | Turn::Assistant(text) => Some(text.clone()),
            Turn::Failed(err) => Some(err.to_string()),
            Turn::Quit => Some(display::FAREWELL.to_string()),
            Turn::Skip => None,
        }
    }
}

pub struct Application {
    pub state: ChatState,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(state: ChatState, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            state,
            command_dispatcher,
        }
    }

    /// Handles one line end to end. Never fails: errors come back as
    /// [`Turn::Failed`] and the session carries on.
    pub async fn respond(&mut self, line: &str) -> Turn {
        match parse_input(line) {
            Input::Empty => Turn::Skip,
            Input::Quit => Turn::Quit,
            Input::Command { token, args } => {
                let result = self
                    .command_dispatcher
                    .execute(token, args, &mut self.state)
                    .await;
                match result {
                    Ok(Some(output)) => Turn::Command(output),
                    Ok(None) if !self.state.should_continue => Turn::Quit,
                    Ok(None) => Turn::Skip,
                    Err(e) => {
                        tracing::debug!(error = ?e, token, "command failed");
                        Turn::Failed(e)
                    }
                }
            }
            Input::Chat(text) => match self.state.chat(text).await {
                Ok(reply) => Turn::Assistant(reply),
                Err(e) => {
                    tracing::warn!(error = %e, "completion failed");
                    Turn::Failed(e)
                }
            },
        }
    }

    pub async fn run(&mut self) -> Result<(), AgentError> {
        if io::stdin().is_terminal() {
            self.run_interactive().await
        } else {
            self.run_piped().await
        }
    }

    async fn run_interactive(&mut self) -> Result<(), AgentError> {
        display::display_banner(self.state.provider.model());
        let mut editor = input::create_editor(&self.command_dispatcher)?;

        loop {
            let line = match input::read_input(&mut editor)? {
                Some(line) => line,
                None => {
                    display::display_farewell();
                    break;
                }
            };

            let turn = self.respond(&line).await;
            if render(&turn) {
                break;
            }
        }

        input::save_history(&mut editor)?;
        Ok(())
    }

    async fn run_piped(&mut self) -> Result<(), AgentError> {
        self.run_lines(io::stdin().lock()).await;
        Ok(())
    }

    /// Scripted use: one turn per line, each finished before the next line is
    /// read. Plain output; an unreadable line is reported and skipped.
    async fn run_lines<R: BufRead>(&mut self, reader: R) {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable input line");
                    display::display_error(&AgentError::from(e).to_string());
                    continue;
                }
            };

            let turn = self.respond(&line).await;
            if render_plain(&turn) {
                break;
            }
        }
    }
}

/// Like [`render`] without styling: failures to stderr, everything else to
/// stdout.
fn render_plain(turn: &Turn) -> bool {
    match turn {
        Turn::Failed(err) => display::display_error(&err.to_string()),
        _ => {
            if let Some(text) = turn.text() {
                display::display_output(&text);
            }
        }
    }
    matches!(turn, Turn::Quit)
}

/// Prints a turn; returns true when the session should end.
fn render(turn: &Turn) -> bool {
    match turn {
        Turn::Skip => {}
        Turn::Command(output) => display::display_output(output),
        Turn::Assistant(reply) => display::display_response(reply),
        Turn::Failed(err) => display::display_error(&err.to_string()),
        Turn::Quit => {
            display::display_farewell();
            return true;
        }
    }
    false
}
