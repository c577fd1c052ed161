use super::{ChatState, Command};
use crate::core::error::AgentError;
use crate::services::weather::DEFAULT_CITY;

use async_trait::async_trait;
use console::style;

pub const SEARCH_USAGE: &str = "Please provide a search query. Usage: /search <query>";
pub const NOTE_USAGE: &str = "Please provide note content. Usage: /note <content>";
pub const REMIND_USAGE: &str =
    "Please provide both content and a due date. Usage: /remind <content> <due_date>";
pub const NO_NOTES: &str = "No notes found.";
pub const NO_REMINDERS: &str = "No reminders found.";

/// `args` is the rest of the input line after the command token, already
/// trimmed; it is empty when nothing followed the token.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &str,
    ) -> Result<Option<String>, AgentError>;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct SaveCommand;
pub struct HistoryCommand;
pub struct WeatherCommand;
pub struct SearchCommand;
pub struct NoteCommand;
pub struct NotesCommand;
pub struct RemindCommand;
pub struct RemindersCommand;

#[async_trait]
impl CommandHandler for QuitCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        state.should_continue = false;
        Ok(None)
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        _state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = std::iter::once(title.to_string())
            .chain(Command::ALL.iter().map(|c| c.usage().to_string()))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Some(help_text))
    }
}

#[async_trait]
impl CommandHandler for ClearCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        Ok(Some(state.transcript.clear().to_string()))
    }
}

#[async_trait]
impl CommandHandler for SaveCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        let path = state.transcript.persist(&state.save_dir)?;
        Ok(Some(format!("Conversation saved to {}", path.display())))
    }
}

#[async_trait]
impl CommandHandler for HistoryCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        Ok(Some(state.transcript.render()))
    }
}

#[async_trait]
impl CommandHandler for WeatherCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &str,
    ) -> Result<Option<String>, AgentError> {
        let city = if args.is_empty() { DEFAULT_CITY } else { args };
        state.weather.current(city).await.map(Some)
    }
}

#[async_trait]
impl CommandHandler for SearchCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &str,
    ) -> Result<Option<String>, AgentError> {
        if args.is_empty() {
            return Err(AgentError::MissingArgument(SEARCH_USAGE));
        }
        state.wiki.summary(args).await.map(Some)
    }
}

#[async_trait]
impl CommandHandler for NoteCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &str,
    ) -> Result<Option<String>, AgentError> {
        if args.is_empty() {
            return Err(AgentError::MissingArgument(NOTE_USAGE));
        }
        let note = state.store.add_note(args)?;
        tracing::debug!(id = note.id, "note saved");
        Ok(Some("Note saved.".to_string()))
    }
}

#[async_trait]
impl CommandHandler for NotesCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        let notes = state.store.notes()?;
        if notes.is_empty() {
            return Ok(Some(NO_NOTES.to_string()));
        }

        let lines: Vec<String> = notes
            .iter()
            .map(|n| format!("{}: {}", n.timestamp, n.content))
            .collect();
        Ok(Some(lines.join("\n")))
    }
}

#[async_trait]
impl CommandHandler for RemindCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &str,
    ) -> Result<Option<String>, AgentError> {
        let (content, due_date) =
            split_reminder(args).ok_or(AgentError::MissingArgument(REMIND_USAGE))?;
        let reminder = state.store.add_reminder(content, due_date)?;
        tracing::debug!(id = reminder.id, "reminder saved");
        Ok(Some(format!(
            "Reminder set: {} (due {})",
            reminder.content, reminder.due_date
        )))
    }
}

#[async_trait]
impl CommandHandler for RemindersCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &str,
    ) -> Result<Option<String>, AgentError> {
        let reminders = state.store.reminders()?;
        if reminders.is_empty() {
            return Ok(Some(NO_REMINDERS.to_string()));
        }

        let lines: Vec<String> = reminders
            .iter()
            .map(|r| format!("{}: {}", r.due_date, r.content))
            .collect();
        Ok(Some(lines.join("\n")))
    }
}

/// Splits on the last whitespace run: everything after it is the due date.
/// A due date containing spaces ("next friday") gets split inside the date.
pub fn split_reminder(args: &str) -> Option<(&str, &str)> {
    let (content, due_date) = args.trim().rsplit_once(char::is_whitespace)?;
    let content = content.trim_end();
    if content.is_empty() || due_date.is_empty() {
        return None;
    }
    Some((content, due_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use serde_json::json;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline_state() -> ChatState {
        state_with(
            ScriptedProvider::default(),
            "http://127.0.0.1:9",
            PathBuf::from("."),
        )
    }

    #[test]
    fn reminder_splits_on_last_whitespace() {
        assert_eq!(
            split_reminder("buy milk 2024-01-15"),
            Some(("buy milk", "2024-01-15"))
        );
        assert_eq!(
            split_reminder("meet   at noon   friday"),
            Some(("meet   at noon", "friday"))
        );
        assert_eq!(split_reminder("2024-01-15"), None);
        assert_eq!(split_reminder(""), None);
    }

    #[tokio::test]
    async fn remind_without_due_date_returns_guidance() {
        let mut state = offline_state();
        let err = RemindCommand
            .execute(&mut state, "2024-01-15")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), REMIND_USAGE);
        assert!(state.store.reminders().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remind_then_list() {
        let mut state = offline_state();
        let reply = RemindCommand
            .execute(&mut state, "buy milk 2024-01-15")
            .await
            .unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("Reminder set: buy milk (due 2024-01-15)")
        );

        let listed = RemindersCommand.execute(&mut state, "").await.unwrap();
        assert_eq!(listed.as_deref(), Some("2024-01-15: buy milk"));
    }

    #[tokio::test]
    async fn notes_listing_is_empty_then_ordered() {
        let mut state = offline_state();
        let empty = NotesCommand.execute(&mut state, "").await.unwrap();
        assert_eq!(empty.as_deref(), Some(NO_NOTES));

        NoteCommand.execute(&mut state, "first").await.unwrap();
        NoteCommand.execute(&mut state, "second").await.unwrap();

        let listed = NotesCommand.execute(&mut state, "").await.unwrap().unwrap();
        let lines: Vec<&str> = listed.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first"));
        assert!(lines[1].ends_with(": second"));
    }

    #[tokio::test]
    async fn empty_note_and_search_return_guidance() {
        let mut state = offline_state();
        let note = NoteCommand.execute(&mut state, "").await.unwrap_err();
        assert_eq!(note.to_string(), NOTE_USAGE);

        let search = SearchCommand.execute(&mut state, "").await.unwrap_err();
        assert_eq!(search.to_string(), SEARCH_USAGE);
    }

    #[tokio::test]
    async fn weather_defaults_to_new_york() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 3},
                "weather": [{"description": "light snow"}]
            })))
            .mount(&server)
            .await;

        let mut state = state_with(ScriptedProvider::default(), &server.uri(), PathBuf::from("."));
        let reply = WeatherCommand.execute(&mut state, "").await.unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("Weather in New York: 3°C, light snow")
        );
    }

    #[tokio::test]
    async fn save_writes_into_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(
            ScriptedProvider::default(),
            "http://127.0.0.1:9",
            dir.path().to_path_buf(),
        );

        let reply = SaveCommand.execute(&mut state, "").await.unwrap().unwrap();
        assert!(reply.starts_with("Conversation saved to "));

        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn quit_stops_the_session() {
        let mut state = offline_state();
        assert!(QuitCommand.execute(&mut state, "").await.unwrap().is_none());
        assert!(!state.should_continue);
    }
}
