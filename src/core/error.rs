use std::io;
use thiserror::Error;

/// Unified error type for the assistant.
///
/// `Display` renders the text shown to the user, so callers can print a
/// failed turn directly without deciding on presentation themselves.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Completion endpoint or encyclopedia failures
    #[error("Error: {0}")]
    Api(String),

    /// Transport failures (timeouts, refused connections)
    #[error("Error: {0}")]
    Network(String),

    /// Any failure of the weather lookup collapses to one fixed message
    #[error("Sorry, I couldn't fetch the weather information.")]
    WeatherUnavailable,

    /// A command was given missing or unparsable arguments; carries the guidance text
    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("Unknown command. Type /help to see available commands.")]
    UnknownCommand(String),

    /// Note/reminder store failures
    #[error("Error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Line editor failures
    #[error("Input error: {0}")]
    Input(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AgentError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AgentError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            AgentError::Api(format!("API returned error status: {}", err))
        } else if err.is_decode() {
            AgentError::Api(format!("Malformed API response: {}", err))
        } else {
            AgentError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AgentError {
    fn from(err: serde_yml::Error) -> Self {
        AgentError::Serialization(format!("YAML error: {}", err))
    }
}
