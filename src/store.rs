use crate::core::error::AgentError;
use chrono::Local;
use rusqlite::{Connection, params};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub content: String,
    /// Free text, never validated.
    pub due_date: String,
}

/// SQLite-backed notes and reminders. One connection, held for the session.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, AgentError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, AgentError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AgentError> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn add_note(&self, content: &str) -> Result<Note, AgentError> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        self.conn.execute(
            "INSERT INTO notes(content, timestamp) VALUES(?1, ?2)",
            params![content, timestamp],
        )?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            content: content.to_string(),
            timestamp,
        })
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> Result<Vec<Note>, AgentError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, content, timestamp FROM notes ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Note {
                id: r.get(0)?,
                content: r.get(1)?,
                timestamp: r.get(2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_reminder(&self, content: &str, due_date: &str) -> Result<Reminder, AgentError> {
        self.conn.execute(
            "INSERT INTO reminders(content, due_date) VALUES(?1, ?2)",
            params![content, due_date],
        )?;

        Ok(Reminder {
            id: self.conn.last_insert_rowid(),
            content: content.to_string(),
            due_date: due_date.to_string(),
        })
    }

    pub fn reminders(&self) -> Result<Vec<Reminder>, AgentError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, content, due_date FROM reminders ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Reminder {
                id: r.get(0)?,
                content: r.get(1)?,
                due_date: r.get(2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(r#"
    CREATE TABLE IF NOT EXISTS notes(id INTEGER PRIMARY KEY AUTOINCREMENT, content TEXT NOT NULL, timestamp TEXT NOT NULL);
    CREATE TABLE IF NOT EXISTS reminders(id INTEGER PRIMARY KEY AUTOINCREMENT, content TEXT NOT NULL, due_date TEXT NOT NULL);
    "#)
}
