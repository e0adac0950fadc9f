//! Command-line use-case service.
//!
//! # Responsibility
//! - Turn one line of input into a parsed, executed, and persisted command.
//! - Own the book and its optional SQLite storage for the process lifetime.
//!
//! # Invariants
//! - Parse and command failures leave both the book and the data file untouched.
//! - After a successful mutating command the data file holds the whole book.
//! - Log events carry command words and error codes, never field values.

use crate::command::{CommandError, CommandOutput};
use crate::db::{open_db, DbError};
use crate::parser::{parse_command, ParseError};
use crate::repo::book_repo::{BookRepository, InMemoryBookRepository};
use crate::repo::snapshot_repo::{SnapshotError, SnapshotRepository, SqliteSnapshotRepository};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type LogicResult<T> = Result<T, LogicError>;

#[derive(Debug)]
pub enum LogicError {
    Parse(ParseError),
    Command(CommandError),
    /// The command ran but the data file could not be written, or loading failed.
    Storage(SnapshotError),
    /// The data directory could not be created.
    Io(std::io::Error),
}

impl LogicError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(err) => err.code(),
            Self::Command(err) => err.code(),
            Self::Storage(_) => "storage_failed",
            Self::Io(_) => "data_dir_failed",
        }
    }
}

impl Display for LogicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Command(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "Could not save data to file: {err}"),
            Self::Io(err) => write!(f, "Could not prepare data directory: {err}"),
        }
    }
}

impl Error for LogicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Command(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ParseError> for LogicError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<CommandError> for LogicError {
    fn from(value: CommandError) -> Self {
        Self::Command(value)
    }
}

impl From<SnapshotError> for LogicError {
    fn from(value: SnapshotError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for LogicError {
    fn from(value: DbError) -> Self {
        Self::Storage(SnapshotError::Db(value))
    }
}

impl From<std::io::Error> for LogicError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Parses, executes and persists commands against one book.
pub struct LogicService<R: BookRepository> {
    repo: R,
    storage: Option<Connection>,
}

impl<R: BookRepository> LogicService<R> {
    /// Creates a service without persistence.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            storage: None,
        }
    }

    /// Creates a service that writes a snapshot to `conn` after each mutating command.
    pub fn with_storage(repo: R, conn: Connection) -> Self {
        Self {
            repo,
            storage: Some(conn),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Runs one line of user input.
    ///
    /// # Errors
    /// - `Parse` / `Command` when the line is rejected; nothing changes.
    /// - `Storage` when the command succeeded in memory but saving failed.
    pub fn execute(&mut self, line: &str) -> LogicResult<CommandOutput> {
        let started_at = Instant::now();

        let command = parse_command(line).map_err(|err| {
            warn!(
                "event=command_execute module=service status=error stage=parse error_code={} duration_ms={}",
                err.code(),
                started_at.elapsed().as_millis()
            );
            LogicError::Parse(err)
        })?;
        let word = command.word();

        let output = command.execute(&mut self.repo).map_err(|err| {
            warn!(
                "event=command_execute module=service status=error stage=execute command={word} error_code={} duration_ms={}",
                err.code(),
                started_at.elapsed().as_millis()
            );
            LogicError::Command(err)
        })?;

        if command.is_mutating() {
            self.save().map_err(|err| {
                error!(
                    "event=command_execute module=service status=error stage=save command={word} error_code=storage_failed duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                err
            })?;
        }

        info!(
            "event=command_execute module=service status=ok command={word} patients={} appointments={} duration_ms={}",
            self.repo.patients().len(),
            self.repo.appointments().len(),
            started_at.elapsed().as_millis()
        );
        Ok(output)
    }

    fn save(&mut self) -> LogicResult<()> {
        let Some(conn) = self.storage.as_mut() else {
            return Ok(());
        };
        SqliteSnapshotRepository::new(conn)
            .save_snapshot(self.repo.patients(), self.repo.appointments())?;
        Ok(())
    }
}

impl LogicService<InMemoryBookRepository> {
    /// Opens (or creates) the data file and loads the stored book.
    ///
    /// # Errors
    /// - `Io` when the parent directory cannot be created.
    /// - `Storage` when the file cannot be opened, migrated, or holds invalid data.
    pub fn open(data_file: &Path) -> LogicResult<Self> {
        if let Some(parent) = data_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = open_db(data_file)?;
        let snapshot = SqliteSnapshotRepository::new(&mut conn).load_snapshot()?;
        let repo = InMemoryBookRepository::from_records(snapshot.patients, snapshot.appointments)
            .map_err(|err| SnapshotError::InvalidData(err.to_string()))?;

        info!(
            "event=book_load module=service status=ok patients={} appointments={}",
            repo.patients().len(),
            repo.appointments().len()
        );
        Ok(Self::with_storage(repo, conn))
    }
}

#[cfg(test)]
mod tests {
    use super::{LogicError, LogicService};
    use crate::command::CommandError;
    use crate::parser::ParseError;
    use crate::repo::book_repo::{BookRepository, InMemoryBookRepository};

    const ADD_ALEX: &str = "add n/Alex Yeoh g/m b/1990-04-12 bt/O+ p/87438807 \
        e/alexyeoh@example.com a/Blk 30 Geylang Street 29";

    #[test]
    fn runs_commands_without_storage() {
        let mut service = LogicService::new(InMemoryBookRepository::new());

        let output = service.execute(ADD_ALEX).unwrap();

        assert!(output.feedback.starts_with("New patient added: Alex Yeoh"));
        assert_eq!(service.repo().patients().len(), 1);
    }

    #[test]
    fn rejected_lines_leave_the_book_unchanged() {
        let mut service = LogicService::new(InMemoryBookRepository::new());
        service.execute(ADD_ALEX).unwrap();

        let parse_err = service.execute("edit x n/Bob").unwrap_err();
        let command_err = service.execute(ADD_ALEX).unwrap_err();

        assert!(matches!(parse_err, LogicError::Parse(ParseError::InvalidIndex(_))));
        assert!(matches!(
            command_err,
            LogicError::Command(CommandError::DuplicateRecord(_))
        ));
        assert_eq!(service.repo().patients().len(), 1);
    }

    #[test]
    fn exit_and_help_set_their_flags() {
        let mut service = LogicService::new(InMemoryBookRepository::new());

        assert!(service.execute("exit").unwrap().exit);
        assert!(service.execute("help").unwrap().show_help);
    }
}
