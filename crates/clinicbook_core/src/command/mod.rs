//! Command layer: one value per parsed command line, executed against the book.
//!
//! # Responsibility
//! - Resolve display indices against the active filtered views.
//! - Merge descriptors into new records, guard identity, commit, report.
//!
//! # Invariants
//! - A failing command never mutates the book.
//! - Edit commands check index bounds first, then reject empty descriptors.
//! - A successful edit resets that record type's filter to "show all".

use crate::model::{RecordKind, ValidationError};
use crate::repo::book_repo::{BookRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_commands;
pub mod apply;
pub mod descriptor;
pub mod guard;
pub mod patient_commands;

use appointment_commands::{
    AddAppointmentCommand, DeleteAppointmentCommand, EditAppointmentCommand,
    FindAppointmentsCommand, ListAppointmentsCommand, SetAppointmentStatusCommand,
};
use patient_commands::{
    AddPatientCommand, DeletePatientCommand, EditPatientCommand, FindPatientsCommand,
    ListPatientsCommand,
};

pub type CommandResult<T> = Result<T, CommandError>;

/// User-facing rejections; each aborts the command before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    IndexOutOfRange {
        kind: RecordKind,
        index: usize,
        len: usize,
    },
    NoFieldsEdited,
    DuplicateRecord(RecordKind),
    /// Patient name that matched no stored patient.
    ReferenceResolution(String),
    InvalidTimeRange(ValidationError),
    Repo(RepoError),
}

impl CommandError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::NoFieldsEdited => "no_fields_edited",
            Self::DuplicateRecord(_) => "duplicate_record",
            Self::ReferenceResolution(_) => "reference_unresolved",
            Self::InvalidTimeRange(_) => "invalid_time_range",
            Self::Repo(_) => "repo_rejected",
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { kind, index, len } => write!(
                f,
                "The {kind} index provided is invalid: {index} is not between 1 and {len}."
            ),
            Self::NoFieldsEdited => write!(f, "At least one field to edit must be provided."),
            Self::DuplicateRecord(kind) => {
                write!(f, "This {kind} already exists in the clinic book.")
            }
            Self::ReferenceResolution(text) => {
                write!(f, "No patient named `{text}` exists in the clinic book.")
            }
            Self::InvalidTimeRange(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTimeRange(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate(kind) => Self::DuplicateRecord(kind),
            other => Self::Repo(other),
        }
    }
}

/// 1-based position in a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index(usize);

impl Index {
    pub fn from_one_based(value: usize) -> Self {
        Self(value)
    }

    pub fn one_based(self) -> usize {
        self.0
    }
}

/// Picks the record at `index` from a filtered view.
///
/// # Errors
/// - `IndexOutOfRange` unless `1 <= index <= view.len()`.
pub fn select<'a, T>(view: &[&'a T], index: Index, kind: RecordKind) -> CommandResult<&'a T> {
    index
        .one_based()
        .checked_sub(1)
        .and_then(|zero_based| view.get(zero_based).copied())
        .ok_or(CommandError::IndexOutOfRange {
            kind,
            index: index.one_based(),
            len: view.len(),
        })
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Human-readable message for the user.
    pub feedback: String,
    /// The caller should show the usage summary.
    pub show_help: bool,
    /// The caller should stop reading commands.
    pub exit: bool,
    /// List the caller should redisplay, if any.
    pub listing: Option<RecordKind>,
}

impl CommandOutput {
    pub fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            show_help: false,
            exit: false,
            listing: None,
        }
    }

    pub fn listing(feedback: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            listing: Some(kind),
            ..Self::message(feedback)
        }
    }
}

pub const HELP_WORD: &str = "help";
pub const EXIT_WORD: &str = "exit";
pub const CLEAR_WORD: &str = "clear";

/// Every command a line can parse into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPatient(AddPatientCommand),
    EditPatient(EditPatientCommand),
    DeletePatient(DeletePatientCommand),
    FindPatients(FindPatientsCommand),
    ListPatients(ListPatientsCommand),
    AddAppointment(AddAppointmentCommand),
    EditAppointment(EditAppointmentCommand),
    DeleteAppointment(DeleteAppointmentCommand),
    FindAppointments(FindAppointmentsCommand),
    ListAppointments(ListAppointmentsCommand),
    SetAppointmentStatus(SetAppointmentStatusCommand),
    Clear,
    Help,
    Exit,
}

impl Command {
    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        match self {
            Self::AddPatient(command) => command.execute(repo),
            Self::EditPatient(command) => command.execute(repo),
            Self::DeletePatient(command) => command.execute(repo),
            Self::FindPatients(command) => command.execute(repo),
            Self::ListPatients(command) => command.execute(repo),
            Self::AddAppointment(command) => command.execute(repo),
            Self::EditAppointment(command) => command.execute(repo),
            Self::DeleteAppointment(command) => command.execute(repo),
            Self::FindAppointments(command) => command.execute(repo),
            Self::ListAppointments(command) => command.execute(repo),
            Self::SetAppointmentStatus(command) => command.execute(repo),
            Self::Clear => {
                repo.clear();
                Ok(CommandOutput::message("Clinic book has been cleared!"))
            }
            Self::Help => Ok(CommandOutput {
                show_help: true,
                ..CommandOutput::message(usage_summary())
            }),
            Self::Exit => Ok(CommandOutput {
                exit: true,
                ..CommandOutput::message("Exiting clinic book as requested ...")
            }),
        }
    }

    /// Command word as typed by the user; used in log events.
    pub fn word(&self) -> &'static str {
        match self {
            Self::AddPatient(_) => AddPatientCommand::COMMAND_WORD,
            Self::EditPatient(_) => EditPatientCommand::COMMAND_WORD,
            Self::DeletePatient(_) => DeletePatientCommand::COMMAND_WORD,
            Self::FindPatients(_) => FindPatientsCommand::COMMAND_WORD,
            Self::ListPatients(_) => ListPatientsCommand::COMMAND_WORD,
            Self::AddAppointment(_) => AddAppointmentCommand::COMMAND_WORD,
            Self::EditAppointment(_) => EditAppointmentCommand::COMMAND_WORD,
            Self::DeleteAppointment(_) => DeleteAppointmentCommand::COMMAND_WORD,
            Self::FindAppointments(_) => FindAppointmentsCommand::COMMAND_WORD,
            Self::ListAppointments(_) => ListAppointmentsCommand::COMMAND_WORD,
            Self::SetAppointmentStatus(command) => command.word(),
            Self::Clear => CLEAR_WORD,
            Self::Help => HELP_WORD,
            Self::Exit => EXIT_WORD,
        }
    }

    /// Whether a successful run changes stored records (and must be persisted).
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::AddPatient(_)
                | Self::EditPatient(_)
                | Self::DeletePatient(_)
                | Self::AddAppointment(_)
                | Self::EditAppointment(_)
                | Self::DeleteAppointment(_)
                | Self::SetAppointmentStatus(_)
                | Self::Clear
        )
    }
}

/// Usage text for every command, one block per command.
pub fn usage_summary() -> String {
    [
        AddPatientCommand::USAGE,
        EditPatientCommand::USAGE,
        DeletePatientCommand::USAGE,
        FindPatientsCommand::USAGE,
        ListPatientsCommand::USAGE,
        AddAppointmentCommand::USAGE,
        EditAppointmentCommand::USAGE,
        DeleteAppointmentCommand::USAGE,
        FindAppointmentsCommand::USAGE,
        ListAppointmentsCommand::USAGE,
        SetAppointmentStatusCommand::USAGE,
        "clear: Deletes every patient and appointment.",
        "exit: Exits the program.",
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::{select, CommandError, Index};
    use crate::model::RecordKind;

    #[test]
    fn select_accepts_first_and_last_positions() {
        let records = ["a", "b", "c"];
        let view: Vec<&&str> = records.iter().collect();

        assert_eq!(*select(&view, Index::from_one_based(1), RecordKind::Patient).unwrap(), "a");
        assert_eq!(*select(&view, Index::from_one_based(3), RecordKind::Patient).unwrap(), "c");
    }

    #[test]
    fn select_rejects_zero_and_past_end() {
        let records = ["a", "b"];
        let view: Vec<&&str> = records.iter().collect();

        for index in [0, 3] {
            let err = select(&view, Index::from_one_based(index), RecordKind::Appointment)
                .unwrap_err();
            assert_eq!(
                err,
                CommandError::IndexOutOfRange {
                    kind: RecordKind::Appointment,
                    index,
                    len: 2,
                }
            );
        }
    }
}
