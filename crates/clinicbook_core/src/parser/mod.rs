//! Command-line parsing into executable [`Command`] values.
//!
//! # Responsibility
//! - Split a line into command word and arguments.
//! - Validate every field value before a command is built.
//!
//! # Invariants
//! - Parsing never reads the book; patient names stay pending until execution.
//! - Indices are positive integers; anything else is rejected here.

use crate::command::appointment_commands::{
    AddAppointmentCommand, DeleteAppointmentCommand, EditAppointmentCommand,
    FindAppointmentsCommand, ListAppointmentsCommand, SetAppointmentStatusCommand,
};
use crate::command::patient_commands::{
    AddPatientCommand, DeletePatientCommand, EditPatientCommand, FindPatientsCommand,
    ListPatientsCommand,
};
use crate::command::{Command, Index, CLEAR_WORD, EXIT_WORD, HELP_WORD};
use crate::model::appointment::AppointmentStatus;
use crate::model::tag::{parse_tags, TagSet};
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod appointment_parser;
mod patient_parser;
pub mod tokenizer;

use tokenizer::{ArgumentMultimap, Prefix, PREFIX_TAG};

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyInput,
    UnknownCommand(String),
    /// Arguments do not fit the command shape; carries the command usage.
    InvalidFormat { usage: &'static str },
    /// Preamble that is not a positive integer.
    InvalidIndex(String),
    InvalidValue(ValidationError),
    /// Single-valued prefixes given more than once.
    DuplicatePrefix(Vec<&'static str>),
}

impl ParseError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::InvalidIndex(_) => "invalid_index",
            Self::InvalidValue(_) => "invalid_value",
            Self::DuplicatePrefix(_) => "duplicate_prefix",
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => {
                write!(f, "No command entered. Type `{HELP_WORD}` to see all commands.")
            }
            Self::UnknownCommand(word) => {
                write!(f, "Unknown command `{word}`. Type `{HELP_WORD}` to see all commands.")
            }
            Self::InvalidFormat { usage } => write!(f, "Invalid command format!\n{usage}"),
            Self::InvalidIndex(text) => {
                write!(f, "Index is not a positive integer: `{text}`.")
            }
            Self::InvalidValue(err) => write!(f, "{err}"),
            Self::DuplicatePrefix(prefixes) => write!(
                f,
                "Multiple values specified for the following single-valued field(s): {}",
                prefixes.join(" ")
            ),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ParseError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidValue(value)
    }
}

/// Parses one line of user input.
///
/// # Errors
/// - `EmptyInput` for a blank line, `UnknownCommand` for an unrecognised word.
/// - Command-specific format, index, and field errors otherwise.
pub fn parse_command(line: &str) -> ParseResult<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let (word, args) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word {
        AddPatientCommand::COMMAND_WORD => patient_parser::parse_add(args),
        EditPatientCommand::COMMAND_WORD => patient_parser::parse_edit(args),
        DeletePatientCommand::COMMAND_WORD => patient_parser::parse_delete(args),
        FindPatientsCommand::COMMAND_WORD => patient_parser::parse_find(args),
        ListPatientsCommand::COMMAND_WORD => Ok(Command::ListPatients(ListPatientsCommand)),
        AddAppointmentCommand::COMMAND_WORD => appointment_parser::parse_add(args),
        EditAppointmentCommand::COMMAND_WORD => appointment_parser::parse_edit(args),
        DeleteAppointmentCommand::COMMAND_WORD => appointment_parser::parse_delete(args),
        FindAppointmentsCommand::COMMAND_WORD => appointment_parser::parse_find(args),
        ListAppointmentsCommand::COMMAND_WORD => {
            Ok(Command::ListAppointments(ListAppointmentsCommand))
        }
        SetAppointmentStatusCommand::MARK_WORD => {
            appointment_parser::parse_status(args, AppointmentStatus::Completed)
        }
        SetAppointmentStatusCommand::MISS_WORD => {
            appointment_parser::parse_status(args, AppointmentStatus::Missed)
        }
        SetAppointmentStatusCommand::UNMARK_WORD => {
            appointment_parser::parse_status(args, AppointmentStatus::Pending)
        }
        CLEAR_WORD => Ok(Command::Clear),
        HELP_WORD => Ok(Command::Help),
        EXIT_WORD => Ok(Command::Exit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Parses a 1-based display index.
///
/// # Errors
/// - `InvalidIndex` for zero, negatives, or non-numeric text.
pub fn parse_index(text: &str) -> ParseResult<Index> {
    let trimmed = text.trim();
    match trimmed.parse::<usize>() {
        Ok(value) if value > 0 => Ok(Index::from_one_based(value)),
        _ => Err(ParseError::InvalidIndex(trimmed.to_string())),
    }
}

/// Index-only commands: the whole argument string must be the index.
fn parse_index_only(args: &str, usage: &'static str) -> ParseResult<Index> {
    if args.is_empty() {
        return Err(ParseError::InvalidFormat { usage });
    }
    parse_index(args)
}

/// Preamble of an edit command: must be present and hold only the index.
fn parse_edit_preamble(args: &ArgumentMultimap, usage: &'static str) -> ParseResult<Index> {
    parse_index_only(args.preamble(), usage)
}

fn parse_keywords(args: &str, usage: &'static str) -> ParseResult<Vec<String>> {
    let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if keywords.is_empty() {
        return Err(ParseError::InvalidFormat { usage });
    }
    Ok(keywords)
}

/// Tags given with `t/`; `None` when no `t/` was given.
///
/// A single empty `t/` yields an empty set, meaning "clear tags".
fn parse_tag_values(args: &ArgumentMultimap) -> ParseResult<Option<TagSet>> {
    let values = args.all_values(PREFIX_TAG);
    match values {
        [] => Ok(None),
        [only] if only.is_empty() => Ok(Some(TagSet::new())),
        _ => Ok(Some(parse_tags(values.iter().map(String::as_str))?)),
    }
}

fn required<'a>(
    args: &'a ArgumentMultimap,
    prefix: Prefix,
    usage: &'static str,
) -> ParseResult<&'a str> {
    args.value(prefix)
        .ok_or(ParseError::InvalidFormat { usage })
}
