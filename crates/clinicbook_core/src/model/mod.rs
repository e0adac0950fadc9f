//! Domain model for patients and appointments.
//!
//! # Responsibility
//! - Define validated field types and the two record types kept by the book.
//! - Separate logical identity (`Identity`) from structural equality (`PartialEq`).
//!
//! # Invariants
//! - Every field type is validated at construction; a constructed record is valid.
//! - Records are plain values: replacing one means building a new value.

use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment;
pub mod patient;
pub mod tag;

/// Logical identity over the subset of fields that define "the same entity".
///
/// Deliberately distinct from `PartialEq`, which compares every field.
pub trait Identity {
    fn same_identity(&self, other: &Self) -> bool;
}

/// The two record families stored in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Patient,
    Appointment,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Appointment => "appointment",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidName(String),
    InvalidGender(String),
    InvalidBirthdate(String),
    InvalidBloodType(String),
    InvalidPhone(String),
    InvalidEmail(String),
    BlankAddress,
    InvalidTag(String),
    BlankDescription,
    InvalidDateTime(String),
    /// `end` must be strictly after `start`.
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(
                f,
                "invalid name `{value}`: names contain alphanumeric words separated by spaces"
            ),
            Self::InvalidGender(value) => {
                write!(f, "invalid gender `{value}`: expected male|female|other")
            }
            Self::InvalidBirthdate(value) => {
                write!(f, "invalid birthdate `{value}`: expected YYYY-MM-DD")
            }
            Self::InvalidBloodType(value) => write!(
                f,
                "invalid blood type `{value}`: expected one of A+ A- B+ B- AB+ AB- O+ O-"
            ),
            Self::InvalidPhone(value) => write!(
                f,
                "invalid phone `{value}`: phone numbers contain only digits, at least 3"
            ),
            Self::InvalidEmail(value) => {
                write!(f, "invalid email `{value}`: expected local-part@domain")
            }
            Self::BlankAddress => write!(f, "address must not be blank"),
            Self::InvalidTag(value) => {
                write!(f, "invalid tag `{value}`: tags are single alphanumeric words")
            }
            Self::BlankDescription => write!(f, "description must not be blank"),
            Self::InvalidDateTime(value) => {
                write!(f, "invalid date-time `{value}`: expected YYYY-MM-DD HH:MM")
            }
            Self::InvalidTimeRange { start, end } => write!(
                f,
                "appointment end ({}) must be after start ({})",
                end.format(appointment::DATE_TIME_FORMAT),
                start.format(appointment::DATE_TIME_FORMAT)
            ),
        }
    }
}

impl Error for ValidationError {}
