//! Appointment record.
//!
//! # Responsibility
//! - Hold one scheduled visit for one patient.
//! - Validate the start/end pair as one compound value.
//!
//! # Invariants
//! - `AppointmentTime::end` is strictly after `AppointmentTime::start`.
//! - Identity is the time range plus the patient's identity.
//! - Status only changes through explicit status transitions, never through edits.

use super::patient::Patient;
use super::tag::{format_tags, TagSet};
use super::{Identity, ValidationError};
use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

/// Input/output format for appointment date-times.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses `YYYY-MM-DD HH:MM`.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT)
        .map_err(|_| ValidationError::InvalidDateTime(value.to_string()))
}

/// Validated start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppointmentTime {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl AppointmentTime {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl Display for AppointmentTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_TIME_FORMAT),
            self.end.format(DATE_TIME_FORMAT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Scheduled, outcome not recorded yet.
    Pending,
    Completed,
    Missed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }
}

/// Appointment record. Holds its patient by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub time: AppointmentTime,
    pub patient: Patient,
    pub description: Description,
    pub tags: TagSet,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Creates a pending appointment.
    pub fn new(
        time: AppointmentTime,
        patient: Patient,
        description: Description,
        tags: TagSet,
    ) -> Self {
        Self {
            time,
            patient,
            description,
            tags,
            status: AppointmentStatus::Pending,
        }
    }

    /// Returns a copy carrying `status`; every other field is unchanged.
    pub fn with_status(&self, status: AppointmentStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Whether this appointment belongs to `patient` (by identity).
    pub fn involves(&self, patient: &Patient) -> bool {
        self.patient.same_identity(patient)
    }
}

impl Identity for Appointment {
    fn same_identity(&self, other: &Self) -> bool {
        self.time == other.time && self.patient.same_identity(&other.patient)
    }
}

impl Display for Appointment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; Patient: {}; Description: {}; Status: {}",
            self.time,
            self.patient.name.as_str(),
            self.description.as_str(),
            self.status.as_str()
        )?;
        if !self.tags.is_empty() {
            write!(f, "; Tags: {}", format_tags(&self.tags))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date_time, AppointmentStatus, AppointmentTime, Description};
    use crate::model::ValidationError;

    #[test]
    fn time_range_requires_end_after_start() {
        let start = parse_date_time("2020-02-05 09:00").unwrap();
        let end = parse_date_time("2020-02-05 10:00").unwrap();

        assert!(AppointmentTime::new(start, end).is_ok());
        assert_eq!(
            AppointmentTime::new(end, start).unwrap_err(),
            ValidationError::InvalidTimeRange {
                start: end,
                end: start
            }
        );
        assert!(AppointmentTime::new(start, start).is_err());
    }

    #[test]
    fn date_time_parse_rejects_other_formats() {
        assert!(parse_date_time("05/02/2020 09:00").is_err());
        assert!(parse_date_time("2020-02-05").is_err());
    }

    #[test]
    fn time_range_renders_both_ends() {
        let time = AppointmentTime::new(
            parse_date_time("2020-02-05 09:00").unwrap(),
            parse_date_time("2020-02-05 09:30").unwrap(),
        )
        .unwrap();
        assert_eq!(time.to_string(), "2020-02-05 09:00 to 2020-02-05 09:30");
    }

    #[test]
    fn status_string_mapping_is_stable() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Completed,
            AppointmentStatus::Missed,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("done"), None);
    }

    #[test]
    fn description_rejects_blank() {
        assert_eq!(
            Description::new(" ").unwrap_err(),
            ValidationError::BlankDescription
        );
    }
}
