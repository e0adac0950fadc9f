//! Book repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Own every patient and appointment record in insertion order.
//! - Expose filtered, index-addressable views driven by the active filters.
//! - Enforce identity uniqueness on every write.
//!
//! # Invariants
//! - No two stored patients share an identity; same for appointments.
//! - Every stored appointment refers to a stored patient (by identity).
//! - Replacing a record keeps its position; it is never partially visible.

use crate::model::appointment::Appointment;
use crate::model::patient::{identity_key, Patient};
use crate::model::{Identity, RecordKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Write would make two records of `kind` share an identity.
    Duplicate(RecordKind),
    /// Target record of `kind` is not stored.
    NotFound(RecordKind),
    /// Appointment refers to a patient that is not stored.
    UnknownPatient(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate(kind) => write!(f, "duplicate {kind} record"),
            Self::NotFound(kind) => write!(f, "{kind} record not found"),
            Self::UnknownPatient(name) => {
                write!(f, "appointment refers to unknown patient `{name}`")
            }
        }
    }
}

impl Error for RepoError {}

/// Predicate selecting which patients are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatientFilter {
    #[default]
    All,
    /// Name contains any keyword as a whole word, ignoring case.
    NameKeywords(Vec<String>),
}

impl PatientFilter {
    pub fn matches(&self, patient: &Patient) -> bool {
        match self {
            Self::All => true,
            Self::NameKeywords(keywords) => contains_any_word(patient.name.as_str(), keywords),
        }
    }
}

/// Predicate selecting which appointments are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AppointmentFilter {
    #[default]
    All,
    /// Patient name or description contains any keyword as a whole word.
    Keywords(Vec<String>),
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            Self::All => true,
            Self::Keywords(keywords) => {
                contains_any_word(appointment.patient.name.as_str(), keywords)
                    || contains_any_word(appointment.description.as_str(), keywords)
            }
        }
    }
}

/// Whole-word match, lowercased the same way as name identity.
fn contains_any_word(text: &str, keywords: &[String]) -> bool {
    let keywords: Vec<String> = keywords.iter().map(|keyword| keyword.to_lowercase()).collect();
    text.split_whitespace()
        .map(str::to_lowercase)
        .any(|word| keywords.contains(&word))
}

/// Store contract used by the command layer.
pub trait BookRepository {
    /// All patients in insertion order, ignoring filters.
    fn patients(&self) -> &[Patient];
    /// All appointments in insertion order, ignoring filters.
    fn appointments(&self) -> &[Appointment];
    /// Patients visible under the active patient filter.
    fn filtered_patients(&self) -> Vec<&Patient>;
    /// Appointments visible under the active appointment filter.
    fn filtered_appointments(&self) -> Vec<&Appointment>;
    fn patient_filter(&self) -> &PatientFilter;
    fn appointment_filter(&self) -> &AppointmentFilter;
    fn update_patient_filter(&mut self, filter: PatientFilter);
    fn update_appointment_filter(&mut self, filter: AppointmentFilter);
    /// Whether a patient with the candidate's identity is stored.
    fn has_patient(&self, candidate: &Patient) -> bool;
    /// Whether an appointment with the candidate's identity is stored.
    fn has_appointment(&self, candidate: &Appointment) -> bool;
    /// Looks a patient up by free-text name (case and spacing insensitive).
    fn find_patient_by_name(&self, text: &str) -> Option<&Patient>;
    fn add_patient(&mut self, patient: Patient) -> RepoResult<()>;
    /// Replaces `target` with `edited` and rewrites its appointments to hold `edited`.
    fn set_patient(&mut self, target: &Patient, edited: Patient) -> RepoResult<()>;
    /// Removes `target` and its appointments; returns how many appointments went with it.
    fn remove_patient(&mut self, target: &Patient) -> RepoResult<usize>;
    fn add_appointment(&mut self, appointment: Appointment) -> RepoResult<()>;
    fn set_appointment(&mut self, target: &Appointment, edited: Appointment) -> RepoResult<()>;
    fn remove_appointment(&mut self, target: &Appointment) -> RepoResult<()>;
    /// Drops every record and resets both filters.
    fn clear(&mut self);
}

/// In-memory book; the single owner of all records for the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookRepository {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    patient_filter: PatientFilter,
    appointment_filter: AppointmentFilter,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from previously stored records, re-checking every invariant.
    pub fn from_records(
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
    ) -> RepoResult<Self> {
        let mut repo = Self::new();
        for patient in patients {
            repo.add_patient(patient)?;
        }
        for appointment in appointments {
            repo.add_appointment(appointment)?;
        }
        Ok(repo)
    }

    fn patient_position(&self, target: &Patient) -> RepoResult<usize> {
        self.patients
            .iter()
            .position(|patient| patient == target)
            .ok_or(RepoError::NotFound(RecordKind::Patient))
    }

    fn appointment_position(&self, target: &Appointment) -> RepoResult<usize> {
        self.appointments
            .iter()
            .position(|appointment| appointment == target)
            .ok_or(RepoError::NotFound(RecordKind::Appointment))
    }
}

impl BookRepository for InMemoryBookRepository {
    fn patients(&self) -> &[Patient] {
        &self.patients
    }

    fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn filtered_patients(&self) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|patient| self.patient_filter.matches(patient))
            .collect()
    }

    fn filtered_appointments(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| self.appointment_filter.matches(appointment))
            .collect()
    }

    fn patient_filter(&self) -> &PatientFilter {
        &self.patient_filter
    }

    fn appointment_filter(&self) -> &AppointmentFilter {
        &self.appointment_filter
    }

    fn update_patient_filter(&mut self, filter: PatientFilter) {
        self.patient_filter = filter;
    }

    fn update_appointment_filter(&mut self, filter: AppointmentFilter) {
        self.appointment_filter = filter;
    }

    fn has_patient(&self, candidate: &Patient) -> bool {
        self.patients
            .iter()
            .any(|patient| patient.same_identity(candidate))
    }

    fn has_appointment(&self, candidate: &Appointment) -> bool {
        self.appointments
            .iter()
            .any(|appointment| appointment.same_identity(candidate))
    }

    fn find_patient_by_name(&self, text: &str) -> Option<&Patient> {
        let key = identity_key(text);
        if key.is_empty() {
            return None;
        }
        self.patients
            .iter()
            .find(|patient| patient.name.identity_key() == key)
    }

    fn add_patient(&mut self, patient: Patient) -> RepoResult<()> {
        if self.has_patient(&patient) {
            return Err(RepoError::Duplicate(RecordKind::Patient));
        }
        self.patients.push(patient);
        Ok(())
    }

    fn set_patient(&mut self, target: &Patient, edited: Patient) -> RepoResult<()> {
        let position = self.patient_position(target)?;
        let collides = self
            .patients
            .iter()
            .enumerate()
            .any(|(idx, patient)| idx != position && patient.same_identity(&edited));
        if collides {
            return Err(RepoError::Duplicate(RecordKind::Patient));
        }

        for appointment in &mut self.appointments {
            if appointment.involves(target) {
                appointment.patient = edited.clone();
            }
        }
        self.patients[position] = edited;
        Ok(())
    }

    fn remove_patient(&mut self, target: &Patient) -> RepoResult<usize> {
        let position = self.patient_position(target)?;
        let removed = self.patients.remove(position);
        let before = self.appointments.len();
        self.appointments
            .retain(|appointment| !appointment.involves(&removed));
        Ok(before - self.appointments.len())
    }

    fn add_appointment(&mut self, appointment: Appointment) -> RepoResult<()> {
        if !self.has_patient(&appointment.patient) {
            return Err(RepoError::UnknownPatient(
                appointment.patient.name.as_str().to_string(),
            ));
        }
        if self.has_appointment(&appointment) {
            return Err(RepoError::Duplicate(RecordKind::Appointment));
        }
        self.appointments.push(appointment);
        Ok(())
    }

    fn set_appointment(&mut self, target: &Appointment, edited: Appointment) -> RepoResult<()> {
        let position = self.appointment_position(target)?;
        if !self.has_patient(&edited.patient) {
            return Err(RepoError::UnknownPatient(
                edited.patient.name.as_str().to_string(),
            ));
        }
        let collides = self
            .appointments
            .iter()
            .enumerate()
            .any(|(idx, appointment)| idx != position && appointment.same_identity(&edited));
        if collides {
            return Err(RepoError::Duplicate(RecordKind::Appointment));
        }
        self.appointments[position] = edited;
        Ok(())
    }

    fn remove_appointment(&mut self, target: &Appointment) -> RepoResult<()> {
        let position = self.appointment_position(target)?;
        self.appointments.remove(position);
        Ok(())
    }

    fn clear(&mut self) {
        self.patients.clear();
        self.appointments.clear();
        self.patient_filter = PatientFilter::All;
        self.appointment_filter = AppointmentFilter::All;
    }
}
