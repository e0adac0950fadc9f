//! Merge engine: builds a new record from an existing one plus a descriptor.
//!
//! # Invariants
//! - Each field is the descriptor's value when present, else the existing value.
//! - Appointment status is always carried over from the existing record.
//! - A mixed old/new start and end is re-validated as one time range.
//! - The existing record is never modified.

use super::descriptor::{EditAppointmentDescriptor, EditPatientDescriptor};
use super::{CommandError, CommandResult};
use crate::model::appointment::{Appointment, AppointmentTime};
use crate::model::patient::Patient;
use crate::repo::book_repo::BookRepository;

/// Applies `descriptor` to `existing`. Patient edits cannot fail once parsed.
pub fn apply_patient_edit(existing: &Patient, descriptor: &EditPatientDescriptor) -> Patient {
    Patient {
        name: descriptor.name().unwrap_or(&existing.name).clone(),
        gender: descriptor.gender().unwrap_or(existing.gender),
        birthdate: descriptor.birthdate().unwrap_or(existing.birthdate),
        blood_type: descriptor.blood_type().unwrap_or(existing.blood_type),
        phone: descriptor.phone().unwrap_or(&existing.phone).clone(),
        email: descriptor.email().unwrap_or(&existing.email).clone(),
        address: descriptor.address().unwrap_or(&existing.address).clone(),
        remark: descriptor.remark().unwrap_or(&existing.remark).clone(),
        tags: descriptor.tags().unwrap_or(&existing.tags).clone(),
    }
}

/// Applies `descriptor` to `existing`, resolving a pending patient name in `repo`.
///
/// # Errors
/// - `InvalidTimeRange` when the resulting end is not after the resulting start.
/// - `ReferenceResolution` when a pending patient name is unknown.
pub fn apply_appointment_edit<R: BookRepository + ?Sized>(
    existing: &Appointment,
    descriptor: &EditAppointmentDescriptor,
    repo: &R,
) -> CommandResult<Appointment> {
    let start = descriptor.start().unwrap_or(existing.time.start());
    let end = descriptor.end().unwrap_or(existing.time.end());
    let time = AppointmentTime::new(start, end).map_err(CommandError::InvalidTimeRange)?;

    let patient = match descriptor.patient() {
        Some(reference) => reference.resolve(repo)?,
        None => existing.patient.clone(),
    };

    Ok(Appointment {
        time,
        patient,
        description: descriptor
            .description()
            .unwrap_or(&existing.description)
            .clone(),
        tags: descriptor.tags().unwrap_or(&existing.tags).clone(),
        status: existing.status,
    })
}
