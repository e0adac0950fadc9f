//! Appointment commands: add, edit, delete, find, list, status changes.

use super::apply::apply_appointment_edit;
use super::descriptor::{EditAppointmentDescriptor, PatientRef};
use super::guard::is_duplicate;
use super::{select, CommandError, CommandOutput, CommandResult, Index};
use crate::model::appointment::{Appointment, AppointmentStatus, AppointmentTime, Description};
use crate::model::tag::TagSet;
use crate::model::RecordKind;
use crate::repo::book_repo::{AppointmentFilter, BookRepository};
use log::debug;

/// Adds a pending appointment for a patient named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAppointmentCommand {
    time: AppointmentTime,
    patient: PatientRef,
    description: Description,
    tags: TagSet,
}

impl AddAppointmentCommand {
    pub const COMMAND_WORD: &'static str = "a-add";
    pub const USAGE: &'static str = "a-add: Adds an appointment to the clinic book.\n\
        Parameters: s/START e/END pt/PATIENT d/DESCRIPTION [t/TAG]...\n\
        Example: a-add s/2020-02-05 09:00 e/2020-02-05 10:00 pt/Alex Yeoh \
        d/Physiotherapy t/followup";

    pub fn new(
        time: AppointmentTime,
        patient: PatientRef,
        description: Description,
        tags: TagSet,
    ) -> Self {
        Self {
            time,
            patient,
            description,
            tags,
        }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let patient = self.patient.resolve(&*repo)?;
        let appointment = Appointment::new(
            self.time,
            patient,
            self.description.clone(),
            self.tags.clone(),
        );
        if is_duplicate(&appointment, None, repo.appointments()) {
            return Err(CommandError::DuplicateRecord(RecordKind::Appointment));
        }

        let feedback = format!("New appointment added: {appointment}");
        repo.add_appointment(appointment)?;
        Ok(CommandOutput::message(feedback))
    }
}

/// Edits the appointment at a displayed index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAppointmentCommand {
    index: Index,
    descriptor: EditAppointmentDescriptor,
}

impl EditAppointmentCommand {
    pub const COMMAND_WORD: &'static str = "a-edit";
    pub const USAGE: &'static str = "a-edit: Edits the details of the appointment identified \
        by the index number used in the displayed appointment list.\n\
        Existing values will be overwritten by the input values.\n\
        Parameters: INDEX (must be a positive integer) [s/START] [e/END] [pt/PATIENT] \
        [d/DESCRIPTION] [t/TAG]...\n\
        Example: a-edit 1 s/2020-02-05 09:00 d/Therapy session";

    pub fn new(index: Index, descriptor: EditAppointmentDescriptor) -> Self {
        Self { index, descriptor }
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn descriptor(&self) -> &EditAppointmentDescriptor {
        &self.descriptor
    }

    /// Runs resolve -> no-op check -> patient resolution -> merge -> duplicate guard -> commit.
    ///
    /// # Errors
    /// - `IndexOutOfRange`, `NoFieldsEdited`, `ReferenceResolution`,
    ///   `InvalidTimeRange`, `DuplicateRecord`, in that precedence.
    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let target = {
            let view = repo.filtered_appointments();
            select(&view, self.index, RecordKind::Appointment)?.clone()
        };
        if !self.descriptor.is_any_field_edited() {
            return Err(CommandError::NoFieldsEdited);
        }

        let descriptor = self.descriptor.resolve(&*repo)?;
        let edited = apply_appointment_edit(&target, &descriptor, &*repo)?;
        if is_duplicate(&edited, Some(&target), repo.appointments()) {
            return Err(CommandError::DuplicateRecord(RecordKind::Appointment));
        }

        debug!(
            "event=command_commit module=command command={} index={}",
            Self::COMMAND_WORD,
            self.index.one_based()
        );
        repo.set_appointment(&target, edited.clone())?;
        repo.update_appointment_filter(AppointmentFilter::All);
        Ok(CommandOutput::message(format!(
            "Edited Appointment: {edited}"
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAppointmentCommand {
    index: Index,
}

impl DeleteAppointmentCommand {
    pub const COMMAND_WORD: &'static str = "a-delete";
    pub const USAGE: &'static str = "a-delete: Deletes the appointment identified by the index \
        number used in the displayed appointment list.\n\
        Parameters: INDEX (must be a positive integer)\n\
        Example: a-delete 1";

    pub fn new(index: Index) -> Self {
        Self { index }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let target = {
            let view = repo.filtered_appointments();
            select(&view, self.index, RecordKind::Appointment)?.clone()
        };
        repo.remove_appointment(&target)?;
        Ok(CommandOutput::message(format!(
            "Deleted Appointment: {target}"
        )))
    }
}

/// Filters appointments by patient-name or description keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindAppointmentsCommand {
    keywords: Vec<String>,
}

impl FindAppointmentsCommand {
    pub const COMMAND_WORD: &'static str = "a-find";
    pub const USAGE: &'static str = "a-find: Finds all appointments whose patient name or \
        description contains any of the specified keywords (case-insensitive).\n\
        Parameters: KEYWORD [MORE_KEYWORDS]...\n\
        Example: a-find alex therapy";

    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        repo.update_appointment_filter(AppointmentFilter::Keywords(self.keywords.clone()));
        let shown = repo.filtered_appointments().len();
        Ok(CommandOutput::listing(
            format!("{shown} appointments listed!"),
            RecordKind::Appointment,
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListAppointmentsCommand;

impl ListAppointmentsCommand {
    pub const COMMAND_WORD: &'static str = "a-list";
    pub const USAGE: &'static str = "a-list: Lists all appointments.";

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        repo.update_appointment_filter(AppointmentFilter::All);
        Ok(CommandOutput::listing(
            "Listed all appointments",
            RecordKind::Appointment,
        ))
    }
}

/// Moves the appointment at a displayed index to another status.
///
/// The only command allowed to change status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAppointmentStatusCommand {
    index: Index,
    status: AppointmentStatus,
}

impl SetAppointmentStatusCommand {
    pub const MARK_WORD: &'static str = "a-mark";
    pub const MISS_WORD: &'static str = "a-miss";
    pub const UNMARK_WORD: &'static str = "a-unmark";
    pub const USAGE: &'static str = "a-mark / a-miss / a-unmark: Marks the appointment \
        identified by the index number used in the displayed appointment list as completed, \
        missed, or pending again.\n\
        Parameters: INDEX (must be a positive integer)\n\
        Example: a-mark 2";

    pub fn new(index: Index, status: AppointmentStatus) -> Self {
        Self { index, status }
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn word(&self) -> &'static str {
        match self.status {
            AppointmentStatus::Completed => Self::MARK_WORD,
            AppointmentStatus::Missed => Self::MISS_WORD,
            AppointmentStatus::Pending => Self::UNMARK_WORD,
        }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let target = {
            let view = repo.filtered_appointments();
            select(&view, self.index, RecordKind::Appointment)?.clone()
        };
        let updated = target.with_status(self.status);
        repo.set_appointment(&target, updated.clone())?;
        Ok(CommandOutput::message(format!(
            "Appointment marked as {}: {updated}",
            self.status.as_str()
        )))
    }
}
