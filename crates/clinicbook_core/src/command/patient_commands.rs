//! Patient commands: add, edit, delete, find, list.

use super::apply::apply_patient_edit;
use super::descriptor::EditPatientDescriptor;
use super::guard::is_duplicate;
use super::{select, CommandError, CommandOutput, CommandResult, Index};
use crate::model::patient::Patient;
use crate::model::RecordKind;
use crate::repo::book_repo::{BookRepository, PatientFilter};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPatientCommand {
    patient: Patient,
}

impl AddPatientCommand {
    pub const COMMAND_WORD: &'static str = "add";
    pub const USAGE: &'static str = "add: Adds a patient to the clinic book.\n\
        Parameters: n/NAME g/GENDER b/BIRTHDATE bt/BLOOD_TYPE p/PHONE e/EMAIL a/ADDRESS \
        [r/REMARK] [t/TAG]...\n\
        Example: add n/John Doe g/male b/1990-04-12 bt/O+ p/98765432 \
        e/johnd@example.com a/311, Clementi Ave 2, #02-25 t/diabetic";

    pub fn new(patient: Patient) -> Self {
        Self { patient }
    }

    pub fn patient(&self) -> &Patient {
        &self.patient
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        if is_duplicate(&self.patient, None, repo.patients()) {
            return Err(CommandError::DuplicateRecord(RecordKind::Patient));
        }
        repo.add_patient(self.patient.clone())?;
        Ok(CommandOutput::message(format!(
            "New patient added: {}",
            self.patient
        )))
    }
}

/// Edits the patient at a displayed index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPatientCommand {
    index: Index,
    descriptor: EditPatientDescriptor,
}

impl EditPatientCommand {
    pub const COMMAND_WORD: &'static str = "edit";
    pub const USAGE: &'static str = "edit: Edits the patient identified by the index number \
        used in the displayed patient list.\n\
        Existing values will be overwritten by the input values.\n\
        Parameters: INDEX (must be a positive integer) [n/NAME] [g/GENDER] [b/BIRTHDATE] \
        [bt/BLOOD_TYPE] [p/PHONE] [e/EMAIL] [a/ADDRESS] [r/REMARK] [t/TAG]...\n\
        Example: edit 1 p/91234567 e/johndoe@example.com";

    pub fn new(index: Index, descriptor: EditPatientDescriptor) -> Self {
        Self { index, descriptor }
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn descriptor(&self) -> &EditPatientDescriptor {
        &self.descriptor
    }

    /// Runs resolve -> no-op check -> merge -> duplicate guard -> commit.
    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let target = {
            let view = repo.filtered_patients();
            select(&view, self.index, RecordKind::Patient)?.clone()
        };
        if !self.descriptor.is_any_field_edited() {
            return Err(CommandError::NoFieldsEdited);
        }

        let edited = apply_patient_edit(&target, &self.descriptor);
        if is_duplicate(&edited, Some(&target), repo.patients()) {
            return Err(CommandError::DuplicateRecord(RecordKind::Patient));
        }

        debug!(
            "event=command_commit module=command command={} index={}",
            Self::COMMAND_WORD,
            self.index.one_based()
        );
        repo.set_patient(&target, edited.clone())?;
        repo.update_patient_filter(PatientFilter::All);
        Ok(CommandOutput::message(format!("Edited Patient: {edited}")))
    }
}

/// Deletes the patient at a displayed index, with that patient's appointments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePatientCommand {
    index: Index,
}

impl DeletePatientCommand {
    pub const COMMAND_WORD: &'static str = "delete";
    pub const USAGE: &'static str = "delete: Deletes the patient identified by the index number \
        used in the displayed patient list, together with the patient's appointments.\n\
        Parameters: INDEX (must be a positive integer)\n\
        Example: delete 1";

    pub fn new(index: Index) -> Self {
        Self { index }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        let target = {
            let view = repo.filtered_patients();
            select(&view, self.index, RecordKind::Patient)?.clone()
        };
        let removed_appointments = repo.remove_patient(&target)?;

        let mut feedback = format!("Deleted Patient: {target}");
        if removed_appointments > 0 {
            feedback.push_str(&format!(
                "\nAlso removed {removed_appointments} appointment(s) of this patient."
            ));
        }
        Ok(CommandOutput::message(feedback))
    }
}

/// Filters patients by name keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindPatientsCommand {
    keywords: Vec<String>,
}

impl FindPatientsCommand {
    pub const COMMAND_WORD: &'static str = "find";
    pub const USAGE: &'static str = "find: Finds all patients whose names contain any of \
        the specified keywords (case-insensitive) and displays them as a list with index numbers.\n\
        Parameters: KEYWORD [MORE_KEYWORDS]...\n\
        Example: find alice bob charlie";

    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        repo.update_patient_filter(PatientFilter::NameKeywords(self.keywords.clone()));
        let shown = repo.filtered_patients().len();
        Ok(CommandOutput::listing(
            format!("{shown} patients listed!"),
            RecordKind::Patient,
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPatientsCommand;

impl ListPatientsCommand {
    pub const COMMAND_WORD: &'static str = "list";
    pub const USAGE: &'static str = "list: Lists all patients.";

    pub fn execute<R: BookRepository + ?Sized>(&self, repo: &mut R) -> CommandResult<CommandOutput> {
        repo.update_patient_filter(PatientFilter::All);
        Ok(CommandOutput::listing(
            "Listed all patients",
            RecordKind::Patient,
        ))
    }
}
