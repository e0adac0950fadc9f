//! Edit descriptors: sparse patches naming only the fields to overwrite.
//!
//! # Invariants
//! - Every slot is an explicit `Option`; `None` means "leave unchanged".
//! - `Some(empty tag set)` means "clear all tags" and is distinct from `None`.
//! - Reading a slot never mutates the descriptor.
//! - The appointment patient slot is resolved in a separate, explicit phase.

use super::{CommandError, CommandResult};
use crate::model::appointment::Description;
use crate::model::patient::{
    Address, Birthdate, BloodType, Email, Gender, Name, Patient, Phone, Remark,
};
use crate::model::tag::{Tag, TagSet};
use crate::repo::book_repo::BookRepository;
use chrono::NaiveDateTime;

/// Fields to overwrite on a patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPatientDescriptor {
    name: Option<Name>,
    gender: Option<Gender>,
    birthdate: Option<Birthdate>,
    blood_type: Option<BloodType>,
    phone: Option<Phone>,
    email: Option<Email>,
    address: Option<Address>,
    remark: Option<Remark>,
    tags: Option<TagSet>,
}

impl EditPatientDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when at least one slot is present.
    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.gender.is_some()
            || self.birthdate.is_some()
            || self.blood_type.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.remark.is_some()
            || self.tags.is_some()
    }

    pub fn set_name(&mut self, name: Name) {
        self.name = Some(name);
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn set_birthdate(&mut self, birthdate: Birthdate) {
        self.birthdate = Some(birthdate);
    }

    pub fn birthdate(&self) -> Option<Birthdate> {
        self.birthdate
    }

    pub fn set_blood_type(&mut self, blood_type: BloodType) {
        self.blood_type = Some(blood_type);
    }

    pub fn blood_type(&self) -> Option<BloodType> {
        self.blood_type
    }

    pub fn set_phone(&mut self, phone: Phone) {
        self.phone = Some(phone);
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = Some(email);
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = Some(address);
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn set_remark(&mut self, remark: Remark) {
        self.remark = Some(remark);
    }

    pub fn remark(&self) -> Option<&Remark> {
        self.remark.as_ref()
    }

    /// Stores an owned copy of `tags`; an empty set clears tags on apply.
    pub fn set_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a Tag>) {
        self.tags = Some(tags.into_iter().cloned().collect());
    }

    pub fn tags(&self) -> Option<&TagSet> {
        self.tags.as_ref()
    }
}

/// Patient reference carried by an appointment descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientRef {
    /// Raw text from the command line, not looked up yet.
    Pending(String),
    Resolved(Patient),
}

impl PatientRef {
    /// Looks a pending name up in `repo`; resolved references are returned as-is.
    pub fn resolve<R: BookRepository + ?Sized>(&self, repo: &R) -> CommandResult<Patient> {
        match self {
            Self::Resolved(patient) => Ok(patient.clone()),
            Self::Pending(text) => repo
                .find_patient_by_name(text)
                .cloned()
                .ok_or_else(|| CommandError::ReferenceResolution(text.clone())),
        }
    }
}

/// Fields to overwrite on an appointment.
///
/// Status is intentionally absent: edits can never change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditAppointmentDescriptor {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    patient: Option<PatientRef>,
    description: Option<Description>,
    tags: Option<TagSet>,
}

impl EditAppointmentDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when at least one slot is present.
    pub fn is_any_field_edited(&self) -> bool {
        self.start.is_some()
            || self.end.is_some()
            || self.patient.is_some()
            || self.description.is_some()
            || self.tags.is_some()
    }

    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.start = Some(start);
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn set_end(&mut self, end: NaiveDateTime) {
        self.end = Some(end);
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Records a patient name to be looked up during resolution.
    pub fn set_patient_name(&mut self, text: impl Into<String>) {
        self.patient = Some(PatientRef::Pending(text.into()));
    }

    pub fn set_patient(&mut self, patient: Patient) {
        self.patient = Some(PatientRef::Resolved(patient));
    }

    pub fn patient(&self) -> Option<&PatientRef> {
        self.patient.as_ref()
    }

    pub fn set_description(&mut self, description: Description) {
        self.description = Some(description);
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Stores an owned copy of `tags`; an empty set clears tags on apply.
    pub fn set_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a Tag>) {
        self.tags = Some(tags.into_iter().cloned().collect());
    }

    pub fn tags(&self) -> Option<&TagSet> {
        self.tags.as_ref()
    }

    /// Resolution phase: returns a copy whose patient slot, if present, is resolved.
    ///
    /// # Errors
    /// - `ReferenceResolution` when a pending name matches no stored patient.
    pub fn resolve<R: BookRepository + ?Sized>(&self, repo: &R) -> CommandResult<Self> {
        let patient = match &self.patient {
            Some(reference) => Some(PatientRef::Resolved(reference.resolve(repo)?)),
            None => None,
        };
        Ok(Self {
            patient,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EditAppointmentDescriptor, EditPatientDescriptor, PatientRef};
    use crate::model::patient::Remark;
    use crate::model::tag::{parse_tags, TagSet};

    #[test]
    fn empty_descriptors_report_no_edits() {
        assert!(!EditPatientDescriptor::new().is_any_field_edited());
        assert!(!EditAppointmentDescriptor::new().is_any_field_edited());
    }

    #[test]
    fn empty_tag_set_counts_as_an_edit() {
        let mut descriptor = EditPatientDescriptor::new();
        descriptor.set_tags(&TagSet::new());
        assert!(descriptor.is_any_field_edited());
        assert_eq!(descriptor.tags(), Some(&TagSet::new()));
    }

    #[test]
    fn empty_remark_counts_as_an_edit() {
        let mut descriptor = EditPatientDescriptor::new();
        descriptor.set_remark(Remark::new(""));
        assert!(descriptor.is_any_field_edited());
    }

    #[test]
    fn tags_are_copied_at_set_time() {
        let mut source = parse_tags(["diabetic"]).unwrap();
        let mut descriptor = EditAppointmentDescriptor::new();
        descriptor.set_tags(&source);

        source.clear();

        assert_eq!(descriptor.tags().map(TagSet::len), Some(1));
    }

    #[test]
    fn equality_includes_pending_reference_text() {
        let mut first = EditAppointmentDescriptor::new();
        first.set_patient_name("Alex Yeoh");
        let mut second = EditAppointmentDescriptor::new();
        second.set_patient_name("Alex Yeoh");
        let mut third = EditAppointmentDescriptor::new();
        third.set_patient_name("Bernice Yu");

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert!(matches!(first.patient(), Some(PatientRef::Pending(text)) if text == "Alex Yeoh"));
    }
}
