use super::tokenizer::{
    tokenize, Prefix, PREFIX_ADDRESS, PREFIX_BIRTHDATE, PREFIX_BLOOD_TYPE, PREFIX_EMAIL,
    PREFIX_GENDER, PREFIX_NAME, PREFIX_PHONE, PREFIX_REMARK, PREFIX_TAG,
};
use super::{
    parse_edit_preamble, parse_index_only, parse_keywords, parse_tag_values, required, ParseError,
    ParseResult,
};
use crate::command::descriptor::EditPatientDescriptor;
use crate::command::patient_commands::{
    AddPatientCommand, DeletePatientCommand, EditPatientCommand, FindPatientsCommand,
};
use crate::command::Command;
use crate::model::patient::{
    Address, Birthdate, BloodType, Email, Gender, Name, Patient, Phone, Remark,
};

const PATIENT_PREFIXES: [Prefix; 9] = [
    PREFIX_NAME,
    PREFIX_GENDER,
    PREFIX_BIRTHDATE,
    PREFIX_BLOOD_TYPE,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_REMARK,
    PREFIX_TAG,
];

const SINGLE_VALUED: [Prefix; 8] = [
    PREFIX_NAME,
    PREFIX_GENDER,
    PREFIX_BIRTHDATE,
    PREFIX_BLOOD_TYPE,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_REMARK,
];

const REQUIRED_FOR_ADD: [Prefix; 7] = [
    PREFIX_NAME,
    PREFIX_GENDER,
    PREFIX_BIRTHDATE,
    PREFIX_BLOOD_TYPE,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
];

pub(super) fn parse_add(args: &str) -> ParseResult<Command> {
    let usage = AddPatientCommand::USAGE;
    let args = tokenize(args, &PATIENT_PREFIXES);
    if !args.preamble().is_empty() || !args.contains_all(&REQUIRED_FOR_ADD) {
        return Err(ParseError::InvalidFormat { usage });
    }
    args.verify_no_duplicate(&SINGLE_VALUED)?;

    let patient = Patient {
        name: Name::new(required(&args, PREFIX_NAME, usage)?)?,
        gender: Gender::parse(required(&args, PREFIX_GENDER, usage)?)?,
        birthdate: Birthdate::parse(required(&args, PREFIX_BIRTHDATE, usage)?)?,
        blood_type: BloodType::parse(required(&args, PREFIX_BLOOD_TYPE, usage)?)?,
        phone: Phone::new(required(&args, PREFIX_PHONE, usage)?)?,
        email: Email::new(required(&args, PREFIX_EMAIL, usage)?)?,
        address: Address::new(required(&args, PREFIX_ADDRESS, usage)?)?,
        remark: args.value(PREFIX_REMARK).map(Remark::new).unwrap_or_default(),
        tags: parse_tag_values(&args)?.unwrap_or_default(),
    };
    Ok(Command::AddPatient(AddPatientCommand::new(patient)))
}

/// Builds the descriptor from whichever prefixes were given; none is not an error here.
pub(super) fn parse_edit(args: &str) -> ParseResult<Command> {
    let args = tokenize(args, &PATIENT_PREFIXES);
    let index = parse_edit_preamble(&args, EditPatientCommand::USAGE)?;
    args.verify_no_duplicate(&SINGLE_VALUED)?;

    let mut descriptor = EditPatientDescriptor::new();
    if let Some(value) = args.value(PREFIX_NAME) {
        descriptor.set_name(Name::new(value)?);
    }
    if let Some(value) = args.value(PREFIX_GENDER) {
        descriptor.set_gender(Gender::parse(value)?);
    }
    if let Some(value) = args.value(PREFIX_BIRTHDATE) {
        descriptor.set_birthdate(Birthdate::parse(value)?);
    }
    if let Some(value) = args.value(PREFIX_BLOOD_TYPE) {
        descriptor.set_blood_type(BloodType::parse(value)?);
    }
    if let Some(value) = args.value(PREFIX_PHONE) {
        descriptor.set_phone(Phone::new(value)?);
    }
    if let Some(value) = args.value(PREFIX_EMAIL) {
        descriptor.set_email(Email::new(value)?);
    }
    if let Some(value) = args.value(PREFIX_ADDRESS) {
        descriptor.set_address(Address::new(value)?);
    }
    if let Some(value) = args.value(PREFIX_REMARK) {
        descriptor.set_remark(Remark::new(value));
    }
    if let Some(tags) = parse_tag_values(&args)? {
        descriptor.set_tags(&tags);
    }
    Ok(Command::EditPatient(EditPatientCommand::new(index, descriptor)))
}

pub(super) fn parse_delete(args: &str) -> ParseResult<Command> {
    let index = parse_index_only(args, DeletePatientCommand::USAGE)?;
    Ok(Command::DeletePatient(DeletePatientCommand::new(index)))
}

pub(super) fn parse_find(args: &str) -> ParseResult<Command> {
    let keywords = parse_keywords(args, FindPatientsCommand::USAGE)?;
    Ok(Command::FindPatients(FindPatientsCommand::new(keywords)))
}
