use super::tokenizer::{
    tokenize, Prefix, PREFIX_DESCRIPTION, PREFIX_END, PREFIX_PATIENT, PREFIX_START, PREFIX_TAG,
};
use super::{
    parse_edit_preamble, parse_index_only, parse_keywords, parse_tag_values, required, ParseError,
    ParseResult,
};
use crate::command::appointment_commands::{
    AddAppointmentCommand, DeleteAppointmentCommand, EditAppointmentCommand,
    FindAppointmentsCommand, SetAppointmentStatusCommand,
};
use crate::command::descriptor::{EditAppointmentDescriptor, PatientRef};
use crate::command::Command;
use crate::model::appointment::{
    parse_date_time, AppointmentStatus, AppointmentTime, Description,
};
use crate::model::patient::Name;

const APPOINTMENT_PREFIXES: [Prefix; 5] = [
    PREFIX_START,
    PREFIX_END,
    PREFIX_PATIENT,
    PREFIX_DESCRIPTION,
    PREFIX_TAG,
];

const SINGLE_VALUED: [Prefix; 4] = [PREFIX_START, PREFIX_END, PREFIX_PATIENT, PREFIX_DESCRIPTION];

pub(super) fn parse_add(args: &str) -> ParseResult<Command> {
    let usage = AddAppointmentCommand::USAGE;
    let args = tokenize(args, &APPOINTMENT_PREFIXES);
    if !args.preamble().is_empty() || !args.contains_all(&SINGLE_VALUED) {
        return Err(ParseError::InvalidFormat { usage });
    }
    args.verify_no_duplicate(&SINGLE_VALUED)?;

    let start = parse_date_time(required(&args, PREFIX_START, usage)?)?;
    let end = parse_date_time(required(&args, PREFIX_END, usage)?)?;
    let time = AppointmentTime::new(start, end)?;
    let patient = Name::new(required(&args, PREFIX_PATIENT, usage)?)?;
    let description = Description::new(required(&args, PREFIX_DESCRIPTION, usage)?)?;
    let tags = parse_tag_values(&args)?.unwrap_or_default();

    Ok(Command::AddAppointment(AddAppointmentCommand::new(
        time,
        PatientRef::Pending(patient.as_str().to_string()),
        description,
        tags,
    )))
}

/// Start and end are checked against each other only after the merge.
pub(super) fn parse_edit(args: &str) -> ParseResult<Command> {
    let args = tokenize(args, &APPOINTMENT_PREFIXES);
    let index = parse_edit_preamble(&args, EditAppointmentCommand::USAGE)?;
    args.verify_no_duplicate(&SINGLE_VALUED)?;

    let mut descriptor = EditAppointmentDescriptor::new();
    if let Some(value) = args.value(PREFIX_START) {
        descriptor.set_start(parse_date_time(value)?);
    }
    if let Some(value) = args.value(PREFIX_END) {
        descriptor.set_end(parse_date_time(value)?);
    }
    if let Some(value) = args.value(PREFIX_PATIENT) {
        descriptor.set_patient_name(Name::new(value)?.as_str());
    }
    if let Some(value) = args.value(PREFIX_DESCRIPTION) {
        descriptor.set_description(Description::new(value)?);
    }
    if let Some(tags) = parse_tag_values(&args)? {
        descriptor.set_tags(&tags);
    }
    Ok(Command::EditAppointment(EditAppointmentCommand::new(
        index, descriptor,
    )))
}

pub(super) fn parse_delete(args: &str) -> ParseResult<Command> {
    let index = parse_index_only(args, DeleteAppointmentCommand::USAGE)?;
    Ok(Command::DeleteAppointment(DeleteAppointmentCommand::new(
        index,
    )))
}

pub(super) fn parse_find(args: &str) -> ParseResult<Command> {
    let keywords = parse_keywords(args, FindAppointmentsCommand::USAGE)?;
    Ok(Command::FindAppointments(FindAppointmentsCommand::new(
        keywords,
    )))
}

pub(super) fn parse_status(args: &str, status: AppointmentStatus) -> ParseResult<Command> {
    let index = parse_index_only(args, SetAppointmentStatusCommand::USAGE)?;
    Ok(Command::SetAppointmentStatus(
        SetAppointmentStatusCommand::new(index, status),
    ))
}

#[cfg(test)]
mod tests {
    use crate::command::appointment_commands::AddAppointmentCommand;
    use crate::command::descriptor::PatientRef;
    use crate::command::Command;
    use crate::model::appointment::{parse_date_time, AppointmentStatus};
    use crate::model::ValidationError;
    use crate::parser::{parse_command, ParseError};

    #[test]
    fn add_rejects_inverted_range() {
        let err = parse_command(
            "a-add s/2020-02-05 10:00 e/2020-02-05 09:00 pt/Alex Yeoh d/Checkup",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::InvalidValue(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn add_requires_patient_and_description() {
        assert_eq!(
            parse_command("a-add s/2020-02-05 09:00 e/2020-02-05 10:00"),
            Err(ParseError::InvalidFormat {
                usage: AddAppointmentCommand::USAGE
            })
        );
    }

    #[test]
    fn edit_keeps_patient_name_pending() {
        let Ok(Command::EditAppointment(command)) =
            parse_command("a-edit 1 s/2020-02-05 08:00 pt/Bernice Yu")
        else {
            panic!("expected a-edit command");
        };
        let descriptor = command.descriptor();

        assert_eq!(
            descriptor.start(),
            Some(parse_date_time("2020-02-05 08:00").unwrap())
        );
        assert_eq!(descriptor.end(), None);
        assert_eq!(
            descriptor.patient(),
            Some(&PatientRef::Pending("Bernice Yu".to_string()))
        );
    }

    #[test]
    fn edit_accepts_start_after_existing_end_at_parse_time() {
        assert!(parse_command("a-edit 1 s/2030-01-01 10:00").is_ok());
    }

    #[test]
    fn edit_rejects_malformed_date_time() {
        assert_eq!(
            parse_command("a-edit 1 e/tomorrow"),
            Err(ParseError::InvalidValue(ValidationError::InvalidDateTime(
                "tomorrow".to_string()
            )))
        );
    }

    #[test]
    fn status_words_map_to_statuses() {
        let cases = [
            ("a-mark 1", AppointmentStatus::Completed),
            ("a-miss 2", AppointmentStatus::Missed),
            ("a-unmark 3", AppointmentStatus::Pending),
        ];
        for (line, status) in cases {
            let Ok(Command::SetAppointmentStatus(command)) = parse_command(line) else {
                panic!("expected status command for `{line}`");
            };
            assert_eq!(command.status(), status);
        }
    }

    #[test]
    fn delete_rejects_missing_index() {
        assert!(matches!(
            parse_command("a-delete"),
            Err(ParseError::InvalidFormat { .. })
        ));
    }
}
