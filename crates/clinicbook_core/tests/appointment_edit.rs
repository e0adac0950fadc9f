use clinicbook_core::command::appointment_commands::EditAppointmentCommand;
use clinicbook_core::command::descriptor::EditAppointmentDescriptor;
use clinicbook_core::repo::book_repo::AppointmentFilter;
use clinicbook_core::{
    parse_command, AppointmentStatus, BookRepository, CommandError, CommandOutput, CommandResult,
    InMemoryBookRepository, Index, RecordKind, ValidationError,
};

const ADD_ALEX: &str = "add n/Alex Yeoh g/m b/1990-04-12 bt/O+ p/87438807 \
    e/alexyeoh@example.com a/Blk 30 Geylang Street 29, #06-40";
const ADD_BERNICE: &str = "add n/Bernice Yu g/f b/1985-11-02 bt/A- p/99272758 \
    e/berniceyu@example.com a/Blk 30 Lorong 3 Serangoon Gardens, #07-18";
const ADD_FIRST_VISIT: &str =
    "a-add s/2020-02-05 09:00 e/2020-02-05 10:00 pt/Alex Yeoh d/Physiotherapy t/followup";
const ADD_SECOND_VISIT: &str =
    "a-add s/2020-02-06 14:00 e/2020-02-06 15:00 pt/Bernice Yu d/Checkup";

fn run(repo: &mut InMemoryBookRepository, line: &str) -> CommandResult<CommandOutput> {
    parse_command(line)
        .unwrap_or_else(|err| panic!("`{line}` should parse: {err}"))
        .execute(repo)
}

fn book() -> InMemoryBookRepository {
    let mut repo = InMemoryBookRepository::new();
    for line in [ADD_ALEX, ADD_BERNICE, ADD_FIRST_VISIT, ADD_SECOND_VISIT] {
        run(&mut repo, line).unwrap();
    }
    repo
}

#[test]
fn empty_descriptor_is_rejected_without_changes() {
    let mut repo = book();
    let before = repo.appointments().to_vec();

    let err = run(&mut repo, "a-edit 1").unwrap_err();

    assert_eq!(err, CommandError::NoFieldsEdited);
    assert_eq!(
        err.to_string(),
        "At least one field to edit must be provided."
    );
    assert_eq!(repo.appointments(), before.as_slice());
}

#[test]
fn bounds_are_checked_before_the_empty_descriptor() {
    let mut repo = book();

    let err = run(&mut repo, "a-edit 3").unwrap_err();

    assert_eq!(
        err,
        CommandError::IndexOutOfRange {
            kind: RecordKind::Appointment,
            index: 3,
            len: 2,
        }
    );
}

#[test]
fn index_zero_is_out_of_range_at_execution() {
    let mut repo = book();
    let mut descriptor = EditAppointmentDescriptor::new();
    descriptor.set_description(
        clinicbook_core::model::appointment::Description::new("Review").unwrap(),
    );
    let command = EditAppointmentCommand::new(Index::from_one_based(0), descriptor);

    assert!(matches!(
        command.execute(&mut repo),
        Err(CommandError::IndexOutOfRange { index: 0, .. })
    ));
}

#[test]
fn last_index_is_accepted() {
    let mut repo = book();

    run(&mut repo, "a-edit 2 d/Blood test").unwrap();

    assert_eq!(repo.appointments()[1].description.as_str(), "Blood test");
}

#[test]
fn edits_never_change_status() {
    let mut repo = book();
    run(&mut repo, "a-mark 1").unwrap();

    run(&mut repo, "a-edit 1 d/Hydrotherapy t/").unwrap();

    let edited = &repo.appointments()[0];
    assert_eq!(edited.status, AppointmentStatus::Completed);
    assert_eq!(edited.description.as_str(), "Hydrotherapy");
    assert!(edited.tags.is_empty());
}

#[test]
fn start_only_edit_is_validated_against_existing_end() {
    let mut repo = book();
    let before = repo.appointments().to_vec();

    let err = run(&mut repo, "a-edit 1 s/2020-02-05 10:30").unwrap_err();

    assert!(matches!(
        err,
        CommandError::InvalidTimeRange(ValidationError::InvalidTimeRange { .. })
    ));
    assert_eq!(repo.appointments(), before.as_slice());
}

#[test]
fn start_only_edit_inside_existing_range_succeeds() {
    let mut repo = book();

    run(&mut repo, "a-edit 1 s/2020-02-05 09:30").unwrap();

    assert_eq!(
        repo.appointments()[0].time.to_string(),
        "2020-02-05 09:30 to 2020-02-05 10:00"
    );
}

#[test]
fn reapplying_the_same_descriptor_is_idempotent() {
    let mut repo = book();
    let line = "a-edit 1 s/2020-02-05 08:00 e/2020-02-05 09:00 d/Early session";

    run(&mut repo, line).unwrap();
    let first = repo.appointments()[0].clone();
    run(&mut repo, line).unwrap();

    assert_eq!(repo.appointments()[0], first);
    assert_eq!(repo.appointments().len(), 2);
}

#[test]
fn description_edit_changes_only_the_description_and_resets_filter() {
    let mut repo = book();
    repo.update_appointment_filter(AppointmentFilter::Keywords(vec![
        "physiotherapy".to_string(),
    ]));
    let before = repo.appointments()[0].clone();

    let output = run(&mut repo, "a-edit 1 d/Therapy session").unwrap();

    let after = &repo.appointments()[0];
    assert!(output.feedback.contains("Therapy session"));
    assert_eq!(after.description.as_str(), "Therapy session");
    assert_eq!(after.time, before.time);
    assert_eq!(after.patient, before.patient);
    assert_eq!(after.tags, before.tags);
    assert_eq!(after.status, before.status);
    assert_eq!(repo.appointments().len(), 2);
    assert_eq!(repo.appointment_filter(), &AppointmentFilter::All);
}

#[test]
fn edit_into_another_appointments_identity_is_a_duplicate() {
    let mut repo = book();
    let before = repo.appointments().to_vec();

    let err = run(
        &mut repo,
        "a-edit 1 s/2020-02-06 14:00 e/2020-02-06 15:00 pt/bernice  yu",
    )
    .unwrap_err();

    assert_eq!(err, CommandError::DuplicateRecord(RecordKind::Appointment));
    assert_eq!(repo.appointments(), before.as_slice());
}

#[test]
fn unknown_patient_name_fails_resolution() {
    let mut repo = book();

    let err = run(&mut repo, "a-edit 1 pt/Charlotte Oliveiro").unwrap_err();

    assert_eq!(
        err,
        CommandError::ReferenceResolution("Charlotte Oliveiro".to_string())
    );
}

#[test]
fn patient_reassignment_resolves_by_name() {
    let mut repo = book();

    run(&mut repo, "a-edit 1 pt/BERNICE YU").unwrap();

    assert_eq!(repo.appointments()[0].patient.name.as_str(), "Bernice Yu");
}

#[test]
fn index_addresses_the_filtered_view() {
    let mut repo = book();
    run(&mut repo, "a-find checkup").unwrap();

    run(&mut repo, "a-edit 1 d/Annual checkup").unwrap();

    assert_eq!(repo.appointments()[0].description.as_str(), "Physiotherapy");
    assert_eq!(repo.appointments()[1].description.as_str(), "Annual checkup");
}
