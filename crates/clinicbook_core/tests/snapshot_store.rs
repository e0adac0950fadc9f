use clinicbook_core::db::{open_db, open_db_in_memory};
use clinicbook_core::repo::snapshot_repo::{
    BookSnapshot, SnapshotError, SnapshotRepository, SqliteSnapshotRepository,
};
use clinicbook_core::{parse_command, AppointmentStatus, BookRepository, InMemoryBookRepository};

fn sample_book() -> InMemoryBookRepository {
    let mut repo = InMemoryBookRepository::new();
    for line in [
        "add n/Alex Yeoh g/m b/1990-04-12 bt/O+ p/87438807 e/alexyeoh@example.com \
         a/Blk 30 Geylang Street 29, #06-40 r/Prefers mornings t/friends t/diabetic",
        "add n/Bernice Yu g/f b/1985-11-02 bt/A- p/99272758 e/berniceyu@example.com \
         a/Blk 30 Lorong 3 Serangoon Gardens, #07-18",
        "a-add s/2020-02-05 09:00 e/2020-02-05 10:00 pt/Bernice Yu d/Checkup",
        "a-add s/2020-02-04 15:00 e/2020-02-04 16:00 pt/Alex Yeoh d/Physiotherapy t/followup",
        "a-miss 1",
    ] {
        parse_command(line)
            .unwrap_or_else(|err| panic!("`{line}` should parse: {err}"))
            .execute(&mut repo)
            .unwrap();
    }
    repo
}

#[test]
fn empty_store_loads_empty_snapshot() {
    let mut conn = open_db_in_memory().unwrap();

    let snapshot = SqliteSnapshotRepository::new(&mut conn)
        .load_snapshot()
        .unwrap();

    assert_eq!(snapshot, BookSnapshot::default());
}

#[test]
fn saved_book_loads_back_in_order_with_status() {
    let book = sample_book();
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteSnapshotRepository::new(&mut conn);

    store
        .save_snapshot(book.patients(), book.appointments())
        .unwrap();
    let snapshot = store.load_snapshot().unwrap();

    assert_eq!(snapshot.patients, book.patients());
    assert_eq!(snapshot.appointments, book.appointments());
    assert_eq!(snapshot.appointments[0].status, AppointmentStatus::Missed);
    assert_eq!(snapshot.appointments[1].patient.name.as_str(), "Alex Yeoh");
}

#[test]
fn save_replaces_the_previous_snapshot() {
    let mut book = sample_book();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinicbook.sqlite3");

    {
        let mut conn = open_db(&path).unwrap();
        let mut store = SqliteSnapshotRepository::new(&mut conn);
        store
            .save_snapshot(book.patients(), book.appointments())
            .unwrap();

        parse_command("delete 2").unwrap().execute(&mut book).unwrap();
        store
            .save_snapshot(book.patients(), book.appointments())
            .unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    let snapshot = SqliteSnapshotRepository::new(&mut conn)
        .load_snapshot()
        .unwrap();
    assert_eq!(snapshot.patients.len(), 1);
    assert_eq!(snapshot.appointments.len(), 1);
    assert_eq!(snapshot.appointments[0].description.as_str(), "Physiotherapy");
}

#[test]
fn invalid_stored_field_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO patients (position, name, gender, birthdate, blood_type, phone, email, address, remark, tags)
         VALUES (0, 'Alex Yeoh', 'unknown', '1990-04-12', 'O+', '87438807', 'alexyeoh@example.com', 'Blk 30', '', '[]');",
    )
    .unwrap();

    let err = SqliteSnapshotRepository::new(&mut conn)
        .load_snapshot()
        .unwrap_err();

    assert!(matches!(err, SnapshotError::Validation(_)));
}

#[test]
fn malformed_tags_column_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO patients (position, name, gender, birthdate, blood_type, phone, email, address, remark, tags)
         VALUES (0, 'Alex Yeoh', 'male', '1990-04-12', 'O+', '87438807', 'alexyeoh@example.com', 'Blk 30', '', 'friends');",
    )
    .unwrap();

    let err = SqliteSnapshotRepository::new(&mut conn)
        .load_snapshot()
        .unwrap_err();

    assert!(matches!(err, SnapshotError::InvalidData(_)));
}

#[test]
fn appointment_without_stored_patient_cannot_be_saved() {
    let book = sample_book();
    let mut conn = open_db_in_memory().unwrap();

    let err = SqliteSnapshotRepository::new(&mut conn)
        .save_snapshot(&book.patients()[..1], book.appointments())
        .unwrap_err();

    assert!(matches!(err, SnapshotError::InvalidData(_)));
}
