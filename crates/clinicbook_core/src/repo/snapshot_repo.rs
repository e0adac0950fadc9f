//! Snapshot persistence of the whole book into SQLite.
//!
//! # Responsibility
//! - Save both record lists, in order, as one replace-all transaction.
//! - Load them back into validated model values.
//!
//! # Invariants
//! - A save is all-or-nothing; readers never see half a snapshot.
//! - Appointments are linked to patients by row id, never by copied fields.
//! - Rows that fail field validation are rejected, not repaired.

use crate::db::DbError;
use crate::model::appointment::{
    parse_date_time, Appointment, AppointmentStatus, AppointmentTime, Description, DATE_TIME_FORMAT,
};
use crate::model::patient::{
    Address, Birthdate, BloodType, Email, Gender, Name, Patient, Phone, Remark,
};
use crate::model::tag::TagSet;
use crate::model::ValidationError;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Db(DbError),
    /// Stored field failed model validation.
    Validation(ValidationError),
    /// Stored data is structurally inconsistent.
    InvalidData(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "invalid stored record: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SnapshotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for SnapshotError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(format!("invalid tags column: {value}"))
    }
}

/// Both record lists as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSnapshot {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
}

/// Snapshot storage contract.
pub trait SnapshotRepository {
    /// Replaces the stored snapshot with the given records.
    fn save_snapshot(
        &mut self,
        patients: &[Patient],
        appointments: &[Appointment],
    ) -> SnapshotResult<()>;
    /// Reads the stored snapshot; an empty store yields an empty snapshot.
    fn load_snapshot(&self) -> SnapshotResult<BookSnapshot>;
}

/// SQLite-backed snapshot repository over a migrated connection.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn save_snapshot(
        &mut self,
        patients: &[Patient],
        appointments: &[Appointment],
    ) -> SnapshotResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM appointments;", [])?;
        tx.execute("DELETE FROM patients;", [])?;

        let mut patient_ids: HashMap<String, i64> = HashMap::with_capacity(patients.len());
        for (position, patient) in patients.iter().enumerate() {
            tx.execute(
                "INSERT INTO patients (
                    position,
                    name,
                    gender,
                    birthdate,
                    blood_type,
                    phone,
                    email,
                    address,
                    remark,
                    tags
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                params![
                    position as i64,
                    patient.name.as_str(),
                    patient.gender.as_str(),
                    patient.birthdate.to_string(),
                    patient.blood_type.as_str(),
                    patient.phone.as_str(),
                    patient.email.as_str(),
                    patient.address.as_str(),
                    patient.remark.as_str(),
                    serde_json::to_string(&patient.tags)?,
                ],
            )?;
            patient_ids.insert(patient.name.identity_key(), tx.last_insert_rowid());
        }

        for (position, appointment) in appointments.iter().enumerate() {
            let patient_id = patient_ids
                .get(&appointment.patient.name.identity_key())
                .copied()
                .ok_or_else(|| {
                    SnapshotError::InvalidData(format!(
                        "appointment at position {position} refers to a patient outside the snapshot"
                    ))
                })?;
            tx.execute(
                "INSERT INTO appointments (
                    position,
                    patient_id,
                    start_at,
                    end_at,
                    description,
                    status,
                    tags
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    position as i64,
                    patient_id,
                    appointment.time.start().format(DATE_TIME_FORMAT).to_string(),
                    appointment.time.end().format(DATE_TIME_FORMAT).to_string(),
                    appointment.description.as_str(),
                    appointment.status.as_str(),
                    serde_json::to_string(&appointment.tags)?,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_snapshot(&self) -> SnapshotResult<BookSnapshot> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                name,
                gender,
                birthdate,
                blood_type,
                phone,
                email,
                address,
                remark,
                tags
             FROM patients
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut patients = Vec::new();
        let mut patients_by_id: HashMap<i64, usize> = HashMap::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get("id")?;
            patients_by_id.insert(id, patients.len());
            patients.push(parse_patient_row(row)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT
                patient_id,
                start_at,
                end_at,
                description,
                status,
                tags
             FROM appointments
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut appointments = Vec::new();
        while let Some(row) = rows.next()? {
            let patient_id: i64 = row.get("patient_id")?;
            let patient = patients_by_id
                .get(&patient_id)
                .map(|idx| patients[*idx].clone())
                .ok_or_else(|| {
                    SnapshotError::InvalidData(format!(
                        "appointment refers to missing patient row {patient_id}"
                    ))
                })?;
            appointments.push(parse_appointment_row(row, patient)?);
        }

        Ok(BookSnapshot {
            patients,
            appointments,
        })
    }
}

fn parse_patient_row(row: &Row<'_>) -> SnapshotResult<Patient> {
    Ok(Patient {
        name: Name::new(&row.get::<_, String>("name")?)?,
        gender: Gender::parse(&row.get::<_, String>("gender")?)?,
        birthdate: Birthdate::parse(&row.get::<_, String>("birthdate")?)?,
        blood_type: BloodType::parse(&row.get::<_, String>("blood_type")?)?,
        phone: Phone::new(&row.get::<_, String>("phone")?)?,
        email: Email::new(&row.get::<_, String>("email")?)?,
        address: Address::new(&row.get::<_, String>("address")?)?,
        remark: Remark::new(&row.get::<_, String>("remark")?),
        tags: parse_tags_column(&row.get::<_, String>("tags")?)?,
    })
}

fn parse_appointment_row(row: &Row<'_>, patient: Patient) -> SnapshotResult<Appointment> {
    let start = parse_date_time(&row.get::<_, String>("start_at")?)?;
    let end = parse_date_time(&row.get::<_, String>("end_at")?)?;
    let status_text: String = row.get("status")?;
    let status = AppointmentStatus::parse(&status_text).ok_or_else(|| {
        SnapshotError::InvalidData(format!(
            "invalid status `{status_text}` in appointments.status"
        ))
    })?;

    let appointment = Appointment::new(
        AppointmentTime::new(start, end)?,
        patient,
        Description::new(&row.get::<_, String>("description")?)?,
        parse_tags_column(&row.get::<_, String>("tags")?)?,
    );
    Ok(appointment.with_status(status))
}

fn parse_tags_column(value: &str) -> SnapshotResult<TagSet> {
    Ok(serde_json::from_str(value)?)
}
