//! Appointment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `appointments` table.
//! - Own the ordering guarantees of appointment listings.
//!
//! # Invariants
//! - Listings are ordered `date ASC, time ASC`, with `id ASC` as tie-breaker.
//! - `update_appointment`/`delete_appointment` report affected rows; zero is
//!   not an error.
//! - Deleting an appointment leaves its billing rows in place.

use super::{ensure_tables, RepoResult};
use crate::model::appointment::{Appointment, AppointmentFields, AppointmentId};
use log::debug;
use rusqlite::{params, Connection, Row};

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    patientName,
    doctorName,
    reasonForVisit,
    date,
    time
FROM appointments";

/// Repository interface for appointment operations.
pub trait AppointmentRepository {
    /// Inserts one appointment and returns its new id.
    fn create_appointment(&self, fields: &AppointmentFields) -> RepoResult<AppointmentId>;
    /// Lists every appointment in schedule order.
    fn list_appointments(&self) -> RepoResult<Vec<Appointment>>;
    /// Lists appointments on one calendar date, ordered by time.
    fn list_appointments_on(&self, date: &str) -> RepoResult<Vec<Appointment>>;
    /// Gets one appointment by id.
    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>>;
    /// Replaces all five attributes; returns affected row count.
    fn update_appointment(&self, id: AppointmentId, fields: &AppointmentFields)
        -> RepoResult<usize>;
    /// Removes one appointment; returns affected row count.
    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<usize>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["appointments"])?;
        Ok(Self { conn })
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn create_appointment(&self, fields: &AppointmentFields) -> RepoResult<AppointmentId> {
        self.conn.execute(
            "INSERT INTO appointments (
                patientName,
                doctorName,
                reasonForVisit,
                date,
                time
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fields.patient_name.as_str(),
                fields.doctor_name.as_str(),
                fields.reason_for_visit.as_str(),
                fields.date.as_str(),
                fields.time.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=appointment_create module=repo status=ok appointment_id={id}");
        Ok(id)
    }

    fn list_appointments(&self) -> RepoResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPOINTMENT_SELECT_SQL} ORDER BY date ASC, time ASC, id ASC;"
        ))?;
        let appointments = stmt
            .query_map([], parse_appointment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    fn list_appointments_on(&self, date: &str) -> RepoResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPOINTMENT_SELECT_SQL}
             WHERE date = ?1
             ORDER BY time ASC, id ASC;"
        ))?;
        let appointments = stmt
            .query_map([date], parse_appointment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_appointment_row(row)?));
        }
        Ok(None)
    }

    fn update_appointment(
        &self,
        id: AppointmentId,
        fields: &AppointmentFields,
    ) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE appointments
             SET
                patientName = ?1,
                doctorName = ?2,
                reasonForVisit = ?3,
                date = ?4,
                time = ?5
             WHERE id = ?6;",
            params![
                fields.patient_name.as_str(),
                fields.doctor_name.as_str(),
                fields.reason_for_visit.as_str(),
                fields.date.as_str(),
                fields.time.as_str(),
                id,
            ],
        )?;

        debug!(
            "event=appointment_update module=repo status=ok appointment_id={id} changed={changed}"
        );
        Ok(changed)
    }

    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?1;", [id])?;

        debug!(
            "event=appointment_delete module=repo status=ok appointment_id={id} changed={changed}"
        );
        Ok(changed)
    }
}

// Columns are nullable in files created before versioned migrations; NULL
// text reads back as an empty string.
fn parse_appointment_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let text = |column: &str| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
    };

    Ok(Appointment {
        id: row.get("id")?,
        fields: AppointmentFields {
            patient_name: text("patientName")?,
            doctor_name: text("doctorName")?,
            reason_for_visit: text("reasonForVisit")?,
            date: text("date")?,
            time: text("time")?,
        },
    })
}
