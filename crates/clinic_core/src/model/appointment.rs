//! Appointment domain model.
//!
//! # Responsibility
//! - Define the stored appointment row and its five editable attributes.
//! - Validate caller-supplied attributes before they reach the store.
//!
//! # Invariants
//! - `date` is ISO `YYYY-MM-DD` text and `time` is `HH:MM[:SS]` text, so
//!   lexicographic order equals chronological order.
//! - `(date, time)` is not unique; double-booking is allowed.

use super::validation::{require_text, ValidationError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Store-assigned appointment identity.
pub type AppointmentId = i64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// The five attributes an appointment is created or replaced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFields {
    pub patient_name: String,
    pub doctor_name: String,
    pub reason_for_visit: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM` or `HH:MM:SS`.
    pub time: String,
}

impl AppointmentFields {
    /// Convenience constructor used by callers and tests.
    pub fn new(
        patient_name: impl Into<String>,
        doctor_name: impl Into<String>,
        reason_for_visit: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            doctor_name: doctor_name.into(),
            reason_for_visit: reason_for_visit.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    /// Checks request shape.
    ///
    /// Patient and doctor names are required. The reason may be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("patientName", &self.patient_name)?;
        require_text("doctorName", &self.doctor_name)?;
        validate_date(&self.date)?;
        validate_time(&self.time)?;
        Ok(())
    }
}

/// One persisted appointment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    #[serde(flatten)]
    pub fields: AppointmentFields,
}

/// Validates an ISO calendar date string.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    // chrono accepts unpadded fields; the stored text must stay sortable.
    if value.len() != 10 || NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }
    Ok(())
}

/// Validates a 24-hour time-of-day string.
pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    let padded = matches!(value.len(), 5 | 8);
    let parses = TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(value, format).is_ok());
    if !(padded && parses) {
        return Err(ValidationError::InvalidTime(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_date, validate_time, AppointmentFields};
    use crate::model::validation::ValidationError;

    fn fields() -> AppointmentFields {
        AppointmentFields::new("Asha Rao", "Mehta", "Fever", "2024-01-02", "09:00")
    }

    #[test]
    fn valid_fields_pass() {
        assert_eq!(fields().validate(), Ok(()));
    }

    #[test]
    fn empty_reason_is_allowed() {
        let mut value = fields();
        value.reason_for_visit = String::new();
        assert_eq!(value.validate(), Ok(()));
    }

    #[test]
    fn blank_patient_name_is_rejected() {
        let mut value = fields();
        value.patient_name = "   ".to_string();
        assert_eq!(
            value.validate(),
            Err(ValidationError::BlankField("patientName"))
        );
    }

    #[test]
    fn date_must_be_zero_padded_iso() {
        assert!(validate_date("2024-01-02").is_ok());
        assert!(validate_date("2024-1-2").is_err());
        assert!(validate_date("02/01/2024").is_err());
        assert!(validate_date("2024-02-30").is_err());
    }

    #[test]
    fn time_accepts_minutes_and_seconds_forms() {
        assert!(validate_time("09:00").is_ok());
        assert!(validate_time("17:45:30").is_ok());
        assert!(validate_time("9:00").is_err());
        assert!(validate_time("25:00").is_err());
    }

    #[test]
    fn serialization_uses_column_names() {
        let json = serde_json::to_value(super::Appointment {
            id: 7,
            fields: fields(),
        })
        .unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["patientName"], "Asha Rao");
        assert_eq!(json["reasonForVisit"], "Fever");
    }
}
