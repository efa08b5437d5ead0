//! Clinic request facade.
//!
//! # Responsibility
//! - Provide one entry point per boundary call (`get-appointments`,
//!   `add-appointment`, ..., `get-bills`).
//! - Validate request shape before any SQL runs.
//! - Compose read-only bill previews and the startup reminder.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.
//! - "Today" is the local calendar date of the host.

use crate::model::appointment::{Appointment, AppointmentFields, AppointmentId, DATE_FORMAT};
use crate::model::billing::{
    total_amount, Bill, BillRequest, BillRow, BillingItem, BillingItemId, NewBillingItem,
};
use crate::model::validation::ValidationError;
use crate::repo::appointment_repo::AppointmentRepository;
use crate::repo::billing_repo::BillingRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Facade error: either a rejected request or a forwarded storage failure.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Store(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid request: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Same-day appointment check shown once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayReminder {
    /// Local calendar date the check ran for.
    pub date: String,
    /// Today's appointments ordered by time.
    pub appointments: Vec<Appointment>,
    /// Human-readable summary line.
    pub message: String,
}

/// Request facade over appointment and billing repositories.
pub struct ClinicService<A: AppointmentRepository, B: BillingRepository> {
    appointments: A,
    billing: B,
}

impl<A: AppointmentRepository, B: BillingRepository> ClinicService<A, B> {
    /// Creates a facade using the provided repository implementations.
    pub fn new(appointments: A, billing: B) -> Self {
        Self {
            appointments,
            billing,
        }
    }

    /// `get-appointments`: all appointments ordered by date, then time.
    pub fn get_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        Ok(self.appointments.list_appointments()?)
    }

    /// `add-appointment`: validates and inserts; returns the new id.
    pub fn add_appointment(&self, fields: &AppointmentFields) -> ServiceResult<AppointmentId> {
        fields.validate()?;
        let id = self.appointments.create_appointment(fields)?;
        info!("event=appointment_add module=service status=ok appointment_id={id}");
        Ok(id)
    }

    /// `update-appointment`: replaces all fields of `id`.
    ///
    /// Returns the affected row count; `0` means `id` did not exist, which is
    /// not an error.
    pub fn update_appointment(
        &self,
        id: AppointmentId,
        fields: &AppointmentFields,
    ) -> ServiceResult<usize> {
        fields.validate()?;
        let changed = self.appointments.update_appointment(id, fields)?;
        if changed == 0 {
            warn!("event=appointment_update module=service status=noop appointment_id={id}");
        }
        Ok(changed)
    }

    /// `delete-appointment`: removes `id`, keeping its billing rows.
    ///
    /// Returns the affected row count; `0` means `id` did not exist.
    pub fn delete_appointment(&self, id: AppointmentId) -> ServiceResult<usize> {
        let changed = self.appointments.delete_appointment(id)?;
        if changed == 0 {
            warn!("event=appointment_delete module=service status=noop appointment_id={id}");
        }
        Ok(changed)
    }

    /// `get-today-appointments`: appointments on the local calendar date.
    pub fn get_today_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        self.get_appointments_on(&today())
    }

    /// Appointments on an explicit `YYYY-MM-DD` date, ordered by time.
    pub fn get_appointments_on(&self, date: &str) -> ServiceResult<Vec<Appointment>> {
        crate::model::appointment::validate_date(date)?;
        Ok(self.appointments.list_appointments_on(date)?)
    }

    /// `add-billing-item`: inserts one billing row.
    pub fn add_billing_item(&self, item: &NewBillingItem) -> ServiceResult<BillingItemId> {
        item.validate()?;
        Ok(self.billing.create_billing_item(item)?)
    }

    /// `get-billing-items`: every billing row in insertion order.
    pub fn get_billing_items(&self) -> ServiceResult<Vec<BillingItem>> {
        Ok(self.billing.list_billing_items()?)
    }

    /// `create-bill`: inserts every line atomically; returns row ids in line
    /// order.
    pub fn create_bill(&self, bill: &BillRequest) -> ServiceResult<Vec<BillingItemId>> {
        bill.validate()?;
        let ids = self.billing.create_bill(bill)?;
        info!(
            "event=bill_create module=service status=ok appointment_id={} line_count={}",
            bill.appointment_id,
            ids.len()
        );
        Ok(ids)
    }

    /// `get-bills`: billing rows joined with patient name and date.
    pub fn get_bills(&self) -> ServiceResult<Vec<BillRow>> {
        Ok(self.billing.list_bills()?)
    }

    /// Bill preview for one appointment.
    ///
    /// Header fields are `None` when the appointment no longer exists.
    pub fn get_bill(&self, appointment_id: AppointmentId) -> ServiceResult<Bill> {
        let items = self.billing.list_bill_items_for(appointment_id)?;
        let header = self.appointments.get_appointment(appointment_id)?;
        let total = total_amount(&items);
        let (patient_name, doctor_name, date, time) = match header {
            Some(appointment) => (
                Some(appointment.fields.patient_name),
                Some(appointment.fields.doctor_name),
                Some(appointment.fields.date),
                Some(appointment.fields.time),
            ),
            None => (None, None, None, None),
        };

        Ok(Bill {
            appointment_id,
            patient_name,
            doctor_name,
            date,
            time,
            items,
            total,
        })
    }

    /// Runs the one-time same-day appointment check.
    pub fn startup_reminder(&self) -> ServiceResult<TodayReminder> {
        let date = today();
        let appointments = self.appointments.list_appointments_on(&date)?;
        info!(
            "event=startup_reminder module=service status=ok count={}",
            appointments.len()
        );
        Ok(TodayReminder {
            message: reminder_message(appointments.len()),
            date,
            appointments,
        })
    }
}

/// Current local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(DATE_FORMAT)
        .to_string()
}

fn reminder_message(count: usize) -> String {
    match count {
        0 => "No appointments scheduled for today!".to_string(),
        1 => "You have 1 appointment today".to_string(),
        n => format!("You have {n} appointments today"),
    }
}

#[cfg(test)]
mod tests {
    use super::{reminder_message, today};
    use crate::model::appointment::validate_date;

    #[test]
    fn reminder_message_pluralizes() {
        assert_eq!(reminder_message(0), "No appointments scheduled for today!");
        assert_eq!(reminder_message(1), "You have 1 appointment today");
        assert_eq!(reminder_message(3), "You have 3 appointments today");
    }

    #[test]
    fn today_is_iso_date() {
        assert!(validate_date(&today()).is_ok());
    }
}
