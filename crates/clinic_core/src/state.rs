//! Caller-owned clinic state.
//!
//! # Responsibility
//! - Hold the appointment list and bill rows a presentation layer renders.
//! - Refresh from the store after every mutation made through it.
//! - Derive the counters of the reports panel.
//!
//! # Invariants
//! - State is never shared implicitly; each caller owns its instance.
//! - After a successful mutating helper, `appointments` and `bills` reflect
//!   the store as re-read right after the write.

use crate::model::appointment::{Appointment, AppointmentFields, AppointmentId};
use crate::model::billing::{sum_amounts, BillRequest, BillRow, BillingItemId};
use crate::repo::appointment_repo::AppointmentRepository;
use crate::repo::billing_repo::BillingRepository;
use crate::service::clinic_service::{ClinicService, ServiceResult};
use std::collections::BTreeSet;

/// Snapshot of what the presentation layer displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicState {
    pub appointments: Vec<Appointment>,
    pub bills: Vec<BillRow>,
}

/// Reports panel counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicReport {
    pub total_appointments: usize,
    pub today_appointments: usize,
    /// Number of billing rows.
    pub total_bill_items: usize,
    /// Distinct appointment ids with at least one billing row.
    pub billed_appointments: usize,
    pub total_billed: f64,
}

impl ClinicState {
    /// Loads a fresh snapshot from the store.
    pub fn load<A, B>(service: &ClinicService<A, B>) -> ServiceResult<Self>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let mut state = Self::default();
        state.refresh(service)?;
        Ok(state)
    }

    /// Re-fetches appointments and bills.
    ///
    /// On error the previous snapshot is kept untouched.
    pub fn refresh<A, B>(&mut self, service: &ClinicService<A, B>) -> ServiceResult<()>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let appointments = service.get_appointments()?;
        let bills = service.get_bills()?;
        self.appointments = appointments;
        self.bills = bills;
        Ok(())
    }

    pub fn add_appointment<A, B>(
        &mut self,
        service: &ClinicService<A, B>,
        fields: &AppointmentFields,
    ) -> ServiceResult<AppointmentId>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let id = service.add_appointment(fields)?;
        self.refresh(service)?;
        Ok(id)
    }

    pub fn update_appointment<A, B>(
        &mut self,
        service: &ClinicService<A, B>,
        id: AppointmentId,
        fields: &AppointmentFields,
    ) -> ServiceResult<usize>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let changed = service.update_appointment(id, fields)?;
        self.refresh(service)?;
        Ok(changed)
    }

    pub fn delete_appointment<A, B>(
        &mut self,
        service: &ClinicService<A, B>,
        id: AppointmentId,
    ) -> ServiceResult<usize>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let changed = service.delete_appointment(id)?;
        self.refresh(service)?;
        Ok(changed)
    }

    pub fn create_bill<A, B>(
        &mut self,
        service: &ClinicService<A, B>,
        bill: &BillRequest,
    ) -> ServiceResult<Vec<BillingItemId>>
    where
        A: AppointmentRepository,
        B: BillingRepository,
    {
        let ids = service.create_bill(bill)?;
        self.refresh(service)?;
        Ok(ids)
    }

    /// Looks up a cached appointment by id.
    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id == id)
    }

    /// Computes report counters relative to `today` (`YYYY-MM-DD`).
    pub fn report(&self, today: &str) -> ClinicReport {
        let billed: BTreeSet<AppointmentId> =
            self.bills.iter().filter_map(|row| row.appointment_id).collect();

        ClinicReport {
            total_appointments: self.appointments.len(),
            today_appointments: self
                .appointments
                .iter()
                .filter(|appointment| appointment.fields.date == today)
                .count(),
            total_bill_items: self.bills.len(),
            billed_appointments: billed.len(),
            total_billed: sum_amounts(self.bills.iter().map(|row| row.amount)),
        }
    }
}
