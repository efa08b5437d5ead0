//! FFI boundary calls for the clinic presentation layer.
//!
//! # Responsibility
//! - Expose one sync function per boundary call (`get_appointments`,
//!   `add_appointment`, ..., `get_bills`) to Dart via FRB.
//! - Translate between FFI-friendly records and core request/response types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are returned as `Err(message)`; nothing is swallowed or retried.
//! - Every data call opens the store configured by `init_store`.

use clinic_core::db::open_db;
use clinic_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    sqlite_service, Appointment, AppointmentFields, Bill, BillLine, BillRequest, BillRow,
    BillingItem, NewBillingItem, ServiceResult, SqliteClinicService, TodayReminder,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::OnceLock;

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens (creating if needed) and migrates the clinic database at `db_path`.
///
/// Must succeed before any data call; a failure here should abort startup.
///
/// # FFI contract
/// - Idempotent for the same path; a different path after success is rejected.
/// - Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "init_store failed: db_path cannot be empty".to_string();
    }
    let path = PathBuf::from(trimmed);

    if let Some(active) = STORE_PATH.get() {
        if *active == path {
            return String::new();
        }
        return format!(
            "init_store failed: store already initialized at `{}`",
            active.display()
        );
    }

    if let Err(err) = open_db(&path) {
        return format!("init_store failed: {err}");
    }

    let active = STORE_PATH.get_or_init(|| path.clone());
    if *active != path {
        return format!(
            "init_store failed: store already initialized at `{}`",
            active.display()
        );
    }
    info!("event=store_init module=ffi status=ok");
    String::new()
}

/// Appointment record crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentView {
    pub id: i64,
    pub patient_name: String,
    pub doctor_name: String,
    pub reason_for_visit: String,
    pub date: String,
    pub time: String,
}

/// Editable appointment attributes sent by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentInput {
    pub patient_name: String,
    pub doctor_name: String,
    pub reason_for_visit: String,
    pub date: String,
    pub time: String,
}

/// Single billing row insert sent by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingItemInput {
    pub appointment_id: i64,
    pub item_name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingItemView {
    pub id: i64,
    pub appointment_id: Option<i64>,
    pub item_name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillLineInput {
    pub name: String,
    pub amount: f64,
}

/// Bill creation request: one appointment, one or more lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BillInput {
    pub appointment_id: i64,
    pub items: Vec<BillLineInput>,
}

/// One `get_bills` row; patient name and date are `None` for orphans.
/// `appointment_id` is `None` only for legacy rows stored without one.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRowView {
    pub id: i64,
    pub appointment_id: Option<i64>,
    pub item_name: String,
    pub amount: f64,
    pub patient_name: Option<String>,
    pub date: Option<String>,
}

/// Bill preview for one appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct BillView {
    pub appointment_id: i64,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub items: Vec<BillingItemView>,
    pub total: f64,
    /// Total with currency symbol, e.g. `₹700.00`.
    pub total_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderView {
    pub date: String,
    pub message: String,
    pub appointments: Vec<AppointmentView>,
}

/// `get-appointments`
#[flutter_rust_bridge::frb(sync)]
pub fn get_appointments() -> Result<Vec<AppointmentView>, String> {
    with_service("get_appointments", |service| service.get_appointments())
        .map(|rows| rows.into_iter().map(AppointmentView::from).collect())
}

/// `add-appointment`; returns the new appointment id.
#[flutter_rust_bridge::frb(sync)]
pub fn add_appointment(input: AppointmentInput) -> Result<i64, String> {
    let fields = AppointmentFields::from(input);
    with_service("add_appointment", |service| service.add_appointment(&fields))
}

/// `update-appointment`; returns affected rows (`0` for an unknown id).
#[flutter_rust_bridge::frb(sync)]
pub fn update_appointment(id: i64, input: AppointmentInput) -> Result<usize, String> {
    let fields = AppointmentFields::from(input);
    with_service("update_appointment", |service| {
        service.update_appointment(id, &fields)
    })
}

/// `delete-appointment`; returns affected rows (`0` for an unknown id).
#[flutter_rust_bridge::frb(sync)]
pub fn delete_appointment(id: i64) -> Result<usize, String> {
    with_service("delete_appointment", |service| service.delete_appointment(id))
}

/// `get-today-appointments`
#[flutter_rust_bridge::frb(sync)]
pub fn get_today_appointments() -> Result<Vec<AppointmentView>, String> {
    with_service("get_today_appointments", |service| {
        service.get_today_appointments()
    })
    .map(|rows| rows.into_iter().map(AppointmentView::from).collect())
}

/// `add-billing-item`; returns the new billing row id.
#[flutter_rust_bridge::frb(sync)]
pub fn add_billing_item(item: BillingItemInput) -> Result<i64, String> {
    let item = NewBillingItem {
        appointment_id: item.appointment_id,
        item_name: item.item_name,
        amount: item.amount,
    };
    with_service("add_billing_item", |service| service.add_billing_item(&item))
}

/// `get-billing-items`
#[flutter_rust_bridge::frb(sync)]
pub fn get_billing_items() -> Result<Vec<BillingItemView>, String> {
    with_service("get_billing_items", |service| service.get_billing_items())
        .map(|rows| rows.into_iter().map(BillingItemView::from).collect())
}

/// `create-bill`; returns the new billing row ids in line order.
#[flutter_rust_bridge::frb(sync)]
pub fn create_bill(bill: BillInput) -> Result<Vec<i64>, String> {
    let request = BillRequest {
        appointment_id: bill.appointment_id,
        items: bill
            .items
            .into_iter()
            .map(|line| BillLine::new(line.name, line.amount))
            .collect(),
    };
    with_service("create_bill", |service| service.create_bill(&request))
}

/// `get-bills`
#[flutter_rust_bridge::frb(sync)]
pub fn get_bills() -> Result<Vec<BillRowView>, String> {
    with_service("get_bills", |service| service.get_bills())
        .map(|rows| rows.into_iter().map(BillRowView::from).collect())
}

/// Bill preview for one appointment.
#[flutter_rust_bridge::frb(sync)]
pub fn get_bill(appointment_id: i64) -> Result<BillView, String> {
    with_service("get_bill", |service| service.get_bill(appointment_id)).map(BillView::from)
}

/// One-time same-day appointment check run by the host at startup.
#[flutter_rust_bridge::frb(sync)]
pub fn startup_reminder() -> Result<ReminderView, String> {
    with_service("startup_reminder", |service| service.startup_reminder()).map(ReminderView::from)
}

fn with_service<T>(
    call: &'static str,
    f: impl FnOnce(&SqliteClinicService<'_>) -> ServiceResult<T>,
) -> Result<T, String> {
    let path = STORE_PATH
        .get()
        .ok_or_else(|| format!("{call} failed: store not initialized; call init_store first"))?;
    let conn = open_db(path).map_err(|err| format!("{call} failed: {err}"))?;
    let service = sqlite_service(&conn).map_err(|err| format!("{call} failed: {err}"))?;
    f(&service).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error call={call} error={err}");
        format!("{call} failed: {err}")
    })
}

impl From<Appointment> for AppointmentView {
    fn from(value: Appointment) -> Self {
        let fields = value.fields;
        Self {
            id: value.id,
            patient_name: fields.patient_name,
            doctor_name: fields.doctor_name,
            reason_for_visit: fields.reason_for_visit,
            date: fields.date,
            time: fields.time,
        }
    }
}

impl From<AppointmentInput> for AppointmentFields {
    fn from(value: AppointmentInput) -> Self {
        Self {
            patient_name: value.patient_name.trim().to_string(),
            doctor_name: value.doctor_name.trim().to_string(),
            reason_for_visit: value.reason_for_visit.trim().to_string(),
            date: value.date.trim().to_string(),
            time: value.time.trim().to_string(),
        }
    }
}

impl From<BillingItem> for BillingItemView {
    fn from(value: BillingItem) -> Self {
        Self {
            id: value.id,
            appointment_id: value.appointment_id,
            item_name: value.item_name,
            amount: value.amount,
        }
    }
}

impl From<BillRow> for BillRowView {
    fn from(value: BillRow) -> Self {
        Self {
            id: value.id,
            appointment_id: value.appointment_id,
            item_name: value.item_name,
            amount: value.amount,
            patient_name: value.patient_name,
            date: value.date,
        }
    }
}

impl From<Bill> for BillView {
    fn from(value: Bill) -> Self {
        Self {
            total_display: value.formatted_total(),
            appointment_id: value.appointment_id,
            patient_name: value.patient_name,
            doctor_name: value.doctor_name,
            date: value.date,
            time: value.time,
            items: value.items.into_iter().map(BillingItemView::from).collect(),
            total: value.total,
        }
    }
}

impl From<TodayReminder> for ReminderView {
    fn from(value: TodayReminder) -> Self {
        Self {
            date: value.date,
            message: value.message,
            appointments: value
                .appointments
                .into_iter()
                .map(AppointmentView::from)
                .collect(),
        }
    }
}
