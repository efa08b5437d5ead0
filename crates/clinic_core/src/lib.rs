//! Persistence and billing core for the clinic point-of-sale app.
//! Appointments and billing rows live in one local SQLite file; this crate
//! owns the schema, the store operations and the request facade over them.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentFields, AppointmentId};
pub use model::billing::{
    format_amount, sum_amounts, total_amount, Bill, BillLine, BillRequest, BillRow, BillingItem,
    BillingItemId, NewBillingItem, CURRENCY_SYMBOL,
};
pub use model::validation::ValidationError;
pub use repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
pub use repo::billing_repo::{BillingRepository, SqliteBillingRepository};
pub use repo::{RepoError, RepoResult};
pub use service::clinic_service::{
    today, ClinicService, ServiceError, ServiceResult, TodayReminder,
};
pub use state::{ClinicReport, ClinicState};

/// Facade wired to the SQLite repositories of one connection.
pub type SqliteClinicService<'conn> =
    ClinicService<SqliteAppointmentRepository<'conn>, SqliteBillingRepository<'conn>>;

/// Builds the SQLite-backed facade over an opened, migrated connection.
pub fn sqlite_service(conn: &rusqlite::Connection) -> RepoResult<SqliteClinicService<'_>> {
    Ok(ClinicService::new(
        SqliteAppointmentRepository::try_new(conn)?,
        SqliteBillingRepository::try_new(conn)?,
    ))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
