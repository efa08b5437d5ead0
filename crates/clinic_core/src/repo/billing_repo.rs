//! Billing repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert billing rows singly or as one bill.
//! - Read billing rows plain, per appointment, or joined with appointments.
//!
//! # Invariants
//! - `create_bill` inserts all lines in one transaction: either every line of
//!   the call is stored or none is.
//! - No existence check is made on `appointmentId`.
//! - `list_bills` keeps orphaned rows, with `None` patient name and date.
//! - Listings never fail on legacy NULLs: a NULL `appointmentId` reads as
//!   `None`, a NULL `amount` as `0.0`, a NULL `itemName` as empty text.

use super::{ensure_tables, RepoResult};
use crate::model::appointment::AppointmentId;
use crate::model::billing::{BillRequest, BillRow, BillingItem, BillingItemId, NewBillingItem};
use log::{debug, warn};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const BILLING_SELECT_SQL: &str = "SELECT
    id,
    appointmentId,
    itemName,
    amount
FROM billing";

const INSERT_BILLING_SQL: &str = "INSERT INTO billing (
    appointmentId,
    itemName,
    amount
) VALUES (?1, ?2, ?3);";

/// Repository interface for billing operations.
pub trait BillingRepository {
    /// Inserts one billing row and returns its new id.
    fn create_billing_item(&self, item: &NewBillingItem) -> RepoResult<BillingItemId>;
    /// Lists every billing row in insertion order.
    fn list_billing_items(&self) -> RepoResult<Vec<BillingItem>>;
    /// Lists billing rows of one appointment in insertion order.
    fn list_bill_items_for(&self, appointment_id: AppointmentId) -> RepoResult<Vec<BillingItem>>;
    /// Inserts one row per bill line atomically; returns ids in line order.
    fn create_bill(&self, bill: &BillRequest) -> RepoResult<Vec<BillingItemId>>;
    /// Lists billing rows joined with appointment patient name and date,
    /// newest appointment date first.
    fn list_bills(&self) -> RepoResult<Vec<BillRow>>;
}

/// SQLite-backed billing repository.
pub struct SqliteBillingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBillingRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["billing", "appointments"])?;
        Ok(Self { conn })
    }
}

impl BillingRepository for SqliteBillingRepository<'_> {
    fn create_billing_item(&self, item: &NewBillingItem) -> RepoResult<BillingItemId> {
        self.conn.execute(
            INSERT_BILLING_SQL,
            params![item.appointment_id, item.item_name.as_str(), item.amount],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_billing_items(&self) -> RepoResult<Vec<BillingItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BILLING_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_billing_row(row)?);
        }
        Ok(items)
    }

    fn list_bill_items_for(&self, appointment_id: AppointmentId) -> RepoResult<Vec<BillingItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BILLING_SELECT_SQL}
             WHERE appointmentId = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([appointment_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_billing_row(row)?);
        }
        Ok(items)
    }

    fn create_bill(&self, bill: &BillRequest) -> RepoResult<Vec<BillingItemId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ids = match insert_bill_lines(&tx, bill) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    "event=bill_create module=repo status=rollback appointment_id={} line_count={}",
                    bill.appointment_id,
                    bill.items.len()
                );
                return Err(err);
            }
        };
        tx.commit()?;

        debug!(
            "event=bill_create module=repo status=ok appointment_id={} line_count={}",
            bill.appointment_id,
            ids.len()
        );
        Ok(ids)
    }

    fn list_bills(&self) -> RepoResult<Vec<BillRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                b.id,
                b.appointmentId,
                b.itemName,
                b.amount,
                a.patientName,
                a.date
             FROM billing b
             LEFT JOIN appointments a ON b.appointmentId = a.id
             ORDER BY a.date DESC, b.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut bills = Vec::new();
        while let Some(row) = rows.next()? {
            let item = parse_billing_row(row)?;
            bills.push(BillRow {
                id: item.id,
                appointment_id: item.appointment_id,
                item_name: item.item_name,
                amount: item.amount,
                patient_name: row.get("patientName")?,
                date: row.get("date")?,
            });
        }
        Ok(bills)
    }
}

fn insert_bill_lines(tx: &Transaction<'_>, bill: &BillRequest) -> RepoResult<Vec<BillingItemId>> {
    let mut stmt = tx.prepare(INSERT_BILLING_SQL)?;
    let mut ids = Vec::with_capacity(bill.items.len());
    for line in &bill.items {
        stmt.execute(params![bill.appointment_id, line.name.as_str(), line.amount])?;
        ids.push(tx.last_insert_rowid());
    }
    Ok(ids)
}

fn parse_billing_row(row: &Row<'_>) -> rusqlite::Result<BillingItem> {
    let id: BillingItemId = row.get(0)?;
    let amount = match row.get::<_, Option<f64>>(3)? {
        Some(amount) => amount,
        None => {
            warn!("event=billing_read module=repo status=null_amount billing_id={id}");
            0.0
        }
    };

    Ok(BillingItem {
        id,
        appointment_id: row.get(1)?,
        item_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        amount,
    })
}
