//! Billing domain model.
//!
//! # Responsibility
//! - Define billing line rows, the bill-creation request and the bill views.
//! - Format currency amounts with the clinic's fixed display symbol.
//!
//! # Invariants
//! - `appointment_id` is a logical reference only; it may point at a deleted
//!   appointment.
//! - A `Bill` total is the plain sum of its item amounts.

use super::appointment::AppointmentId;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned billing row identity.
pub type BillingItemId = i64;

/// Display symbol prefixed to every formatted amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Input for a single billing row insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillingItem {
    pub appointment_id: AppointmentId,
    pub item_name: String,
    pub amount: f64,
}

impl NewBillingItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_line(&self.item_name, self.amount)
    }
}

/// One persisted `billing` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingItem {
    pub id: BillingItemId,
    /// `None` only for rows written without an appointment reference.
    pub appointment_id: Option<AppointmentId>,
    pub item_name: String,
    pub amount: f64,
}

/// One charged service inside a bill request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub name: String,
    pub amount: f64,
}

impl BillLine {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Request to bill one appointment for one or more lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    pub appointment_id: AppointmentId,
    pub items: Vec<BillLine>,
}

impl BillRequest {
    /// Checks that the bill has lines and every line is well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyBill);
        }
        for line in &self.items {
            validate_line(&line.name, line.amount)?;
        }
        Ok(())
    }

    /// Sum of all requested line amounts.
    pub fn total(&self) -> f64 {
        sum_amounts(self.items.iter().map(|line| line.amount))
    }
}

/// One row of the billing/appointment join.
///
/// `patient_name` and `date` are `None` when the appointment no longer exists
/// or the row has no appointment reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    pub id: BillingItemId,
    pub appointment_id: Option<AppointmentId>,
    pub item_name: String,
    pub amount: f64,
    pub patient_name: Option<String>,
    pub date: Option<String>,
}

/// All billing rows of one appointment, with header and total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub appointment_id: AppointmentId,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub items: Vec<BillingItem>,
    pub total: f64,
}

impl Bill {
    /// Total rendered with the clinic currency symbol.
    pub fn formatted_total(&self) -> String {
        format_amount(self.total)
    }
}

/// Sums billing row amounts.
pub fn total_amount<'a>(items: impl IntoIterator<Item = &'a BillingItem>) -> f64 {
    sum_amounts(items.into_iter().map(|item| item.amount))
}

/// Adds amounts starting from `+0.0`; an empty sum is `0.0`, never `-0.0`.
pub fn sum_amounts(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts.into_iter().fold(0.0, |total, amount| total + amount)
}

/// Formats an amount as `₹1234.50`.
pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

fn validate_line(name: &str, amount: f64) -> Result<(), ValidationError> {
    require_text("itemName", name)?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::InvalidAmount {
            item_name: name.to_string(),
            amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_amount, sum_amounts, total_amount, BillLine, BillRequest};
    use crate::model::validation::ValidationError;

    #[test]
    fn format_amount_uses_symbol_and_two_decimals() {
        assert_eq!(format_amount(700.0), "₹700.00");
        assert_eq!(format_amount(1234.5), "₹1234.50");
    }

    #[test]
    fn empty_totals_format_as_positive_zero() {
        assert_eq!(format_amount(total_amount(&[])), "₹0.00");
        assert_eq!(format_amount(sum_amounts(Vec::new())), "₹0.00");
        assert!(sum_amounts([]).is_sign_positive());
    }

    #[test]
    fn bill_request_requires_items() {
        let request = BillRequest {
            appointment_id: 1,
            items: Vec::new(),
        };
        assert_eq!(request.validate(), Err(ValidationError::EmptyBill));
    }

    #[test]
    fn bill_request_rejects_negative_and_nan_amounts() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            let request = BillRequest {
                appointment_id: 1,
                items: vec![BillLine::new("Consult", 500.0), BillLine::new("Lab", amount)],
            };
            assert!(matches!(
                request.validate(),
                Err(ValidationError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn bill_request_total_sums_lines() {
        let request = BillRequest {
            appointment_id: 1,
            items: vec![BillLine::new("Consult", 500.0), BillLine::new("Lab", 200.0)],
        };
        assert_eq!(request.validate(), Ok(()));
        assert_eq!(request.total(), 700.0);
    }

    #[test]
    fn bill_request_deserializes_wire_shape() {
        let request: BillRequest = serde_json::from_value(serde_json::json!({
            "appointmentId": 4,
            "items": [{ "name": "Consult", "amount": 500 }]
        }))
        .unwrap();
        assert_eq!(request.appointment_id, 4);
        assert_eq!(request.items[0], BillLine::new("Consult", 500.0));
    }
}
