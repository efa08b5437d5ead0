//! Request validation errors shared by appointment and billing requests.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shape error found in a caller-supplied request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    BlankField(&'static str),
    /// Date is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Time is not `HH:MM` or `HH:MM:SS`.
    InvalidTime(String),
    /// Amount is negative, NaN or infinite.
    InvalidAmount { item_name: String, amount: f64 },
    /// Bill request carries no line items.
    EmptyBill,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidDate(value) => {
                write!(f, "date `{value}` must be a calendar date in YYYY-MM-DD form")
            }
            Self::InvalidTime(value) => write!(f, "time `{value}` must be HH:MM or HH:MM:SS"),
            Self::InvalidAmount { item_name, amount } => write!(
                f,
                "amount {amount} for `{item_name}` must be a finite non-negative number"
            ),
            Self::EmptyBill => write!(f, "bill must contain at least one item"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
