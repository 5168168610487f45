//! Invoice entity
//!
//! An invoice has a database-generated serial id and belongs to exactly one
//! company via `comp_code`. `paid` defaults to false and `add_date` to the
//! current date on insert; `paid_date` stays null until set explicitly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A full invoice row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Surrogate primary key (serial)
    pub id: i32,
    /// Foreign key to `companies.code`
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// The `{id, comp_code}` projection returned by the list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

impl From<Invoice> for InvoiceSummary {
    fn from(invoice: Invoice) -> Self {
        InvoiceSummary {
            id: invoice.id,
            comp_code: invoice.comp_code,
        }
    }
}

/// Validated payload for creating an invoice.
///
/// The store fills in the id, the `paid = false` default and today's
/// `add_date`.
#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
}

/// Validated payload for a full-row invoice replace by id.
#[derive(Clone, Debug)]
pub struct InvoicePatch {
    pub amt: f64,
    pub comp_code: String,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}
