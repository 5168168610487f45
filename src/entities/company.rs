//! Company entity
//!
//! A company is keyed by a short natural code (e.g. `"ibm"`) rather than a
//! surrogate id, and owns zero or more invoices via `invoices.comp_code`.

use serde::{Deserialize, Serialize};

/// A full company row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Natural primary key (e.g. "apple")
    pub code: String,
    pub name: String,
    pub description: String,
}

/// The `{code, name}` projection returned by the list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        CompanySummary {
            code: company.code,
            name: company.name,
        }
    }
}

/// Validated payload for creating a company.
#[derive(Clone, Debug)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// Validated payload for updating a company by code.
///
/// The code itself is taken from the URL path and cannot be changed.
#[derive(Clone, Debug)]
pub struct CompanyPatch {
    pub name: String,
    pub description: String,
}
