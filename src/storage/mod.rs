//! Storage backends for companies and invoices
//!
//! The [`Store`] trait is the seam between HTTP handlers and persistence.
//! Two implementations exist:
//!
//! - [`InMemoryStore`]: insertion-ordered maps behind an `RwLock`, for
//!   development and tests
//! - [`postgres::PostgresStore`] (feature `postgres`): backed by a
//!   `sqlx::PgPool`
//!
//! Absent rows are `Option`/`bool` results, never errors; [`StoreError`]
//! covers constraint rejections and backend failures only.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;

use crate::core::error::StoreError;
use crate::entities::{
    Company, CompanyPatch, CompanySummary, Invoice, InvoicePatch, InvoiceSummary, NewCompany,
    NewInvoice,
};

/// Persistence operations for the two resources.
///
/// Every method corresponds to a single statement (or, for the in-memory
/// backend, a single critical section) — there are no cross-call transaction
/// boundaries.
#[async_trait]
pub trait Store: Send + Sync {
    // === Companies ===

    /// All companies as `{code, name}` pairs.
    ///
    /// Order is backend-natural: insertion order in memory, no ORDER BY
    /// in PostgreSQL. Only invoice listings guarantee an ordering.
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, StoreError>;

    /// One company by code, or `None`.
    async fn get_company(&self, code: &str) -> Result<Option<Company>, StoreError>;

    /// The ids of all invoices billed to a company, ordered by id.
    ///
    /// Returns an empty list for an unknown code; the caller decides whether
    /// the company itself exists.
    async fn company_invoice_ids(&self, code: &str) -> Result<Vec<i32>, StoreError>;

    /// Insert a company. A duplicate code is an [`StoreError::Integrity`]
    /// rejection.
    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError>;

    /// Update name and description by code. `None` when no row was affected.
    async fn update_company(
        &self,
        code: &str,
        patch: CompanyPatch,
    ) -> Result<Option<Company>, StoreError>;

    /// Delete a company and, via cascade, its invoices.
    ///
    /// Does not report whether a row existed.
    async fn delete_company(&self, code: &str) -> Result<(), StoreError>;

    // === Invoices ===

    /// All invoices as `{id, comp_code}` pairs, ordered by id.
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, StoreError>;

    /// One invoice by id, or `None`.
    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, StoreError>;

    /// Insert an invoice with `paid = false` and today's `add_date`.
    ///
    /// An unknown `comp_code` is an [`StoreError::Integrity`] rejection.
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError>;

    /// Full-row replace by id. `None` when no row matched; an unknown
    /// `comp_code` is an [`StoreError::Integrity`] rejection.
    async fn update_invoice(
        &self,
        id: i32,
        patch: InvoicePatch,
    ) -> Result<Option<Invoice>, StoreError>;

    /// Delete an invoice by id. Returns whether a row existed.
    async fn delete_invoice(&self, id: i32) -> Result<bool, StoreError>;
}
