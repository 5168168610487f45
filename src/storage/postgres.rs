//! PostgreSQL storage backend using sqlx.
//!
//! Provides the [`PostgresStore`] implementation of [`Store`] backed by a
//! `sqlx::PgPool`, plus [`ensure_schema`] for idempotent table creation.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Two tables: `companies` keyed by natural code, and `invoices` keyed by a
//! serial id with a cascading foreign key on `comp_code`. Constraint
//! violations surface as [`StoreError::Integrity`] so handlers can answer
//! 400 instead of 500.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::core::error::StoreError;
use crate::entities::{
    Company, CompanyPatch, CompanySummary, Invoice, InvoicePatch, InvoiceSummary, NewCompany,
    NewInvoice,
};
use crate::storage::Store;

const BACKEND: &str = "postgres";

/// Row tuple for full invoice selects.
type InvoiceRow = (i32, String, f64, bool, NaiveDate, Option<NaiveDate>);

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::query(BACKEND, format!("failed to create companies table: {e}")))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies ON DELETE CASCADE,
            amt DOUBLE PRECISION NOT NULL,
            paid BOOLEAN NOT NULL DEFAULT false,
            add_date DATE NOT NULL DEFAULT CURRENT_DATE,
            paid_date DATE
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::query(BACKEND, format!("failed to create invoices table: {e}")))?;

    tracing::debug!("database schema ensured");
    Ok(())
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Store implementation backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use sqlx::PgPool;
/// use biztime::storage::postgres::{PostgresStore, ensure_schema};
///
/// let pool = PgPool::connect("postgres://localhost/biztime").await?;
/// ensure_schema(&pool).await?;
/// let store = PostgresStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a sqlx error, routing constraint violations to `Integrity`.
fn map_sqlx_err(context: &str, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation() || db.is_unique_violation() =>
        {
            StoreError::integrity(db.message().to_string())
        }
        _ => StoreError::query(BACKEND, format!("{context}: {e}")),
    }
}

fn invoice_from_row((id, comp_code, amt, paid, add_date, paid_date): InvoiceRow) -> Invoice {
    Invoice {
        id,
        comp_code,
        amt,
        paid,
        add_date,
        paid_date,
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT code, name FROM companies")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_err("failed to list companies", e))?;

        Ok(rows
            .into_iter()
            .map(|(code, name)| CompanySummary { code, name })
            .collect())
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to get company", e))?;

        Ok(row.map(|(code, name, description)| Company {
            code,
            name,
            description,
        }))
    }

    async fn company_invoice_ids(&self, code: &str) -> Result<Vec<i32>, StoreError> {
        let rows = sqlx::query_as::<_, (i32,)>(
            "SELECT id FROM invoices WHERE comp_code = $1 ORDER BY id",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to list company invoices", e))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        let (code, name, description) = sqlx::query_as::<_, (String, String, String)>(
            "INSERT INTO companies (code, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to create company", e))?;

        Ok(Company {
            code,
            name,
            description,
        })
    }

    async fn update_company(
        &self,
        code: &str,
        patch: CompanyPatch,
    ) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "UPDATE companies SET name = $1, description = $2 \
             WHERE code = $3 \
             RETURNING code, name, description",
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to update company", e))?;

        Ok(row.map(|(code, name, description)| Company {
            code,
            name,
            description,
        }))
    }

    async fn delete_company(&self, code: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_err("failed to delete company", e))?;

        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT id, comp_code FROM invoices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to list invoices", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, comp_code)| InvoiceSummary { id, comp_code })
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, comp_code, amt, paid, add_date, paid_date \
             FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to get invoice", e))?;

        Ok(row.map(invoice_from_row))
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "INSERT INTO invoices (comp_code, amt) \
             VALUES ($1, $2) \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(&invoice.comp_code)
        .bind(invoice.amt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to create invoice", e))?;

        Ok(invoice_from_row(row))
    }

    async fn update_invoice(
        &self,
        id: i32,
        patch: InvoicePatch,
    ) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "UPDATE invoices \
             SET amt = $1, comp_code = $2, paid = $3, add_date = $4, paid_date = $5 \
             WHERE id = $6 \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(patch.amt)
        .bind(&patch.comp_code)
        .bind(patch.paid)
        .bind(patch.add_date)
        .bind(patch.paid_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err("failed to update invoice", e))?;

        Ok(row.map(invoice_from_row))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_err("failed to delete invoice", e))?;

        Ok(result.rows_affected() > 0)
    }
}
