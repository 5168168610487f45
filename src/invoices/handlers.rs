//! HTTP handlers for the invoice resource
//!
//! The detail endpoint embeds the parent company (looked up by `comp_code`
//! after the invoice query) and omits `comp_code` from the payload, since
//! the embedded company already carries the code.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::ApiError;
use crate::entities::{Company, Invoice, InvoicePatch, InvoiceSummary, NewInvoice};
use crate::server::AppState;

// =============================================================================
// Request payloads
// =============================================================================

/// Body for POST /invoices
#[derive(Debug, Default, Deserialize)]
pub struct CreateInvoiceRequest {
    pub comp_code: Option<String>,
    pub amt: Option<f64>,
}

impl CreateInvoiceRequest {
    fn validate(self) -> Result<NewInvoice, ApiError> {
        let Self { comp_code, amt } = self;
        match (comp_code, amt) {
            (Some(comp_code), Some(amt)) => Ok(NewInvoice { comp_code, amt }),
            (comp_code, amt) => {
                let mut fields = Vec::new();
                if comp_code.is_none() {
                    fields.push("comp_code");
                }
                if amt.is_none() {
                    fields.push("amt");
                }
                Err(ApiError::missing_fields(fields))
            }
        }
    }
}

/// Body for PUT /invoices/{id}
///
/// A full-row replace: everything except `paid_date` is required,
/// `paid_date` may be null for unpaid invoices.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub amt: Option<f64>,
    pub comp_code: Option<String>,
    pub paid: Option<bool>,
    pub add_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
}

impl UpdateInvoiceRequest {
    fn validate(self) -> Result<InvoicePatch, ApiError> {
        let Self {
            amt,
            comp_code,
            paid,
            add_date,
            paid_date,
        } = self;
        match (amt, comp_code, paid, add_date) {
            (Some(amt), Some(comp_code), Some(paid), Some(add_date)) => Ok(InvoicePatch {
                amt,
                comp_code,
                paid,
                add_date,
                paid_date,
            }),
            (amt, comp_code, paid, add_date) => {
                let mut fields = Vec::new();
                if amt.is_none() {
                    fields.push("amt");
                }
                if comp_code.is_none() {
                    fields.push("comp_code");
                }
                if paid.is_none() {
                    fields.push("paid");
                }
                if add_date.is_none() {
                    fields.push("add_date");
                }
                Err(ApiError::missing_fields(fields))
            }
        }
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Response for GET /invoices
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

/// Response for POST and PUT endpoints
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
}

/// Invoice with the parent company embedded in place of `comp_code`
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

/// Response for GET /invoices/{id}
#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    pub invoice: InvoiceDetail,
}

/// Response for DELETE /invoices/{id}
#[derive(Debug, Serialize)]
pub struct DeleteInvoiceResponse {
    pub status: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /invoices
///
/// Returns `{invoices: [{id, comp_code}, ...]}`.
pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = state.store.list_invoices().await?;

    Ok(Json(InvoiceListResponse { invoices }))
}

/// GET /invoices/{id}
///
/// Returns `{invoice: {id, amt, paid, add_date, paid_date, company: {...}}}`.
/// The parent company comes from a second lookup keyed on `comp_code`.
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InvoiceDetailResponse>, ApiError> {
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| ApiError::not_found("invoice", id))?;

    // The FK guarantees the company exists; a miss here is store corruption
    let company = state
        .store
        .get_company(&invoice.comp_code)
        .await?
        .ok_or_else(|| ApiError::Storage {
            message: format!(
                "invoice {} references missing company '{}'",
                id, invoice.comp_code
            ),
        })?;

    Ok(Json(InvoiceDetailResponse {
        invoice: InvoiceDetail {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        },
    }))
}

/// POST /invoices
///
/// Accepts `{comp_code, amt}`, returns 201 `{invoice}` with `paid = false`
/// and today's `add_date`.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let invoice = state.store.create_invoice(body.validate()?).await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

/// PUT /invoices/{id}
///
/// Full-row replace. 404 when no invoice matches the id, 400 when the store
/// rejects the write (e.g. an unknown `comp_code`).
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let patch = body.validate()?;

    let invoice = state
        .store
        .update_invoice(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("invoice", id))?;

    Ok(Json(InvoiceResponse { invoice }))
}

/// DELETE /invoices/{id}
///
/// Unlike company deletion, this verifies existence: 404 when no row matched.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteInvoiceResponse>, ApiError> {
    let deleted = state.store.delete_invoice(id).await?;
    if !deleted {
        return Err(ApiError::not_found("invoice", id));
    }

    Ok(Json(DeleteInvoiceResponse { status: "deleted" }))
}
