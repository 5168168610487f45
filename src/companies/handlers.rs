//! HTTP handlers for the company resource
//!
//! Request payloads deserialize into all-`Option` structs so that presence
//! checks (the only input validation this API does) can answer 400 with the
//! offending field names. Responses are typed envelopes, one struct per
//! endpoint shape.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::core::error::ApiError;
use crate::entities::{Company, CompanyPatch, CompanySummary, NewCompany};
use crate::server::AppState;

// =============================================================================
// Request payloads
// =============================================================================

/// Body for POST /companies
#[derive(Debug, Default, Deserialize)]
pub struct CreateCompanyRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateCompanyRequest {
    fn validate(self) -> Result<NewCompany, ApiError> {
        let Self {
            code,
            name,
            description,
        } = self;
        match (code, name, description) {
            (Some(code), Some(name), Some(description)) => Ok(NewCompany {
                code,
                name,
                description,
            }),
            (code, name, description) => {
                let mut fields = Vec::new();
                if code.is_none() {
                    fields.push("code");
                }
                if name.is_none() {
                    fields.push("name");
                }
                if description.is_none() {
                    fields.push("description");
                }
                Err(ApiError::missing_fields(fields))
            }
        }
    }
}

/// Body for PUT /companies/{code}
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCompanyRequest {
    fn validate(self) -> Result<CompanyPatch, ApiError> {
        let Self { name, description } = self;
        match (name, description) {
            (Some(name), Some(description)) => Ok(CompanyPatch { name, description }),
            (name, description) => {
                let mut fields = Vec::new();
                if name.is_none() {
                    fields.push("name");
                }
                if description.is_none() {
                    fields.push("description");
                }
                Err(ApiError::missing_fields(fields))
            }
        }
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Response for GET /companies
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummary>,
}

/// Response for POST and PUT endpoints
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Company,
}

/// Company plus the ids of its invoices, for the detail endpoint
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: String,
    pub invoices: Vec<i32>,
}

/// Response for GET /companies/{code}
#[derive(Debug, Serialize)]
pub struct CompanyDetailResponse {
    pub company: CompanyDetail,
}

/// Response for DELETE /companies/{code}
#[derive(Debug, Serialize)]
pub struct DeleteCompanyResponse {
    pub message: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /companies
///
/// Returns `{companies: [{code, name}, ...]}`.
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let companies = state.store.list_companies().await?;

    Ok(Json(CompanyListResponse { companies }))
}

/// GET /companies/{code}
///
/// Returns `{company: {code, name, description, invoices: [id, ...]}}`.
/// The invoice id list comes from a second lookup keyed on `comp_code`.
pub async fn get_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CompanyDetailResponse>, ApiError> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("company", &code))?;

    let invoices = state.store.company_invoice_ids(&code).await?;

    Ok(Json(CompanyDetailResponse {
        company: CompanyDetail {
            code: company.code,
            name: company.name,
            description: company.description,
            invoices,
        },
    }))
}

/// POST /companies
///
/// Accepts `{code, name, description}`, returns 201 `{company}`.
pub async fn create_company(
    State(state): State<AppState>,
    Json(body): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let company = state.store.create_company(body.validate()?).await?;

    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// PUT /companies/{code}
///
/// Accepts `{name, description}`, returns `{company}`.
pub async fn update_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let patch = body.validate()?;

    let company = state
        .store
        .update_company(&code, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("company", &code))?;

    Ok(Json(CompanyResponse { company }))
}

/// DELETE /companies/{code}
///
/// Always reports `{message: "Deleted"}`, whether or not a row existed.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteCompanyResponse>, ApiError> {
    state.store.delete_company(&code).await?;

    Ok(Json(DeleteCompanyResponse { message: "Deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation_names_missing_fields() {
        let err = CreateCompanyRequest::default().validate().unwrap_err();
        let ApiError::MissingFields { fields } = err else {
            panic!("expected MissingFields, got {err:?}");
        };
        assert_eq!(fields, vec!["code", "name", "description"]);
    }

    #[test]
    fn test_create_request_validation_accepts_full_payload() {
        let payload = CreateCompanyRequest {
            code: Some("ibm".to_string()),
            name: Some("IBM".to_string()),
            description: Some("Big blue.".to_string()),
        };
        let new_company = payload.validate().unwrap();
        assert_eq!(new_company.code, "ibm");
    }

    #[test]
    fn test_update_request_validation_partial_payload() {
        let payload = UpdateCompanyRequest {
            name: Some("IBM".to_string()),
            description: None,
        };
        let err = payload.validate().unwrap_err();
        let ApiError::MissingFields { fields } = err else {
            panic!("expected MissingFields, got {err:?}");
        };
        assert_eq!(fields, vec!["description"]);
    }
}
