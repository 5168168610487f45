//! # biztime
//!
//! A small REST API for tracking companies and the invoices billed to them.
//!
//! ## Resources
//!
//! - **Company**: keyed by a short code (e.g. `"ibm"`), owns zero or more invoices
//! - **Invoice**: serial id, amount, paid flag and dates, belongs to one company
//!
//! ## Architecture
//!
//! - [`entities`]: domain models and validated write payloads
//! - [`storage`]: the [`storage::Store`] trait with in-memory and PostgreSQL backends
//! - [`companies`] / [`invoices`]: HTTP handlers and response envelopes per resource
//! - [`server`]: router assembly and the serve loop
//! - [`config`]: runtime configuration (YAML file + environment overrides)
//! - [`core`]: error types shared across the crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! let store = InMemoryStore::new();
//! let app = build_router(AppState::new(Arc::new(store)));
//! server::serve("127.0.0.1:3000", app).await?;
//! ```

pub mod companies;
pub mod config;
pub mod core;
pub mod entities;
pub mod invoices;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::core::error::{ApiError, ErrorResponse, StoreError};
    pub use crate::entities::{
        company::{Company, CompanyPatch, CompanySummary, NewCompany},
        invoice::{Invoice, InvoicePatch, InvoiceSummary, NewInvoice},
    };
    pub use crate::server::{AppState, build_router};
    pub use crate::storage::{InMemoryStore, Store};
    #[cfg(feature = "postgres")]
    pub use crate::storage::postgres::{PostgresStore, ensure_schema};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
