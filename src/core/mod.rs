//! Shared core types

pub mod error;

pub use error::{ApiError, ErrorResponse, StoreError};
