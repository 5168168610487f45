//! Invoice resource: HTTP handlers and payload types

pub mod handlers;
