//! Domain models and validated write payloads

pub mod company;
pub mod invoice;

pub use company::{Company, CompanyPatch, CompanySummary, NewCompany};
pub use invoice::{Invoice, InvoicePatch, InvoiceSummary, NewInvoice};
