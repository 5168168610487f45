//! In-memory implementation of Store for testing and development

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;

use crate::core::error::StoreError;
use crate::entities::{
    Company, CompanyPatch, CompanySummary, Invoice, InvoicePatch, InvoiceSummary, NewCompany,
    NewInvoice,
};
use crate::storage::Store;

const BACKEND: &str = "in-memory";

/// Map state behind the lock.
///
/// `IndexMap` keeps insertion order, which is what the list endpoints
/// promise. Invoice ids come from a serial counter, mirroring the SERIAL
/// column in the PostgreSQL backend.
#[derive(Default)]
struct State {
    companies: IndexMap<String, Company>,
    invoices: IndexMap<i32, Invoice>,
    next_invoice_id: i32,
}

/// In-memory store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Referential integrity is enforced by hand: invoice writes check that the
/// company exists, company deletion cascades to its invoices.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                next_invoice_id: 1,
                ..State::default()
            })),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|e| StoreError::query(BACKEND, format!("failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|e| StoreError::query(BACKEND, format!("failed to acquire write lock: {e}")))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, StoreError> {
        let state = self.read()?;

        Ok(state
            .companies
            .values()
            .cloned()
            .map(CompanySummary::from)
            .collect())
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, StoreError> {
        let state = self.read()?;

        Ok(state.companies.get(code).cloned())
    }

    async fn company_invoice_ids(&self, code: &str) -> Result<Vec<i32>, StoreError> {
        let state = self.read()?;

        Ok(state
            .invoices
            .values()
            .filter(|invoice| invoice.comp_code == code)
            .map(|invoice| invoice.id)
            .collect())
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        let mut state = self.write()?;

        if state.companies.contains_key(&company.code) {
            return Err(StoreError::integrity(format!(
                "company '{}' already exists",
                company.code
            )));
        }

        let company = Company {
            code: company.code,
            name: company.name,
            description: company.description,
        };
        state
            .companies
            .insert(company.code.clone(), company.clone());

        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        patch: CompanyPatch,
    ) -> Result<Option<Company>, StoreError> {
        let mut state = self.write()?;

        let Some(company) = state.companies.get_mut(code) else {
            return Ok(None);
        };

        company.name = patch.name;
        company.description = patch.description;

        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;

        state.companies.shift_remove(code);
        // Cascade, matching ON DELETE CASCADE in the PostgreSQL schema
        state.invoices.retain(|_, invoice| invoice.comp_code != code);

        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, StoreError> {
        let state = self.read()?;

        Ok(state
            .invoices
            .values()
            .cloned()
            .map(InvoiceSummary::from)
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, StoreError> {
        let state = self.read()?;

        Ok(state.invoices.get(&id).cloned())
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let mut state = self.write()?;

        if !state.companies.contains_key(&invoice.comp_code) {
            return Err(StoreError::integrity(format!(
                "unknown company '{}'",
                invoice.comp_code
            )));
        }

        let id = state.next_invoice_id;
        state.next_invoice_id += 1;

        let invoice = Invoice {
            id,
            comp_code: invoice.comp_code,
            amt: invoice.amt,
            paid: false,
            add_date: Utc::now().date_naive(),
            paid_date: None,
        };
        state.invoices.insert(id, invoice.clone());

        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        id: i32,
        patch: InvoicePatch,
    ) -> Result<Option<Invoice>, StoreError> {
        let mut state = self.write()?;

        // Match the SQL semantics: an UPDATE with no matching row never
        // evaluates the foreign key, so the absent-id check comes first
        if !state.invoices.contains_key(&id) {
            return Ok(None);
        }

        if !state.companies.contains_key(&patch.comp_code) {
            return Err(StoreError::integrity(format!(
                "unknown company '{}'",
                patch.comp_code
            )));
        }

        let Some(invoice) = state.invoices.get_mut(&id) else {
            return Ok(None);
        };

        invoice.amt = patch.amt;
        invoice.comp_code = patch.comp_code;
        invoice.paid = patch.paid;
        invoice.add_date = patch.add_date;
        invoice.paid_date = patch.paid_date;

        Ok(Some(invoice.clone()))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.write()?;

        Ok(state.invoices.shift_remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> NewCompany {
        NewCompany {
            code: "acme".to_string(),
            name: "Acme Corp".to_string(),
            description: "Makers of everything".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_company() {
        let store = InMemoryStore::new();

        let created = store.create_company(acme()).await.unwrap();
        assert_eq!(created.code, "acme");

        let fetched = store.get_company("acme").await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_company_is_rejected() {
        let store = InMemoryStore::new();

        store.create_company(acme()).await.unwrap();
        let err = store.create_company(acme()).await.unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }));
    }

    #[tokio::test]
    async fn test_list_companies_in_insertion_order() {
        let store = InMemoryStore::new();

        store.create_company(acme()).await.unwrap();
        store
            .create_company(NewCompany {
                code: "ibm".to_string(),
                name: "IBM".to_string(),
                description: "Big blue.".to_string(),
            })
            .await
            .unwrap();

        let companies = store.list_companies().await.unwrap();
        let codes: Vec<&str> = companies.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["acme", "ibm"]);
    }

    #[tokio::test]
    async fn test_update_company() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();

        let updated = store
            .update_company(
                "acme",
                CompanyPatch {
                    name: "Acme Inc".to_string(),
                    description: "Rebranded".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.unwrap().name, "Acme Inc");
    }

    #[tokio::test]
    async fn test_update_missing_company_is_none() {
        let store = InMemoryStore::new();

        let updated = store
            .update_company(
                "ghost",
                CompanyPatch {
                    name: "x".to_string(),
                    description: "y".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_company_is_silent_and_cascades() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();
        store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 100.0,
            })
            .await
            .unwrap();

        // Deleting an absent code is not an error
        store.delete_company("ghost").await.unwrap();

        store.delete_company("acme").await.unwrap();
        assert!(store.get_company("acme").await.unwrap().is_none());
        assert!(store.list_invoices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_defaults_and_serial_ids() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();

        let first = store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 100.0,
            })
            .await
            .unwrap();
        let second = store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 250.0,
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.paid);
        assert!(first.paid_date.is_none());
        assert_eq!(first.add_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_invoice_with_unknown_company_is_rejected() {
        let store = InMemoryStore::new();

        let err = store
            .create_invoice(NewInvoice {
                comp_code: "ghost".to_string(),
                amt: 1.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }));
    }

    #[tokio::test]
    async fn test_company_invoice_ids() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();
        store
            .create_company(NewCompany {
                code: "ibm".to_string(),
                name: "IBM".to_string(),
                description: "Big blue.".to_string(),
            })
            .await
            .unwrap();

        for (code, amt) in [("acme", 10.0), ("ibm", 20.0), ("acme", 30.0)] {
            store
                .create_invoice(NewInvoice {
                    comp_code: code.to_string(),
                    amt,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.company_invoice_ids("acme").await.unwrap(), vec![1, 3]);
        assert_eq!(store.company_invoice_ids("ibm").await.unwrap(), vec![2]);
        assert!(store.company_invoice_ids("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_invoice_full_replace() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();
        let invoice = store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 100.0,
            })
            .await
            .unwrap();

        let paid_date = chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let updated = store
            .update_invoice(
                invoice.id,
                InvoicePatch {
                    amt: 150.0,
                    comp_code: "acme".to_string(),
                    paid: true,
                    add_date: invoice.add_date,
                    paid_date: Some(paid_date),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.amt, 150.0);
        assert!(updated.paid);
        assert_eq!(updated.paid_date, Some(paid_date));
    }

    #[tokio::test]
    async fn test_update_invoice_rejects_unknown_company() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();
        let invoice = store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 100.0,
            })
            .await
            .unwrap();

        let err = store
            .update_invoice(
                invoice.id,
                InvoicePatch {
                    amt: 100.0,
                    comp_code: "ghost".to_string(),
                    paid: false,
                    add_date: invoice.add_date,
                    paid_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_invoice_is_none_even_with_unknown_company() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();

        // An update that matches no row never evaluates the company
        // reference, mirroring the FK behavior of the SQL backend
        let updated = store
            .update_invoice(
                999,
                InvoicePatch {
                    amt: 100.0,
                    comp_code: "ghost".to_string(),
                    paid: false,
                    add_date: Utc::now().date_naive(),
                    paid_date: None,
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_invoice_reports_existence() {
        let store = InMemoryStore::new();
        store.create_company(acme()).await.unwrap();
        let invoice = store
            .create_invoice(NewInvoice {
                comp_code: "acme".to_string(),
                amt: 100.0,
            })
            .await
            .unwrap();

        assert!(store.delete_invoice(invoice.id).await.unwrap());
        assert!(!store.delete_invoice(invoice.id).await.unwrap());
    }
}
