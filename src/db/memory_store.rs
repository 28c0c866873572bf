// src/db/memory_store.rs

// Store em memória para os testes. Implementa as mesmas traits do Postgres,
// com injeção de falha por etapa e atraso artificial na criação do orçamento.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CatalogStore, QuoteStore, QuoteUnitOfWork},
    models::{
        catalog::{
            CatalogCategory, CatalogFilter, CatalogItem, CatalogItemUpdate, CatalogUnit,
            NewCatalogItem, DEFAULT_ICON,
        },
        quote::{
            ClientData, FinalizeStep, NewQuoteLine, QuoteHeader, QuoteItemDetail, QuoteStatus,
            QuoteSummary,
        },
    },
};

#[derive(Debug, Clone)]
struct StoredClient {
    id: Uuid,
    name: String,
    phone: String,
    address: String,
    location_type: crate::models::quote::LocationType,
}

#[derive(Debug, Clone)]
struct StoredQuote {
    id: Uuid,
    quote_number: String,
    client_id: Uuid,
    valid_until: NaiveDate,
    status: QuoteStatus,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Clone)]
struct StoredLine {
    id: Uuid,
    line: NewQuoteLine,
}

#[derive(Debug, Default)]
struct MemoryState {
    catalog: Vec<CatalogItem>,
    clients: Vec<StoredClient>,
    quotes: Vec<StoredQuote>,
    lines: Vec<StoredLine>,
    next_number: u64,
    seq: u64,
    fail_at: Option<FinalizeStep>,
    quote_delay: Option<Duration>,
    unit_of_work_count: usize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

fn injected(step: FinalizeStep) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("falha simulada em {}", step))
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().next_number = 1000;
        store
    }

    pub fn add_catalog_item(&self, name: &str, price: Decimal, category: CatalogCategory) -> CatalogItem {
        let mut state = self.state.lock().unwrap();
        state.seq += 1;
        let item = CatalogItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: String::new(),
            price,
            unit: CatalogUnit::Unit,
            category,
            icon: DEFAULT_ICON.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        state.catalog.push(item.clone());
        item
    }

    pub fn add_client(&self, name: &str, phone: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().clients.push(StoredClient {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            address: String::new(),
            location_type: crate::models::quote::LocationType::House,
        });
        id
    }

    /// Insere um orçamento já finalizado, sem passar pelo fluxo.
    pub fn add_quote(&self, client_id: Uuid, status: QuoteStatus, created_at: DateTime<Utc>, lines: &[(Uuid, i32, Decimal)]) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_number += 1;
        state.seq += 1;
        let quote = StoredQuote {
            id: Uuid::new_v4(),
            quote_number: state.next_number.to_string(),
            client_id,
            valid_until: created_at.date_naive(),
            status,
            created_at,
            seq: state.seq,
        };
        for (catalog_item_id, quantity, unit_price) in lines {
            state.lines.push(StoredLine {
                id: Uuid::new_v4(),
                line: NewQuoteLine {
                    quote_id: quote.id,
                    catalog_item_id: *catalog_item_id,
                    quantity: *quantity,
                    unit_price: *unit_price,
                },
            });
        }
        let number = quote.quote_number.clone();
        state.quotes.push(quote);
        number
    }

    pub fn fail_at(&self, step: FinalizeStep) {
        self.state.lock().unwrap().fail_at = Some(step);
    }

    pub fn set_quote_delay(&self, delay: Duration) {
        self.state.lock().unwrap().quote_delay = Some(delay);
    }

    pub fn client_count(&self) -> usize {
        self.state.lock().unwrap().clients.len()
    }

    pub fn client_name(&self, id: Uuid) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.clients.iter().find(|c| c.id == id).map(|c| c.name.clone())
    }

    pub fn quote_count(&self) -> usize {
        self.state.lock().unwrap().quotes.len()
    }

    pub fn line_count(&self) -> usize {
        self.state.lock().unwrap().lines.len()
    }

    pub fn unit_of_work_count(&self) -> usize {
        self.state.lock().unwrap().unit_of_work_count
    }

    pub fn client_id_of(&self, quote_number: &str) -> Option<Uuid> {
        let state = self.state.lock().unwrap();
        state
            .quotes
            .iter()
            .find(|q| q.quote_number == quote_number)
            .map(|q| q.client_id)
    }

    pub fn lines_of(&self, quote_number: &str) -> Vec<NewQuoteLine> {
        let state = self.state.lock().unwrap();
        let Some(quote) = state.quotes.iter().find(|q| q.quote_number == quote_number) else {
            return Vec::new();
        };
        state
            .lines
            .iter()
            .filter(|stored| stored.line.quote_id == quote.id)
            .map(|stored| stored.line.clone())
            .collect()
    }

    pub fn status_of(&self, quote_number: &str) -> Option<QuoteStatus> {
        let state = self.state.lock().unwrap();
        state
            .quotes
            .iter()
            .find(|q| q.quote_number == quote_number)
            .map(|q| q.status)
    }
}

impl MemoryState {
    fn summary(&self, quote: &StoredQuote) -> QuoteSummary {
        let client = self.clients.iter().find(|c| c.id == quote.client_id);
        let total_value = self
            .lines
            .iter()
            .filter(|stored| stored.line.quote_id == quote.id)
            .map(|stored| stored.line.unit_price * Decimal::from(stored.line.quantity))
            .sum();

        QuoteSummary {
            id: quote.id,
            quote_number: quote.quote_number.clone(),
            client_id: quote.client_id,
            client_name: client.map(|c| c.name.clone()).unwrap_or_default(),
            client_phone: client.map(|c| c.phone.clone()).unwrap_or_default(),
            client_address: client.map(|c| c.address.clone()).unwrap_or_default(),
            client_location_type: client
                .map(|c| c.location_type)
                .unwrap_or(crate::models::quote::LocationType::House),
            valid_until: quote.valid_until,
            status: quote.status,
            total_value,
            created_at: quote.created_at,
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<CatalogItem>, AppError> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<CatalogItem> = state
            .catalog
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CatalogItem>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.catalog.iter().find(|item| item.id == id).cloned())
    }

    async fn insert(&self, item: &NewCatalogItem) -> Result<Uuid, AppError> {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::new_v4();
        state.catalog.push(CatalogItem {
            id,
            name: item.name.clone(),
            brand: item.brand.clone(),
            price: item.price,
            unit: item.unit,
            category: item.category,
            icon: item.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
            is_active: true,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: &CatalogItemUpdate) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        match state.catalog.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                changes.apply_to(item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        match state.catalog.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Acumula as escritas e só aplica no `commit`, como uma transação.
/// Clientes são a exceção: entram direto no estado compartilhado, como o
/// índice único de telefone faria, e saem de novo se não houver commit.
pub struct MemoryUnitOfWork {
    store: MemoryStore,
    created_clients: Vec<Uuid>,
    quote: Option<StoredQuote>,
    lines: Vec<StoredLine>,
}

impl MemoryUnitOfWork {
    fn check(&self, step: FinalizeStep) -> Result<(), AppError> {
        if self.store.state.lock().unwrap().fail_at == Some(step) {
            return Err(injected(step));
        }
        Ok(())
    }
}

// Rollback
impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        if self.created_clients.is_empty() {
            return;
        }
        if let Ok(mut state) = self.store.state.lock() {
            state.clients.retain(|c| !self.created_clients.contains(&c.id));
        }
    }
}

#[async_trait]
impl QuoteUnitOfWork for MemoryUnitOfWork {
    async fn upsert_client(&mut self, client: &ClientData) -> Result<(Uuid, bool), AppError> {
        self.check(FinalizeStep::ResolveClient)?;
        let mut state = self.store.state.lock().unwrap();
        if let Some(existing) = state.clients.iter().find(|c| c.phone == client.phone) {
            return Ok((existing.id, false));
        }

        let id = Uuid::new_v4();
        state.clients.push(StoredClient {
            id,
            name: client.name.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            location_type: client.location_type,
        });
        self.created_clients.push(id);
        Ok((id, true))
    }

    async fn insert_quote(
        &mut self,
        client_id: Uuid,
        valid_until: NaiveDate,
        status: QuoteStatus,
    ) -> Result<QuoteHeader, AppError> {
        let delay = self.store.state.lock().unwrap().quote_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check(FinalizeStep::CreateQuote)?;

        let mut state = self.store.state.lock().unwrap();
        state.next_number += 1;
        state.seq += 1;
        let quote = StoredQuote {
            id: Uuid::new_v4(),
            quote_number: state.next_number.to_string(),
            client_id,
            valid_until,
            status,
            created_at: Utc::now(),
            seq: state.seq,
        };
        let header = QuoteHeader {
            id: quote.id,
            quote_number: quote.quote_number.clone(),
        };
        self.quote = Some(quote);
        Ok(header)
    }

    async fn insert_items(&mut self, lines: &[NewQuoteLine]) -> Result<(), AppError> {
        self.check(FinalizeStep::InsertItems)?;
        self.lines.extend(lines.iter().cloned().map(|line| StoredLine {
            id: Uuid::new_v4(),
            line,
        }));
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), AppError> {
        self.check(FinalizeStep::Commit)?;
        let store = self.store.clone();
        let mut state = store.state.lock().unwrap();
        if let Some(quote) = self.quote.take() {
            state.quotes.push(quote);
        }
        state.lines.append(&mut self.lines);
        self.created_clients.clear();
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn QuoteUnitOfWork>, AppError> {
        self.state.lock().unwrap().unit_of_work_count += 1;
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            created_clients: Vec::new(),
            quote: None,
            lines: Vec::new(),
        }))
    }

    async fn list(&self) -> Result<Vec<QuoteSummary>, AppError> {
        let state = self.state.lock().unwrap();
        let mut quotes: Vec<&StoredQuote> = state.quotes.iter().collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));
        Ok(quotes.into_iter().map(|q| state.summary(q)).collect())
    }

    async fn get_by_number(&self, quote_number: &str) -> Result<Option<QuoteSummary>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .quotes
            .iter()
            .find(|q| q.quote_number == quote_number)
            .map(|q| state.summary(q)))
    }

    async fn list_items(&self, quote_id: Uuid) -> Result<Vec<QuoteItemDetail>, AppError> {
        let state = self.state.lock().unwrap();
        let details = state
            .lines
            .iter()
            .filter(|stored| stored.line.quote_id == quote_id)
            .filter_map(|stored| {
                let item = state.catalog.iter().find(|c| c.id == stored.line.catalog_item_id)?;
                Some(QuoteItemDetail {
                    id: stored.id,
                    quote_id,
                    catalog_item_id: item.id,
                    quantity: stored.line.quantity,
                    unit_price: stored.line.unit_price,
                    item_name: item.name.clone(),
                    item_brand: item.brand.clone(),
                    item_unit: item.unit,
                    item_category: item.category,
                    item_icon: item.icon.clone(),
                    item_is_active: item.is_active,
                    item_created_at: item.created_at,
                })
            })
            .collect();
        Ok(details)
    }

    async fn update_status(
        &self,
        quote_number: &str,
        expected: QuoteStatus,
        status: QuoteStatus,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        match state
            .quotes
            .iter_mut()
            .find(|q| q.quote_number == quote_number && q.status == expected)
        {
            Some(quote) => {
                quote.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, quote_number: &str) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(position) = state.quotes.iter().position(|q| q.quote_number == quote_number) else {
            return Ok(false);
        };
        let removed = state.quotes.remove(position);
        state.lines.retain(|stored| stored.line.quote_id != removed.id);
        Ok(true)
    }
}
