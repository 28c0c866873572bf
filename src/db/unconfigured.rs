// src/db/unconfigured.rs

// Store usado quando as credenciais do banco não foram informadas.
// O processo sobe normalmente, mas toda operação devolve uma falha.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CatalogStore, QuoteStore, QuoteUnitOfWork},
    models::{
        catalog::{CatalogFilter, CatalogItem, CatalogItemUpdate, NewCatalogItem},
        quote::{QuoteItemDetail, QuoteStatus, QuoteSummary},
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl CatalogStore for UnconfiguredStore {
    async fn list(&self, _filter: &CatalogFilter) -> Result<Vec<CatalogItem>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn get(&self, _id: Uuid) -> Result<Option<CatalogItem>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn insert(&self, _item: &NewCatalogItem) -> Result<Uuid, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn update(&self, _id: Uuid, _changes: &CatalogItemUpdate) -> Result<bool, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn set_active(&self, _id: Uuid, _active: bool) -> Result<bool, AppError> {
        Err(AppError::StoreNotConfigured)
    }
}

#[async_trait]
impl QuoteStore for UnconfiguredStore {
    async fn begin(&self) -> Result<Box<dyn QuoteUnitOfWork>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn list(&self) -> Result<Vec<QuoteSummary>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn get_by_number(&self, _quote_number: &str) -> Result<Option<QuoteSummary>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn list_items(&self, _quote_id: Uuid) -> Result<Vec<QuoteItemDetail>, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn update_status(
        &self,
        _quote_number: &str,
        _expected: QuoteStatus,
        _status: QuoteStatus,
    ) -> Result<bool, AppError> {
        Err(AppError::StoreNotConfigured)
    }

    async fn delete(&self, _quote_number: &str) -> Result<bool, AppError> {
        Err(AppError::StoreNotConfigured)
    }
}
