// src/db/store.rs

// Contratos dos stores externos. Os serviços só conhecem estas traits:
// o Postgres implementa em produção, o `UnconfiguredStore` quando faltam
// credenciais e o store em memória nos testes.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::{CatalogFilter, CatalogItem, CatalogItemUpdate, NewCatalogItem},
        quote::{ClientData, NewQuoteLine, QuoteHeader, QuoteItemDetail, QuoteStatus, QuoteSummary},
    },
};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Itens ativos que batem com o filtro, ordenados por nome.
    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<CatalogItem>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<CatalogItem>, AppError>;

    async fn insert(&self, item: &NewCatalogItem) -> Result<Uuid, AppError>;

    /// Retorna `false` se o item não existir.
    async fn update(&self, id: Uuid, changes: &CatalogItemUpdate) -> Result<bool, AppError>;

    /// Retorna `false` se o item não existir.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, AppError>;
}

/// Uma unidade de trabalho da finalização. Tudo que for feito aqui só
/// fica visível depois do `commit`; se ela for descartada, nada persiste.
#[async_trait]
pub trait QuoteUnitOfWork: Send {
    /// Cliente com este telefone, criado se ainda não existir. Um cliente
    /// já gravado mantém nome e endereço. Retorna `(id, criado_agora)`.
    async fn upsert_client(&mut self, client: &ClientData) -> Result<(Uuid, bool), AppError>;

    async fn insert_quote(
        &mut self,
        client_id: Uuid,
        valid_until: NaiveDate,
        status: QuoteStatus,
    ) -> Result<QuoteHeader, AppError>;

    async fn insert_items(&mut self, lines: &[NewQuoteLine]) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn QuoteUnitOfWork>, AppError>;

    /// Orçamentos do mais novo para o mais antigo.
    async fn list(&self) -> Result<Vec<QuoteSummary>, AppError>;

    async fn get_by_number(&self, quote_number: &str) -> Result<Option<QuoteSummary>, AppError>;

    async fn list_items(&self, quote_id: Uuid) -> Result<Vec<QuoteItemDetail>, AppError>;

    /// Troca o status somente se o atual ainda for `expected`.
    /// Retorna `false` quando nenhuma linha foi alterada.
    async fn update_status(
        &self,
        quote_number: &str,
        expected: QuoteStatus,
        status: QuoteStatus,
    ) -> Result<bool, AppError>;

    /// Retorna `false` se o orçamento não existir.
    async fn delete(&self, quote_number: &str) -> Result<bool, AppError>;
}
