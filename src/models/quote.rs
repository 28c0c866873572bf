// src/models/quote.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::catalog::{CatalogCategory, CatalogItem, CatalogUnit};

// --- ENUMS ---

// Mapeia o CREATE TYPE quote_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Open,
    Approved,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Open => "open",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    /// Rótulo exibido nas telas.
    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Open => "Orçado",
            QuoteStatus::Approved => "Validado",
            QuoteStatus::Completed => "Concluído",
            QuoteStatus::Cancelled => "Cancelado",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            QuoteStatus::Open => "gray-400",
            QuoteStatus::Approved => "status-warning",
            QuoteStatus::Completed => "status-success",
            QuoteStatus::Cancelled => "status-danger",
        }
    }

    /// Tabela de transições: open -> {approved, cancelled},
    /// approved -> {completed, cancelled}. Repetir o status atual é aceito.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (QuoteStatus::Open, QuoteStatus::Approved)
                | (QuoteStatus::Open, QuoteStatus::Cancelled)
                | (QuoteStatus::Approved, QuoteStatus::Completed)
                | (QuoteStatus::Approved, QuoteStatus::Cancelled)
        )
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Mapeia o CREATE TYPE location_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "location_type")]
pub enum LocationType {
    #[serde(rename = "casa")]
    #[sqlx(rename = "casa")]
    House,
    #[serde(rename = "apartamento")]
    #[sqlx(rename = "apartamento")]
    Apartment,
    #[serde(rename = "loja")]
    #[sqlx(rename = "loja")]
    Store,
    #[serde(rename = "empresa")]
    #[sqlx(rename = "empresa")]
    Company,
}

impl LocationType {
    pub fn label(&self) -> &'static str {
        match self {
            LocationType::House => "Casa",
            LocationType::Apartment => "Apartamento",
            LocationType::Store => "Loja",
            LocationType::Company => "Empresa",
        }
    }
}

// --- CLIENTE ---

/// Dados do cliente informados no passo 1. O telefone é a chave natural
/// usada para reaproveitar clientes já cadastrados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "Rua das Flores, 123")]
    pub address: String,
    #[schema(example = "11999990000")]
    pub phone: String,
    #[schema(value_type = String, format = Date, example = "2025-01-01")]
    pub valid_until: NaiveDate,
    pub location_type: LocationType,
}

// --- ITENS ---

/// Linha de orçamento: snapshot do item de catálogo + quantidade (mínimo 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub catalog_item: CatalogItem,
    #[schema(example = 3)]
    pub quantity: i32,
}

impl QuoteItem {
    pub fn new(catalog_item: CatalogItem, quantity: i32) -> Self {
        Self { catalog_item, quantity }
    }

    pub fn line_total(&self) -> Decimal {
        self.catalog_item.price * Decimal::from(self.quantity)
    }
}

/// Linha a gravar em `quote_items`. O `unit_price` é o snapshot do preço
/// no momento da finalização.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuoteLine {
    pub quote_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewQuoteLine {
    pub fn snapshot(quote_id: Uuid, item: &QuoteItem) -> Self {
        Self {
            quote_id,
            catalog_item_id: item.catalog_item.id,
            quantity: item.quantity,
            unit_price: item.catalog_item.price,
        }
    }
}

// --- LINHAS DO BANCO (views) ---

/// Uma linha da view `quotes_with_client`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct QuoteSummary {
    pub id: Uuid,
    pub quote_number: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_phone: String,
    pub client_address: String,
    pub client_location_type: LocationType,
    pub valid_until: NaiveDate,
    pub status: QuoteStatus,
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

impl QuoteSummary {
    pub fn client(&self) -> ClientData {
        ClientData {
            name: self.client_name.clone(),
            address: self.client_address.clone(),
            phone: self.client_phone.clone(),
            valid_until: self.valid_until,
            location_type: self.client_location_type,
        }
    }
}

/// Uma linha da view `quote_items_detailed`: dados de exibição do catálogo
/// com o preço congelado da linha.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct QuoteItemDetail {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub item_name: String,
    pub item_brand: String,
    pub item_unit: CatalogUnit,
    pub item_category: CatalogCategory,
    pub item_icon: String,
    pub item_is_active: bool,
    pub item_created_at: DateTime<Utc>,
}

impl From<QuoteItemDetail> for QuoteItem {
    fn from(row: QuoteItemDetail) -> Self {
        QuoteItem {
            catalog_item: CatalogItem {
                id: row.catalog_item_id,
                name: row.item_name,
                brand: row.item_brand,
                // Preço da linha, nunca o preço atual do catálogo
                price: row.unit_price,
                unit: row.item_unit,
                category: row.item_category,
                icon: row.item_icon,
                is_active: row.item_is_active,
                created_at: row.item_created_at,
            },
            quantity: row.quantity,
        }
    }
}

/// Cabeçalho devolvido pelo insert em `quotes`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct QuoteHeader {
    pub id: Uuid,
    pub quote_number: String,
}

// --- VIEW MODEL ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Número do orçamento (não é o id interno da linha)
    #[schema(example = "1024")]
    pub id: String,
    pub client: ClientData,
    pub items: Vec<QuoteItem>,
    pub status: QuoteStatus,
    #[schema(example = "Orçado")]
    pub status_label: String,
    #[schema(example = "31.50")]
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Monta a visão de listagem; os itens são carregados à parte.
    pub fn from_summary(summary: &QuoteSummary) -> Self {
        Quote {
            id: summary.quote_number.clone(),
            client: summary.client(),
            items: Vec::new(),
            status: summary.status,
            status_label: summary.status.label().to_string(),
            total_value: summary.total_value,
            created_at: summary.created_at,
        }
    }

    pub fn with_items(summary: &QuoteSummary, items: Vec<QuoteItem>) -> Self {
        let mut quote = Quote::from_summary(summary);
        quote.total_value = crate::common::pricing::total(&items);
        quote.items = items;
        quote
    }
}

/// Filtros da tela de orçamentos.
#[derive(Debug, Clone, Default)]
pub struct QuoteListFilter {
    pub status: Option<QuoteStatus>,
    pub search: Option<String>,
}

impl QuoteListFilter {
    pub fn matches(&self, quote: &Quote) -> bool {
        if let Some(status) = self.status {
            if quote.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                quote.client.name.to_lowercase().contains(&term)
                    || quote.id.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Resultado de uma finalização bem-sucedida.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuote {
    pub success: bool,
    #[schema(example = "1024")]
    pub quote_id: String,
}

// --- ETAPAS DA FINALIZAÇÃO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeStep {
    ResolveClient,
    CreateQuote,
    InsertItems,
    Commit,
}

impl fmt::Display for FinalizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FinalizeStep::ResolveClient => "resolve_client",
            FinalizeStep::CreateQuote => "create_quote",
            FinalizeStep::InsertItems => "insert_items",
            FinalizeStep::Commit => "commit",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_display_label() {
        use QuoteStatus::*;

        let labels: Vec<_> = [Open, Approved, Completed, Cancelled].iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Orçado", "Validado", "Concluído", "Cancelado"]);
    }

    #[test]
    fn unknown_status_is_rejected_at_deserialization() {
        assert!(serde_json::from_str::<QuoteStatus>("\"archived\"").is_err());
        assert_eq!(serde_json::from_str::<QuoteStatus>("\"approved\"").unwrap(), QuoteStatus::Approved);
    }

    #[test]
    fn transition_table_allows_only_the_workflow() {
        use QuoteStatus::*;

        assert!(Open.can_transition_to(Approved));
        assert!(Open.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Completed));
        assert!(Approved.can_transition_to(Cancelled));

        assert!(!Open.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Open));
        assert!(!Cancelled.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Cancelled));

        for status in [Open, Approved, Completed, Cancelled] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn client_data_uses_camel_case_and_storage_values() {
        let json = serde_json::json!({
            "name": "X",
            "address": "A",
            "phone": "11999990000",
            "validUntil": "2025-01-01",
            "locationType": "casa"
        });
        let client: ClientData = serde_json::from_value(json).unwrap();
        assert_eq!(client.location_type, LocationType::House);
        assert_eq!(client.valid_until, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn search_matches_client_name_or_quote_number() {
        let quote = Quote {
            id: "1024".into(),
            client: ClientData {
                name: "Padaria Central".into(),
                address: "Rua A".into(),
                phone: "1".into(),
                valid_until: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                location_type: LocationType::Store,
            },
            items: vec![],
            status: QuoteStatus::Open,
            status_label: QuoteStatus::Open.label().into(),
            total_value: Decimal::ZERO,
            created_at: Utc::now(),
        };

        let by_name = QuoteListFilter { search: Some("padaria".into()), ..Default::default() };
        let by_number = QuoteListFilter { search: Some("102".into()), ..Default::default() };
        let wrong_status = QuoteListFilter { status: Some(QuoteStatus::Approved), ..Default::default() };

        assert!(by_name.matches(&quote));
        assert!(by_number.matches(&quote));
        assert!(!wrong_status.matches(&quote));
    }
}
