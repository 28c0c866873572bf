// src/models/draft.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::pricing;
use crate::models::quote::{ClientData, QuoteItem};

/// Orçamento em montagem. Vive só em memória até a finalização.
///
/// Nunca há duas linhas para o mesmo item de catálogo e nenhuma linha
/// fica com quantidade menor que 1. O total é sempre recalculado a partir
/// das linhas atuais.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteDraft {
    client: Option<ClientData>,
    items: Vec<QuoteItem>,
}

impl QuoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> Option<&ClientData> {
        self.client.as_ref()
    }

    pub fn items(&self) -> &[QuoteItem] {
        &self.items
    }

    /// Substitui os dados do cliente por inteiro. Validação é da borda HTTP.
    pub fn set_client(&mut self, data: ClientData) {
        self.client = Some(data);
    }

    /// Adiciona uma linha; se o item já estiver no rascunho, soma a quantidade.
    pub fn add_item(&mut self, item: QuoteItem) {
        let quantity = item.quantity.max(1);
        match self
            .items
            .iter_mut()
            .find(|line| line.catalog_item.id == item.catalog_item.id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(QuoteItem { quantity, ..item }),
        }
    }

    /// Define a quantidade da linha, com piso em 1. Remover é outra operação.
    pub fn update_quantity(&mut self, item_id: Uuid, quantity: i64) {
        let clamped = quantity.clamp(1, i64::from(i32::MAX)) as i32;
        if let Some(line) = self.items.iter_mut().find(|line| line.catalog_item.id == item_id) {
            line.quantity = clamped;
        }
    }

    pub fn remove_item(&mut self, item_id: Uuid) {
        self.items.retain(|line| line.catalog_item.id != item_id);
    }

    pub fn clear(&mut self) {
        self.client = None;
        self.items.clear();
    }

    pub fn total_value(&self) -> Decimal {
        pricing::total(&self.items)
    }
}

/// Visão de revisão (passo 3): linhas, subtotais e total.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub id: Uuid,
    pub client: Option<ClientData>,
    pub items: Vec<QuoteItem>,
    pub subtotal_materials: Decimal,
    pub subtotal_services: Decimal,
    pub total_value: Decimal,
    pub finalizing: bool,
}

impl DraftView {
    pub fn new(id: Uuid, draft: &QuoteDraft, finalizing: bool) -> Self {
        DraftView {
            id,
            client: draft.client().cloned(),
            items: draft.items().to_vec(),
            subtotal_materials: pricing::materials_subtotal(draft.items()),
            subtotal_services: pricing::services_subtotal(draft.items()),
            total_value: draft.total_value(),
            finalizing,
        }
    }
}
