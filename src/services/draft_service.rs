// src/services/draft_service.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        draft::{DraftView, QuoteDraft},
        quote::{ClientData, QuoteItem},
    },
    services::{catalog_service::CatalogService, quote_service::QuoteService},
};

// Um fluxo de criação aberto: o rascunho e a trava de finalização.
// `closed` marca fluxos já finalizados ou abandonados, para que quem ainda
// segura o handle não altere um rascunho que saiu do registro.
struct QuoteFlow {
    draft: QuoteDraft,
    finalizing: bool,
    closed: bool,
    touched_at: Instant,
}

impl QuoteFlow {
    fn new() -> Self {
        Self {
            draft: QuoteDraft::new(),
            finalizing: false,
            closed: false,
            touched_at: Instant::now(),
        }
    }

    fn ensure_open(&self, id: Uuid) -> Result<(), AppError> {
        if self.closed {
            return Err(AppError::DraftNotFound(id));
        }
        Ok(())
    }

    // Alterações ficam bloqueadas enquanto a finalização está em andamento
    fn editable(&mut self, id: Uuid) -> Result<&mut QuoteDraft, AppError> {
        self.ensure_open(id)?;
        if self.finalizing {
            return Err(AppError::FinalizeInProgress);
        }
        self.touched_at = Instant::now();
        Ok(&mut self.draft)
    }
}

type FlowHandle = Arc<Mutex<QuoteFlow>>;

/// Registro dos rascunhos abertos. Cada fluxo de criação de orçamento
/// recebe um id em `start` e é descartado ao finalizar ou abandonar.
#[derive(Clone)]
pub struct DraftService {
    flows: Arc<Mutex<HashMap<Uuid, FlowHandle>>>,
    catalog: CatalogService,
    quotes: QuoteService,
    ttl: Duration,
}

impl DraftService {
    pub fn new(catalog: CatalogService, quotes: QuoteService, ttl: Duration) -> Self {
        Self {
            flows: Arc::new(Mutex::new(HashMap::new())),
            catalog,
            quotes,
            ttl,
        }
    }

    async fn flow(&self, id: Uuid) -> Result<FlowHandle, AppError> {
        self.flows
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::DraftNotFound(id))
    }

    pub async fn start(&self) -> DraftView {
        let id = Uuid::new_v4();
        let flow = QuoteFlow::new();
        let view = DraftView::new(id, &flow.draft, false);

        let mut flows = self.flows.lock().await;
        let before = flows.len();
        flows.retain(|_, handle| match handle.try_lock() {
            Ok(flow) => flow.finalizing || flow.touched_at.elapsed() < self.ttl,
            Err(_) => true,
        });
        if flows.len() < before {
            tracing::info!("{} rascunho(s) abandonado(s) descartado(s)", before - flows.len());
        }
        flows.insert(id, Arc::new(Mutex::new(flow)));

        tracing::debug!("Rascunho {} iniciado", id);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<DraftView, AppError> {
        let handle = self.flow(id).await?;
        let flow = handle.lock().await;
        flow.ensure_open(id)?;
        Ok(DraftView::new(id, &flow.draft, flow.finalizing))
    }

    pub async fn set_client(&self, id: Uuid, client: ClientData) -> Result<DraftView, AppError> {
        let handle = self.flow(id).await?;
        let mut flow = handle.lock().await;
        flow.editable(id)?.set_client(client);
        Ok(DraftView::new(id, &flow.draft, flow.finalizing))
    }

    /// Adiciona um item ativo do catálogo, com o preço vigente agora.
    pub async fn add_item(&self, id: Uuid, catalog_item_id: Uuid, quantity: i32) -> Result<DraftView, AppError> {
        let handle = self.flow(id).await?;
        let item = self.catalog.get_active_item(catalog_item_id).await?;

        let mut flow = handle.lock().await;
        flow.editable(id)?.add_item(QuoteItem::new(item, quantity));
        Ok(DraftView::new(id, &flow.draft, flow.finalizing))
    }

    pub async fn update_quantity(&self, id: Uuid, item_id: Uuid, quantity: i64) -> Result<DraftView, AppError> {
        let handle = self.flow(id).await?;
        let mut flow = handle.lock().await;
        flow.editable(id)?.update_quantity(item_id, quantity);
        Ok(DraftView::new(id, &flow.draft, flow.finalizing))
    }

    pub async fn remove_item(&self, id: Uuid, item_id: Uuid) -> Result<DraftView, AppError> {
        let handle = self.flow(id).await?;
        let mut flow = handle.lock().await;
        flow.editable(id)?.remove_item(item_id);
        Ok(DraftView::new(id, &flow.draft, flow.finalizing))
    }

    /// Persiste o rascunho. Uma segunda chamada enquanto a primeira ainda
    /// roda é recusada com `FinalizeInProgress`. Em caso de sucesso o
    /// rascunho é limpo e o fluxo encerrado; em caso de falha ele fica
    /// intacto para nova tentativa.
    pub async fn finalize(&self, id: Uuid) -> Result<String, AppError> {
        let handle = self.flow(id).await?;
        let (client, items) = Self::claim_for_finalize(id, &handle).await?;

        let result = self.quotes.create_quote(&client, &items).await;

        let mut flow = handle.lock().await;
        flow.finalizing = false;
        flow.touched_at = Instant::now();

        let quote_number = result?;
        flow.draft.clear();
        flow.closed = true;
        drop(flow);
        self.flows.lock().await.remove(&id);

        Ok(quote_number)
    }

    // Checa e liga a trava numa única seção crítica do fluxo
    async fn claim_for_finalize(id: Uuid, handle: &FlowHandle) -> Result<(ClientData, Vec<QuoteItem>), AppError> {
        let mut flow = handle.lock().await;
        flow.ensure_open(id)?;
        if flow.finalizing {
            tracing::warn!("Finalização repetida do rascunho {} recusada", id);
            return Err(AppError::FinalizeInProgress);
        }
        let client = flow
            .draft
            .client()
            .cloned()
            .ok_or_else(|| AppError::DraftIncomplete("dados do cliente não informados".to_string()))?;
        if flow.draft.items().is_empty() {
            return Err(AppError::DraftIncomplete("o orçamento não tem itens".to_string()));
        }
        flow.finalizing = true;
        Ok((client, flow.draft.items().to_vec()))
    }

    /// Descarta o rascunho sem gravar nada.
    pub async fn abandon(&self, id: Uuid) -> Result<(), AppError> {
        let handle = self.flow(id).await?;
        {
            let mut flow = handle.lock().await;
            flow.ensure_open(id)?;
            if flow.finalizing {
                return Err(AppError::FinalizeInProgress);
            }
            flow.closed = true;
        }
        self.flows.lock().await.remove(&id);
        tracing::debug!("Rascunho {} descartado", id);
        Ok(())
    }
}
