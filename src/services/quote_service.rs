// src/services/quote_service.rs

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{QuoteStore, QuoteUnitOfWork},
    models::quote::{
        ClientData, FinalizeStep, NewQuoteLine, Quote, QuoteItem, QuoteListFilter, QuoteStatus,
    },
};

#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    // Última listagem buscada no banco; refeita depois de cada alteração
    cache: Arc<RwLock<Option<Arc<Vec<Quote>>>>>,
}

// Loga e marca o erro com a etapa que falhou
fn step_failed(step: FinalizeStep) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        tracing::error!("❌ Falha na etapa '{}' da finalização: {}", step, err);
        err.at_step(step)
    }
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    //  FINALIZAÇÃO (cliente -> orçamento -> itens)
    // =========================================================================

    /// Persiste um rascunho completo e devolve o número do orçamento.
    ///
    /// As três etapas rodam numa única unidade de trabalho: se qualquer uma
    /// falhar, nada fica gravado (nem cliente novo, nem cabeçalho sem itens).
    pub async fn create_quote(&self, client: &ClientData, items: &[QuoteItem]) -> Result<String, AppError> {
        if items.is_empty() {
            return Err(AppError::DraftIncomplete("o orçamento não tem itens".to_string()));
        }

        tracing::info!(
            "--- Iniciando salvamento do orçamento (cliente {}, {} itens) ---",
            client.phone,
            items.len()
        );

        let mut uow = self
            .store
            .begin()
            .await
            .map_err(step_failed(FinalizeStep::ResolveClient))?;

        // 1. Cliente: reaproveita pelo telefone ou cria
        let client_id = Self::resolve_client(uow.as_mut(), client)
            .await
            .map_err(step_failed(FinalizeStep::ResolveClient))?;

        // 2. Cabeçalho, sempre nascendo como 'open'
        let header = uow
            .insert_quote(client_id, client.valid_until, QuoteStatus::Open)
            .await
            .map_err(step_failed(FinalizeStep::CreateQuote))?;
        tracing::info!("Orçamento criado. Número: {}", header.quote_number);

        // 3. Linhas com o preço congelado agora
        let lines: Vec<NewQuoteLine> = items
            .iter()
            .map(|item| NewQuoteLine::snapshot(header.id, item))
            .collect();
        uow.insert_items(&lines)
            .await
            .map_err(step_failed(FinalizeStep::InsertItems))?;
        tracing::info!("{} itens gravados", lines.len());

        uow.commit().await.map_err(step_failed(FinalizeStep::Commit))?;

        tracing::info!("✅ Orçamento {} salvo com sucesso", header.quote_number);
        self.refresh_quietly().await;

        Ok(header.quote_number)
    }

    async fn resolve_client(uow: &mut dyn QuoteUnitOfWork, client: &ClientData) -> Result<Uuid, AppError> {
        let (id, created) = uow.upsert_client(client).await?;
        if created {
            tracing::info!("Novo cliente criado ID: {}", id);
        } else {
            tracing::info!("Cliente encontrado ID: {}", id);
        }
        Ok(id)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Busca a lista no banco e atualiza o cache.
    pub async fn refresh_quotes(&self) -> Result<Arc<Vec<Quote>>, AppError> {
        let rows = self.store.list().await?;
        let quotes: Arc<Vec<Quote>> = Arc::new(rows.iter().map(Quote::from_summary).collect());
        *self.cache.write().await = Some(quotes.clone());
        Ok(quotes)
    }

    // Depois de uma escrita bem-sucedida, falha no refresh só é logada
    async fn refresh_quietly(&self) {
        if let Err(err) = self.refresh_quotes().await {
            tracing::warn!("Não foi possível atualizar a lista de orçamentos: {}", err);
            *self.cache.write().await = None;
        }
    }

    /// Lista do mais novo para o mais antigo, servida do cache quando possível.
    pub async fn list_quotes(&self, filter: &QuoteListFilter, refresh: bool) -> Result<Vec<Quote>, AppError> {
        let cached = if refresh { None } else { self.cache.read().await.clone() };
        let quotes = match cached {
            Some(quotes) => quotes,
            None => self.refresh_quotes().await?,
        };

        Ok(quotes.iter().filter(|q| filter.matches(q)).cloned().collect())
    }

    /// Orçamento com itens. `None` quando o número não existe.
    pub async fn get_quote(&self, quote_number: &str) -> Result<Option<Quote>, AppError> {
        let Some(summary) = self.store.get_by_number(quote_number).await? else {
            return Ok(None);
        };

        let items: Vec<QuoteItem> = self
            .store
            .list_items(summary.id)
            .await?
            .into_iter()
            .map(QuoteItem::from)
            .collect();

        Ok(Some(Quote::with_items(&summary, items)))
    }

    // =========================================================================
    //  STATUS / EXCLUSÃO
    // =========================================================================

    pub async fn update_status(&self, quote_number: &str, status: QuoteStatus) -> Result<(), AppError> {
        let current = self
            .store
            .get_by_number(quote_number)
            .await?
            .ok_or_else(|| AppError::QuoteNotFound(quote_number.to_string()))?;

        if !current.status.can_transition_to(status) {
            return Err(AppError::InvalidStatusTransition {
                from: current.status,
                to: status,
            });
        }
        if current.status == status {
            return Ok(());
        }

        // Compare-and-set: só troca se ninguém mudou o status nesse meio tempo
        if !self.store.update_status(quote_number, current.status, status).await? {
            return Err(AppError::StatusChanged(quote_number.to_string()));
        }

        tracing::info!("Orçamento {}: {} -> {}", quote_number, current.status, status);
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn delete_quote(&self, quote_number: &str) -> Result<(), AppError> {
        if !self.store.delete(quote_number).await? {
            return Err(AppError::QuoteNotFound(quote_number.to_string()));
        }

        tracing::info!("Orçamento {} excluído", quote_number);
        self.refresh_quietly().await;
        Ok(())
    }
}
