// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Orçamentos Elétricos", description = "Catálogo, rascunhos e orçamentos"),
    paths(
        // --- Catálogo ---
        handlers::catalog::list_items,
        handlers::catalog::get_item,
        handlers::catalog::create_item,
        handlers::catalog::update_item,
        handlers::catalog::delete_item,

        // --- Orçamentos ---
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::update_status,
        handlers::quotes::delete_quote,
        handlers::documents::generate_quote_pdf,

        // --- Rascunhos ---
        handlers::drafts::start_draft,
        handlers::drafts::get_draft,
        handlers::drafts::set_client,
        handlers::drafts::add_item,
        handlers::drafts::update_quantity,
        handlers::drafts::remove_item,
        handlers::drafts::finalize_draft,
        handlers::drafts::abandon_draft,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Catálogo ---
            models::catalog::CatalogUnit,
            models::catalog::CatalogCategory,
            models::catalog::CatalogTab,
            models::catalog::CatalogItem,

            // --- Orçamentos ---
            models::quote::QuoteStatus,
            models::quote::LocationType,
            models::quote::ClientData,
            models::quote::QuoteItem,
            models::quote::Quote,
            models::quote::CreatedQuote,
            models::draft::DraftView,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::ActivityEntry,

            // --- Payloads ---
            handlers::catalog::CreateCatalogItemPayload,
            handlers::catalog::UpdateCatalogItemPayload,
            handlers::quotes::UpdateStatusPayload,
            handlers::drafts::ClientPayload,
            handlers::drafts::AddItemPayload,
            handlers::drafts::UpdateQuantityPayload,
        )
    ),
    tags(
        (name = "Catálogo", description = "Materiais e serviços disponíveis"),
        (name = "Orçamentos", description = "Orçamentos gravados, status e PDF"),
        (name = "Rascunhos", description = "Criação de orçamento em três passos"),
        (name = "Dashboard", description = "Indicadores do painel")
    )
)]
pub struct ApiDoc;
