//src/main.rs

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;

async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "storeConfigured": app_state.store_configured(),
    }))
}

pub fn app_router(app_state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/items"
               ,get(handlers::catalog::list_items)
               .post(handlers::catalog::create_item)
        )
        .route("/items/{id}"
               ,get(handlers::catalog::get_item)
               .patch(handlers::catalog::update_item)
               .delete(handlers::catalog::delete_item)
        );

    // Rotas estáticas ("drafts") têm prioridade sobre o parâmetro {number}
    let draft_routes = Router::new()
        .route("/", post(handlers::drafts::start_draft))
        .route("/{id}"
               ,get(handlers::drafts::get_draft)
               .delete(handlers::drafts::abandon_draft)
        )
        .route("/{id}/client", put(handlers::drafts::set_client))
        .route("/{id}/items", post(handlers::drafts::add_item))
        .route("/{id}/items/{item_id}"
               ,patch(handlers::drafts::update_quantity)
               .delete(handlers::drafts::remove_item)
        )
        .route("/{id}/finalize", post(handlers::drafts::finalize_draft));

    let quote_routes = Router::new()
        .route("/", get(handlers::quotes::list_quotes))
        .route("/{number}"
               ,get(handlers::quotes::get_quote)
               .delete(handlers::quotes::delete_quote)
        )
        .route("/{number}/status", patch(handlers::quotes::update_status))
        .route("/{number}/pdf", get(handlers::documents::generate_quote_pdf));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/catalog", catalog_routes)
        .nest("/api/quotes/drafts", draft_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env();
    let app_state = AppState::new(&config)?;

    // Migrações só rodam com o banco configurado; falha aqui não derruba o servidor
    if let Some(pool) = &app_state.db_pool {
        match sqlx::migrate!().run(pool).await {
            Ok(()) => tracing::info!("✅ Migrações do banco de dados executadas com sucesso!"),
            Err(e) => tracing::error!("🔥 Falha ao rodar as migrações do banco de dados: {}", e),
        }
    }

    let app = app_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
