// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::{
    db::{CatalogRepository, CatalogStore, QuoteRepository, QuoteStore, UnconfiguredStore},
    services::{
        catalog_service::CatalogService,
        dashboard_service::DashboardService,
        document_service::{DocumentService, DocumentSettings},
        draft_service::DraftService,
        quote_service::QuoteService,
    },
};

/// Configuração lida do ambiente. O `.env` é carregado pelo `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_access_key: Option<String>,
    pub bind_addr: String,
    pub max_connections: u32,
    pub draft_ttl: Duration,
    pub fonts_dir: PathBuf,
    pub company_name: Option<String>,
    pub pix_key: Option<String>,
}

// Variável vazia conta como ausente
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    match optional_var(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Valor inválido em {}: '{}'. Usando o padrão.", name, raw);
            default
        }),
        None => default,
    }
}

fn minutes(value: u64) -> Duration {
    Duration::from_secs(value.saturating_mul(60))
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: optional_var("DATABASE_URL"),
            database_access_key: optional_var("DATABASE_ACCESS_KEY"),
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            max_connections: parsed_var("DB_MAX_CONNECTIONS", 5),
            draft_ttl: minutes(parsed_var("DRAFT_TTL_MINUTES", 120)),
            fonts_dir: PathBuf::from(optional_var("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string())),
            company_name: optional_var("COMPANY_NAME"),
            pix_key: optional_var("PIX_KEY"),
        }
    }

    fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            fonts_dir: self.fonts_dir.clone(),
            company_name: self.company_name.clone(),
            pix_key: self.pix_key.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub catalog_service: CatalogService,
    pub quote_service: QuoteService,
    pub draft_service: DraftService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    /// Sem as duas credenciais o app sobe mesmo assim, mas toda operação
    /// de dados responde com "banco não configurado".
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (Some(url), Some(key)) = (&config.database_url, &config.database_access_key) else {
            tracing::warn!("⚠️ DATABASE_URL / DATABASE_ACCESS_KEY ausentes. Operações de dados vão falhar.");
            return Ok(Self::unconfigured(config));
        };

        let options = match PgConnectOptions::from_str(url) {
            Ok(options) => options.password(key),
            Err(e) => {
                tracing::warn!("⚠️ DATABASE_URL inválida ({}). Operações de dados vão falhar.", e);
                return Ok(Self::unconfigured(config));
            }
        };
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy_with(options);

        tracing::info!("✅ Pool do banco de dados configurado");

        let catalog_store = Arc::new(CatalogRepository::new(db_pool.clone()));
        let quote_store = Arc::new(QuoteRepository::new(db_pool.clone()));
        Ok(Self::with_stores(config, catalog_store, quote_store, Some(db_pool)))
    }

    fn unconfigured(config: &AppConfig) -> Self {
        let store = Arc::new(UnconfiguredStore);
        Self::with_stores(config, store.clone(), store, None)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_stores(
        config: &AppConfig,
        catalog_store: Arc<dyn CatalogStore>,
        quote_store: Arc<dyn QuoteStore>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let catalog_service = CatalogService::new(catalog_store);
        let quote_service = QuoteService::new(quote_store);
        let draft_service = DraftService::new(catalog_service.clone(), quote_service.clone(), config.draft_ttl);
        let dashboard_service = DashboardService::new(quote_service.clone());
        let document_service = DocumentService::new(quote_service.clone(), config.document_settings());

        Self {
            db_pool,
            catalog_service,
            quote_service,
            draft_service,
            dashboard_service,
            document_service,
        }
    }

    pub fn store_configured(&self) -> bool {
        self.db_pool.is_some()
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            database_access_key: None,
            bind_addr: "127.0.0.1:0".to_string(),
            max_connections: 1,
            draft_ttl: Duration::from_secs(3600),
            fonts_dir: PathBuf::from("./fonts"),
            company_name: None,
            pix_key: None,
        }
    }
}
