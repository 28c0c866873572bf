// src/db/catalog_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::CatalogStore,
    models::catalog::{
        CatalogCategory, CatalogFilter, CatalogItem, CatalogItemUpdate, CatalogTab, NewCatalogItem,
        DEFAULT_ICON,
    },
};

// O repositório do catálogo, responsável pela tabela 'catalog_items'
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Monta o padrão do ILIKE escapando os curingas digitados pelo usuário.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<CatalogItem>, AppError> {
        let search = filter
            .search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
            .map(like_pattern);
        // A aba vira um booleano: true = serviços, false = materiais
        let services_only = filter.tab.map(|tab| tab == CatalogTab::Services);

        let items = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, name, brand, price, unit, category, icon, is_active, created_at
            FROM catalog_items
            WHERE is_active = true
              AND ($1::catalog_category IS NULL OR category = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR brand ILIKE $2)
              AND ($3::boolean IS NULL OR (category = $4) = $3)
            ORDER BY name ASC
            "#,
        )
        .bind(filter.category)
        .bind(search)
        .bind(services_only)
        .bind(CatalogCategory::Services)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CatalogItem>, AppError> {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, name, brand, price, unit, category, icon, is_active, created_at
            FROM catalog_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn insert(&self, item: &NewCatalogItem) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO catalog_items (name, brand, price, unit, category, icon)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&item.name)
        .bind(&item.brand)
        .bind(item.price)
        .bind(item.unit)
        .bind(item.category)
        .bind(item.icon.as_deref().unwrap_or(DEFAULT_ICON))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: &CatalogItemUpdate) -> Result<bool, AppError> {
        // COALESCE mantém o valor atual quando o campo não veio
        let result = sqlx::query(
            r#"
            UPDATE catalog_items
            SET name = COALESCE($2, name),
                brand = COALESCE($3, brand),
                price = COALESCE($4, price),
                unit = COALESCE($5, unit),
                category = COALESCE($6, category),
                icon = COALESCE($7, icon),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.brand.as_deref())
        .bind(changes.price)
        .bind(changes.unit)
        .bind(changes.category)
        .bind(changes.icon.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE catalog_items SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
