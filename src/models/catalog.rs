// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Ícone usado quando o item é cadastrado sem um.
pub const DEFAULT_ICON: &str = "inventory_2";

// --- ENUMS ---

// Mapeia o CREATE TYPE catalog_unit do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "catalog_unit")]
pub enum CatalogUnit {
    #[serde(rename = "metro")]
    #[sqlx(rename = "metro")]
    Meter,
    #[serde(rename = "unid")]
    #[sqlx(rename = "unid")]
    Unit,
    #[serde(rename = "rolo")]
    #[sqlx(rename = "rolo")]
    Roll,
    #[serde(rename = "ponto")]
    #[sqlx(rename = "ponto")]
    Point,
    #[serde(rename = "visita")]
    #[sqlx(rename = "visita")]
    Visit,
    #[serde(rename = "barra")]
    #[sqlx(rename = "barra")]
    Bar,
}

impl CatalogUnit {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogUnit::Meter => "Metro",
            CatalogUnit::Unit => "Unid",
            CatalogUnit::Roll => "Rolo",
            CatalogUnit::Point => "Ponto",
            CatalogUnit::Visit => "Visita",
            CatalogUnit::Bar => "Barra",
        }
    }
}

// Mapeia o CREATE TYPE catalog_category do banco.
// `Services` separa mão de obra de material em todo o sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "catalog_category")]
pub enum CatalogCategory {
    #[serde(rename = "fios_cabos")]
    #[sqlx(rename = "fios_cabos")]
    WiresCables,
    #[serde(rename = "iluminacao")]
    #[sqlx(rename = "iluminacao")]
    Lighting,
    #[serde(rename = "disjuntores")]
    #[sqlx(rename = "disjuntores")]
    Breakers,
    #[serde(rename = "infra_eletrodutos")]
    #[sqlx(rename = "infra_eletrodutos")]
    InfraConduits,
    #[serde(rename = "ferramentas")]
    #[sqlx(rename = "ferramentas")]
    Tools,
    #[serde(rename = "servicos")]
    #[sqlx(rename = "servicos")]
    Services,
    #[serde(rename = "geral")]
    #[sqlx(rename = "geral")]
    General,
}

impl CatalogCategory {
    pub fn is_service(&self) -> bool {
        matches!(self, CatalogCategory::Services)
    }
}

/// Abas da tela de catálogo: materiais ou serviços.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTab {
    Materials,
    Services,
}

impl CatalogTab {
    pub fn matches(&self, category: CatalogCategory) -> bool {
        match self {
            CatalogTab::Materials => !category.is_service(),
            CatalogTab::Services => category.is_service(),
        }
    }
}

// --- ITEM DE CATÁLOGO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,
    #[schema(example = "Cabo Flexível 2,5mm")]
    pub name: String,
    #[schema(example = "Sil")]
    pub brand: String,
    #[schema(example = "3.49")]
    pub price: Decimal,
    pub unit: CatalogUnit,
    pub category: CatalogCategory,
    #[schema(example = "cable")]
    pub icon: String,
    // Soft delete: itens inativos somem das listagens, mas não do banco
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    pub fn is_service(&self) -> bool {
        self.category.is_service()
    }
}

/// Dados para cadastrar um item. O `id` é gerado pelo banco.
#[derive(Debug, Clone)]
pub struct NewCatalogItem {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub unit: CatalogUnit,
    pub category: CatalogCategory,
    pub icon: Option<String>,
}

/// Atualização parcial: só os campos presentes são alterados.
#[derive(Debug, Clone, Default)]
pub struct CatalogItemUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub unit: Option<CatalogUnit>,
    pub category: Option<CatalogCategory>,
    pub icon: Option<String>,
}

impl CatalogItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.price.is_none()
            && self.unit.is_none()
            && self.category.is_none()
            && self.icon.is_none()
    }

    pub fn apply_to(&self, item: &mut CatalogItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(brand) = &self.brand {
            item.brand = brand.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(icon) = &self.icon {
            item.icon = icon.clone();
        }
    }
}

/// Filtros da listagem. Sempre considera apenas itens ativos.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<CatalogCategory>,
    pub tab: Option<CatalogTab>,
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if !item.is_active {
            return false;
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(tab) = self.tab {
            if !tab.matches(item.category) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                item.name.to_lowercase().contains(&term) || item.brand.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
