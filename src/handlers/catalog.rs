// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validate_not_blank;
use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{
        CatalogCategory, CatalogFilter, CatalogItem, CatalogItemUpdate, CatalogTab, CatalogUnit,
        NewCatalogItem,
    },
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Disjuntor Bipolar 32A")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Steck")]
    pub brand: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "42.90")]
    pub price: Decimal,

    pub unit: CatalogUnit,
    pub category: CatalogCategory,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub brand: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
    pub unit: Option<CatalogUnit>,
    pub category: Option<CatalogCategory>,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Filtra por categoria exata
    pub category: Option<CatalogCategory>,
    /// `materials` ou `services`
    pub tab: Option<CatalogTab>,
    /// Trecho do nome ou da marca
    pub search: Option<String>,
}

// GET /api/catalog/items
#[utoipa::path(
    get,
    path = "/api/catalog/items",
    tag = "Catálogo",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Itens ativos ordenados por nome", body = Vec<CatalogItem>),
        (status = 503, description = "Banco não configurado")
    )
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CatalogQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CatalogFilter {
        category: query.category,
        tab: query.tab,
        search: query.search,
    };
    let items = app_state.catalog_service.list_items(&filter).await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /api/catalog/items/{id}
#[utoipa::path(
    get,
    path = "/api/catalog/items/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, body = CatalogItem),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.catalog_service.get_item(id).await?;
    Ok((StatusCode::OK, Json(item)))
}

// POST /api/catalog/items
#[utoipa::path(
    post,
    path = "/api/catalog/items",
    tag = "Catálogo",
    request_body = CreateCatalogItemPayload,
    responses(
        (status = 201, description = "Item criado"),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCatalogItemPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = app_state
        .catalog_service
        .create_item(NewCatalogItem {
            name: payload.name.trim().to_string(),
            brand: payload.brand.trim().to_string(),
            price: payload.price,
            unit: payload.unit,
            category: payload.category,
            icon: payload.icon,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "itemId": id }))))
}

// PATCH /api/catalog/items/{id}
#[utoipa::path(
    patch,
    path = "/api/catalog/items/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = UpdateCatalogItemPayload,
    responses(
        (status = 200, description = "Item atualizado"),
        (status = 400, description = "Nenhum campo informado ou dados inválidos"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCatalogItemPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let changes = CatalogItemUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        brand: payload.brand,
        price: payload.price,
        unit: payload.unit,
        category: payload.category,
        icon: payload.icon,
    };

    if changes.is_empty() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = ValidationError::new("empty");
        err.message = Some("Informe ao menos um campo para alterar.".into());
        errors.add("body", err);
        return Err(AppError::ValidationError(errors));
    }

    app_state.catalog_service.update_item(id, changes).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "itemId": id }))))
}

// DELETE /api/catalog/items/{id}
#[utoipa::path(
    delete,
    path = "/api/catalog/items/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item desativado (continua no banco)"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.deactivate_item(id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "itemId": id }))))
}
