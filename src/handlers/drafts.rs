// src/handlers/drafts.rs

// Fluxo de criação de orçamento em três passos:
// 1. dados do cliente, 2. itens do catálogo, 3. revisão e finalização.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        draft::DraftView,
        quote::{ClientData, CreatedQuote, LocationType},
    },
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    // Campo ausente vira "" e cai na mesma validação de campo vazio
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Rua das Flores, 123")]
    pub address: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "11999990000")]
    pub phone: String,

    #[validate(required(message = "O campo 'validUntil' é obrigatório."))]
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-01")]
    pub valid_until: Option<NaiveDate>,

    #[validate(required(message = "O campo 'locationType' é obrigatório."))]
    pub location_type: Option<LocationType>,
}

impl ClientPayload {
    fn into_client(self) -> Result<ClientData, AppError> {
        self.validate()?;

        let (Some(valid_until), Some(location_type)) = (self.valid_until, self.location_type) else {
            return Err(AppError::DraftIncomplete("dados do cliente incompletos".to_string()));
        };

        Ok(ClientData {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            valid_until,
            location_type,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemPayload {
    pub catalog_item_id: Uuid,
    /// Padrão 1; valores menores que 1 viram 1
    #[serde(default = "default_quantity")]
    #[schema(example = 1)]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityPayload {
    /// Valores menores que 1 viram 1
    #[schema(example = 3)]
    pub quantity: i64,
}

// POST /api/quotes/drafts
#[utoipa::path(
    post,
    path = "/api/quotes/drafts",
    tag = "Rascunhos",
    responses((status = 201, description = "Rascunho vazio criado", body = DraftView))
)]
pub async fn start_draft(State(app_state): State<AppState>) -> impl IntoResponse {
    let view = app_state.draft_service.start().await;
    (StatusCode::CREATED, Json(view))
}

// GET /api/quotes/drafts/{id}
#[utoipa::path(
    get,
    path = "/api/quotes/drafts/{id}",
    tag = "Rascunhos",
    params(("id" = Uuid, Path, description = "ID do rascunho")),
    responses(
        (status = 200, description = "Revisão: cliente, itens, subtotais e total", body = DraftView),
        (status = 404, description = "Rascunho não encontrado")
    )
)]
pub async fn get_draft(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.draft_service.view(id).await?;
    Ok((StatusCode::OK, Json(view)))
}

// PUT /api/quotes/drafts/{id}/client
#[utoipa::path(
    put,
    path = "/api/quotes/drafts/{id}/client",
    tag = "Rascunhos",
    params(("id" = Uuid, Path, description = "ID do rascunho")),
    request_body = ClientPayload,
    responses(
        (status = 200, body = DraftView),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 409, description = "Finalização em andamento")
    )
)]
pub async fn set_client(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ClientPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let client = payload.into_client()?;
    let view = app_state.draft_service.set_client(id, client).await?;
    Ok((StatusCode::OK, Json(view)))
}

// POST /api/quotes/drafts/{id}/items
#[utoipa::path(
    post,
    path = "/api/quotes/drafts/{id}/items",
    tag = "Rascunhos",
    params(("id" = Uuid, Path, description = "ID do rascunho")),
    request_body = AddItemPayload,
    responses(
        (status = 200, description = "Item adicionado (ou quantidade somada)", body = DraftView),
        (status = 404, description = "Rascunho ou item de catálogo não encontrado")
    )
)]
pub async fn add_item(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<AddItemPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state
        .draft_service
        .add_item(id, payload.catalog_item_id, payload.quantity)
        .await?;
    Ok((StatusCode::OK, Json(view)))
}

// PATCH /api/quotes/drafts/{id}/items/{item_id}
#[utoipa::path(
    patch,
    path = "/api/quotes/drafts/{id}/items/{item_id}",
    tag = "Rascunhos",
    params(
        ("id" = Uuid, Path, description = "ID do rascunho"),
        ("item_id" = Uuid, Path, description = "ID do item de catálogo")
    ),
    request_body = UpdateQuantityPayload,
    responses((status = 200, body = DraftView))
)]
pub async fn update_quantity(
    State(app_state): State<AppState>,
    WithRejection(Path((id, item_id)), _): WithRejection<Path<(Uuid, Uuid)>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateQuantityPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state
        .draft_service
        .update_quantity(id, item_id, payload.quantity)
        .await?;
    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/quotes/drafts/{id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/quotes/drafts/{id}/items/{item_id}",
    tag = "Rascunhos",
    params(
        ("id" = Uuid, Path, description = "ID do rascunho"),
        ("item_id" = Uuid, Path, description = "ID do item de catálogo")
    ),
    responses((status = 200, body = DraftView))
)]
pub async fn remove_item(
    State(app_state): State<AppState>,
    WithRejection(Path((id, item_id)), _): WithRejection<Path<(Uuid, Uuid)>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.draft_service.remove_item(id, item_id).await?;
    Ok((StatusCode::OK, Json(view)))
}

// POST /api/quotes/drafts/{id}/finalize
#[utoipa::path(
    post,
    path = "/api/quotes/drafts/{id}/finalize",
    tag = "Rascunhos",
    params(("id" = Uuid, Path, description = "ID do rascunho")),
    responses(
        (status = 201, description = "Orçamento gravado", body = CreatedQuote),
        (status = 400, description = "Cliente ou itens ausentes"),
        (status = 409, description = "Já existe uma finalização em andamento"),
        (status = 500, description = "Falha numa etapa da gravação")
    )
)]
pub async fn finalize_draft(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let quote_id = app_state.draft_service.finalize(id).await?;
    Ok((StatusCode::CREATED, Json(CreatedQuote { success: true, quote_id })))
}

// DELETE /api/quotes/drafts/{id}
#[utoipa::path(
    delete,
    path = "/api/quotes/drafts/{id}",
    tag = "Rascunhos",
    params(("id" = Uuid, Path, description = "ID do rascunho")),
    responses(
        (status = 200, description = "Rascunho descartado"),
        (status = 404, description = "Rascunho não encontrado")
    )
)]
pub async fn abandon_draft(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.draft_service.abandon(id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "draftId": id }))))
}
