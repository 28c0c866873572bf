// src/handlers/quotes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    models::quote::{Quote, QuoteListFilter, QuoteStatus},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteListQuery {
    pub status: Option<QuoteStatus>,
    /// Nome do cliente ou número do orçamento
    pub search: Option<String>,
    /// Ignora o cache e relê do banco
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: QuoteStatus,
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Orçamentos",
    params(QuoteListQuery),
    responses(
        (status = 200, description = "Orçamentos do mais novo para o mais antigo (sem itens)", body = Vec<Quote>),
        (status = 503, description = "Banco não configurado")
    )
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<QuoteListQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let filter = QuoteListFilter {
        status: query.status,
        search: query.search,
    };
    let quotes = app_state.quote_service.list_quotes(&filter, query.refresh).await?;
    Ok((StatusCode::OK, Json(quotes)))
}

// GET /api/quotes/{number}
#[utoipa::path(
    get,
    path = "/api/quotes/{number}",
    tag = "Orçamentos",
    params(("number" = String, Path, description = "Número do orçamento")),
    responses(
        (status = 200, description = "Orçamento com itens (preços congelados)", body = Quote),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    WithRejection(Path(number), _): WithRejection<Path<String>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state
        .quote_service
        .get_quote(&number)
        .await?
        .ok_or(AppError::QuoteNotFound(number))?;
    Ok((StatusCode::OK, Json(quote)))
}

// PATCH /api/quotes/{number}/status
#[utoipa::path(
    patch,
    path = "/api/quotes/{number}/status",
    tag = "Orçamentos",
    params(("number" = String, Path, description = "Número do orçamento")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status alterado"),
        (status = 404, description = "Orçamento não encontrado"),
        (status = 409, description = "Transição não permitida ou status alterado por outra operação")
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    WithRejection(Path(number), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStatusPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quote_service.update_status(&number, payload.status).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "quoteId": number,
            "status": payload.status,
            "statusLabel": payload.status.label(),
        })),
    ))
}

// DELETE /api/quotes/{number}
#[utoipa::path(
    delete,
    path = "/api/quotes/{number}",
    tag = "Orçamentos",
    params(("number" = String, Path, description = "Número do orçamento")),
    responses(
        (status = 200, description = "Orçamento e itens excluídos"),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    WithRejection(Path(number), _): WithRejection<Path<String>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quote_service.delete_quote(&number).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "quoteId": number }))))
}
