// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;

use crate::{common::error::AppError, config::AppState};

// GET /api/quotes/{number}/pdf
#[utoipa::path(
    get,
    path = "/api/quotes/{number}/pdf",
    tag = "Orçamentos",
    params(("number" = String, Path, description = "Número do orçamento")),
    responses(
        (status = 200, description = "PDF do orçamento (application/pdf)"),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn generate_quote_pdf(
    State(app_state): State<AppState>,
    WithRejection(Path(number), _): WithRejection<Path<String>, AppError>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state.document_service.generate_quote_pdf(&number).await?;

    // Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"orcamento_{}.pdf\"", number),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
