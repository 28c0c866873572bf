// src/common/error.rs

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::quote::{FinalizeStep, QuoteStatus};

// Erro único da aplicação. Toda falha vira um resultado `{ success: false, error }`
// na borda HTTP; nada é propagado como pânico.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Um ou mais campos são inválidos.")]
    ValidationError(#[from] validator::ValidationErrors),

    // Rejeições dos extratores do axum, para manter o corpo `{ success: false, error }`
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Parâmetro de rota inválido: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("Parâmetro de consulta inválido: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Rascunho incompleto: {0}")]
    DraftIncomplete(String),

    #[error("Rascunho {0} não encontrado.")]
    DraftNotFound(Uuid),

    #[error("Item de catálogo {0} não encontrado.")]
    CatalogItemNotFound(Uuid),

    #[error("Orçamento {0} não encontrado.")]
    QuoteNotFound(String),

    #[error("Já existe uma finalização em andamento para este rascunho.")]
    FinalizeInProgress,

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: QuoteStatus, to: QuoteStatus },

    #[error("O status do orçamento {0} foi alterado por outra operação.")]
    StatusChanged(String),

    #[error("Banco de dados não configurado (DATABASE_URL / DATABASE_ACCESS_KEY ausentes).")]
    StoreNotConfigured,

    // Falha de uma etapa nomeada da finalização do orçamento
    #[error("Falha na etapa '{step}': {message}")]
    WorkflowStep { step: FinalizeStep, message: String },

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Anota o erro com a etapa da finalização em que ele aconteceu.
    /// Erros que já carregam significado próprio passam intactos.
    pub fn at_step(self, step: FinalizeStep) -> Self {
        match self {
            AppError::StoreNotConfigured | AppError::WorkflowStep { .. } => self,
            other => AppError::WorkflowStep {
                step,
                message: other.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DraftIncomplete(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::InvalidPath(rejection) => rejection.status(),
            AppError::InvalidQuery(rejection) => rejection.status(),
            AppError::DraftNotFound(_)
            | AppError::CatalogItemNotFound(_)
            | AppError::QuoteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::FinalizeInProgress
            | AppError::InvalidStatusTransition { .. }
            | AppError::StatusChanged(_) => StatusCode::CONFLICT,
            AppError::StoreNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::WorkflowStep { .. }
            | AppError::DatabaseError(_)
            | AppError::FontNotFound(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "error": self.to_string(),
                "details": details,
            }));
            return (status, body).into_response();
        }

        if status.is_server_error() {
            tracing::error!("🔥 Erro Interno do Servidor: {}", self);
        }

        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}
