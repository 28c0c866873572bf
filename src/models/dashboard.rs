// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::quote::QuoteStatus;

// 1. Os Cards do Topo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub open_quotes: usize,           // Aguardando resposta do cliente
    pub approved_this_week: usize,    // Aprovados e criados nos últimos 7 dias
    pub revenue_this_month: Decimal,  // Concluídos criados no mês corrente
    pub conversion_rate: u32,         // (aprovados + concluídos) / total, em %
    pub recent_activity: Vec<ActivityEntry>,
}

// 2. Feed de atividades recentes
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[schema(example = "1024")]
    pub quote_id: String,
    pub client_name: String,
    pub status: QuoteStatus,
    #[schema(example = "Orçado")]
    pub status_label: String,
    #[schema(example = "gray-400")]
    pub status_color: String,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
}
