// src/services/dashboard_service.rs

use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{ActivityEntry, DashboardSummary},
        quote::{Quote, QuoteListFilter, QuoteStatus},
    },
    services::quote_service::QuoteService,
};

const RECENT_ACTIVITY: usize = 4;

#[derive(Clone)]
pub struct DashboardService {
    quotes: QuoteService,
}

impl DashboardService {
    pub fn new(quotes: QuoteService) -> Self {
        Self { quotes }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let quotes = self.quotes.list_quotes(&QuoteListFilter::default(), true).await?;
        Ok(summarize(&quotes, Utc::now()))
    }
}

/// Cards e feed do painel, calculados sobre a lista completa.
pub fn summarize(quotes: &[Quote], now: DateTime<Utc>) -> DashboardSummary {
    let week_ago = now - Duration::days(7);

    let open_quotes = quotes.iter().filter(|q| q.status == QuoteStatus::Open).count();

    let approved_this_week = quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Approved && q.created_at >= week_ago)
        .count();

    let revenue_this_month: Decimal = quotes
        .iter()
        .filter(|q| {
            q.status == QuoteStatus::Completed
                && q.created_at.year() == now.year()
                && q.created_at.month() == now.month()
        })
        .map(|q| q.total_value)
        .sum();

    let converted = quotes
        .iter()
        .filter(|q| matches!(q.status, QuoteStatus::Approved | QuoteStatus::Completed))
        .count();
    // Porcentagem arredondada (meio para cima)
    let conversion_rate = match quotes.len() {
        0 => 0,
        total => ((converted * 100 + total / 2) / total) as u32,
    };

    let mut recent: Vec<&Quote> = quotes.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_activity = recent
        .into_iter()
        .take(RECENT_ACTIVITY)
        .map(|q| ActivityEntry {
            quote_id: q.id.clone(),
            client_name: q.client.name.clone(),
            status: q.status,
            status_label: q.status_label.clone(),
            status_color: q.status.color().to_string(),
            value: q.total_value,
            created_at: q.created_at,
        })
        .collect();

    DashboardSummary {
        open_quotes,
        approved_this_week,
        revenue_this_month,
        conversion_rate,
        recent_activity,
    }
}
