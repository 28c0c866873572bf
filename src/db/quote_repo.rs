// src/db/quote_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{QuoteStore, QuoteUnitOfWork},
    models::quote::{ClientData, NewQuoteLine, QuoteHeader, QuoteItemDetail, QuoteStatus, QuoteSummary},
};

const SUMMARY_COLUMNS: &str = r#"
    id, quote_number, client_id, client_name, client_phone, client_address,
    client_location_type, valid_until, status, total_value, created_at
"#;

// Repositório de orçamentos: tabelas 'clients', 'quotes', 'quote_items'
// e as views 'quotes_with_client' / 'quote_items_detailed'.
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Finalização dentro de uma transação do Postgres. Se o objeto for
/// descartado sem `commit`, o sqlx faz rollback e não sobra cliente nem
/// orçamento órfão.
pub struct PgQuoteUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl QuoteUnitOfWork for PgQuoteUnitOfWork {
    async fn upsert_client(&mut self, client: &ClientData) -> Result<(Uuid, bool), AppError> {
        // O índice único em 'phone' serializa finalizações simultâneas do
        // mesmo telefone; o SET no-op só existe para o RETURNING devolver o id.
        let row = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            INSERT INTO clients (name, phone, address, location_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (phone) DO UPDATE SET phone = EXCLUDED.phone
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.location_type)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_quote(
        &mut self,
        client_id: Uuid,
        valid_until: NaiveDate,
        status: QuoteStatus,
    ) -> Result<QuoteHeader, AppError> {
        // O número do orçamento vem do DEFAULT da coluna (sequence)
        let header = sqlx::query_as::<_, QuoteHeader>(
            r#"
            INSERT INTO quotes (client_id, valid_until, status)
            VALUES ($1, $2, $3)
            RETURNING id, quote_number
            "#,
        )
        .bind(client_id)
        .bind(valid_until)
        .bind(status)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(header)
    }

    async fn insert_items(&mut self, lines: &[NewQuoteLine]) -> Result<(), AppError> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO quote_items (quote_id, catalog_item_id, quantity, unit_price) ",
        );
        builder.push_values(lines, |mut row, line| {
            row.push_bind(line.quote_id)
                .push_bind(line.catalog_item_id)
                .push_bind(line.quantity)
                .push_bind(line.unit_price);
        });

        builder.build().execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn begin(&self) -> Result<Box<dyn QuoteUnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgQuoteUnitOfWork { tx }))
    }

    async fn list(&self) -> Result<Vec<QuoteSummary>, AppError> {
        let sql = format!(
            "SELECT {} FROM quotes_with_client ORDER BY created_at DESC, quote_number::bigint DESC",
            SUMMARY_COLUMNS
        );
        let quotes = sqlx::query_as::<_, QuoteSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(quotes)
    }

    async fn get_by_number(&self, quote_number: &str) -> Result<Option<QuoteSummary>, AppError> {
        let sql = format!(
            "SELECT {} FROM quotes_with_client WHERE quote_number = $1",
            SUMMARY_COLUMNS
        );
        let quote = sqlx::query_as::<_, QuoteSummary>(&sql)
            .bind(quote_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quote)
    }

    async fn list_items(&self, quote_id: Uuid) -> Result<Vec<QuoteItemDetail>, AppError> {
        let items = sqlx::query_as::<_, QuoteItemDetail>(
            r#"
            SELECT
                id, quote_id, catalog_item_id, quantity, unit_price,
                item_name, item_brand, item_unit, item_category, item_icon,
                item_is_active, item_created_at
            FROM quote_items_detailed
            WHERE quote_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update_status(
        &self,
        quote_number: &str,
        expected: QuoteStatus,
        status: QuoteStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE quotes
            SET status = $3, updated_at = NOW()
            WHERE quote_number = $1 AND status = $2
            "#,
        )
        .bind(quote_number)
        .bind(expected)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, quote_number: &str) -> Result<bool, AppError> {
        // quote_items sai junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM quotes WHERE quote_number = $1")
            .bind(quote_number)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
