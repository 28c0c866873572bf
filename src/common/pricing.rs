// src/common/pricing.rs

// Agregações puras usadas por todas as telas que mostram valores.
// Somas de Decimal são exatas, então a ordem dos itens não altera o resultado.

use rust_decimal::Decimal;

use crate::models::quote::QuoteItem;

pub fn subtotal<P>(items: &[QuoteItem], predicate: P) -> Decimal
where
    P: Fn(&QuoteItem) -> bool,
{
    items
        .iter()
        .filter(|item| predicate(item))
        .map(QuoteItem::line_total)
        .sum()
}

pub fn total(items: &[QuoteItem]) -> Decimal {
    subtotal(items, |_| true)
}

pub fn materials_subtotal(items: &[QuoteItem]) -> Decimal {
    subtotal(items, |item| !item.catalog_item.is_service())
}

pub fn services_subtotal(items: &[QuoteItem]) -> Decimal {
    subtotal(items, |item| item.catalog_item.is_service())
}

/// Formata em reais: `R$ 1.234,50`.
pub fn format_brl(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.round_dp(2).is_zero() { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}
