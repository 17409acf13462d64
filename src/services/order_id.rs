//! Identifiants de commande `CMD-<année>-<séquence>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::models::Order;

const PREFIX: &str = "CMD";

/// Au plus 9 chiffres de séquence : un `u64` ne peut pas déborder
static ORDER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CMD-\d{4}-\d{3,9}$").expect("motif d'identifiant valide"));

/// Identifiant fourni par un client : `CMD-AAAA-NNN` (3 à 9 chiffres)
pub fn is_valid_order_id(id: &str) -> bool {
    ORDER_ID.is_match(id)
}

/// Suffixe numérique d'un identifiant de l'année donnée
fn sequence_of(id: &str, year: i32) -> Option<u64> {
    let suffix = id.strip_prefix(&format!("{PREFIX}-{year}-"))?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

pub fn format_order_id(year: i32, sequence: u64) -> String {
    format!("{PREFIX}-{year}-{sequence:03}")
}

/// Prochain identifiant libre pour l'année : séquence max + 1, puis sondage
/// linéaire si l'identifiant calculé est déjà pris.
pub fn next_order_id(orders: &[Order], year: i32) -> Result<String, AppError> {
    let exhausted = || AppError::Internal(format!("séquence de commandes {year} épuisée"));

    let max = orders
        .iter()
        .filter_map(|order| sequence_of(&order.id, year))
        .max()
        .unwrap_or(0);

    let mut sequence = max.checked_add(1).ok_or_else(exhausted)?;
    loop {
        let candidate = format_order_id(year, sequence);
        if !is_taken(orders, &candidate) {
            return Ok(candidate);
        }
        sequence = sequence.checked_add(1).ok_or_else(exhausted)?;
    }
}

pub fn is_taken(orders: &[Order], id: &str) -> bool {
    orders.iter().any(|order| order.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use chrono::Utc;

    fn order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            user_id: 1,
            date: Utc::now(),
            articles: Vec::new(),
            statut: OrderStatus::default(),
        }
    }

    #[test]
    fn first_order_of_the_year() {
        assert_eq!(next_order_id(&[], 2025).unwrap(), "CMD-2025-001");
    }

    #[test]
    fn follows_the_highest_sequence() {
        let orders: Vec<_> = (1..=7).map(|n| order(&format_order_id(2025, n))).collect();
        assert_eq!(next_order_id(&orders, 2025).unwrap(), "CMD-2025-008");
    }

    #[test]
    fn sequence_is_scoped_per_year() {
        let orders = vec![order("CMD-2024-041"), order("CMD-2025-002")];
        assert_eq!(next_order_id(&orders, 2025).unwrap(), "CMD-2025-003");
        assert_eq!(next_order_id(&orders, 2026).unwrap(), "CMD-2026-001");
    }

    #[test]
    fn ignores_foreign_ids() {
        let orders = vec![order("CMD-2025-abc"), order("ORD-2025-900"), order("CMD-2025-")];
        assert_eq!(next_order_id(&orders, 2025).unwrap(), "CMD-2025-001");
    }

    #[test]
    fn grows_past_three_digits() {
        let orders = vec![order("CMD-2025-999")];
        assert_eq!(next_order_id(&orders, 2025).unwrap(), "CMD-2025-1000");
        let orders = vec![order("CMD-2025-999"), order("CMD-2025-1000")];
        assert_eq!(next_order_id(&orders, 2025).unwrap(), "CMD-2025-1001");
    }

    #[test]
    fn never_reuses_an_existing_id() {
        let orders = vec![order("CMD-2025-0005"), order("CMD-2025-006"), order("CMD-2024-007")];
        let next = next_order_id(&orders, 2025).unwrap();
        assert!(!is_taken(&orders, &next));
        assert_eq!(next, "CMD-2025-007");
    }

    #[test]
    fn saturated_sequence_is_an_error() {
        let orders = vec![order(&format!("CMD-2025-{}", u64::MAX))];
        assert!(matches!(next_order_id(&orders, 2025), Err(AppError::Internal(_))));
    }

    #[test]
    fn supplied_id_format() {
        assert!(is_valid_order_id("CMD-2025-001"));
        assert!(is_valid_order_id("CMD-2025-123456789"));
        assert!(!is_valid_order_id("CMD-2025-4294967295"));
        assert!(!is_valid_order_id("CMD-2025-01"));
        assert!(!is_valid_order_id("CMD-25-001"));
        assert!(!is_valid_order_id("ORD-2025-001"));
        assert!(!is_valid_order_id(" CMD-2025-001"));
    }
}
