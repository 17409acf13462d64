//! Vérification et réservation du stock pour une commande.
//!
//! Tout est calculé en mémoire : en cas de refus, rien n'a été écrit.

use std::collections::HashMap;

use crate::error::{AppError, StockShortfall};
use crate::models::{Article, CartItem, OrderLine};

/// Résultat d'une réservation acceptée
#[derive(Debug)]
pub struct Reservation {
    /// Catalogue complet après décrément
    pub articles: Vec<Article>,
    /// Lignes de commande avec l'instantané avant décrément
    pub lines: Vec<OrderLine>,
}

pub fn reserve(catalog: &[Article], items: &[CartItem]) -> Result<Reservation, AppError> {
    if items.is_empty() {
        return Err(AppError::validation("La commande ne contient aucun article"));
    }
    if let Some(item) = items.iter().find(|item| item.quantity <= 0) {
        return Err(AppError::validation(format!(
            "Quantité invalide pour l'article {}",
            item.article_id
        )));
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let article = catalog
            .iter()
            .find(|article| article.id == item.article_id)
            .ok_or_else(|| AppError::not_found(format!("Article {} non trouvé", item.article_id)))?;
        lines.push(OrderLine {
            article_id: article.id,
            nom: article.nom.clone(),
            quantity: item.quantity,
            stock: article.stock,
            prix: article.prix,
        });
    }

    // Plusieurs lignes sur le même article consomment le même stock
    let mut requested: HashMap<i64, i64> = HashMap::new();
    let mut order_of_appearance = Vec::new();
    for line in &lines {
        let total = requested.entry(line.article_id).or_insert_with(|| {
            order_of_appearance.push(line.article_id);
            0
        });
        *total = total
            .checked_add(line.quantity)
            .ok_or_else(|| quantity_too_large(line.article_id))?;
    }

    let shortfalls: Vec<StockShortfall> = order_of_appearance
        .iter()
        .filter_map(|id| {
            let article = catalog.iter().find(|article| article.id == *id)?;
            let wanted = requested[id];
            (wanted > article.stock).then(|| StockShortfall {
                article_id: article.id,
                nom: article.nom.clone(),
                requested: wanted,
                available: article.stock,
            })
        })
        .collect();

    if !shortfalls.is_empty() {
        return Err(AppError::InsufficientStock(shortfalls));
    }

    let articles = catalog
        .iter()
        .map(|article| match requested.get(&article.id) {
            Some(quantity) => article
                .stock
                .checked_sub(*quantity)
                .map(|stock| Article { stock, ..article.clone() })
                .ok_or_else(|| quantity_too_large(article.id)),
            None => Ok(article.clone()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Reservation { articles, lines })
}

fn quantity_too_large(article_id: i64) -> AppError {
    AppError::validation(format!("Quantité trop élevée pour l'article {article_id}"))
}
