//! Création, suivi et suppression des commandes.

use chrono::{DateTime, Datelike, Utc};
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::{CartItem, Order, OrderStatus};
use crate::services::order_id::{is_taken, is_valid_order_id, next_order_id};
use crate::services::stock;
use crate::store::Store;

/// Crée une commande : réserve le stock, attribue un identifiant, persiste
pub fn create_order(
    store: &Store,
    user_id: i64,
    items: &[CartItem],
    requested_id: Option<String>,
    now: DateTime<Utc>,
) -> Result<Order, AppError> {
    let _guard = store.lock();
    place_order(store, user_id, items, requested_id, now)
}

/// Comme [`create_order`], verrou déjà pris par l'appelant
pub(crate) fn place_order(
    store: &Store,
    user_id: i64,
    items: &[CartItem],
    requested_id: Option<String>,
    now: DateTime<Utc>,
) -> Result<Order, AppError> {
    if !store.users()?.iter().any(|user| user.id == user_id) {
        return Err(AppError::not_found("Utilisateur non trouvé"));
    }

    let catalog = store.articles()?;
    let reservation = stock::reserve(&catalog, items)?;

    let mut orders = store.orders()?;
    let id = match requested_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
        Some(id) if !is_valid_order_id(&id) => return Err(invalid_order_id(&id)),
        Some(id) if is_taken(&orders, &id) => return Err(AppError::DuplicateId(id)),
        Some(id) => id,
        None => next_order_id(&orders, now.year())?,
    };

    let order = Order {
        id,
        user_id,
        date: now,
        articles: reservation.lines,
        statut: OrderStatus::EnAttenteDeValidation,
    };

    store.save_articles(&reservation.articles)?;
    orders.push(order.clone());
    if let Err(err) = store.save_orders(&orders) {
        error!(order_id = %order.id, error = %err, "Échec d'écriture de la commande, restauration du stock");
        if let Err(restore) = store.save_articles(&catalog) {
            error!(error = %restore, "Restauration du stock impossible");
        }
        return Err(err.into());
    }

    info!(order_id = %order.id, user_id, lines = order.articles.len(), total = order.total(), "Commande créée");
    Ok(order)
}

/// Toutes les commandes, éventuellement filtrées par utilisateur
pub fn list_orders(store: &Store, user_id: Option<i64>) -> Result<Vec<Order>, AppError> {
    let orders = store.orders()?;
    Ok(match user_id {
        Some(user_id) => orders.into_iter().filter(|order| order.user_id == user_id).collect(),
        None => orders,
    })
}

pub fn get_order(store: &Store, id: &str) -> Result<Order, AppError> {
    store
        .orders()?
        .into_iter()
        .find(|order| order.id == id)
        .ok_or_else(|| order_not_found(id))
}

/// Remplace le statut sans restriction de transition
pub fn update_status(store: &Store, id: &str, statut: OrderStatus) -> Result<Order, AppError> {
    let _guard = store.lock();
    let mut orders = store.orders()?;
    let order = orders
        .iter_mut()
        .find(|order| order.id == id)
        .ok_or_else(|| order_not_found(id))?;

    let previous = order.statut;
    order.statut = statut;
    let updated = order.clone();
    store.save_orders(&orders)?;

    info!(order_id = id, from = %previous, to = %statut, "Statut de commande modifié");
    Ok(updated)
}

/// Suppression définitive ; le stock réservé n'est pas restitué
pub fn delete_order(store: &Store, id: &str) -> Result<(), AppError> {
    let _guard = store.lock();
    let mut orders = store.orders()?;
    let before = orders.len();
    orders.retain(|order| order.id != id);
    if orders.len() == before {
        return Err(order_not_found(id));
    }
    store.save_orders(&orders)?;

    info!(order_id = id, "Commande supprimée");
    Ok(())
}

/// Remplace toute la liste des commandes, sans contrôle de stock
pub fn replace_all(store: &Store, orders: Vec<Order>) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();
    for order in &orders {
        if order.user_id <= 0 {
            return Err(AppError::validation("Format de commande invalide"));
        }
        if !is_valid_order_id(&order.id) {
            return Err(invalid_order_id(&order.id));
        }
        if !seen.insert(order.id.as_str()) {
            return Err(AppError::DuplicateId(order.id.clone()));
        }
    }

    let _guard = store.lock();
    store.save_orders(&orders)?;

    warn!(count = orders.len(), "Liste des commandes remplacée");
    Ok(())
}

fn invalid_order_id(id: &str) -> AppError {
    AppError::validation(format!("Identifiant de commande invalide : {id} (attendu CMD-AAAA-NNN)"))
}

fn order_not_found(id: &str) -> AppError {
    AppError::not_found(format!("Commande {id} non trouvée"))
}
