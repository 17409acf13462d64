//! Panier côté serveur, un par utilisateur, persisté dans carts.json.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::error::AppError;
use crate::models::{Cart, CartItem, Order};
use crate::services::orders::place_order;
use crate::store::Store;

pub fn get_cart(store: &Store, user_id: i64) -> Result<Cart, AppError> {
    Ok(store
        .carts()?
        .into_iter()
        .find(|cart| cart.user_id == user_id)
        .unwrap_or(Cart { user_id, items: Vec::new() }))
}

/// Applique `change` au panier de l'utilisateur et persiste ; un panier vide est retiré du fichier
fn modify_cart(
    store: &Store,
    user_id: i64,
    change: impl FnOnce(&mut Vec<CartItem>) -> Result<(), AppError>,
) -> Result<Cart, AppError> {
    let _guard = store.lock();
    let mut carts = store.carts()?;
    let mut cart = match carts.iter().position(|cart| cart.user_id == user_id) {
        Some(index) => carts.remove(index),
        None => Cart { user_id, items: Vec::new() },
    };

    change(&mut cart.items)?;

    if !cart.items.is_empty() {
        carts.push(cart.clone());
    }
    store.save_carts(&carts)?;
    Ok(cart)
}

/// Ajoute une quantité ; si l'article est déjà présent les quantités s'additionnent
pub fn add_item(store: &Store, user_id: i64, item: CartItem) -> Result<Cart, AppError> {
    if item.quantity <= 0 {
        return Err(AppError::validation("La quantité doit être positive"));
    }
    if !store.articles()?.iter().any(|article| article.id == item.article_id) {
        return Err(AppError::not_found("Article non trouvé"));
    }

    modify_cart(store, user_id, |items| {
        match items.iter_mut().find(|existing| existing.article_id == item.article_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| AppError::validation("Quantité trop élevée"))?;
            }
            None => items.push(item),
        }
        Ok(())
    })
}

/// Fixe la quantité ; zéro ou moins retire la ligne
pub fn set_quantity(store: &Store, user_id: i64, article_id: i64, quantity: i64) -> Result<Cart, AppError> {
    if quantity <= 0 {
        return remove_item(store, user_id, article_id);
    }
    modify_cart(store, user_id, |items| {
        if let Some(existing) = items.iter_mut().find(|existing| existing.article_id == article_id) {
            existing.quantity = quantity;
        }
        Ok(())
    })
}

pub fn remove_item(store: &Store, user_id: i64, article_id: i64) -> Result<Cart, AppError> {
    modify_cart(store, user_id, |items| {
        items.retain(|item| item.article_id != article_id);
        Ok(())
    })
}

pub fn clear_cart(store: &Store, user_id: i64) -> Result<(), AppError> {
    modify_cart(store, user_id, |items| {
        items.clear();
        Ok(())
    })?;
    Ok(())
}

/// Transforme le panier en commande puis le vide
pub fn checkout(store: &Store, user_id: i64, now: DateTime<Utc>) -> Result<Order, AppError> {
    let _guard = store.lock();
    let mut carts = store.carts()?;
    let index = carts
        .iter()
        .position(|cart| cart.user_id == user_id && !cart.items.is_empty())
        .ok_or_else(|| AppError::validation("Le panier est vide"))?;

    let order = place_order(store, user_id, &carts[index].items, None, now)?;

    // Commande déjà persistée : un échec ici est seulement journalisé
    carts.remove(index);
    if let Err(err) = store.save_carts(&carts) {
        error!(order_id = %order.id, user_id, error = %err, "Impossible de vider le panier après validation");
    }

    info!(order_id = %order.id, user_id, "Panier validé");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Role, User};

    fn seeded() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .save_users(&[User { id: 7, email: "u@x.fr".into(), password: "p".into(), nom: "U".into(), role: Role::User }])
            .unwrap();
        let article = |id: i64, stock: i64| Article {
            id,
            nom: format!("Article {id}"),
            kind: "T".into(),
            description_courte: "c".into(),
            description_longue: "l".into(),
            image: String::new(),
            stock,
            prix: 2.5,
        };
        store.save_articles(&[article(1, 10), article(2, 1)]).unwrap();
        (dir, store)
    }

    fn item(article_id: i64, quantity: i64) -> CartItem {
        CartItem { article_id, quantity }
    }

    #[test]
    fn add_merges_quantities() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, 2)).unwrap();
        let cart = add_item(&store, 7, item(1, 3)).unwrap();

        assert_eq!(cart.items, vec![item(1, 5)]);
        assert_eq!(get_cart(&store, 7).unwrap().total_items(), 5);
    }

    #[test]
    fn add_rejects_bad_items() {
        let (_dir, store) = seeded();
        assert!(matches!(add_item(&store, 7, item(1, 0)), Err(AppError::Validation(_))));
        assert!(matches!(add_item(&store, 7, item(9, 1)), Err(AppError::NotFound(_))));
    }

    #[test]
    fn add_rejects_overflowing_merge() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, i64::MAX)).unwrap();

        assert!(matches!(add_item(&store, 7, item(1, 1)), Err(AppError::Validation(_))));
        assert_eq!(get_cart(&store, 7).unwrap().items, vec![item(1, i64::MAX)]);
    }

    #[test]
    fn set_quantity_zero_removes() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, 2)).unwrap();
        add_item(&store, 7, item(2, 1)).unwrap();

        assert_eq!(set_quantity(&store, 7, 1, 4).unwrap().items, vec![item(1, 4), item(2, 1)]);
        assert_eq!(set_quantity(&store, 7, 1, 0).unwrap().items, vec![item(2, 1)]);

        clear_cart(&store, 7).unwrap();
        assert!(get_cart(&store, 7).unwrap().items.is_empty());
        assert!(store.carts().unwrap().is_empty());
    }

    #[test]
    fn carts_are_per_user() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, 2)).unwrap();
        add_item(&store, 8, item(2, 1)).unwrap();

        remove_item(&store, 8, 2).unwrap();
        assert_eq!(get_cart(&store, 7).unwrap().items, vec![item(1, 2)]);
    }

    #[test]
    fn checkout_creates_order_and_empties_cart() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, 4)).unwrap();

        let order = checkout(&store, 7, Utc::now()).unwrap();

        assert_eq!(order.user_id, 7);
        assert_eq!(order.articles[0].quantity, 4);
        assert_eq!(store.articles().unwrap()[0].stock, 6);
        assert!(get_cart(&store, 7).unwrap().items.is_empty());
    }

    #[test]
    fn checkout_succeeds_when_cart_cannot_be_cleared() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(1, 2)).unwrap();

        // Un répertoire à la place du fichier temporaire bloque l'écriture de carts.json
        let blocker = store.path(crate::store::Collection::Carts).with_extension("json.tmp");
        std::fs::create_dir(&blocker).unwrap();

        let order = checkout(&store, 7, Utc::now()).unwrap();

        assert_eq!(order.articles[0].quantity, 2);
        assert_eq!(store.orders().unwrap(), vec![order]);
        assert_eq!(store.articles().unwrap()[0].stock, 8);
    }

    #[test]
    fn failed_checkout_keeps_cart() {
        let (_dir, store) = seeded();
        add_item(&store, 7, item(2, 3)).unwrap();

        assert!(matches!(checkout(&store, 7, Utc::now()), Err(AppError::InsufficientStock(_))));
        assert_eq!(get_cart(&store, 7).unwrap().items, vec![item(2, 3)]);
        assert!(matches!(checkout(&store, 8, Utc::now()), Err(AppError::Validation(_))));
    }
}
