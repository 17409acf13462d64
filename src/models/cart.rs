use serde::{Deserialize, Serialize};

/// Ligne de panier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub article_id: i64,
    pub quantity: i64,
}

/// Panier d'un utilisateur, persisté dans carts.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: i64,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Réponse de GET /api/cart
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: i64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.clone(),
            total_items: cart.total_items(),
        }
    }
}

/// Quantité seule, pour PUT /api/cart/items/{articleId}
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: i64,
}
