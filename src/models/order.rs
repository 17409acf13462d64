use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartItem;

/// Statut d'une commande. Aucune transition n'est interdite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "En attente de validation")]
    EnAttenteDeValidation,
    #[serde(rename = "En cours")]
    EnCours,
    #[serde(rename = "Expédié")]
    Expedie,
    #[serde(rename = "Reçu")]
    Recu,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::EnAttenteDeValidation => "En attente de validation",
            OrderStatus::EnCours => "En cours",
            OrderStatus::Expedie => "Expédié",
            OrderStatus::Recu => "Reçu",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::EnAttenteDeValidation
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ligne de commande : instantané de l'article au moment de la commande
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub article_id: i64,
    pub nom: String,
    pub quantity: i64,
    pub stock: i64,
    pub prix: f64,
}

/// Commande persistée dans orders.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub articles: Vec<OrderLine>,
    pub statut: OrderStatus,
}

impl Order {
    pub fn total(&self) -> f64 {
        self.articles.iter().map(|line| line.prix * line.quantity as f64).sum()
    }
}

/// Commande soumise par le client. Les instantanés (nom, stock, prix)
/// éventuellement envoyés sont ignorés : ils sont relus dans le catalogue.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub id: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub articles: Vec<CartItem>,
}

/// Enveloppe `{type: "new_order", order}`
#[derive(Debug, Deserialize)]
pub struct NewOrderRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub order: NewOrderPayload,
}

/// Corps de POST /api/orders : création unitaire ou remplacement complet
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrdersSubmission {
    NewOrder(NewOrderRequest),
    Replace(Vec<Order>),
}

/// Corps de PUT /api/orders/{id}/status
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub statut: OrderStatus,
}

/// Paramètres de requête de GET /api/orders
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub user_id: Option<i64>,
}
