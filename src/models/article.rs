use serde::{Deserialize, Serialize};

/// Article du catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub nom: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description_courte: String,
    pub description_longue: String,
    #[serde(default)]
    pub image: String,
    pub stock: i64,
    pub prix: f64,
}

/// Corps de création d'un article
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description_courte: String,
    #[serde(default)]
    pub description_longue: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub prix: f64,
}

/// Mise à jour partielle : un champ absent ou vide garde sa valeur
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    pub nom: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description_courte: Option<String>,
    pub description_longue: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub prix: Option<f64>,
}

/// Ordre de tri du catalogue (`?sort=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ArticleSort {
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "stock-asc")]
    StockAsc,
    #[serde(rename = "stock-desc")]
    StockDesc,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

/// Paramètres de requête de GET /api/articles
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sort: Option<ArticleSort>,
}
