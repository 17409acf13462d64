//! Erreurs applicatives et leur conversion en réponses JSON `{error: ...}`.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

/// Ligne de commande refusée faute de stock
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockShortfall {
    pub article_id: i64,
    pub nom: String,
    pub requested: i64,
    pub available: i64,
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: quantité demandée ({}) > stock disponible ({})",
            self.nom, self.requested, self.available
        )
    }
}

fn join_shortfalls(lines: &[StockShortfall]) -> String {
    lines.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Champ manquant ou invalide (400)
    #[error("{0}")]
    Validation(String),

    /// Identifiant inconnu (404)
    #[error("{0}")]
    NotFound(String),

    /// Une ou plusieurs lignes dépassent le stock (400)
    #[error("Stock insuffisant pour: {}", join_shortfalls(.0))]
    InsufficientStock(Vec<StockShortfall>),

    /// Identifiant de commande déjà pris (400)
    #[error("La commande {0} existe déjà")]
    DuplicateId(String),

    /// Jeton absent, invalide ou identifiants incorrects (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Rôle insuffisant (403)
    #[error("{0}")]
    Forbidden(String),

    /// Lecture ou écriture des fichiers JSON impossible (500)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Échec interne hors stockage : hachage, signature du jeton (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Accès réservé aux administrateurs".to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [StockShortfall]>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InsufficientStock(_) | AppError::DuplicateId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Store(err) => {
                error!(error = %err, "Erreur du stockage JSON");
                ErrorBody { error: "Erreur interne du serveur".to_string(), details: None }
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Erreur interne");
                ErrorBody { error: "Erreur interne du serveur".to_string(), details: None }
            }
            AppError::InsufficientStock(lines) => ErrorBody {
                error: self.to_string(),
                details: Some(lines),
            },
            _ => ErrorBody { error: self.to_string(), details: None },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_lists_every_line() {
        let err = AppError::InsufficientStock(vec![
            StockShortfall { article_id: 1, nom: "Casque".into(), requested: 5, available: 2 },
            StockShortfall { article_id: 2, nom: "Gants".into(), requested: 3, available: 0 },
        ]);

        assert_eq!(
            err.to_string(),
            "Stock insuffisant pour: Casque: quantité demandée (5) > stock disponible (2), \
             Gants: quantité demandée (3) > stock disponible (0)"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_hide_details() {
        let err = AppError::from(StoreError::Io {
            path: "orders.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disque plein"),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
