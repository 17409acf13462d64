//! PER SE SYSTEMS : catalogue, panier et commandes sur fichiers JSON.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use config::Config;
use store::Store;

/// État partagé entre les handlers via `web::Data`
pub struct AppState {
    pub store: Store,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_secret_code: Option<String>,
}

impl AppState {
    pub fn new(config: &Config, store: Store) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
            admin_secret_code: config.admin_secret_code.clone(),
        }
    }
}
