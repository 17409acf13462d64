use std::env;
use std::path::PathBuf;
use dotenvy::dotenv;

/// Erreur de chargement de la configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} n'est pas défini dans .env")]
    Missing(&'static str),

    #[error("{name} invalide : {value}")]
    Invalid { name: &'static str, value: String },
}

/// Structure pour stocker la configuration de l'application
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_secret_code: Option<String>,
    pub cors_origin: String,
    pub log_level: String,
}

impl Config {
    /// Charge les variables d'environnement et initialise la configuration
    pub fn from_env() -> Result<Self, ConfigError> {
        // Charge le fichier `.env` s'il existe
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::Invalid { name: "TOKEN_TTL_HOURS", value })?,
            Err(_) => 1,
        };

        // Un code vide revient à désactiver l'inscription admin
        let admin_secret_code = env::var("ADMIN_SECRET_CODE")
            .ok()
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        Ok(Self {
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()).into(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            jwt_secret,
            token_ttl_hours,
            admin_secret_code,
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
