use actix_cors::Cors; // Importation pour CORS
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use tracing::info;

use per_se::config::Config;
use per_se::store::Store;
use per_se::utils::logger;
use per_se::{routes, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Charger la configuration depuis .env
    let config = Config::from_env()?;
    logger::init_logger(&config.log_level);

    info!(data_dir = %config.data_dir.display(), "Ouverture du répertoire de données");
    let store = Store::open(config.data_dir.clone())?;
    let state = web::Data::new(AppState::new(&config, store));
    let cors_origin = config.cors_origin.clone();

    info!("Démarrage du serveur sur http://{}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone()) // Partager le stockage avec les handlers
            .wrap(Logger::default())
            .wrap(
                Cors::default() // Configuration de CORS
                    .allowed_origin(&cors_origin) // Autoriser les requêtes du frontend
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]) // Méthodes HTTP autorisées
                    .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::AUTHORIZATION]) // En-têtes autorisés
                    .max_age(3600), // Durée de validité des pré-requêtes
            )
            .configure(routes::config)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
