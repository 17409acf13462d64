pub mod articles;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod users;

use actix_web::web;

use crate::error::AppError;
use crate::store::Store;
use crate::utils::extract_user::ExtractUser;
use crate::AppState;

/// Exécute un accès au stockage hors du thread de l'event loop
pub(crate) async fn blocking<T, F>(state: &web::Data<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Store) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    web::block(move || f(&state.store))
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?
}

/// Les corps JSON mal formés deviennent des erreurs de validation
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("Corps JSON invalide : {err}")).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("Paramètres invalides : {err}")).into())
}

/// Configuration de toutes les routes sous /api
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(ExtractUser)
            .app_data(json_config())
            .app_data(query_config())
            .service(web::scope("/auth").configure(auth::config))
            .service(web::scope("/articles").configure(articles::config))
            .service(web::scope("/orders").configure(orders::config))
            .service(web::scope("/users").configure(users::config))
            .service(web::scope("/cart").configure(cart::config)),
    );
}
