use actix_web::{post, web, HttpResponse};

use crate::error::AppError;
use crate::models::{LoginForm, RegisterForm};
use crate::routes::blocking;
use crate::services::{cart, users};
use crate::utils::extract_user::{require_user, AuthUser};
use crate::utils::jwt;
use crate::AppState;

/// Route pour la connexion des utilisateurs
#[post("")]
async fn login(
    state: web::Data<AppState>,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let user = blocking(&state, move |store| users::authenticate(store, &form)).await?;

    // Générer un token JWT
    let token = jwt::create_token(user.id, user.role, &state.jwt_secret, state.token_ttl_hours)
        .map_err(|err| AppError::Internal(format!("génération du token : {err}")))?;

    // Le mot de passe n'est jamais renvoyé
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": user,
        "token": token
    })))
}

/// Route pour l'inscription des utilisateurs
#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    form: web::Json<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let admin_code = state.admin_secret_code.clone();
    let user = blocking(&state, move |store| users::register(store, form, admin_code.as_deref())).await?;

    Ok(HttpResponse::Created().json(user))
}

/// Déconnexion : le panier serveur est vidé
#[post("/logout")]
async fn logout(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    blocking(&state, move |store| cart::clear_cart(store, user.id)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configuration des routes d'authentification
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(register);
    cfg.service(logout);
}
