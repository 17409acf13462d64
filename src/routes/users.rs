use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::error::AppError;
use crate::models::{CreateUserForm, ProfileForm, UpdateUserForm};
use crate::routes::blocking;
use crate::services::users;
use crate::utils::extract_user::{require_admin, require_user, AuthUser};
use crate::utils::validation::parse_id;
use crate::AppState;

/// Route pour obtenir la liste des utilisateurs, sans mots de passe (administrateurs)
#[get("")]
async fn list_users(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let users = blocking(&state, users::list_users).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Route pour ajouter un utilisateur en tant qu'administrateur
#[post("")]
async fn create_user(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    form: web::Json<CreateUserForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let form = form.into_inner();
    let created = blocking(&state, move |store| users::create_user(store, form)).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Route pour modifier son propre profil
#[put("/me")]
async fn update_me(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    form: web::Json<ProfileForm>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let form = form.into_inner();
    let updated = blocking(&state, move |store| users::update_profile(store, user.id, form)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": updated,
        "message": "Profil mis à jour avec succès"
    })))
}

/// Route pour mettre à jour les informations d'un utilisateur
#[put("/{id}")]
async fn update_user(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
    form: web::Json<UpdateUserForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let user_id = parse_id(&path)?;
    let form = form.into_inner();
    let updated = blocking(&state, move |store| users::update_user(store, user_id, form)).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Route pour supprimer un utilisateur (accessible uniquement aux administrateurs)
#[delete("/{id}")]
async fn delete_user(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let user_id = parse_id(&path)?;
    blocking(&state, move |store| users::delete_user(store, user_id)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Utilisateur supprimé avec succès"
    })))
}

/// Configuration des routes utilisateurs ; /me avant /{id}
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users);
    cfg.service(create_user);
    cfg.service(update_me);
    cfg.service(update_user);
    cfg.service(delete_user);
}
