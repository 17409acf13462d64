use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;

use crate::error::AppError;
use crate::models::{OrdersQuery, OrdersSubmission, StatusForm};
use crate::routes::blocking;
use crate::services::orders;
use crate::utils::extract_user::{require_admin, require_user, AuthUser};
use crate::AppState;

/// Les administrateurs voient tout (filtre `?userId=`), les autres leurs commandes
#[get("")]
async fn list_orders(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    query: web::Query<OrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let filter = if user.is_admin() { query.user_id } else { Some(user.id) };
    let orders = blocking(&state, move |store| orders::list_orders(store, filter)).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `{type: "new_order", order}` crée une commande avec contrôle du stock ;
/// un tableau remplace toute la liste (administrateurs, sans contrôle)
#[post("")]
async fn submit_orders(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    body: web::Json<OrdersSubmission>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;

    match body.into_inner() {
        OrdersSubmission::NewOrder(request) => {
            if request.kind != "new_order" {
                return Err(AppError::validation(format!("Type de requête inconnu : {}", request.kind)));
            }
            let payload = request.order;
            let owner = match payload.user_id {
                Some(owner) if owner != user.id && !user.is_admin() => {
                    return Err(AppError::Forbidden(
                        "Impossible de commander pour un autre utilisateur".to_string(),
                    ));
                }
                Some(owner) => owner,
                None => user.id,
            };

            let order = blocking(&state, move |store| {
                orders::create_order(store, owner, &payload.articles, payload.id, Utc::now())
            })
            .await?;

            Ok(HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "order": order
            })))
        }
        OrdersSubmission::Replace(all) => {
            if !user.is_admin() {
                return Err(AppError::forbidden());
            }
            blocking(&state, move |store| orders::replace_all(store, all)).await?;
            Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
        }
    }
}

#[get("/{id}")]
async fn get_order(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let id = path.into_inner();
    let order = blocking(&state, move |store| orders::get_order(store, &id)).await?;

    // Même réponse qu'un identifiant inexistant pour les commandes d'autrui
    if !user.is_admin() && order.user_id != user.id {
        return Err(AppError::not_found(format!("Commande {} non trouvée", order.id)));
    }
    Ok(HttpResponse::Ok().json(order))
}

#[put("/{id}/status")]
async fn update_status(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
    form: web::Json<StatusForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let id = path.into_inner();
    let statut = form.statut;
    let order = blocking(&state, move |store| orders::update_status(store, &id, statut)).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[delete("/{id}")]
async fn delete_order(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let id = path.into_inner();
    blocking(&state, move |store| orders::delete_order(store, &id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configuration des routes de commandes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_orders);
    cfg.service(submit_orders);
    cfg.service(get_order);
    cfg.service(update_status);
    cfg.service(delete_order);
}
