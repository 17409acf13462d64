use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;

use crate::error::AppError;
use crate::models::{CartItem, CartView, QuantityForm};
use crate::routes::blocking;
use crate::services::cart;
use crate::utils::extract_user::{require_user, AuthUser};
use crate::utils::validation::parse_id;
use crate::AppState;

#[get("")]
async fn get_cart(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let cart = blocking(&state, move |store| cart::get_cart(store, user.id)).await?;
    Ok(HttpResponse::Ok().json(CartView::from(&cart)))
}

#[delete("")]
async fn clear_cart(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    blocking(&state, move |store| cart::clear_cart(store, user.id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[post("/items")]
async fn add_item(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    item: web::Json<CartItem>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let item = item.into_inner();
    let cart = blocking(&state, move |store| cart::add_item(store, user.id, item)).await?;
    Ok(HttpResponse::Ok().json(CartView::from(&cart)))
}

#[put("/items/{article_id}")]
async fn set_quantity(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
    form: web::Json<QuantityForm>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let article_id = parse_id(&path)?;
    let quantity = form.quantity;
    let cart = blocking(&state, move |store| cart::set_quantity(store, user.id, article_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartView::from(&cart)))
}

#[delete("/items/{article_id}")]
async fn remove_item(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let article_id = parse_id(&path)?;
    let cart = blocking(&state, move |store| cart::remove_item(store, user.id, article_id)).await?;
    Ok(HttpResponse::Ok().json(CartView::from(&cart)))
}

/// Valide le panier : même flux que POST /api/orders
#[post("/checkout")]
async fn checkout(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(user)?;
    let order = blocking(&state, move |store| cart::checkout(store, user.id, Utc::now())).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "order": order
    })))
}

/// Configuration des routes du panier
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_cart);
    cfg.service(clear_cart);
    cfg.service(add_item);
    cfg.service(set_quantity);
    cfg.service(remove_item);
    cfg.service(checkout);
}
