use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::error::AppError;
use crate::models::{ArticleForm, ArticleUpdate, CatalogQuery};
use crate::routes::blocking;
use crate::services::catalog;
use crate::utils::extract_user::{require_admin, AuthUser};
use crate::utils::validation::parse_id;
use crate::AppState;

/// Catalogue, filtrable par `?type=` et triable par `?sort=`
#[get("")]
async fn list_articles(
    state: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
    let CatalogQuery { kind, sort } = query.into_inner();
    let articles = blocking(&state, move |store| catalog::list_articles(store, kind.as_deref(), sort)).await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[get("/types")]
async fn list_types(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let types = blocking(&state, catalog::article_types).await?;
    Ok(HttpResponse::Ok().json(types))
}

#[get("/{id}")]
async fn get_article(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let article = blocking(&state, move |store| catalog::get_article(store, id)).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[post("")]
async fn create_article(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    form: web::Json<ArticleForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let form = form.into_inner();
    let article = blocking(&state, move |store| catalog::create_article(store, form)).await?;
    Ok(HttpResponse::Created().json(article))
}

#[put("/{id}")]
async fn update_article(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
    form: web::Json<ArticleUpdate>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let id = parse_id(&path)?;
    let update = form.into_inner();
    let article = blocking(&state, move |store| catalog::update_article(store, id, update)).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[delete("/{id}")]
async fn delete_article(
    state: web::Data<AppState>,
    user: Option<web::ReqData<AuthUser>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(user)?;
    let id = parse_id(&path)?;
    blocking(&state, move |store| catalog::delete_article(store, id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configuration des routes du catalogue ; /types avant /{id}
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_articles);
    cfg.service(list_types);
    cfg.service(get_article);
    cfg.service(create_article);
    cfg.service(update_article);
    cfg.service(delete_article);
}
