use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, web, Error, HttpMessage, HttpResponse};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::AppError;
use crate::models::Role;
use crate::utils::jwt;
use crate::AppState;

/// Identité portée par le jeton, insérée dans les extensions de la requête
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Exige un utilisateur connecté
pub fn require_user(user: Option<web::ReqData<AuthUser>>) -> Result<AuthUser, AppError> {
    user.map(|user| user.into_inner())
        .ok_or_else(|| AppError::unauthorized("Authentification requise"))
}

/// Exige un administrateur connecté
pub fn require_admin(user: Option<web::ReqData<AuthUser>>) -> Result<AuthUser, AppError> {
    let user = require_user(user)?;
    if !user.is_admin() {
        return Err(AppError::forbidden());
    }
    Ok(user)
}

//Il vérifie le jeton JWT quand il est présent. Les routes décident ensuite
//si l'authentification est obligatoire.
pub struct ExtractUser;

impl<S, B> Transform<S, ServiceRequest> for ExtractUser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ExtractUserMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractUserMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct ExtractUserMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ExtractUserMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx) // Appel explicite à `poll_ready`
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match identify(&req) {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(user);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(path = req.path(), error = %err, "Jeton refusé");
                    let response = HttpResponse::from_error(err).map_into_right_body();
                    return Ok(req.into_response(response));
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn identify(req: &ServiceRequest) -> Result<Option<AuthUser>, AppError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("En-tête Authorization invalide"))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState non enregistré".to_string()))?;

    let claims = jwt::validate_token(token, &state.jwt_secret)
        .map_err(|_| AppError::unauthorized("Jeton JWT invalide ou expiré"))?;

    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::unauthorized("Identifiant utilisateur invalide dans le JWT"))?;

    Ok(Some(AuthUser { id, role: claims.role }))
}
