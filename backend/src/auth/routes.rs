use actix_web::{web, HttpResponse};
use shared::{LoginRequest, MessageResponse, RegisterRequest};

use super::models::AuthenticatedUser;
use super::service::{AuthError, AuthService};

pub async fn register(
    auth_service: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    let message = auth_service.register(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let response = auth_service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new(
        "Logged out. Discard the token on the client.",
    ))
}

pub async fn me(
    user: AuthenticatedUser,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    log::info!("/api/auth/me called for user ID: {}", user.id);
    let view = auth_service.me(user.id).await?;
    Ok(HttpResponse::Ok().json(view))
}
