use actix_web::{error::InternalError, web, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::auth::routes::{login, logout, me, register};
use crate::classify::routes::classify_image;
use crate::requests::routes::{create_request, get_request, list_requests, update_status};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: AppState) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(web::Data::new(state.classifier))
        .app_data(web::Data::new(state.auth_service))
        .app_data(web::Data::new(state.request_service))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/api/ai/classify").route(web::post().to(classify_image)))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/logout", web::post().to(logout))
                .service(
                    web::resource("/me")
                        .wrap(state.auth_middleware.clone())
                        .route(web::get().to(me)),
                ),
        )
        .service(
            web::scope("/api/requests")
                .wrap(state.auth_middleware)
                .route("", web::post().to(create_request))
                .route("", web::get().to(list_requests))
                .route("/{request_id}", web::get().to(get_request))
                .route("/{request_id}/status", web::patch().to(update_status)),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
