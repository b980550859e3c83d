use actix_web::{web, HttpResponse};
use shared::{CreateCollectionRequest, UpdateStatusRequest};
use uuid::Uuid;

use super::service::{RequestError, RequestService};
use crate::auth::AuthenticatedUser;

fn parse_request_id(raw: &str) -> Result<Uuid, RequestError> {
    Uuid::parse_str(raw).map_err(|_| RequestError::InvalidInput("Invalid UUID format".to_string()))
}

pub async fn create_request(
    user: AuthenticatedUser,
    service: web::Data<RequestService>,
    body: web::Json<CreateCollectionRequest>,
) -> Result<HttpResponse, RequestError> {
    let created = service.create(user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_requests(
    user: AuthenticatedUser,
    service: web::Data<RequestService>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.list(user).await)
}

pub async fn get_request(
    user: AuthenticatedUser,
    service: web::Data<RequestService>,
    path: web::Path<String>,
) -> Result<HttpResponse, RequestError> {
    let request_id = parse_request_id(&path.into_inner())?;
    let request = service.get(user, request_id).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn update_status(
    user: AuthenticatedUser,
    service: web::Data<RequestService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, RequestError> {
    let request_id = parse_request_id(&path.into_inner())?;
    let updated = service
        .update_status(user, request_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}
