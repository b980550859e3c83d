use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use shared::{CollectionRequestView, CreateCollectionRequest, ReportStatus, Role, UpdateStatusRequest};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::models::CollectionRequest;
use crate::db::{MemoryRepository, RepositoryError};
use crate::routes::ErrorResponse;

pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Collection request not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
}

impl From<RepositoryError> for RequestError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => RequestError::NotFound,
            RepositoryError::DuplicateEmail(email) => {
                RequestError::Conflict(format!("Email already registered: {}", email))
            }
        }
    }
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RequestError::Forbidden(_) => StatusCode::FORBIDDEN,
            RequestError::NotFound => StatusCode::NOT_FOUND,
            RequestError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

#[derive(Clone)]
pub struct RequestService {
    repo: MemoryRepository,
}

impl RequestService {
    pub fn new(repo: MemoryRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        user: AuthenticatedUser,
        payload: CreateCollectionRequest,
    ) -> Result<CollectionRequestView, RequestError> {
        if user.role != Role::Citizen {
            return Err(RequestError::Forbidden(
                "Only citizens can submit collection requests".to_string(),
            ));
        }

        let description = payload
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(RequestError::InvalidInput(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        let coordinates = validate_coordinates(payload.latitude, payload.longitude)?;
        let image_url = payload.image_url.filter(|u| !u.trim().is_empty());

        let request = CollectionRequest::new(
            user.id,
            payload.waste_type,
            description,
            image_url,
            coordinates,
        );
        Ok(self.repo.create_request(request).await.to_view())
    }

    pub async fn list(&self, user: AuthenticatedUser) -> Vec<CollectionRequestView> {
        let owner = (user.role == Role::Citizen).then_some(user.id);
        self.repo
            .list_requests(owner)
            .await
            .iter()
            .map(CollectionRequest::to_view)
            .collect()
    }

    /// Citizens only see their own requests; others are reported as missing.
    pub async fn get(
        &self,
        user: AuthenticatedUser,
        request_id: Uuid,
    ) -> Result<CollectionRequestView, RequestError> {
        let request = self
            .repo
            .get_request(request_id)
            .await
            .ok_or(RequestError::NotFound)?;
        if user.role == Role::Citizen && request.citizen_id != user.id {
            return Err(RequestError::NotFound);
        }
        Ok(request.to_view())
    }

    pub async fn update_status(
        &self,
        user: AuthenticatedUser,
        request_id: Uuid,
        change: UpdateStatusRequest,
    ) -> Result<CollectionRequestView, RequestError> {
        let next = change.status;
        check_role_may_set(user.role, next)?;

        let collector_id = if next == ReportStatus::Assigned {
            let id = change.collector_id.ok_or_else(|| {
                RequestError::InvalidInput("collectorId is required to assign a request".to_string())
            })?;
            match self.repo.get_user_by_id(id).await {
                Some(account) if account.role == Role::Collector && account.is_active => Some(id),
                _ => {
                    return Err(RequestError::InvalidInput(
                        "collectorId does not name an active collector".to_string(),
                    ));
                }
            }
        } else {
            None
        };

        let updated = self
            .repo
            .update_request(request_id, |request| {
                if user.role == Role::Collector && request.assigned_collector_id != Some(user.id) {
                    return Err(RequestError::Forbidden(
                        "Request is not assigned to you".to_string(),
                    ));
                }
                if request.status.is_terminal() {
                    return Err(RequestError::Conflict(format!(
                        "Request is already {}; its status can no longer change",
                        request.status
                    )));
                }
                if !request.status.can_transition_to(next) {
                    return Err(RequestError::Conflict(format!(
                        "Cannot change status from {} to {}",
                        request.status, next
                    )));
                }
                if let Some(collector_id) = collector_id {
                    request.assigned_collector_id = Some(collector_id);
                }
                request.set_status(next);
                Ok(())
            })
            .await?;

        log::info!(
            "Collection request {} moved to {} by {} {}",
            updated.id,
            updated.status,
            user.role,
            user.id
        );
        Ok(updated.to_view())
    }
}

fn check_role_may_set(role: Role, next: ReportStatus) -> Result<(), RequestError> {
    let allowed = match next {
        ReportStatus::Accepted | ReportStatus::Rejected | ReportStatus::Assigned => role.is_staff(),
        ReportStatus::Collected => role == Role::Collector,
        ReportStatus::Pending => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(RequestError::Forbidden(format!(
            "Role {} cannot set status {}",
            role, next
        )))
    }
}

fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<(f64, f64)>, RequestError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(RequestError::InvalidInput(
                    "Coordinates are out of range".to_string(),
                ));
            }
            Ok(Some((lat, lon)))
        }
        _ => Err(RequestError::InvalidInput(
            "Latitude and longitude must be given together".to_string(),
        )),
    }
}
