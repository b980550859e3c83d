use crate::auth::{AuthMiddleware, AuthService, JwtService};
use crate::classify::{ClassifierClient, ClassifyError};
use crate::config::AppConfig;
use crate::db::MemoryRepository;
use crate::requests::RequestService;

/// Handles shared by every worker. Cloning is cheap; the store and the HTTP
/// client are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    pub classifier: ClassifierClient,
    pub auth_service: AuthService,
    pub request_service: RequestService,
    pub auth_middleware: AuthMiddleware,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ClassifyError> {
        let classifier = ClassifierClient::new(&config.ai_service_url)?;
        let jwt_service = JwtService::new(&config.jwt_secret, config.token_ttl_hours);
        Ok(Self::new(classifier, jwt_service, MemoryRepository::new()))
    }

    pub fn new(classifier: ClassifierClient, jwt_service: JwtService, repo: MemoryRepository) -> Self {
        Self {
            classifier,
            auth_middleware: AuthMiddleware::new(jwt_service.clone()),
            auth_service: AuthService::new(repo.clone(), jwt_service),
            request_service: RequestService::new(repo),
        }
    }
}
