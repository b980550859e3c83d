use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use shared::{AuthResponse, LoginRequest, RegisterRequest, UserView};
use uuid::Uuid;

use super::jwt::{JwtError, JwtService};
use super::password::{hash_password, verify_password};
use crate::db::models::UserAccount;
use crate::db::{MemoryRepository, RepositoryError};
use crate::routes::ErrorResponse;

const MIN_PASSWORD_LEN: usize = 6;
const LOGIN_FAILED: &str = "Invalid email or password";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Email is already registered")]
    EmailTaken,
    #[error("{0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

#[derive(Clone)]
pub struct AuthService {
    repo: MemoryRepository,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(repo: MemoryRepository, jwt_service: JwtService) -> Self {
        Self { repo, jwt_service }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Returns a confirmation message naming the new user and role.
    ///
    /// The caller picks its own role, staff roles included; registration is
    /// open to every role and there is no approval step.
    pub async fn register(&self, request: RegisterRequest) -> Result<String, AuthError> {
        let full_name = request.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AuthError::InvalidInput("Full name is required".to_string()));
        }
        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("A valid email is required".to_string()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let role = request.role.unwrap_or_default();
        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))?;
        let account = UserAccount::new(full_name, email, password_hash, role);

        let account = self.repo.create_user(account).await.map_err(|e| match e {
            RepositoryError::DuplicateEmail(_) => AuthError::EmailTaken,
            other => AuthError::Internal(other.to_string()),
        })?;

        Ok(format!(
            "User {} registered successfully with role {}",
            account.full_name, account.role
        ))
    }

    /// Unknown email, wrong password and inactive account all fail the same way.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let account = self
            .repo
            .get_user_by_email(&request.email)
            .await
            .ok_or_else(|| AuthError::Unauthorized(LOGIN_FAILED.to_string()))?;

        if !account.is_active || !verify_password(&request.password, &account.password_hash) {
            log::warn!("Failed login attempt for {}", account.email);
            return Err(AuthError::Unauthorized(LOGIN_FAILED.to_string()));
        }

        let token = self.jwt_service.generate_token(&account)?;
        log::info!("User {} logged in", account.email);
        Ok(AuthResponse {
            token,
            user: UserView::from(&account),
        })
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserView, AuthError> {
        self.repo
            .get_user_by_id(user_id)
            .await
            .map(|account| UserView::from(&account))
            .ok_or_else(|| AuthError::Unauthorized("Account no longer exists".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    fn service() -> AuthService {
        AuthService::new(MemoryRepository::new(), JwtService::new("test", 24))
    }

    fn register_request(email: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            full_name: "Hoa Nguyen".into(),
            email: email.into(),
            password: "secret123".into(),
            role,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_verifiable_token() {
        let auth = service();
        let message = auth
            .register(register_request("hoa@example.com", Some(Role::Operator)))
            .await
            .unwrap();
        assert_eq!(message, "User Hoa Nguyen registered successfully with role OPERATOR");

        let response = auth
            .login(LoginRequest {
                email: "HOA@example.com".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::Operator);

        let claims = auth.jwt_service().verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.user.id.to_string());
    }

    #[tokio::test]
    async fn role_defaults_to_citizen() {
        let auth = service();
        let message = auth.register(register_request("c@example.com", None)).await.unwrap();
        assert!(message.ends_with("CITIZEN"));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let auth = service();
        auth.register(register_request("dup@example.com", None)).await.unwrap();
        let err = auth.register(register_request("dup@example.com", None)).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_registration_fields_are_rejected() {
        let auth = service();
        let mut req = register_request("no-at-sign", None);
        assert!(matches!(auth.register(req.clone()).await, Err(AuthError::InvalidInput(_))));

        req.email = "ok@example.com".into();
        req.password = "123".into();
        assert!(matches!(auth.register(req.clone()).await, Err(AuthError::InvalidInput(_))));

        req.password = "long-enough".into();
        req.full_name = "   ".into();
        assert!(matches!(auth.register(req).await, Err(AuthError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let auth = service();
        auth.register(register_request("x@example.com", None)).await.unwrap();

        let wrong_password = auth
            .login(LoginRequest {
                email: "x@example.com".into(),
                password: "nope-nope".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(LoginRequest {
                email: "ghost@example.com".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    }
}
