#![allow(dead_code, unused_macros)]

use shared::{LoginRequest, RegisterRequest, Role};
use uuid::Uuid;
use wcs_backend::auth::JwtService;
use wcs_backend::classify::ClassifierClient;
use wcs_backend::db::MemoryRepository;
use wcs_backend::state::AppState;

pub const BOUNDARY: &str = "wcs-test-boundary";
pub const PASSWORD: &str = "secret123";

macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(actix_web::App::new().configure(|cfg| {
            wcs_backend::routes::configure_routes(cfg, $state.clone())
        }))
        .await
    };
}

pub fn state_with_classifier(base_url: &str) -> AppState {
    AppState::new(
        ClassifierClient::new(base_url).unwrap(),
        JwtService::new("integration-secret", 24),
        MemoryRepository::new(),
    )
}

pub fn state() -> AppState {
    state_with_classifier(&unused_local_url())
}

/// Address nothing listens on, for connection-refused cases.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Registers an account directly through the service and returns its id and token.
pub async fn login_as(state: &AppState, role: Role) -> (Uuid, String) {
    let email = format!("{}@example.com", Uuid::new_v4());
    state
        .auth_service
        .register(RegisterRequest {
            full_name: format!("Test {}", role),
            email: email.clone(),
            password: PASSWORD.to_string(),
            role: Some(role),
        })
        .await
        .unwrap();
    let response = state
        .auth_service
        .login(LoginRequest {
            email,
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    (response.user.id, response.token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(
    field_name: &str,
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, file_name
        )
        .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
