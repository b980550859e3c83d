pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;

pub use jwt::JwtService;
pub use middleware::AuthMiddleware;
pub use models::AuthenticatedUser;
pub use service::{AuthError, AuthService};
