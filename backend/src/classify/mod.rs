pub mod client;
pub mod error;
pub mod models;
pub mod routes;

pub use client::ClassifierClient;
pub use error::ClassifyError;
pub use models::ClassificationRequest;
