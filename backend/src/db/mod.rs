pub mod memory_repository;
pub mod models;

pub use memory_repository::{MemoryRepository, RepositoryError};
