use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{normalize_email, CollectionRequest, UserAccount};

/// Process-local store for accounts and collection requests.
///
/// Each operation takes the relevant lock exactly once, so check-then-write
/// sequences (unique email, status transitions) are atomic.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, UserAccount>>>,
    requests: Arc<RwLock<HashMap<Uuid, CollectionRequest>>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
    #[error("Item not found")]
    NotFound,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail(user.email));
        }
        log::info!("Creating account {} with role {}", user.email, user.role);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Option<UserAccount> {
        self.users.read().await.get(&user_id).cloned()
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<UserAccount> {
        let email = normalize_email(email);
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn create_request(&self, request: CollectionRequest) -> CollectionRequest {
        log::info!(
            "Creating collection request {} for citizen {}",
            request.id,
            request.citizen_id
        );
        self.requests
            .write()
            .await
            .insert(request.id, request.clone());
        request
    }

    pub async fn get_request(&self, request_id: Uuid) -> Option<CollectionRequest> {
        self.requests.read().await.get(&request_id).cloned()
    }

    /// Newest first. `citizen_id` narrows the list to one citizen's requests.
    pub async fn list_requests(&self, citizen_id: Option<Uuid>) -> Vec<CollectionRequest> {
        let mut list: Vec<CollectionRequest> = self
            .requests
            .read()
            .await
            .values()
            .filter(|r| citizen_id.is_none_or(|id| r.citizen_id == id))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Applies `update` under the write lock; nothing is stored if it fails.
    pub async fn update_request<F, E>(&self, request_id: Uuid, update: F) -> Result<CollectionRequest, E>
    where
        F: FnOnce(&mut CollectionRequest) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut requests = self.requests.write().await;
        let current = requests.get(&request_id).ok_or(RepositoryError::NotFound)?;
        let mut updated = current.clone();
        update(&mut updated)?;
        requests.insert(request_id, updated.clone());
        Ok(updated)
    }
}
