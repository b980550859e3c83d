use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CollectionRequestView, ReportStatus, Role, UserView, WasteCategory};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub full_name: String,
    /// Stored lowercased; lookups go through the same normalisation.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(full_name: String, email: &str, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            email: normalize_email(email),
            password_hash,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl From<&UserAccount> for UserView {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub waste_type: WasteCategory,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub assigned_collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollectionRequest {
    pub fn new(
        citizen_id: Uuid,
        waste_type: WasteCategory,
        description: Option<String>,
        image_url: Option<String>,
        coordinates: Option<(f64, f64)>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            citizen_id,
            waste_type,
            description,
            image_url,
            status: ReportStatus::default(),
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lon)| lon),
            assigned_collector_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ReportStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn to_view(&self) -> CollectionRequestView {
        CollectionRequestView {
            id: self.id,
            citizen_id: self.citizen_id,
            waste_type: self.waste_type,
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            status: self.status,
            latitude: self.latitude,
            longitude: self.longitude,
            assigned_collector_id: self.assigned_collector_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
