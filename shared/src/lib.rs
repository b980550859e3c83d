use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Label and confidence returned by the classification service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClassificationResult {
    #[serde(rename = "suggestedLabel")]
    pub suggested_label: String,
    pub confidence: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    #[default]
    Citizen,
    Collector,
    Operator,
    Admin,
}

impl Role {
    /// Operators and admins review and dispatch requests.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Operator | Role::Admin)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WasteCategory {
    Plastic,
    Construction,
    Furniture,
    Hazardous,
    Organic,
    Other,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Assigned,
    Collected,
}

impl ReportStatus {
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Accepted, Assigned) | (Assigned, Collected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Rejected | ReportStatus::Collected)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account; never carries the password hash.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub waste_type: WasteCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
    #[serde(default)]
    pub collector_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequestView {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub waste_type: WasteCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn classification_result_uses_upstream_field_names() {
        let parsed: ClassificationResult =
            serde_json::from_str(r#"{"suggestedLabel":"plastic","confidence":0.92}"#).unwrap();
        assert_eq!(parsed.suggested_label, "plastic");
        assert_eq!(parsed.confidence, 0.92);

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["suggestedLabel"], "plastic");
    }

    #[test]
    fn lifecycle_allows_only_forward_steps() {
        use ReportStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Accepted.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(Collected));

        assert!(!Pending.can_transition_to(Collected));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Collected.can_transition_to(Assigned));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_have_no_successor() {
        let all = [
            ReportStatus::Pending,
            ReportStatus::Accepted,
            ReportStatus::Rejected,
            ReportStatus::Assigned,
            ReportStatus::Collected,
        ];
        for from in all.iter().filter(|s| s.is_terminal()) {
            assert!(all.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn role_string_forms() {
        assert_eq!(Role::Operator.to_string(), "OPERATOR");
        assert_eq!(Role::from_str("collector").unwrap(), Role::Collector);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(Role::default(), Role::Citizen);
    }

    #[test]
    fn register_request_defaults_role_to_none() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"fullName":"Lan Tran","email":"lan@example.com","password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name, "Lan Tran");
        assert!(req.role.is_none());
    }
}
