use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::db::{Account, ApplicationRecord, CatalogEntry};
use crate::entities::attachments;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-field validation messages, present on validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            fields: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            fields: None,
        }
    }

    pub fn validation_error(fields: BTreeMap<String, String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Validation failed".to_string()),
            fields: Some(fields),
        }
    }
}

/// Distinguishes an absent field from an explicit null in PATCH-style
/// updates: absent leaves the column untouched, null clears it.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCodeRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_city_id: Option<i32>,
    pub is_staff: bool,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            phone: account.phone,
            first_name: account.first_name,
            last_name: account.last_name,
            birth_city_id: account.birth_city_id,
            is_staff: account.is_staff,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub file: String,
    pub attachment_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    /// Required on the generic path; the specialized communications and
    /// conscription paths fill it in themselves.
    pub service_type_id: Option<i32>,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub birth_city_id: Option<i32>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub education_level_id: Option<i32>,
    #[serde(default)]
    pub specialization_id: Option<i32>,
    #[serde(default)]
    pub graduation_place: String,
    #[serde(default)]
    pub sports_achievements: String,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub has_conscript_certificate: bool,
    #[serde(default)]
    pub has_military_ticket: bool,
    #[serde(default)]
    pub has_military_faculty: bool,
    #[serde(default)]
    pub current_rank_id: Option<i32>,
    #[serde(default)]
    pub preferred_branch_id: Option<i32>,
    #[serde(default)]
    pub health_status_id: Option<i32>,
    #[serde(default)]
    pub health_comment: String,
    pub iin: String,
    #[serde(default)]
    pub has_deferment: bool,
    #[serde(default)]
    pub deferment_reason: String,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub desired_city_ids: Vec<i32>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateApplicationRequest {
    pub service_type_id: Option<i32>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub birth_city_id: Option<Option<i32>>,
    pub address: Option<String>,
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub education_level_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub specialization_id: Option<Option<i32>>,
    pub graduation_place: Option<String>,
    pub sports_achievements: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub height_cm: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight_kg: Option<Option<f64>>,
    pub has_conscript_certificate: Option<bool>,
    pub has_military_ticket: Option<bool>,
    pub has_military_faculty: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_rank_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub preferred_branch_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub health_status_id: Option<Option<i32>>,
    pub health_comment: Option<String>,
    /// Honored through the staff path only; silently discarded for owners.
    pub admin_comment: Option<String>,
    /// Honored through the staff path only; silently discarded for owners.
    pub status_id: Option<i32>,
    pub has_deferment: Option<bool>,
    pub deferment_reason: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub gpa: Option<Option<f64>>,
    pub desired_city_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRequest>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentDto {
    pub id: i32,
    pub file: String,
    pub attachment_type: Option<String>,
}

impl From<attachments::Model> for AttachmentDto {
    fn from(model: attachments::Model) -> Self {
        Self {
            id: model.id,
            file: model.file,
            attachment_type: model.attachment_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationDto {
    pub id: i32,
    pub user_id: i32,
    pub service_type_id: i32,
    pub status_id: i32,
    pub status_code: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone: String,
    pub birth_city_id: Option<i32>,
    pub address: String,
    pub comment: String,
    pub education_level_id: Option<i32>,
    pub specialization_id: Option<i32>,
    pub graduation_place: String,
    pub sports_achievements: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub has_conscript_certificate: bool,
    pub has_military_ticket: bool,
    pub has_military_faculty: bool,
    pub current_rank_id: Option<i32>,
    pub preferred_branch_id: Option<i32>,
    pub health_status_id: Option<i32>,
    pub health_comment: String,
    pub admin_comment: String,
    pub iin: String,
    pub has_deferment: bool,
    pub deferment_reason: String,
    pub gpa: Option<f64>,
    pub desired_city_ids: Vec<i32>,
    pub attachments: Vec<AttachmentDto>,
    pub created_at: String,
    pub modified_at: String,
    pub exist: bool,
}

impl From<ApplicationRecord> for ApplicationDto {
    fn from(record: ApplicationRecord) -> Self {
        let app = record.application;
        Self {
            id: app.id,
            user_id: app.user_id,
            service_type_id: app.service_type_id,
            status_id: app.status_id,
            status_code: record.status_code,
            full_name: app.full_name,
            date_of_birth: app.date_of_birth,
            email: app.email,
            phone: app.phone,
            birth_city_id: app.birth_city_id,
            address: app.address,
            comment: app.comment,
            education_level_id: app.education_level_id,
            specialization_id: app.specialization_id,
            graduation_place: app.graduation_place,
            sports_achievements: app.sports_achievements,
            height_cm: app.height_cm,
            weight_kg: app.weight_kg,
            has_conscript_certificate: app.has_conscript_certificate,
            has_military_ticket: app.has_military_ticket,
            has_military_faculty: app.has_military_faculty,
            current_rank_id: app.current_rank_id,
            preferred_branch_id: app.preferred_branch_id,
            health_status_id: app.health_status_id,
            health_comment: app.health_comment,
            admin_comment: app.admin_comment,
            iin: app.iin,
            has_deferment: app.has_deferment,
            deferment_reason: app.deferment_reason,
            gpa: app.gpa,
            desired_city_ids: record.desired_city_ids,
            attachments: record
                .attachments
                .into_iter()
                .map(AttachmentDto::from)
                .collect(),
            created_at: app.created_at.to_rfc3339(),
            modified_at: app.modified_at.to_rfc3339(),
            exist: app.exist,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateStatusRequest {
    pub ids: Vec<i32>,
    pub status_code: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateStatusResponse {
    pub updated: u64,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CatalogEntryDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exist: bool,
}

impl From<CatalogEntry> for CatalogEntryDto {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            code: entry.code,
            name: entry.name,
            description: entry.description,
            exist: entry.exist,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogCreateRequest {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncludeDeletedQuery {
    #[serde(default)]
    pub include_deleted: bool,
}
