use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, permissions,
    types::{
        ApplicationDto, BulkUpdateStatusRequest, BulkUpdateStatusResponse,
        CreateApplicationRequest, IncludeDeletedQuery, UpdateApplicationRequest,
    },
    validation,
};
use crate::db::{
    Account, ApplicationPatch, ApplicationRecord, NewApplication, NewAttachment, Viewer,
};

/// GET /api/applications
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Query(query): Query<IncludeDeletedQuery>,
) -> Result<Json<ApiResponse<Vec<ApplicationDto>>>, ApiError> {
    let viewer = if account.is_staff {
        Viewer::Staff
    } else {
        Viewer::Owner(account.id)
    };
    let include_deleted = account.is_staff && query.include_deleted;

    let records = state
        .store
        .applications()
        .list(viewer, include_deleted)
        .await?;
    let dtos = records.into_iter().map(ApplicationDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/applications
pub async fn create_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(service_type_id) = payload.service_type_id else {
        return Err(ApiError::validation(
            "service_type_id",
            "Service type is required",
        ));
    };

    let record = create_with_service_type(&state, &account, payload, service_type_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ApplicationDto::from(record))),
    ))
}

/// POST /api/applications/communications
///
/// Contract-service entry point: the service type is fixed, everything else
/// follows the standard creation path.
pub async fn create_communications_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_for_service_code(state, account, payload, "contract").await
}

/// POST /api/applications/conscription
pub async fn create_conscription_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_for_service_code(state, account, payload, "conscription").await
}

async fn create_for_service_code(
    state: Arc<AppState>,
    account: Account,
    payload: CreateApplicationRequest,
    service_code: &str,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationDto>>), ApiError> {
    let service_type_id = state
        .store
        .catalog()
        .service_type_id_by_code(service_code)
        .await?
        .ok_or_else(|| {
            ApiError::internal(format!("Service type '{service_code}' is not seeded"))
        })?;

    let record = create_with_service_type(&state, &account, payload, service_type_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ApplicationDto::from(record))),
    ))
}

async fn create_with_service_type(
    state: &AppState,
    account: &Account,
    payload: CreateApplicationRequest,
    service_type_id: i32,
) -> Result<ApplicationRecord, ApiError> {
    let mut errors = validation::FieldErrors::new();
    if payload.full_name.trim().is_empty() {
        errors.add("full_name", "Full name is required");
    }
    if !validation::is_valid_email(&payload.email) {
        errors.add("email", "Invalid email address");
    }
    if !validation::is_valid_phone(&payload.phone) {
        errors.add("phone", "Phone must match +7 followed by 10 digits");
    }
    if !validation::is_valid_iin(&payload.iin) {
        errors.add("iin", "IIN must be exactly 12 digits");
    }
    errors.into_result()?;

    let applications = state.store.applications();
    if applications.iin_taken(&payload.iin, None).await? {
        return Err(ApiError::validation("iin", "IIN is already registered"));
    }

    let status_id = state
        .store
        .catalog()
        .status_id_by_code(permissions::INITIAL_STATUS_CODE)
        .await?
        .ok_or_else(|| ApiError::internal("Initial application status is not seeded"))?;

    let record = applications
        .create(
            NewApplication {
                user_id: account.id,
                service_type_id,
                status_id,
                full_name: payload.full_name,
                date_of_birth: payload.date_of_birth,
                email: payload.email,
                phone: payload.phone,
                birth_city_id: payload.birth_city_id,
                address: payload.address,
                comment: payload.comment,
                education_level_id: payload.education_level_id,
                specialization_id: payload.specialization_id,
                graduation_place: payload.graduation_place,
                sports_achievements: payload.sports_achievements,
                height_cm: payload.height_cm,
                weight_kg: payload.weight_kg,
                has_conscript_certificate: payload.has_conscript_certificate,
                has_military_ticket: payload.has_military_ticket,
                has_military_faculty: payload.has_military_faculty,
                current_rank_id: payload.current_rank_id,
                preferred_branch_id: payload.preferred_branch_id,
                health_status_id: payload.health_status_id,
                health_comment: payload.health_comment,
                iin: payload.iin,
                has_deferment: payload.has_deferment,
                deferment_reason: payload.deferment_reason,
                gpa: payload.gpa,
                desired_city_ids: payload.desired_city_ids,
                attachments: payload
                    .attachments
                    .into_iter()
                    .map(|a| NewAttachment {
                        file: a.file,
                        attachment_type: a.attachment_type,
                    })
                    .collect(),
            },
            account.id,
        )
        .await?;

    tracing::info!("Application {} created by account {}", record.application.id, account.id);

    Ok(record)
}

/// GET /api/applications/{id}
pub async fn get_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeDeletedQuery>,
) -> Result<Json<ApiResponse<ApplicationDto>>, ApiError> {
    let record = state
        .store
        .applications()
        .get(id, query.include_deleted)
        .await?
        .ok_or_else(|| ApiError::not_found("Application", id))?;

    if !permissions::can_read(&account, record.application.user_id) {
        return Err(ApiError::forbidden("Not your application"));
    }

    Ok(Json(ApiResponse::success(ApplicationDto::from(record))))
}

/// PUT /api/applications/{id}
pub async fn update_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateApplicationRequest>,
) -> Result<Json<ApiResponse<ApplicationDto>>, ApiError> {
    let applications = state.store.applications();
    let record = applications
        .get(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Application", id))?;

    if !permissions::can_read(&account, record.application.user_id) {
        return Err(ApiError::forbidden("Not your application"));
    }
    if !permissions::can_write(&account, record.application.user_id, &record.status_code) {
        return Err(ApiError::forbidden(
            "Application is no longer editable by its owner",
        ));
    }

    let mut errors = validation::FieldErrors::new();
    if let Some(email) = &payload.email
        && !validation::is_valid_email(email)
    {
        errors.add("email", "Invalid email address");
    }
    if let Some(phone) = &payload.phone
        && !validation::is_valid_phone(phone)
    {
        errors.add("phone", "Phone must match +7 followed by 10 digits");
    }
    errors.into_result()?;

    // Status and reviewer comments move through the staff path only.
    let (status_id, admin_comment) = if account.is_staff {
        (payload.status_id, payload.admin_comment)
    } else {
        (None, None)
    };

    let patch = ApplicationPatch {
        service_type_id: payload.service_type_id,
        status_id,
        full_name: payload.full_name,
        date_of_birth: payload.date_of_birth,
        email: payload.email,
        phone: payload.phone,
        birth_city_id: payload.birth_city_id,
        address: payload.address,
        comment: payload.comment,
        education_level_id: payload.education_level_id,
        specialization_id: payload.specialization_id,
        graduation_place: payload.graduation_place,
        sports_achievements: payload.sports_achievements,
        height_cm: payload.height_cm,
        weight_kg: payload.weight_kg,
        has_conscript_certificate: payload.has_conscript_certificate,
        has_military_ticket: payload.has_military_ticket,
        has_military_faculty: payload.has_military_faculty,
        current_rank_id: payload.current_rank_id,
        preferred_branch_id: payload.preferred_branch_id,
        health_status_id: payload.health_status_id,
        health_comment: payload.health_comment,
        admin_comment,
        has_deferment: payload.has_deferment,
        deferment_reason: payload.deferment_reason,
        gpa: payload.gpa,
        desired_city_ids: payload.desired_city_ids,
        new_attachments: payload
            .attachments
            .into_iter()
            .map(|a| NewAttachment {
                file: a.file,
                attachment_type: a.attachment_type,
            })
            .collect(),
    };

    let updated = applications
        .update(id, patch, account.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application", id))?;

    Ok(Json(ApiResponse::success(ApplicationDto::from(updated))))
}

/// DELETE /api/applications/{id}
pub async fn delete_application(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let applications = state.store.applications();
    let record = applications
        .get(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Application", id))?;

    if !permissions::can_read(&account, record.application.user_id) {
        return Err(ApiError::forbidden("Not your application"));
    }
    if !permissions::can_write(&account, record.application.user_id, &record.status_code) {
        return Err(ApiError::forbidden(
            "Application is no longer editable by its owner",
        ));
    }

    applications.soft_delete(id, account.id).await?;

    tracing::info!("Application {id} soft-deleted by account {}", account.id);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/applications/bulk-update-status
///
/// Staff-only batch transition. Unknown or already-deleted ids are skipped;
/// the returned count is the only feedback.
pub async fn bulk_update_status(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Json(payload): Json<BulkUpdateStatusRequest>,
) -> Result<Json<ApiResponse<BulkUpdateStatusResponse>>, ApiError> {
    if !account.is_staff {
        return Err(ApiError::forbidden("Staff access required"));
    }

    let mut errors = validation::FieldErrors::new();
    if payload.ids.is_empty() {
        errors.add("ids", "At least one application id is required");
    }
    if payload.status_code.trim().is_empty() {
        errors.add("status_code", "Status code is required");
    }
    errors.into_result()?;

    let status_id = state
        .store
        .catalog()
        .status_id_by_code(&payload.status_code)
        .await?
        .ok_or_else(|| ApiError::not_found("Status", &payload.status_code))?;

    let updated = state
        .store
        .applications()
        .bulk_update_status(
            &payload.ids,
            status_id,
            payload.comment.as_deref(),
            account.id,
        )
        .await?;

    tracing::info!(
        "Bulk status update to '{}' touched {updated} applications",
        payload.status_code
    );

    Ok(Json(ApiResponse::success(BulkUpdateStatusResponse {
        updated,
    })))
}
