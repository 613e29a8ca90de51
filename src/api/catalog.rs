use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState,
    types::{CatalogCreateRequest, CatalogEntryDto, CatalogUpdateRequest, IncludeDeletedQuery},
};
use crate::db::Account;

fn require_staff(account: &Account) -> Result<(), ApiError> {
    if account.is_staff {
        Ok(())
    } else {
        Err(ApiError::forbidden("Staff access required"))
    }
}

/// GET /api/service-types
///
/// The one reference listing open without authentication, so the public
/// signup form can render its choices.
pub async fn public_service_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CatalogEntryDto>>>, ApiError> {
    let entries = state.store.catalog().list_service_types(false).await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(CatalogEntryDto::from).collect(),
    )))
}

/// Reference tables carrying only a name.
macro_rules! name_only_handlers {
    ($list:ident, $create:ident, $update:ident, $delete:ident,
     $repo_list:ident, $repo_create:ident, $repo_update:ident, $repo_delete:ident,
     $resource:literal) => {
        pub async fn $list(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Query(query): Query<IncludeDeletedQuery>,
        ) -> Result<Json<ApiResponse<Vec<CatalogEntryDto>>>, ApiError> {
            let include_deleted = account.is_staff && query.include_deleted;
            let entries = state.store.catalog().$repo_list(include_deleted).await?;
            Ok(Json(ApiResponse::success(
                entries.into_iter().map(CatalogEntryDto::from).collect(),
            )))
        }

        pub async fn $create(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Json(payload): Json<CatalogCreateRequest>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;
            if payload.name.trim().is_empty() {
                return Err(ApiError::validation("name", "Name is required"));
            }

            let entry = state
                .store
                .catalog()
                .$repo_create(&payload.name, account.id)
                .await?;

            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(CatalogEntryDto::from(entry))),
            ))
        }

        pub async fn $update(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
            Json(payload): Json<CatalogUpdateRequest>,
        ) -> Result<Json<ApiResponse<CatalogEntryDto>>, ApiError> {
            require_staff(&account)?;

            let entry = state
                .store
                .catalog()
                .$repo_update(id, payload.name.as_deref(), account.id)
                .await?
                .ok_or_else(|| ApiError::not_found($resource, id))?;

            Ok(Json(ApiResponse::success(CatalogEntryDto::from(entry))))
        }

        pub async fn $delete(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;

            if !state.store.catalog().$repo_delete(id, account.id).await? {
                return Err(ApiError::not_found($resource, id));
            }

            Ok(StatusCode::NO_CONTENT)
        }
    };
}

/// Reference tables carrying a unique code plus a name.
macro_rules! coded_handlers {
    ($list:ident, $create:ident, $update:ident, $delete:ident,
     $repo_list:ident, $repo_create:ident, $repo_update:ident, $repo_delete:ident,
     $resource:literal) => {
        pub async fn $list(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Query(query): Query<IncludeDeletedQuery>,
        ) -> Result<Json<ApiResponse<Vec<CatalogEntryDto>>>, ApiError> {
            let include_deleted = account.is_staff && query.include_deleted;
            let entries = state.store.catalog().$repo_list(include_deleted).await?;
            Ok(Json(ApiResponse::success(
                entries.into_iter().map(CatalogEntryDto::from).collect(),
            )))
        }

        pub async fn $create(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Json(payload): Json<CatalogCreateRequest>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;
            let Some(code) = payload.code.as_deref().filter(|c| !c.trim().is_empty()) else {
                return Err(ApiError::validation("code", "Code is required"));
            };
            if payload.name.trim().is_empty() {
                return Err(ApiError::validation("name", "Name is required"));
            }

            let entry = state
                .store
                .catalog()
                .$repo_create(code, &payload.name, account.id)
                .await?;

            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(CatalogEntryDto::from(entry))),
            ))
        }

        pub async fn $update(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
            Json(payload): Json<CatalogUpdateRequest>,
        ) -> Result<Json<ApiResponse<CatalogEntryDto>>, ApiError> {
            require_staff(&account)?;

            let entry = state
                .store
                .catalog()
                .$repo_update(id, payload.code.as_deref(), payload.name.as_deref(), account.id)
                .await?
                .ok_or_else(|| ApiError::not_found($resource, id))?;

            Ok(Json(ApiResponse::success(CatalogEntryDto::from(entry))))
        }

        pub async fn $delete(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;

            if !state.store.catalog().$repo_delete(id, account.id).await? {
                return Err(ApiError::not_found($resource, id));
            }

            Ok(StatusCode::NO_CONTENT)
        }
    };
}

/// Reference tables carrying code, name and description.
macro_rules! described_handlers {
    ($list:ident, $create:ident, $update:ident, $delete:ident,
     $repo_list:ident, $repo_create:ident, $repo_update:ident, $repo_delete:ident,
     $resource:literal) => {
        pub async fn $list(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Query(query): Query<IncludeDeletedQuery>,
        ) -> Result<Json<ApiResponse<Vec<CatalogEntryDto>>>, ApiError> {
            let include_deleted = account.is_staff && query.include_deleted;
            let entries = state.store.catalog().$repo_list(include_deleted).await?;
            Ok(Json(ApiResponse::success(
                entries.into_iter().map(CatalogEntryDto::from).collect(),
            )))
        }

        pub async fn $create(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Json(payload): Json<CatalogCreateRequest>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;
            let Some(code) = payload.code.as_deref().filter(|c| !c.trim().is_empty()) else {
                return Err(ApiError::validation("code", "Code is required"));
            };
            if payload.name.trim().is_empty() {
                return Err(ApiError::validation("name", "Name is required"));
            }

            let entry = state
                .store
                .catalog()
                .$repo_create(
                    code,
                    &payload.name,
                    payload.description.as_deref().unwrap_or(""),
                    account.id,
                )
                .await?;

            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(CatalogEntryDto::from(entry))),
            ))
        }

        pub async fn $update(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
            Json(payload): Json<CatalogUpdateRequest>,
        ) -> Result<Json<ApiResponse<CatalogEntryDto>>, ApiError> {
            require_staff(&account)?;

            let entry = state
                .store
                .catalog()
                .$repo_update(
                    id,
                    payload.code.as_deref(),
                    payload.name.as_deref(),
                    payload.description.as_deref(),
                    account.id,
                )
                .await?
                .ok_or_else(|| ApiError::not_found($resource, id))?;

            Ok(Json(ApiResponse::success(CatalogEntryDto::from(entry))))
        }

        pub async fn $delete(
            State(state): State<Arc<AppState>>,
            Extension(account): Extension<Account>,
            Path(id): Path<i32>,
        ) -> Result<impl IntoResponse, ApiError> {
            require_staff(&account)?;

            if !state.store.catalog().$repo_delete(id, account.id).await? {
                return Err(ApiError::not_found($resource, id));
            }

            Ok(StatusCode::NO_CONTENT)
        }
    };
}

name_only_handlers!(
    list_cities, create_city, update_city, delete_city,
    list_cities, create_city, update_city, delete_city,
    "City"
);
name_only_handlers!(
    list_specializations, create_specialization, update_specialization, delete_specialization,
    list_specializations, create_specialization, update_specialization, delete_specialization,
    "Specialization"
);
name_only_handlers!(
    list_military_branches, create_military_branch, update_military_branch, delete_military_branch,
    list_military_branches, create_military_branch, update_military_branch, delete_military_branch,
    "Military branch"
);
name_only_handlers!(
    list_ranks, create_rank, update_rank, delete_rank,
    list_ranks, create_rank, update_rank, delete_rank,
    "Rank"
);

coded_handlers!(
    list_application_statuses, create_application_status, update_application_status,
    delete_application_status,
    list_application_statuses, create_application_status, update_application_status,
    delete_application_status,
    "Application status"
);
coded_handlers!(
    list_education_levels, create_education_level, update_education_level, delete_education_level,
    list_education_levels, create_education_level, update_education_level, delete_education_level,
    "Education level"
);
coded_handlers!(
    list_health_statuses, create_health_status, update_health_status, delete_health_status,
    list_health_statuses, create_health_status, update_health_status, delete_health_status,
    "Health status"
);

described_handlers!(
    list_service_types, create_service_type, update_service_type, delete_service_type,
    list_service_types, create_service_type, update_service_type, delete_service_type,
    "Service type"
);
described_handlers!(
    list_advantages, create_advantage, update_advantage, delete_advantage,
    list_advantages, create_advantage, update_advantage, delete_advantage,
    "Advantage"
);

// ============================================================================
// Service type / advantage links
// ============================================================================

/// GET /api/catalog/service-types/{id}/advantages
pub async fn list_service_type_advantages(
    State(state): State<Arc<AppState>>,
    Extension(_account): Extension<Account>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CatalogEntryDto>>>, ApiError> {
    let catalog = state.store.catalog();
    catalog
        .get_service_type(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Service type", id))?;

    let entries = catalog.advantages_for_service_type(id).await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(CatalogEntryDto::from).collect(),
    )))
}

/// PUT /api/catalog/service-types/{id}/advantages/{advantage_id}
pub async fn link_service_type_advantage(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path((id, advantage_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&account)?;

    let catalog = state.store.catalog();
    catalog
        .get_service_type(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Service type", id))?;
    catalog
        .get_advantage(advantage_id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Advantage", advantage_id))?;

    let created = catalog.link_advantage(id, advantage_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::success(()))))
}

/// DELETE /api/catalog/service-types/{id}/advantages/{advantage_id}
pub async fn unlink_service_type_advantage(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Path((id, advantage_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&account)?;

    if !state
        .store
        .catalog()
        .unlink_advantage(id, advantage_id)
        .await?
    {
        return Err(ApiError::NotFound(format!(
            "Service type {id} has no advantage {advantage_id}"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
