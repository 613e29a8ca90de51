use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{
    advantages, application_statuses, cities, education_levels, health_statuses,
    military_branches, ranks, service_type_advantages, service_types, specializations,
};

/// Uniform row shape for the reference tables. `code` and `description`
/// stay `None` for tables that do not carry them.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: i32,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub exist: bool,
}

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

/// Tables with only a `name` column besides the audit stamps.
macro_rules! name_only_catalog {
    ($module:ident, $list:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        pub async fn $list(&self, include_deleted: bool) -> Result<Vec<CatalogEntry>> {
            let mut query = $module::Entity::find().order_by_asc($module::Column::Name);
            if !include_deleted {
                query = query.filter($module::Column::Exist.eq(true));
            }
            let rows = query
                .all(&self.conn)
                .await
                .context(concat!("Failed to list ", stringify!($module)))?;

            Ok(rows
                .into_iter()
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: None,
                    name: m.name,
                    description: None,
                    exist: m.exist,
                })
                .collect())
        }

        pub async fn $get(&self, id: i32, include_deleted: bool) -> Result<Option<CatalogEntry>> {
            let row = $module::Entity::find_by_id(id)
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " by ID"))?;

            Ok(row
                .filter(|m| include_deleted || m.exist)
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: None,
                    name: m.name,
                    description: None,
                    exist: m.exist,
                }))
        }

        pub async fn $create(&self, name: &str, actor: i32) -> Result<CatalogEntry> {
            let now = Utc::now();
            let model = $module::ActiveModel {
                name: Set(name.to_string()),
                created_by: Set(Some(actor)),
                created_at: Set(now),
                modified_by: Set(Some(actor)),
                modified_at: Set(now),
                exist: Set(true),
                ..Default::default()
            };

            let created = model
                .insert(&self.conn)
                .await
                .context(concat!("Failed to insert ", stringify!($module)))?;

            Ok(CatalogEntry {
                id: created.id,
                code: None,
                name: created.name,
                description: None,
                exist: created.exist,
            })
        }

        pub async fn $update(
            &self,
            id: i32,
            name: Option<&str>,
            actor: i32,
        ) -> Result<Option<CatalogEntry>> {
            let Some(row) = $module::Entity::find_by_id(id)
                .filter($module::Column::Exist.eq(true))
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " for update"))?
            else {
                return Ok(None);
            };

            let mut active: $module::ActiveModel = row.into();
            if let Some(name) = name {
                active.name = Set(name.to_string());
            }
            active.modified_by = Set(Some(actor));
            active.modified_at = Set(Utc::now());

            let updated = active
                .update(&self.conn)
                .await
                .context(concat!("Failed to update ", stringify!($module)))?;

            Ok(Some(CatalogEntry {
                id: updated.id,
                code: None,
                name: updated.name,
                description: None,
                exist: updated.exist,
            }))
        }

        pub async fn $delete(&self, id: i32, actor: i32) -> Result<bool> {
            soft_delete!(self, $module, id, actor)
        }
    };
}

/// Tables with a unique `code` alongside `name`.
macro_rules! coded_catalog {
    ($module:ident, $list:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        pub async fn $list(&self, include_deleted: bool) -> Result<Vec<CatalogEntry>> {
            let mut query = $module::Entity::find().order_by_asc($module::Column::Name);
            if !include_deleted {
                query = query.filter($module::Column::Exist.eq(true));
            }
            let rows = query
                .all(&self.conn)
                .await
                .context(concat!("Failed to list ", stringify!($module)))?;

            Ok(rows
                .into_iter()
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: Some(m.code),
                    name: m.name,
                    description: None,
                    exist: m.exist,
                })
                .collect())
        }

        pub async fn $get(&self, id: i32, include_deleted: bool) -> Result<Option<CatalogEntry>> {
            let row = $module::Entity::find_by_id(id)
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " by ID"))?;

            Ok(row
                .filter(|m| include_deleted || m.exist)
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: Some(m.code),
                    name: m.name,
                    description: None,
                    exist: m.exist,
                }))
        }

        pub async fn $create(&self, code: &str, name: &str, actor: i32) -> Result<CatalogEntry> {
            let now = Utc::now();
            let model = $module::ActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                created_by: Set(Some(actor)),
                created_at: Set(now),
                modified_by: Set(Some(actor)),
                modified_at: Set(now),
                exist: Set(true),
                ..Default::default()
            };

            let created = model
                .insert(&self.conn)
                .await
                .context(concat!("Failed to insert ", stringify!($module)))?;

            Ok(CatalogEntry {
                id: created.id,
                code: Some(created.code),
                name: created.name,
                description: None,
                exist: created.exist,
            })
        }

        pub async fn $update(
            &self,
            id: i32,
            code: Option<&str>,
            name: Option<&str>,
            actor: i32,
        ) -> Result<Option<CatalogEntry>> {
            let Some(row) = $module::Entity::find_by_id(id)
                .filter($module::Column::Exist.eq(true))
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " for update"))?
            else {
                return Ok(None);
            };

            let mut active: $module::ActiveModel = row.into();
            if let Some(code) = code {
                active.code = Set(code.to_string());
            }
            if let Some(name) = name {
                active.name = Set(name.to_string());
            }
            active.modified_by = Set(Some(actor));
            active.modified_at = Set(Utc::now());

            let updated = active
                .update(&self.conn)
                .await
                .context(concat!("Failed to update ", stringify!($module)))?;

            Ok(Some(CatalogEntry {
                id: updated.id,
                code: Some(updated.code),
                name: updated.name,
                description: None,
                exist: updated.exist,
            }))
        }

        pub async fn $delete(&self, id: i32, actor: i32) -> Result<bool> {
            soft_delete!(self, $module, id, actor)
        }
    };
}

/// Tables with `code`, `name` and a free-text `description`.
macro_rules! described_catalog {
    ($module:ident, $list:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        pub async fn $list(&self, include_deleted: bool) -> Result<Vec<CatalogEntry>> {
            let mut query = $module::Entity::find().order_by_asc($module::Column::Name);
            if !include_deleted {
                query = query.filter($module::Column::Exist.eq(true));
            }
            let rows = query
                .all(&self.conn)
                .await
                .context(concat!("Failed to list ", stringify!($module)))?;

            Ok(rows
                .into_iter()
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: Some(m.code),
                    name: m.name,
                    description: Some(m.description),
                    exist: m.exist,
                })
                .collect())
        }

        pub async fn $get(&self, id: i32, include_deleted: bool) -> Result<Option<CatalogEntry>> {
            let row = $module::Entity::find_by_id(id)
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " by ID"))?;

            Ok(row
                .filter(|m| include_deleted || m.exist)
                .map(|m| CatalogEntry {
                    id: m.id,
                    code: Some(m.code),
                    name: m.name,
                    description: Some(m.description),
                    exist: m.exist,
                }))
        }

        pub async fn $create(
            &self,
            code: &str,
            name: &str,
            description: &str,
            actor: i32,
        ) -> Result<CatalogEntry> {
            let now = Utc::now();
            let model = $module::ActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                description: Set(description.to_string()),
                created_by: Set(Some(actor)),
                created_at: Set(now),
                modified_by: Set(Some(actor)),
                modified_at: Set(now),
                exist: Set(true),
                ..Default::default()
            };

            let created = model
                .insert(&self.conn)
                .await
                .context(concat!("Failed to insert ", stringify!($module)))?;

            Ok(CatalogEntry {
                id: created.id,
                code: Some(created.code),
                name: created.name,
                description: Some(created.description),
                exist: created.exist,
            })
        }

        pub async fn $update(
            &self,
            id: i32,
            code: Option<&str>,
            name: Option<&str>,
            description: Option<&str>,
            actor: i32,
        ) -> Result<Option<CatalogEntry>> {
            let Some(row) = $module::Entity::find_by_id(id)
                .filter($module::Column::Exist.eq(true))
                .one(&self.conn)
                .await
                .context(concat!("Failed to get ", stringify!($module), " for update"))?
            else {
                return Ok(None);
            };

            let mut active: $module::ActiveModel = row.into();
            if let Some(code) = code {
                active.code = Set(code.to_string());
            }
            if let Some(name) = name {
                active.name = Set(name.to_string());
            }
            if let Some(description) = description {
                active.description = Set(description.to_string());
            }
            active.modified_by = Set(Some(actor));
            active.modified_at = Set(Utc::now());

            let updated = active
                .update(&self.conn)
                .await
                .context(concat!("Failed to update ", stringify!($module)))?;

            Ok(Some(CatalogEntry {
                id: updated.id,
                code: Some(updated.code),
                name: updated.name,
                description: Some(updated.description),
                exist: updated.exist,
            }))
        }

        pub async fn $delete(&self, id: i32, actor: i32) -> Result<bool> {
            soft_delete!(self, $module, id, actor)
        }
    };
}

/// Soft delete: flip `exist` to false and re-stamp the modified fields.
macro_rules! soft_delete {
    ($self:ident, $module:ident, $id:expr, $actor:expr) => {{
        let Some(row) = $module::Entity::find_by_id($id)
            .filter($module::Column::Exist.eq(true))
            .one(&$self.conn)
            .await
            .context(concat!("Failed to get ", stringify!($module), " for delete"))?
        else {
            return Ok(false);
        };

        let mut active: $module::ActiveModel = row.into();
        active.exist = Set(false);
        active.modified_by = Set(Some($actor));
        active.modified_at = Set(Utc::now());
        active
            .update(&$self.conn)
            .await
            .context(concat!("Failed to soft-delete ", stringify!($module)))?;

        Ok(true)
    }};
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    name_only_catalog!(cities, list_cities, get_city, create_city, update_city, delete_city);
    name_only_catalog!(
        specializations,
        list_specializations,
        get_specialization,
        create_specialization,
        update_specialization,
        delete_specialization
    );
    name_only_catalog!(
        military_branches,
        list_military_branches,
        get_military_branch,
        create_military_branch,
        update_military_branch,
        delete_military_branch
    );
    name_only_catalog!(ranks, list_ranks, get_rank, create_rank, update_rank, delete_rank);

    coded_catalog!(
        application_statuses,
        list_application_statuses,
        get_application_status,
        create_application_status,
        update_application_status,
        delete_application_status
    );
    coded_catalog!(
        education_levels,
        list_education_levels,
        get_education_level,
        create_education_level,
        update_education_level,
        delete_education_level
    );
    coded_catalog!(
        health_statuses,
        list_health_statuses,
        get_health_status,
        create_health_status,
        update_health_status,
        delete_health_status
    );

    described_catalog!(
        service_types,
        list_service_types,
        get_service_type,
        create_service_type,
        update_service_type,
        delete_service_type
    );
    described_catalog!(
        advantages,
        list_advantages,
        get_advantage,
        create_advantage,
        update_advantage,
        delete_advantage
    );

    /// Resolve a status code to its row id; review states are looked up by
    /// code everywhere so renames do not break the state machine.
    pub async fn status_id_by_code(&self, code: &str) -> Result<Option<i32>> {
        let row = application_statuses::Entity::find()
            .filter(application_statuses::Column::Code.eq(code))
            .filter(application_statuses::Column::Exist.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to resolve status code")?;

        Ok(row.map(|m| m.id))
    }

    pub async fn service_type_id_by_code(&self, code: &str) -> Result<Option<i32>> {
        let row = service_types::Entity::find()
            .filter(service_types::Column::Code.eq(code))
            .filter(service_types::Column::Exist.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to resolve service type code")?;

        Ok(row.map(|m| m.id))
    }

    /// Link an advantage to a service type. Returns false when the pair
    /// already exists; the unique index makes duplicates impossible either
    /// way.
    pub async fn link_advantage(&self, service_type_id: i32, advantage_id: i32) -> Result<bool> {
        let existing = service_type_advantages::Entity::find()
            .filter(service_type_advantages::Column::ServiceTypeId.eq(service_type_id))
            .filter(service_type_advantages::Column::AdvantageId.eq(advantage_id))
            .one(&self.conn)
            .await
            .context("Failed to query service type advantage link")?;

        if existing.is_some() {
            return Ok(false);
        }

        service_type_advantages::ActiveModel {
            service_type_id: Set(service_type_id),
            advantage_id: Set(advantage_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to link advantage to service type")?;

        Ok(true)
    }

    pub async fn unlink_advantage(&self, service_type_id: i32, advantage_id: i32) -> Result<bool> {
        let result = service_type_advantages::Entity::delete_many()
            .filter(service_type_advantages::Column::ServiceTypeId.eq(service_type_id))
            .filter(service_type_advantages::Column::AdvantageId.eq(advantage_id))
            .exec(&self.conn)
            .await
            .context("Failed to unlink advantage from service type")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn advantages_for_service_type(
        &self,
        service_type_id: i32,
    ) -> Result<Vec<CatalogEntry>> {
        let links = service_type_advantages::Entity::find()
            .filter(service_type_advantages::Column::ServiceTypeId.eq(service_type_id))
            .all(&self.conn)
            .await
            .context("Failed to list service type advantage links")?;

        let ids: Vec<i32> = links.into_iter().map(|l| l.advantage_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = advantages::Entity::find()
            .filter(advantages::Column::Id.is_in(ids))
            .filter(advantages::Column::Exist.eq(true))
            .order_by_asc(advantages::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to load linked advantages")?;

        Ok(rows
            .into_iter()
            .map(|m| CatalogEntry {
                id: m.id,
                code: Some(m.code),
                name: m.name,
                description: Some(m.description),
                exist: m.exist,
            })
            .collect())
    }
}
