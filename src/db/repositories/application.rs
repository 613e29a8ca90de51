use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::{application_cities, application_statuses, applications, attachments};

/// Who is asking; owners only ever see their own rows.
#[derive(Debug, Clone, Copy)]
pub enum Viewer {
    Staff,
    Owner(i32),
}

pub struct NewAttachment {
    pub file: String,
    pub attachment_type: Option<String>,
}

pub struct NewApplication {
    pub user_id: i32,
    pub service_type_id: i32,
    pub status_id: i32,
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
    pub iin: String,
    pub has_deferment: bool,
    pub deferment_reason: String,
    pub gpa: Option<f64>,
    pub desired_city_ids: Vec<i32>,
    pub attachments: Vec<NewAttachment>,
}

/// Partial update; `None` leaves a field untouched. Nullable columns take a
/// double `Option` so an explicit null can clear them.
#[derive(Default)]
pub struct ApplicationPatch {
    pub service_type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_city_id: Option<Option<i32>>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub education_level_id: Option<Option<i32>>,
    pub specialization_id: Option<Option<i32>>,
    pub graduation_place: Option<String>,
    pub sports_achievements: Option<String>,
    pub height_cm: Option<Option<f64>>,
    pub weight_kg: Option<Option<f64>>,
    pub has_conscript_certificate: Option<bool>,
    pub has_military_ticket: Option<bool>,
    pub has_military_faculty: Option<bool>,
    pub current_rank_id: Option<Option<i32>>,
    pub preferred_branch_id: Option<Option<i32>>,
    pub health_status_id: Option<Option<i32>>,
    pub health_comment: Option<String>,
    pub admin_comment: Option<String>,
    pub has_deferment: Option<bool>,
    pub deferment_reason: Option<String>,
    pub gpa: Option<Option<f64>>,
    pub desired_city_ids: Option<Vec<i32>>,
    pub new_attachments: Vec<NewAttachment>,
}

/// An application together with its child rows and resolved status code.
pub struct ApplicationRecord {
    pub application: applications::Model,
    pub status_code: String,
    pub desired_city_ids: Vec<i32>,
    pub attachments: Vec<attachments::Model>,
}

pub struct ApplicationRepository {
    conn: DatabaseConnection,
}

impl ApplicationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// True when the identification number is already used by another row,
    /// soft-deleted rows included.
    pub async fn iin_taken(&self, iin: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query =
            applications::Entity::find().filter(applications::Column::Iin.eq(iin));
        if let Some(id) = exclude_id {
            query = query.filter(applications::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to count applications by IIN")?;

        Ok(count > 0)
    }

    /// Insert the application with its desired cities and attachments in a
    /// single transaction.
    pub async fn create(&self, new: NewApplication, actor: i32) -> Result<ApplicationRecord> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin application transaction")?;

        let now = Utc::now();
        let model = applications::ActiveModel {
            user_id: Set(new.user_id),
            service_type_id: Set(new.service_type_id),
            status_id: Set(new.status_id),
            full_name: Set(new.full_name),
            date_of_birth: Set(new.date_of_birth),
            email: Set(new.email),
            phone: Set(new.phone),
            birth_city_id: Set(new.birth_city_id),
            address: Set(new.address),
            comment: Set(new.comment),
            education_level_id: Set(new.education_level_id),
            specialization_id: Set(new.specialization_id),
            graduation_place: Set(new.graduation_place),
            sports_achievements: Set(new.sports_achievements),
            height_cm: Set(new.height_cm),
            weight_kg: Set(new.weight_kg),
            has_conscript_certificate: Set(new.has_conscript_certificate),
            has_military_ticket: Set(new.has_military_ticket),
            has_military_faculty: Set(new.has_military_faculty),
            current_rank_id: Set(new.current_rank_id),
            preferred_branch_id: Set(new.preferred_branch_id),
            health_status_id: Set(new.health_status_id),
            health_comment: Set(new.health_comment),
            admin_comment: Set(String::new()),
            iin: Set(new.iin),
            has_deferment: Set(new.has_deferment),
            deferment_reason: Set(new.deferment_reason),
            gpa: Set(new.gpa),
            created_by: Set(Some(actor)),
            created_at: Set(now),
            modified_by: Set(Some(actor)),
            modified_at: Set(now),
            exist: Set(true),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .context("Failed to insert application")?;

        let mut city_ids = new.desired_city_ids;
        city_ids.sort_unstable();
        city_ids.dedup();
        for city_id in &city_ids {
            application_cities::ActiveModel {
                application_id: Set(created.id),
                city_id: Set(*city_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert desired city")?;
        }

        let mut attachment_rows = Vec::with_capacity(new.attachments.len());
        for attachment in new.attachments {
            let row = attachments::ActiveModel {
                application_id: Set(created.id),
                file: Set(attachment.file),
                attachment_type: Set(attachment.attachment_type),
                created_by: Set(Some(actor)),
                created_at: Set(now),
                modified_by: Set(Some(actor)),
                modified_at: Set(now),
                exist: Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert attachment")?;
            attachment_rows.push(row);
        }

        let status_code = application_statuses::Entity::find_by_id(created.status_id)
            .one(&txn)
            .await
            .context("Failed to resolve application status")?
            .map(|s| s.code)
            .unwrap_or_default();

        txn.commit()
            .await
            .context("Failed to commit application transaction")?;

        Ok(ApplicationRecord {
            application: created,
            status_code,
            desired_city_ids: city_ids,
            attachments: attachment_rows,
        })
    }

    pub async fn get(&self, id: i32, include_deleted: bool) -> Result<Option<ApplicationRecord>> {
        let mut query = applications::Entity::find_by_id(id);
        if !include_deleted {
            query = query.filter(applications::Column::Exist.eq(true));
        }

        let Some((application, status)) = query
            .find_also_related(application_statuses::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query application")?
        else {
            return Ok(None);
        };

        let record = self.load_children(application, status).await?;
        Ok(Some(record))
    }

    /// List applications newest-first; owners see only their own.
    pub async fn list(&self, viewer: Viewer, include_deleted: bool) -> Result<Vec<ApplicationRecord>> {
        let mut query =
            applications::Entity::find().order_by_desc(applications::Column::CreatedAt);
        if !include_deleted {
            query = query.filter(applications::Column::Exist.eq(true));
        }

        if let Viewer::Owner(user_id) = viewer {
            query = query.filter(applications::Column::UserId.eq(user_id));
        }

        let rows = query
            .find_also_related(application_statuses::Entity)
            .all(&self.conn)
            .await
            .context("Failed to list applications")?;

        let mut records = Vec::with_capacity(rows.len());
        for (application, status) in rows {
            records.push(self.load_children(application, status).await?);
        }

        Ok(records)
    }

    /// Apply a partial update. City selections are replaced wholesale;
    /// attachments only ever append.
    pub async fn update(
        &self,
        id: i32,
        patch: ApplicationPatch,
        actor: i32,
    ) -> Result<Option<ApplicationRecord>> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin application update")?;

        let Some(row) = applications::Entity::find_by_id(id)
            .filter(applications::Column::Exist.eq(true))
            .one(&txn)
            .await
            .context("Failed to query application for update")?
        else {
            return Ok(None);
        };

        let mut active: applications::ActiveModel = row.into();
        if let Some(v) = patch.service_type_id {
            active.service_type_id = Set(v);
        }
        if let Some(v) = patch.status_id {
            active.status_id = Set(v);
        }
        if let Some(v) = patch.full_name {
            active.full_name = Set(v);
        }
        if let Some(v) = patch.date_of_birth {
            active.date_of_birth = Set(v);
        }
        if let Some(v) = patch.email {
            active.email = Set(v);
        }
        if let Some(v) = patch.phone {
            active.phone = Set(v);
        }
        if let Some(v) = patch.birth_city_id {
            active.birth_city_id = Set(v);
        }
        if let Some(v) = patch.address {
            active.address = Set(v);
        }
        if let Some(v) = patch.comment {
            active.comment = Set(v);
        }
        if let Some(v) = patch.education_level_id {
            active.education_level_id = Set(v);
        }
        if let Some(v) = patch.specialization_id {
            active.specialization_id = Set(v);
        }
        if let Some(v) = patch.graduation_place {
            active.graduation_place = Set(v);
        }
        if let Some(v) = patch.sports_achievements {
            active.sports_achievements = Set(v);
        }
        if let Some(v) = patch.height_cm {
            active.height_cm = Set(v);
        }
        if let Some(v) = patch.weight_kg {
            active.weight_kg = Set(v);
        }
        if let Some(v) = patch.has_conscript_certificate {
            active.has_conscript_certificate = Set(v);
        }
        if let Some(v) = patch.has_military_ticket {
            active.has_military_ticket = Set(v);
        }
        if let Some(v) = patch.has_military_faculty {
            active.has_military_faculty = Set(v);
        }
        if let Some(v) = patch.current_rank_id {
            active.current_rank_id = Set(v);
        }
        if let Some(v) = patch.preferred_branch_id {
            active.preferred_branch_id = Set(v);
        }
        if let Some(v) = patch.health_status_id {
            active.health_status_id = Set(v);
        }
        if let Some(v) = patch.health_comment {
            active.health_comment = Set(v);
        }
        if let Some(v) = patch.admin_comment {
            active.admin_comment = Set(v);
        }
        if let Some(v) = patch.has_deferment {
            active.has_deferment = Set(v);
        }
        if let Some(v) = patch.deferment_reason {
            active.deferment_reason = Set(v);
        }
        if let Some(v) = patch.gpa {
            active.gpa = Set(v);
        }
        active.modified_by = Set(Some(actor));
        active.modified_at = Set(Utc::now());

        let updated = active
            .update(&txn)
            .await
            .context("Failed to update application")?;

        if let Some(city_ids) = patch.desired_city_ids {
            application_cities::Entity::delete_many()
                .filter(application_cities::Column::ApplicationId.eq(id))
                .exec(&txn)
                .await
                .context("Failed to clear desired cities")?;

            let mut city_ids = city_ids;
            city_ids.sort_unstable();
            city_ids.dedup();
            for city_id in city_ids {
                application_cities::ActiveModel {
                    application_id: Set(id),
                    city_id: Set(city_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .context("Failed to insert desired city")?;
            }
        }

        let now = Utc::now();
        for attachment in patch.new_attachments {
            attachments::ActiveModel {
                application_id: Set(id),
                file: Set(attachment.file),
                attachment_type: Set(attachment.attachment_type),
                created_by: Set(Some(actor)),
                created_at: Set(now),
                modified_by: Set(Some(actor)),
                modified_at: Set(now),
                exist: Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert attachment")?;
        }

        txn.commit()
            .await
            .context("Failed to commit application update")?;

        self.get(updated.id, true).await
    }

    /// Flip the `exist` flag; the row stays retrievable via unfiltered reads.
    pub async fn soft_delete(&self, id: i32, actor: i32) -> Result<bool> {
        let Some(row) = applications::Entity::find_by_id(id)
            .filter(applications::Column::Exist.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query application for delete")?
        else {
            return Ok(false);
        };

        let mut active: applications::ActiveModel = row.into();
        active.exist = Set(false);
        active.modified_by = Set(Some(actor));
        active.modified_at = Set(Utc::now());
        active
            .update(&self.conn)
            .await
            .context("Failed to soft-delete application")?;

        Ok(true)
    }

    /// Move every live application in `ids` to the given status, returning
    /// how many rows actually changed. Missing or deleted ids are skipped
    /// silently; the count tells the caller.
    pub async fn bulk_update_status(
        &self,
        ids: &[i32],
        status_id: i32,
        comment: Option<&str>,
        actor: i32,
    ) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut update = applications::Entity::update_many().col_expr(
            applications::Column::StatusId,
            sea_orm::sea_query::Expr::value(status_id),
        );
        if let Some(comment) = comment {
            update = update.col_expr(
                applications::Column::AdminComment,
                sea_orm::sea_query::Expr::value(comment),
            );
        }

        let result = update
            .col_expr(
                applications::Column::ModifiedBy,
                sea_orm::sea_query::Expr::value(Some(actor)),
            )
            .col_expr(
                applications::Column::ModifiedAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .filter(applications::Column::Id.is_in(ids.iter().copied()))
            .filter(applications::Column::Exist.eq(true))
            .exec(&self.conn)
            .await
            .context("Failed to bulk-update application statuses")?;

        Ok(result.rows_affected)
    }

    async fn load_children(
        &self,
        application: applications::Model,
        status: Option<application_statuses::Model>,
    ) -> Result<ApplicationRecord> {
        let desired_city_ids = application_cities::Entity::find()
            .filter(application_cities::Column::ApplicationId.eq(application.id))
            .order_by_asc(application_cities::Column::CityId)
            .all(&self.conn)
            .await
            .context("Failed to load desired cities")?
            .into_iter()
            .map(|row| row.city_id)
            .collect();

        let attachment_rows = attachments::Entity::find()
            .filter(attachments::Column::ApplicationId.eq(application.id))
            .filter(attachments::Column::Exist.eq(true))
            .order_by_asc(attachments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load attachments")?;

        Ok(ApplicationRecord {
            application,
            status_code: status.map(|s| s.code).unwrap_or_default(),
            desired_city_ids,
            attachments: attachment_rows,
        })
    }
}
