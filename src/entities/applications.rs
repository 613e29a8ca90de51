use sea_orm::entity::prelude::*;

/// The central aggregate: one citizen's request to serve.
///
/// Owned rows are editable by the owner only while the status is still the
/// initial `new` value; staff may mutate at any time. Deletion is a flip of
/// `exist`, never a physical removal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning account; immutable after creation.
    pub user_id: i32,

    pub service_type_id: i32,

    pub status_id: i32,

    pub full_name: String,

    pub date_of_birth: Date,

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

    /// Conscript certificate on hand (conscription service).
    pub has_conscript_certificate: bool,

    /// Military ID on hand (contract service).
    pub has_military_ticket: bool,

    /// Completed a military faculty (contract service).
    pub has_military_faculty: bool,

    pub current_rank_id: Option<i32>,

    pub preferred_branch_id: Option<i32>,

    pub health_status_id: Option<i32>,

    pub health_comment: String,

    /// Reviewer notes; writable through the staff path only.
    pub admin_comment: String,

    /// National identification number, exactly 12 digits.
    /// Unique across all rows including soft-deleted ones.
    #[sea_orm(unique)]
    pub iin: String,

    pub has_deferment: bool,

    pub deferment_reason: String,

    pub gpa: Option<f64>,

    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub modified_by: Option<i32>,
    pub modified_at: DateTimeUtc,

    pub exist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::service_types::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    ServiceType,
    #[sea_orm(
        belongs_to = "super::application_statuses::Entity",
        from = "Column::StatusId",
        to = "super::application_statuses::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Status,
}

impl Related<super::application_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
