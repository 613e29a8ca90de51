use sea_orm::entity::prelude::*;

/// Typed file references attached to an application.
/// Updates only ever append; individual attachments soft-delete on their own.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub application_id: i32,

    /// Storage reference handed over by the upload boundary.
    pub file: String,

    /// resume, photo, diploma, attestat, id_document or conscript_ticket.
    pub attachment_type: Option<String>,

    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub modified_by: Option<i32>,
    pub modified_at: DateTimeUtc,

    pub exist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::applications::Entity",
        from = "Column::ApplicationId",
        to = "super::applications::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Application,
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
