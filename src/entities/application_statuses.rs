use sea_orm::entity::prelude::*;

/// Review states an application moves through. The `new` row seeded by the
/// initial migration is the only state in which the owner may edit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "application_statuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub modified_by: Option<i32>,
    pub modified_at: DateTimeUtc,

    pub exist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
