use sea_orm::entity::prelude::*;

/// Link table between service types and advantages.
/// The (service_type_id, advantage_id) pair is unique (index in migration).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_type_advantages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service_type_id: i32,

    pub advantage_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_types::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ServiceType,
    #[sea_orm(
        belongs_to = "super::advantages::Entity",
        from = "Column::AdvantageId",
        to = "super::advantages::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Advantage,
}

impl ActiveModelBehavior for ActiveModel {}
