use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Phone in `+7XXXXXXXXXX` format, validated at the API boundary.
    #[sea_orm(unique)]
    pub phone: String,

    pub first_name: String,

    pub last_name: String,

    pub birth_city_id: Option<i32>,

    /// Argon2id password hash
    pub password_hash: String,

    /// False until the registration code is confirmed.
    pub is_active: bool,

    /// Staff accounts bypass per-object ownership checks.
    pub is_staff: bool,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::BirthCityId",
        to = "super::cities::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    BirthCity,
}

impl ActiveModelBehavior for ActiveModel {}
