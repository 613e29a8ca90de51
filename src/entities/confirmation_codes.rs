use sea_orm::entity::prelude::*;

/// One-time codes for confirming registration and resetting passwords.
///
/// A code is valid iff it is unused, at most 15 minutes old, and its kind
/// matches the requested operation. Consumption flips `is_used` with an
/// atomic conditional update so a code can never be redeemed twice.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "confirmation_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    /// Six decimal digits.
    pub code: String,

    /// `registration` or `password_reset`.
    pub kind: String,

    pub created_at: DateTimeUtc,

    pub is_used: bool,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
