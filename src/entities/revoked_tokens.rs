use sea_orm::entity::prelude::*;

/// Revocation list for refresh tokens. A refresh token presented after its
/// `jti` lands here is rejected even though its signature is still valid.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "revoked_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub jti: String,

    /// Expiry of the underlying token; rows past this point are prunable.
    pub expires_at: DateTimeUtc,

    pub revoked_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
