use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

use crate::entities::revoked_tokens;

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record a refresh token as revoked until it expires on its own.
    /// Idempotent: revoking an already-revoked token is a no-op.
    pub async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let model = revoked_tokens::ActiveModel {
            jti: Set(jti.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = revoked_tokens::Entity::insert(model)
            .on_conflict(
                OnConflict::column(revoked_tokens::Column::Jti)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e).context("Failed to insert revoked token"),
        }
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let count = revoked_tokens::Entity::find()
            .filter(revoked_tokens::Column::Jti.eq(jti))
            .count(&self.conn)
            .await
            .context("Failed to query revoked token")?;

        Ok(count > 0)
    }

    /// Drop revocation rows whose tokens have expired anyway.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = revoked_tokens::Entity::delete_many()
            .filter(revoked_tokens::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.conn)
            .await
            .context("Failed to purge expired revoked tokens")?;

        Ok(result.rows_affected)
    }
}
