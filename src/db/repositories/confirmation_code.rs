use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::confirmation_codes;

/// Validity window for a confirmation code.
pub const CODE_TTL_MINUTES: i64 = 15;

/// What a confirmation code authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Registration,
    PasswordReset,
}

impl CodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::PasswordReset => "password_reset",
        }
    }
}

pub struct ConfirmationCodeRepository {
    conn: DatabaseConnection,
}

impl ConfirmationCodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issue a fresh 6-digit code for the account.
    pub async fn issue(&self, user_id: i32, kind: CodeKind) -> Result<String> {
        let code = generate_code();

        let model = confirmation_codes::ActiveModel {
            user_id: Set(user_id),
            code: Set(code.clone()),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(Utc::now()),
            is_used: Set(false),
            ..Default::default()
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert confirmation code")?;

        Ok(code)
    }

    /// Consume a code, returning the owning user id when it was valid.
    ///
    /// The used-flag flip is a conditional update filtered on `is_used =
    /// false`, and the affected-row count decides the outcome. Two
    /// concurrent attempts can both read the code as unused, but only one
    /// update matches; the loser gets `None`.
    pub async fn consume(&self, code: &str, kind: CodeKind) -> Result<Option<i32>> {
        let cutoff = Utc::now() - Duration::minutes(CODE_TTL_MINUTES);

        let row = confirmation_codes::Entity::find()
            .filter(confirmation_codes::Column::Code.eq(code))
            .filter(confirmation_codes::Column::Kind.eq(kind.as_str()))
            .filter(confirmation_codes::Column::IsUsed.eq(false))
            .filter(confirmation_codes::Column::CreatedAt.gte(cutoff))
            .one(&self.conn)
            .await
            .context("Failed to query confirmation code")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id = row.user_id;
        let result = confirmation_codes::Entity::update_many()
            .col_expr(
                confirmation_codes::Column::IsUsed,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(confirmation_codes::Column::Id.eq(row.id))
            .filter(confirmation_codes::Column::IsUsed.eq(false))
            .exec(&self.conn)
            .await
            .context("Failed to mark confirmation code used")?;

        if result.rows_affected == 0 {
            // Lost the race: someone consumed it between read and write.
            return Ok(None);
        }

        Ok(Some(user_id))
    }
}

fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_kind_round_trip() {
        assert_eq!(CodeKind::Registration.as_str(), "registration");
        assert_eq!(CodeKind::PasswordReset.as_str(), "password_reset");
    }
}
