use chrono::Utc;
use quiz_core::model::UserProfile;
use sqlx::Row;

use super::{SqliteRepository, mapping::ser};
use crate::repository::{AccountRecord, AccountRepository, NewAccount, StorageError};

fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<UserProfile, StorageError> {
        sqlx::query(
            r"
                INSERT INTO users (user_id, email, username, password_hash, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(account.user_id.value())
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(UserProfile::new(
            account.user_id.clone(),
            account.username.clone(),
            account.email.clone(),
        ))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id, email, username, password_hash, total_score, quiz_count
                FROM users
                WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => {
                let password_hash: String = row.try_get("password_hash").map_err(ser)?;
                let profile = super::mapping::map_profile_row(&row)?;
                Ok(Some(AccountRecord {
                    profile,
                    password_hash,
                }))
            }
            None => Ok(None),
        }
    }
}
