use quiz_core::model::{LeaderboardEntry, QuizResultRecord, UserId, UserProfile};
use sqlx::Row;

use super::{
    SqliteRepository,
    mapping::{map_profile_row, map_result_row, ser, u32_from_i64},
};
use crate::repository::{ScoreRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ScoreRepository for SqliteRepository {
    async fn record_result(
        &self,
        user_id: &UserId,
        result: &QuizResultRecord,
    ) -> Result<i64, StorageError> {
        // History insert and profile update commit together or not at all.
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let updated = sqlx::query(
            r"
                UPDATE users
                SET total_score = total_score + ?1,
                    quiz_count = quiz_count + 1
                WHERE user_id = ?2
            ",
        )
        .bind(i64::from(result.score()))
        .bind(user_id.value())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if updated.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        let inserted = sqlx::query(
            r"
                INSERT INTO quiz_results (user_id, score, total_questions, difficulty, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(user_id.value())
        .bind(i64::from(result.score()))
        .bind(i64::from(result.total_questions()))
        .bind(result.difficulty().as_str())
        .bind(result.recorded_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        let id = inserted.last_insert_rowid();
        tx.commit().await.map_err(conn)?;
        Ok(id)
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT username, total_score, quiz_count
                FROM users
                ORDER BY total_score DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(LeaderboardEntry {
                username: row.try_get("username").map_err(ser)?,
                total_score: u32_from_i64(
                    "total_score",
                    row.try_get::<i64, _>("total_score").map_err(ser)?,
                )?,
                quiz_count: u32_from_i64(
                    "quiz_count",
                    row.try_get::<i64, _>("quiz_count").map_err(ser)?,
                )?,
            });
        }
        Ok(out)
    }

    async fn user_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<QuizResultRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT score, total_questions, difficulty, recorded_at
                FROM quiz_results
                WHERE user_id = ?1
                ORDER BY recorded_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(user_id.value())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id, email, username, total_score, quiz_count
                FROM users
                WHERE user_id = ?1
            ",
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => Ok(Some(map_profile_row(&row)?)),
            None => Ok(None),
        }
    }
}
