use quiz_core::model::{Difficulty, QuizResultRecord, UserId, UserProfile};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn difficulty_from_label(label: &str) -> Result<Difficulty, StorageError> {
    Difficulty::from_label(label)
        .ok_or_else(|| StorageError::Serialization(format!("unknown difficulty: {label}")))
}

pub(crate) fn map_profile_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    let username: String = row.try_get("username").map_err(ser)?;
    let email: String = row.try_get("email").map_err(ser)?;
    let total_score = u32_from_i64(
        "total_score",
        row.try_get::<i64, _>("total_score").map_err(ser)?,
    )?;
    let quiz_count = u32_from_i64(
        "quiz_count",
        row.try_get::<i64, _>("quiz_count").map_err(ser)?,
    )?;

    Ok(UserProfile::from_persisted(
        UserId::new(user_id),
        username,
        email,
        total_score,
        quiz_count,
    ))
}

pub(crate) fn map_result_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<QuizResultRecord, StorageError> {
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total_questions = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;
    let recorded_at = row.try_get("recorded_at").map_err(ser)?;

    QuizResultRecord::new(
        score,
        total_questions,
        difficulty_from_label(&difficulty)?,
        recorded_at,
    )
    .map_err(ser)
}
