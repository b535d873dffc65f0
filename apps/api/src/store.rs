//! Persistence gateway for feedback records.
//!
//! Each record is an independent unit of work; inserts are atomic and there
//! are no cross-record invariants, so no transactions span multiple records.

use sqlx::PgPool;
use uuid::Uuid;

use crate::feedback::scores::ScoreSet;
use crate::models::feedback::FeedbackRow;

/// A record ready for insertion.
#[derive(Debug)]
pub struct NewFeedback<'a> {
    pub student_name: &'a str,
    pub scores: &'a ScoreSet,
    pub feedback_text: &'a str,
    pub model_used: &'a str,
}

/// Inserts one feedback record and returns its id.
pub async fn insert_feedback(pool: &PgPool, record: &NewFeedback<'_>) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO feedback
            (id, student_name, communication, teamwork, creativity,
             critical_thinking, presentation, feedback_text, model_used)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(record.student_name)
    .bind(record.scores.communication)
    .bind(record.scores.teamwork)
    .bind(record.scores.creativity)
    .bind(record.scores.critical_thinking)
    .bind(record.scores.presentation)
    .bind(record.feedback_text)
    .bind(record.model_used)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn get_feedback(pool: &PgPool, id: Uuid) -> Result<Option<FeedbackRow>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackRow>("SELECT * FROM feedback WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// One page of feedback records plus the unpaged total.
#[derive(Debug)]
pub struct FeedbackPage {
    pub items: Vec<FeedbackRow>,
    pub total: i64,
}

/// Lists feedback records ordered by creation time, newest first, with an
/// optional case-insensitive substring filter on the student name.
pub async fn list_feedback(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    student_name: Option<&str>,
) -> Result<FeedbackPage, sqlx::Error> {
    let offset = (page - 1) * per_page;

    let (items, total) = match student_name {
        Some(name) => {
            let pattern = format!("%{name}%");
            let items = sqlx::query_as::<_, FeedbackRow>(
                r#"
                SELECT * FROM feedback
                WHERE student_name ILIKE $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(&pattern)
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE student_name ILIKE $1")
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await?;
            (items, total)
        }
        None => {
            let items = sqlx::query_as::<_, FeedbackRow>(
                "SELECT * FROM feedback ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
                .fetch_one(pool)
                .await?;
            (items, total)
        }
    };

    Ok(FeedbackPage { items, total })
}
