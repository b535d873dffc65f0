use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::feedback::scores::ScoreSet;

/// A persisted feedback record. Immutable after insert.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub student_name: String,
    pub communication: i32,
    pub teamwork: i32,
    pub creativity: i32,
    pub critical_thinking: i32,
    pub presentation: i32,
    pub feedback_text: String,
    pub model_used: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRow {
    pub fn scores(&self) -> ScoreSet {
        ScoreSet {
            communication: self.communication,
            teamwork: self.teamwork,
            creativity: self.creativity,
            critical_thinking: self.critical_thinking,
            presentation: self.presentation,
        }
    }
}

/// API projection of a feedback record, with scores nested under one key.
#[derive(Debug, Serialize)]
pub struct FeedbackDetail {
    pub id: Uuid,
    pub student_name: String,
    pub scores: ScoreSet,
    pub feedback_text: String,
    pub created_at: DateTime<Utc>,
    pub model_used: String,
}

impl From<&FeedbackRow> for FeedbackDetail {
    fn from(row: &FeedbackRow) -> Self {
        FeedbackDetail {
            id: row.id,
            student_name: row.student_name.clone(),
            scores: row.scores(),
            feedback_text: row.feedback_text.clone(),
            created_at: row.created_at,
            model_used: row.model_used.clone(),
        }
    }
}
