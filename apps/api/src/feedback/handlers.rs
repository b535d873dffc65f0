//! Axum route handlers for the feedback JSON API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generator::{batch_generate, generate_feedback, BatchEntry, BatchResult};
use crate::feedback::scores::ScoreSet;
use crate::feedback::validation::{validate, RawScores};
use crate::models::feedback::FeedbackDetail;
use crate::state::AppState;
use crate::store::{self, NewFeedback};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Flat request body: the five score fields sit beside the name, exactly as
/// the validator expects them.
#[derive(Debug, Deserialize)]
pub struct GenerateFeedbackRequest {
    pub student_name: Option<Value>,
    #[serde(flatten)]
    pub scores: RawScores,
    pub feedback_type: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateFeedbackResponse {
    pub success: bool,
    pub feedback: String,
    pub student_name: String,
    pub scores: ScoreSet,
    pub feedback_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BatchFeedbackRequest {
    pub students: Vec<BatchEntry>,
}

#[derive(Debug, Serialize)]
pub struct BatchResultBody {
    pub student_name: String,
    pub status: &'static str,
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchFeedbackResponse {
    pub success: bool,
    pub results: Vec<BatchResultBody>,
    pub total_processed: usize,
    pub saved_to_database: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub student_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize)]
pub struct ListFeedbackResponse {
    pub success: bool,
    pub feedbacks: Vec<FeedbackDetail>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct GetFeedbackResponse {
    pub success: bool,
    pub feedback: FeedbackDetail,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-feedback
///
/// Validates, generates (with fallback on model failure), persists, and
/// returns the stored record's id alongside the text.
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Json(request): Json<GenerateFeedbackRequest>,
) -> Result<Json<GenerateFeedbackResponse>, AppError> {
    let validated = validate(
        request.student_name.as_ref(),
        &request.scores,
        request.feedback_type.as_ref(),
        state.config.max_name_length,
    )
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let generated = generate_feedback(state.llm.as_ref(), &validated).await;

    let feedback_id = store::insert_feedback(
        &state.db,
        &NewFeedback {
            student_name: &validated.student_name,
            scores: &validated.scores,
            feedback_text: &generated.text,
            model_used: generated.model_used,
        },
    )
    .await?;

    info!(
        "Generated feedback for {} (ID: {feedback_id})",
        validated.student_name
    );

    Ok(Json(GenerateFeedbackResponse {
        success: true,
        feedback: generated.text,
        student_name: validated.student_name,
        scores: validated.scores,
        feedback_id,
    }))
}

/// POST /batch-feedback
///
/// Processes entries independently; per-entry validation failures are
/// reported inline and never abort the batch. Successful entries are
/// persisted; a save failure is logged and only lowers `saved_to_database`.
pub async fn handle_batch_feedback(
    State(state): State<AppState>,
    Json(request): Json<BatchFeedbackRequest>,
) -> Result<Json<BatchFeedbackResponse>, AppError> {
    if request.students.is_empty() {
        return Err(AppError::Validation(
            "students list cannot be empty".to_string(),
        ));
    }
    if request.students.len() > state.config.max_batch_size {
        return Err(AppError::Validation(format!(
            "Maximum {} students allowed per batch request",
            state.config.max_batch_size
        )));
    }

    let results = batch_generate(
        state.llm.as_ref(),
        &request.students,
        state.config.max_name_length,
    )
    .await;

    let mut bodies = Vec::with_capacity(results.len());
    let mut saved = 0usize;

    for result in &results {
        match result {
            BatchResult::Success { request, feedback } => {
                match store::insert_feedback(
                    &state.db,
                    &NewFeedback {
                        student_name: &request.student_name,
                        scores: &request.scores,
                        feedback_text: &feedback.text,
                        model_used: feedback.model_used,
                    },
                )
                .await
                {
                    Ok(_) => saved += 1,
                    Err(e) => {
                        error!("Error saving feedback for {}: {e}", request.student_name);
                    }
                }
                bodies.push(BatchResultBody {
                    student_name: request.student_name.clone(),
                    status: "success",
                    feedback: Some(feedback.text.clone()),
                    error: None,
                });
            }
            BatchResult::Error {
                student_name,
                error,
            } => {
                bodies.push(BatchResultBody {
                    student_name: student_name.clone(),
                    status: "error",
                    feedback: None,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    let total_processed = bodies.len();
    info!("Batch processed {total_processed} entries, saved {saved}");

    Ok(Json(BatchFeedbackResponse {
        success: true,
        results: bodies,
        total_processed,
        saved_to_database: saved,
    }))
}

/// GET /feedback/:id
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetFeedbackResponse>, AppError> {
    let row = store::get_feedback(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {id} not found")))?;

    Ok(Json(GetFeedbackResponse {
        success: true,
        feedback: FeedbackDetail::from(&row),
    }))
}

/// GET /feedback?page=&per_page=&student_name=
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListFeedbackResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(10).clamp(1, 100);
    let name_filter = params
        .student_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let result = store::list_feedback(&state.db, page, per_page, name_filter).await?;

    let pages = (result.total + per_page - 1) / per_page;
    let pagination = Pagination {
        page,
        per_page,
        total: result.total,
        pages,
        has_next: page < pages,
        has_prev: page > 1,
    };

    Ok(Json(ListFeedbackResponse {
        success: true,
        feedbacks: result.items.iter().map(FeedbackDetail::from).collect(),
        pagination,
    }))
}
