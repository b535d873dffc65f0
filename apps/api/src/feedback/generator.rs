//! Feedback generation pipeline.
//!
//! Flow per request: validate → analyze → build prompt → completion call →
//! post-process. A failed completion call is absorbed by a deterministic
//! fallback keyed on the mean score, so generation never fails once input
//! has passed validation. Batch entries are processed independently and
//! results preserve input order.

use serde_json::Value;
use tracing::{info, warn};

use crate::feedback::analysis::analyze;
use crate::feedback::prompts::{build_prompt, FeedbackType};
use crate::feedback::validation::{validate, RawScores, ValidatedRequest, ValidationError};
use crate::llm_client::CompletionClient;

const COMPREHENSIVE_MAX_TOKENS: u32 = 300;
const BRIEF_MAX_TOKENS: u32 = 150;

/// Model identifier recorded when the deterministic fallback produced the text.
pub const FALLBACK_MODEL: &str = "fallback";

/// Name placeholder for batch entries whose `student_name` is unusable.
const UNKNOWN_STUDENT: &str = "Unknown";

/// The outcome of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedFeedback {
    pub text: String,
    /// `MODEL` on success, `FALLBACK_MODEL` when the completion call failed.
    pub model_used: &'static str,
}

/// Generates feedback text for a validated request.
///
/// Infallible by contract: any completion failure (network, quota,
/// malformed response) selects the fallback branch instead of propagating.
pub async fn generate_feedback(
    llm: &dyn CompletionClient,
    request: &ValidatedRequest,
) -> GeneratedFeedback {
    let analysis = analyze(&request.scores);
    let prompt = build_prompt(
        &request.student_name,
        &request.scores,
        &analysis,
        request.feedback_type,
    );
    let max_tokens = match request.feedback_type {
        FeedbackType::Comprehensive => COMPREHENSIVE_MAX_TOKENS,
        FeedbackType::Brief => BRIEF_MAX_TOKENS,
    };

    match llm.complete(prompt.system, &prompt.user, max_tokens).await {
        Ok(text) => {
            info!("Generated feedback for {}", request.student_name);
            GeneratedFeedback {
                text: post_process(&text, &request.student_name),
                model_used: llm.model(),
            }
        }
        Err(e) => {
            warn!(
                "Completion call failed for {} ({e}); using fallback feedback",
                request.student_name
            );
            GeneratedFeedback {
                text: fallback_feedback(&request.student_name, analysis.average_score),
                model_used: FALLBACK_MODEL,
            }
        }
    }
}

/// Ensures the student's name appears in the text and that it ends with
/// terminal punctuation.
fn post_process(text: &str, student_name: &str) -> String {
    let mut feedback = text.trim().to_string();
    if !feedback.contains(student_name) {
        feedback = format!("{student_name}, {}", feedback.to_lowercase());
    }
    if !feedback.ends_with(['.', '!', '?']) {
        feedback.push('.');
    }
    feedback
}

/// Deterministic feedback used when the completion call fails.
/// Depends only on the mean score; boundaries at 8.0 and 6.0, both inclusive.
fn fallback_feedback(student_name: &str, average_score: f64) -> String {
    if average_score >= 8.0 {
        format!(
            "{student_name} demonstrates excellent performance across all areas with an average \
            score of {average_score:.1}/10. Continue maintaining this high standard of work."
        )
    } else if average_score >= 6.0 {
        format!(
            "{student_name} shows good performance with an average score of \
            {average_score:.1}/10. Focus on strengthening weaker areas to achieve excellence."
        )
    } else {
        format!(
            "{student_name} has room for improvement with an average score of \
            {average_score:.1}/10. Consider additional practice and support in key skill areas."
        )
    }
}

/// One student entry of a batch request. Fields stay loosely typed so a
/// malformed entry becomes a per-entry error instead of failing the batch.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BatchEntry {
    pub student_name: Option<Value>,
    pub scores: Option<RawScores>,
    pub feedback_type: Option<Value>,
}

/// Per-entry batch outcome, in input order.
#[derive(Debug)]
pub enum BatchResult {
    Success {
        request: ValidatedRequest,
        feedback: GeneratedFeedback,
    },
    Error {
        student_name: String,
        error: ValidationError,
    },
}

/// Generates feedback for each batch entry independently. One entry's
/// failure never aborts its siblings; output order matches input order.
pub async fn batch_generate(
    llm: &dyn CompletionClient,
    entries: &[BatchEntry],
    max_name_length: usize,
) -> Vec<BatchResult> {
    let mut results = Vec::with_capacity(entries.len());

    for entry in entries {
        let scores = entry.scores.clone().unwrap_or_default();
        match validate(
            entry.student_name.as_ref(),
            &scores,
            entry.feedback_type.as_ref(),
            max_name_length,
        ) {
            Ok(request) => {
                let feedback = generate_feedback(llm, &request).await;
                results.push(BatchResult::Success { request, feedback });
            }
            Err(error) => {
                results.push(BatchResult::Error {
                    student_name: entry_display_name(entry.student_name.as_ref()),
                    error,
                });
            }
        }
    }

    results
}

fn entry_display_name(name: Option<&Value>) -> String {
    name.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_STUDENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::scores::ScoreSet;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always fails, simulating an unreachable completion API.
    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        fn model(&self) -> &'static str {
            "stub"
        }

        async fn complete(&self, _: &str, _: &str, _: u32) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }

    /// Returns a canned completion and counts invocations.
    struct CannedClient {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        fn model(&self) -> &'static str {
            "stub"
        }

        async fn complete(&self, _: &str, _: &str, _: u32) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    fn request(name: &str, scores: ScoreSet) -> ValidatedRequest {
        ValidatedRequest {
            student_name: name.to_string(),
            scores,
            feedback_type: FeedbackType::Comprehensive,
        }
    }

    fn uniform(score: i32) -> ScoreSet {
        ScoreSet {
            communication: score,
            teamwork: score,
            creativity: score,
            critical_thinking: score,
            presentation: score,
        }
    }

    #[tokio::test]
    async fn test_fallback_on_model_failure_matches_excellent_template() {
        let out = generate_feedback(&FailingClient, &request("Asha", uniform(9))).await;

        assert_eq!(out.model_used, FALLBACK_MODEL);
        assert!(out.text.contains("Asha"));
        assert!(out.text.ends_with('.'));
        assert!(out.text.contains("excellent performance"));
        assert!(out.text.contains("average score of 9.0/10"));
        assert!(out.text.contains("Continue maintaining"));
    }

    #[tokio::test]
    async fn test_fallback_tiers_and_boundaries() {
        // mean exactly 8.0 -> excellent
        let out = generate_feedback(&FailingClient, &request("Ben", uniform(8))).await;
        assert!(out.text.contains("excellent performance"));

        // mean 7.0 -> good
        let out = generate_feedback(&FailingClient, &request("Ben", uniform(7))).await;
        assert!(out.text.contains("shows good performance"));
        assert!(out.text.contains("strengthening weaker areas"));

        // mean exactly 6.0 -> good
        let out = generate_feedback(&FailingClient, &request("Ben", uniform(6))).await;
        assert!(out.text.contains("shows good performance"));

        // mean 5.0 -> room for improvement
        let out = generate_feedback(&FailingClient, &request("Ben", uniform(5))).await;
        assert!(out.text.contains("room for improvement"));
        assert!(out.text.contains("average score of 5.0/10"));
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic() {
        let req = request("Mira", uniform(4));
        let a = generate_feedback(&FailingClient, &req).await;
        let b = generate_feedback(&FailingClient, &req).await;
        assert_eq!(a.text, b.text);
    }

    #[tokio::test]
    async fn test_success_path_records_model_and_post_processes() {
        let client = CannedClient::new("Asha, your teamwork stands out");
        let out = generate_feedback(&client, &request("Asha", uniform(7))).await;

        assert_eq!(out.model_used, "stub");
        assert_eq!(out.text, "Asha, your teamwork stands out.");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_post_process_prepends_missing_name() {
        let client = CannedClient::new("Your Teamwork Stands Out!");
        let out = generate_feedback(&client, &request("Asha", uniform(7))).await;

        // Name absent from the model text: prepend it and lower-case the rest.
        assert_eq!(out.text, "Asha, your teamwork stands out!");
    }

    #[test]
    fn test_post_process_keeps_terminal_punctuation() {
        assert_eq!(post_process("Asha did well", "Asha"), "Asha did well.");
        assert_eq!(post_process("Asha did well!", "Asha"), "Asha did well!");
        assert_eq!(post_process("Did Asha do well?", "Asha"), "Did Asha do well?");
    }

    fn batch_entry(name: Option<Value>, score: Value) -> BatchEntry {
        BatchEntry {
            student_name: name,
            scores: Some(RawScores {
                communication: Some(score.clone()),
                teamwork: Some(score.clone()),
                creativity: Some(score.clone()),
                critical_thinking: Some(score.clone()),
                presentation: Some(score),
            }),
            feedback_type: None,
        }
    }

    #[tokio::test]
    async fn test_batch_reports_per_entry_errors_in_order() {
        let entries = vec![
            batch_entry(Some(json!("Asha")), json!(9)),
            batch_entry(Some(json!("Ben")), json!(0)),
            batch_entry(Some(json!("Mira")), json!(6)),
        ];

        let results = batch_generate(&FailingClient, &entries, 100).await;
        assert_eq!(results.len(), 3);

        match &results[0] {
            BatchResult::Success { request, feedback } => {
                assert_eq!(request.student_name, "Asha");
                assert!(feedback.text.contains("Asha"));
            }
            other => panic!("expected success for entry 1, got {other:?}"),
        }
        match &results[1] {
            BatchResult::Error {
                student_name,
                error,
            } => {
                assert_eq!(student_name, "Ben");
                assert_eq!(
                    *error,
                    ValidationError::OutOfRange {
                        field: "communication",
                        value: 0
                    }
                );
            }
            other => panic!("expected error for entry 2, got {other:?}"),
        }
        match &results[2] {
            BatchResult::Success { request, .. } => assert_eq!(request.student_name, "Mira"),
            other => panic!("expected success for entry 3, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_invalid_entry_never_reaches_the_model() {
        let client = CannedClient::new("ok");
        let entries = vec![batch_entry(Some(json!("Ben")), json!(12))];

        let results = batch_generate(&client, &entries, 100).await;
        assert!(matches!(results[0], BatchResult::Error { .. }));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_missing_name_reported_as_unknown() {
        let entries = vec![batch_entry(None, json!(7))];
        let results = batch_generate(&FailingClient, &entries, 100).await;

        match &results[0] {
            BatchResult::Error {
                student_name,
                error,
            } => {
                assert_eq!(student_name, "Unknown");
                assert_eq!(*error, ValidationError::MissingField("student_name"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_entry_without_scores_object() {
        let entries = vec![BatchEntry {
            student_name: Some(json!("Asha")),
            scores: None,
            feedback_type: None,
        }];
        let results = batch_generate(&FailingClient, &entries, 100).await;

        match &results[0] {
            BatchResult::Error { error, .. } => {
                assert_eq!(*error, ValidationError::MissingField("communication"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }
}
