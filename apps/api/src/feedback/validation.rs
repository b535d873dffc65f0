//! Boundary validation for feedback requests.
//!
//! Score fields arrive as loosely-typed JSON values so a non-integer score
//! is reported as `InvalidType` for that field instead of a generic
//! deserialization failure. Everything downstream works with the validated
//! fixed-shape types and never re-checks.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::feedback::prompts::FeedbackType;
use crate::feedback::scores::{ScoreSet, Skill, SKILLS};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0} score must be an integer")]
    InvalidType(&'static str),

    #[error("{field} score must be between 1 and 10, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("Student name must be a non-empty string")]
    InvalidName,

    #[error("feedback_type must be one of: comprehensive, brief (got '{0}')")]
    InvalidFeedbackType(String),
}

/// Raw per-skill score fields as received on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawScores {
    pub communication: Option<Value>,
    pub teamwork: Option<Value>,
    pub creativity: Option<Value>,
    pub critical_thinking: Option<Value>,
    pub presentation: Option<Value>,
}

impl RawScores {
    fn get(&self, skill: Skill) -> Option<&Value> {
        match skill {
            Skill::Communication => self.communication.as_ref(),
            Skill::Teamwork => self.teamwork.as_ref(),
            Skill::Creativity => self.creativity.as_ref(),
            Skill::CriticalThinking => self.critical_thinking.as_ref(),
            Skill::Presentation => self.presentation.as_ref(),
        }
    }
}

/// A fully validated request, ready for the generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Trimmed and truncated to the configured maximum length.
    pub student_name: String,
    pub scores: ScoreSet,
    pub feedback_type: FeedbackType,
}

/// Validates name, scores, and optional feedback type. Pure.
///
/// An absent `feedback_type` defaults to comprehensive; a present but
/// unrecognized value is rejected.
pub fn validate(
    student_name: Option<&Value>,
    raw: &RawScores,
    feedback_type: Option<&Value>,
    max_name_length: usize,
) -> Result<ValidatedRequest, ValidationError> {
    let name = match student_name {
        None => return Err(ValidationError::MissingField("student_name")),
        Some(Value::String(s)) => s.trim(),
        Some(_) => return Err(ValidationError::InvalidName),
    };
    if name.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    let student_name: String = name.chars().take(max_name_length).collect();

    let mut values = [0i32; 5];
    for (i, &skill) in SKILLS.iter().enumerate() {
        let field = skill.field_name();
        let value = raw
            .get(skill)
            .ok_or(ValidationError::MissingField(field))?;
        let score = value
            .as_i64()
            .ok_or(ValidationError::InvalidType(field))?;
        if !(1..=10).contains(&score) {
            return Err(ValidationError::OutOfRange {
                field,
                value: score,
            });
        }
        values[i] = score as i32;
    }

    let feedback_type = match feedback_type {
        None | Some(Value::Null) => FeedbackType::Comprehensive,
        Some(Value::String(s)) => FeedbackType::parse(s)
            .ok_or_else(|| ValidationError::InvalidFeedbackType(s.clone()))?,
        Some(other) => {
            return Err(ValidationError::InvalidFeedbackType(other.to_string()));
        }
    };

    Ok(ValidatedRequest {
        student_name,
        scores: ScoreSet {
            communication: values[0],
            teamwork: values[1],
            creativity: values[2],
            critical_thinking: values[3],
            presentation: values[4],
        },
        feedback_type,
    })
}
