//! Server-rendered web form for generating and browsing feedback.
//!
//! The form path always requests comprehensive feedback; invalid input
//! re-renders the form with the validation message instead of a JSON error.

use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::generator::generate_feedback;
use crate::feedback::scores::SKILLS;
use crate::feedback::validation::{validate, RawScores};
use crate::state::AppState;
use crate::store::{self, NewFeedback};

const HISTORY_PER_PAGE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub student_name: String,
    pub communication: String,
    pub teamwork: String,
    pub creativity: String,
    pub critical_thinking: String,
    pub presentation: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render_form(None))
}

/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Result<Html<String>, AppError> {
    let name = Value::String(form.student_name.clone());
    let scores = RawScores {
        communication: Some(score_value(&form.communication)),
        teamwork: Some(score_value(&form.teamwork)),
        creativity: Some(score_value(&form.creativity)),
        critical_thinking: Some(score_value(&form.critical_thinking)),
        presentation: Some(score_value(&form.presentation)),
    };

    // The form never offers a feedback type; it always gets comprehensive.
    let validated = match validate(Some(&name), &scores, None, state.config.max_name_length) {
        Ok(v) => v,
        Err(e) => return Ok(Html(render_form(Some(&e.to_string())))),
    };

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
        "Generated feedback via web form for {} (ID: {feedback_id})",
        validated.student_name
    );

    let scores_rows: String = validated
        .scores
        .iter()
        .map(|(skill, score)| {
            format!(
                "<tr><td>{}</td><td>{score}/10</td></tr>",
                skill.display_name()
            )
        })
        .collect();

    let body = format!(
        "<h1>Feedback for {name}</h1>\n\
        <table>{scores_rows}</table>\n\
        <blockquote>{feedback}</blockquote>\n\
        <p><a href=\"/\">Generate another</a> | <a href=\"/history\">History</a></p>",
        name = escape_html(&validated.student_name),
        feedback = escape_html(&generated.text),
    );

    Ok(Html(page("Feedback Result", &body)))
}

/// GET /history?page=
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Html<String>, AppError> {
    let page_num = params.page.unwrap_or(1).max(1);
    let result = store::list_feedback(&state.db, page_num, HISTORY_PER_PAGE, None).await?;

    let rows: String = result
        .items
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.student_name),
                row.scores().mean(),
                escape_html(&row.feedback_text),
                row.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let pages = (result.total + HISTORY_PER_PAGE - 1) / HISTORY_PER_PAGE;
    let mut nav = String::new();
    if page_num > 1 {
        nav.push_str(&format!(
            "<a href=\"/history?page={}\">Previous</a> ",
            page_num - 1
        ));
    }
    if page_num < pages {
        nav.push_str(&format!(
            "<a href=\"/history?page={}\">Next</a>",
            page_num + 1
        ));
    }

    let body = format!(
        "<h1>Feedback History</h1>\n\
        <table>\n\
        <tr><th>Student</th><th>Average</th><th>Feedback</th><th>Created</th></tr>\n\
        {rows}\n\
        </table>\n\
        <p>{nav}</p>\n\
        <p><a href=\"/\">Back to form</a></p>"
    );

    Ok(Html(page("Feedback History", &body)))
}

/// Form field values come in as strings; numeric ones become JSON integers
/// so the validator applies its normal type and range checks.
fn score_value(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(raw.to_string()),
    }
}

fn render_form(error: Option<&str>) -> String {
    let error_html = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>", escape_html(msg)),
        None => String::new(),
    };

    let score_inputs: String = SKILLS
        .iter()
        .map(|skill| {
            format!(
                "<label>{display}\n\
                <input type=\"number\" name=\"{field}\" min=\"1\" max=\"10\" required></label><br>",
                display = skill.display_name(),
                field = skill.field_name(),
            )
        })
        .collect();

    let body = format!(
        "<h1>Auto Feedback Generator</h1>\n\
        {error_html}\n\
        <form method=\"post\" action=\"/generate\">\n\
        <label>Student Name\n\
        <input type=\"text\" name=\"student_name\" maxlength=\"100\" required></label><br>\n\
        {score_inputs}\n\
        <button type=\"submit\">Generate Feedback</button>\n\
        </form>\n\
        <p><a href=\"/history\">History</a></p>"
    );

    page("Auto Feedback Generator", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
        <html>\n\
        <head>\n\
        <meta charset=\"utf-8\">\n\
        <title>{title}</title>\n\
        <style>\n\
        body {{ font-family: sans-serif; max-width: 42rem; margin: 2rem auto; }}\n\
        table {{ border-collapse: collapse; }}\n\
        td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; }}\n\
        .error {{ color: #b00; }}\n\
        </style>\n\
        </head>\n\
        <body>{body}</body>\n\
        </html>"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_value_numeric() {
        assert_eq!(score_value("7"), Value::from(7));
        assert_eq!(score_value(" 10 "), Value::from(10));
    }

    #[test]
    fn test_score_value_non_numeric_stays_string() {
        assert_eq!(score_value("seven"), Value::String("seven".to_string()));
        assert_eq!(score_value("7.5"), Value::String("7.5".to_string()));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>&\"quote\"'</b>"),
            "&lt;b&gt;&amp;&quot;quote&quot;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_form_renders_all_score_fields() {
        let html = render_form(None);
        for skill in SKILLS {
            assert!(html.contains(&format!("name=\"{}\"", skill.field_name())));
        }
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_form_renders_error_message() {
        let html = render_form(Some("communication score must be an integer"));
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("communication score must be an integer"));
    }
}
