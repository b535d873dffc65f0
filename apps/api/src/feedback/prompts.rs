//! Prompt construction for feedback generation.
//!
//! Builders are pure: for any valid analysis (including all-empty tier
//! lists) they produce a prompt without failing.

use crate::feedback::analysis::{PerformanceAnalysis, Tier};
use crate::feedback::scores::ScoreSet;

/// Selects between the long multi-point template and the short one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackType {
    #[default]
    Comprehensive,
    Brief,
}

impl FeedbackType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "comprehensive" => Some(FeedbackType::Comprehensive),
            "brief" => Some(FeedbackType::Brief),
            _ => None,
        }
    }
}

/// System prompt for every feedback call. Constant, never parameterized.
pub const SYSTEM_PROMPT: &str = "You are an experienced educational assessor and mentor who provides constructive, \
personalized feedback to students. Your feedback should be:\n\
\n\
1. Encouraging and positive in tone\n\
2. Specific and actionable\n\
3. Balanced (highlighting both strengths and areas for improvement)\n\
4. Professional yet warm\n\
5. Focused on growth and development\n\
\n\
Always structure feedback to:\n\
- Start with positive recognition of strengths\n\
- Acknowledge areas that are developing well\n\
- Provide specific, actionable suggestions for improvement\n\
- End with encouragement and forward-looking statements\n\
\n\
Keep feedback concise but meaningful, typically 2-3 sentences.";

/// A system/user prompt pair ready for the completion API.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system: &'static str,
    pub user: String,
}

/// Builds the prompt for the requested feedback type.
pub fn build_prompt(
    student_name: &str,
    scores: &ScoreSet,
    analysis: &PerformanceAnalysis,
    feedback_type: FeedbackType,
) -> PromptPair {
    let user = match feedback_type {
        FeedbackType::Comprehensive => comprehensive_prompt(student_name, scores, analysis),
        FeedbackType::Brief => brief_prompt(student_name, scores, analysis),
    };
    PromptPair {
        system: SYSTEM_PROMPT,
        user,
    }
}

fn comprehensive_prompt(
    student_name: &str,
    scores: &ScoreSet,
    analysis: &PerformanceAnalysis,
) -> String {
    format!(
        "Generate personalized feedback for {name} based on these performance scores:\n\
        \n\
        Performance Scores (1-10 scale):\n\
        - Communication: {c}/10\n\
        - Teamwork: {t}/10\n\
        - Creativity: {cr}/10\n\
        - Critical Thinking: {ct}/10\n\
        - Presentation: {p}/10\n\
        \n\
        Performance Analysis:\n\
        {strengths}\n\
        {developing}\n\
        {improvement}\n\
        \n\
        Average Score: {avg:.1}/10\n\
        \n\
        Write constructive, encouraging feedback that:\n\
        1. Acknowledges {name}'s strongest areas\n\
        2. Recognizes areas showing good progress\n\
        3. Provides specific, actionable suggestions for improvement\n\
        4. Maintains an encouraging, growth-focused tone\n\
        \n\
        Focus on practical next steps and maintain a balance between recognition and development opportunities.",
        name = student_name,
        c = scores.communication,
        t = scores.teamwork,
        cr = scores.creativity,
        ct = scores.critical_thinking,
        p = scores.presentation,
        strengths = format_skills_list(&analysis.strengths, Tier::Strong),
        developing = format_skills_list(&analysis.developing, Tier::Developing),
        improvement = format_skills_list(&analysis.needs_improvement, Tier::NeedsImprovement),
        avg = analysis.average_score,
    )
}

fn brief_prompt(student_name: &str, scores: &ScoreSet, analysis: &PerformanceAnalysis) -> String {
    let top_strength = analysis
        .strengths
        .first()
        .copied()
        .unwrap_or("overall performance");
    let main_improvement = analysis
        .needs_improvement
        .first()
        .copied()
        .unwrap_or("consistency");

    format!(
        "Write brief, encouraging feedback for {name}:\n\
        \n\
        Scores: Communication {c}, Teamwork {t}, Creativity {cr}, Critical Thinking {ct}, \
        Presentation {p} (all out of 10)\n\
        \n\
        Highlight: {strength} as strength, suggest improvement in {improvement}.\n\
        Keep it concise, positive, and actionable (2-3 sentences maximum).",
        name = student_name,
        c = scores.communication,
        t = scores.teamwork,
        cr = scores.creativity,
        ct = scores.critical_thinking,
        p = scores.presentation,
        strength = top_strength,
        improvement = main_improvement,
    )
}

/// Renders a tier's skill list as one grammatical sentence.
///
/// 0 items: "No areas identified as <tier>."
/// 1 item:  "<skill> shows <tier> performance."
/// 2 items: "<a> and <b> show <tier> performance."
/// 3+:      "<a>, <b>, and <c> show <tier> performance."
pub fn format_skills_list(skills: &[&str], tier: Tier) -> String {
    let level = tier.label();
    match skills {
        [] => format!("No areas identified as {level}."),
        [only] => format!("{only} shows {level} performance."),
        [a, b] => format!("{a} and {b} show {level} performance."),
        [head @ .., last] => {
            format!("{}, and {last} show {level} performance.", head.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::analysis::analyze;

    fn scores(c: i32, t: i32, cr: i32, ct: i32, p: i32) -> ScoreSet {
        ScoreSet {
            communication: c,
            teamwork: t,
            creativity: cr,
            critical_thinking: ct,
            presentation: p,
        }
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(
            format_skills_list(&[], Tier::Strong),
            "No areas identified as strong."
        );
    }

    #[test]
    fn test_format_single_item_no_comma() {
        let s = format_skills_list(&["Teamwork"], Tier::Developing);
        assert_eq!(s, "Teamwork shows developing performance.");
        assert!(!s.contains(','));
    }

    #[test]
    fn test_format_two_items() {
        assert_eq!(
            format_skills_list(&["Communication", "Teamwork"], Tier::Strong),
            "Communication and Teamwork show strong performance."
        );
    }

    #[test]
    fn test_format_three_items_oxford_comma() {
        assert_eq!(
            format_skills_list(
                &["Communication", "Teamwork", "Creativity"],
                Tier::NeedsImprovement
            ),
            "Communication, Teamwork, and Creativity show needs improvement performance."
        );
    }

    #[test]
    fn test_format_five_items() {
        assert_eq!(
            format_skills_list(&["A", "B", "C", "D", "E"], Tier::Strong),
            "A, B, C, D, and E show strong performance."
        );
    }

    #[test]
    fn test_comprehensive_prompt_contents() {
        let s = scores(9, 4, 8, 6, 3);
        let analysis = analyze(&s);
        let pair = build_prompt("Priya", &s, &analysis, FeedbackType::Comprehensive);

        assert_eq!(pair.system, SYSTEM_PROMPT);
        assert!(pair.user.contains("Priya"));
        assert!(pair.user.contains("- Communication: 9/10"));
        assert!(pair.user.contains("- Presentation: 3/10"));
        assert!(pair
            .user
            .contains("Communication and Creativity show strong performance."));
        assert!(pair
            .user
            .contains("Teamwork and Presentation show needs improvement performance."));
        assert!(pair.user.contains("Average Score: 6.0/10"));
    }

    #[test]
    fn test_brief_prompt_picks_first_strength_and_improvement() {
        let s = scores(9, 4, 8, 6, 3);
        let analysis = analyze(&s);
        let pair = build_prompt("Priya", &s, &analysis, FeedbackType::Brief);

        assert!(pair.user.contains("Communication as strength"));
        assert!(pair.user.contains("improvement in Teamwork"));
    }

    #[test]
    fn test_brief_prompt_fallback_phrases_when_lists_empty() {
        // All developing: no strengths, no improvement areas.
        let s = scores(6, 6, 7, 7, 6);
        let analysis = analyze(&s);
        let pair = build_prompt("Sam", &s, &analysis, FeedbackType::Brief);

        assert!(pair.user.contains("overall performance as strength"));
        assert!(pair.user.contains("improvement in consistency"));
    }

    #[test]
    fn test_feedback_type_parse() {
        assert_eq!(
            FeedbackType::parse("comprehensive"),
            Some(FeedbackType::Comprehensive)
        );
        assert_eq!(FeedbackType::parse("brief"), Some(FeedbackType::Brief));
        assert_eq!(FeedbackType::parse("detailed"), None);
        assert_eq!(FeedbackType::parse(""), None);
    }
}
