use serde::Serialize;

use crate::feedback::scores::ScoreSet;

/// Performance tier for a single skill score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Strong,
    Developing,
    NeedsImprovement,
}

impl Tier {
    /// Label used in prompt sentences ("X shows strong performance.").
    pub fn label(self) -> &'static str {
        match self {
            Tier::Strong => "strong",
            Tier::Developing => "developing",
            Tier::NeedsImprovement => "needs improvement",
        }
    }
}

/// Classifies a single score. Boundaries: >=8 strong, 6..=7 developing, <=5 needs improvement.
pub fn classify(score: i32) -> Tier {
    if score >= 8 {
        Tier::Strong
    } else if score >= 6 {
        Tier::Developing
    } else {
        Tier::NeedsImprovement
    }
}

/// Derived view of a ScoreSet: skills bucketed by tier plus the mean score.
/// Tier lists hold display names and preserve canonical skill order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceAnalysis {
    pub strengths: Vec<&'static str>,
    pub developing: Vec<&'static str>,
    pub needs_improvement: Vec<&'static str>,
    pub average_score: f64,
}

/// Buckets each skill into its tier and computes the mean. Pure and idempotent.
pub fn analyze(scores: &ScoreSet) -> PerformanceAnalysis {
    let mut strengths = Vec::new();
    let mut developing = Vec::new();
    let mut needs_improvement = Vec::new();

    for (skill, score) in scores.iter() {
        match classify(score) {
            Tier::Strong => strengths.push(skill.display_name()),
            Tier::Developing => developing.push(skill.display_name()),
            Tier::NeedsImprovement => needs_improvement.push(skill.display_name()),
        }
    }

    PerformanceAnalysis {
        strengths,
        developing,
        needs_improvement,
        average_score: scores.mean(),
    }
}
