use serde::Serialize;

/// The five assessed skill dimensions, in canonical order.
///
/// The ordering is a contract: analysis tier lists and every generated
/// sentence enumerate skills in exactly this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Communication,
    Teamwork,
    Creativity,
    CriticalThinking,
    Presentation,
}

pub const SKILLS: [Skill; 5] = [
    Skill::Communication,
    Skill::Teamwork,
    Skill::Creativity,
    Skill::CriticalThinking,
    Skill::Presentation,
];

impl Skill {
    /// Wire / form field name.
    pub fn field_name(self) -> &'static str {
        match self {
            Skill::Communication => "communication",
            Skill::Teamwork => "teamwork",
            Skill::Creativity => "creativity",
            Skill::CriticalThinking => "critical_thinking",
            Skill::Presentation => "presentation",
        }
    }

    /// Human-readable name used in prompts and generated text.
    pub fn display_name(self) -> &'static str {
        match self {
            Skill::Communication => "Communication",
            Skill::Teamwork => "Teamwork",
            Skill::Creativity => "Creativity",
            Skill::CriticalThinking => "Critical Thinking",
            Skill::Presentation => "Presentation",
        }
    }
}

/// A validated set of the five skill scores, each in 1..=10.
/// Only `feedback::validation` constructs these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSet {
    pub communication: i32,
    pub teamwork: i32,
    pub creativity: i32,
    pub critical_thinking: i32,
    pub presentation: i32,
}

impl ScoreSet {
    pub fn get(&self, skill: Skill) -> i32 {
        match skill {
            Skill::Communication => self.communication,
            Skill::Teamwork => self.teamwork,
            Skill::Creativity => self.creativity,
            Skill::CriticalThinking => self.critical_thinking,
            Skill::Presentation => self.presentation,
        }
    }

    /// Iterates (skill, score) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, i32)> + '_ {
        SKILLS.iter().map(move |&skill| (skill, self.get(skill)))
    }

    pub fn mean(&self) -> f64 {
        let sum: i32 = SKILLS.iter().map(|&skill| self.get(skill)).sum();
        sum as f64 / SKILLS.len() as f64
    }
}
