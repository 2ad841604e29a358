//! Value types flowing through the pipeline.

use serde::{Deserialize, Serialize};

/// The four prompt families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Summary,
    Quiz,
    Recommendation,
    Qa,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Summary => "summary",
            TaskType::Quiz => "quiz",
            TaskType::Recommendation => "recommendation",
            TaskType::Qa => "qa",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::ShortAnswer => "short-answer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" => Some(QuestionType::MultipleChoice),
            "true-false" => Some(QuestionType::TrueFalse),
            "short-answer" => Some(QuestionType::ShortAnswer),
            _ => None,
        }
    }
}

/// One validated quiz question. `correct_answer` always indexes `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    #[serde(default)]
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub difficulty: Difficulty,
    /// Minutes, always > 0.
    pub time_limit: u32,
    /// Percentage in [0, 100].
    pub passing_score: u8,
}

/// Result of quiz generation. `degraded` quizzes carry the fallback question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub quiz: Quiz,
    pub degraded: bool,
}

/// Input to quiz generation.
#[derive(Debug, Clone, Default)]
pub struct QuizRequest {
    pub course_ref: String,
    pub section_ref: Option<String>,
    pub subsection_ref: Option<String>,
    pub content: String,
    pub num_questions: Option<usize>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub time_limit: Option<u32>,
    pub passing_score: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            _ => None,
        }
    }
}

/// How recommendations are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// The completion provider ranks the catalog.
    #[default]
    Provider,
    /// Local token-set similarity against course descriptions.
    Similarity,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Provider => "provider",
            Strategy::Similarity => "similarity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "provider" => Some(Strategy::Provider),
            "similarity" => Some(Strategy::Similarity),
            _ => None,
        }
    }
}

/// A catalog course offered for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCandidate {
    pub course_ref: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    pub course_ref: String,
    pub title: String,
    /// In [0, 1].
    pub score: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Input to recommendation generation.
#[derive(Debug, Clone, Default)]
pub struct RecommendationRequest {
    pub user_ref: String,
    pub interests: Vec<String>,
    /// Course refs or titles the user has finished.
    pub completed_courses: Vec<String>,
    pub learning_goals: Vec<String>,
    pub skill_level: SkillLevel,
    pub strategy: Strategy,
}

/// A ranked recommendation set, entries unique by `course_ref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub strategy: Strategy,
    pub skill_level: SkillLevel,
    pub user_interests: Vec<String>,
    pub completed_courses: Vec<String>,
    pub learning_goals: Vec<String>,
    pub entries: Vec<RecommendationEntry>,
    /// Raw provider text, for the provider strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum RecommendationOutcome {
    Success(RecommendationSet),
    /// Displayable message explaining why no set was produced.
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_wire_names() {
        let q = QuizQuestion {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            correct_answer: 1,
            explanation: "Arithmetic.".into(),
            question_type: QuestionType::MultipleChoice,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], 1);
        assert_eq!(json["questionType"], "multiple-choice");
    }

    #[test]
    fn test_question_type_defaults() {
        let q: QuizQuestion = serde_json::from_str(
            r#"{"question": "q", "options": ["a"], "correctAnswer": 0, "explanation": "e"}"#,
        )
        .unwrap();
        assert_eq!(q.question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn test_outcome_is_tagged() {
        let json = serde_json::to_value(RecommendationOutcome::Unavailable("off".into())).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["data"], "off");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(SkillLevel::parse("advanced"), Some(SkillLevel::Advanced));
        assert_eq!(Strategy::parse("similarity"), Some(Strategy::Similarity));
        assert_eq!(Difficulty::parse("extreme"), None);
    }
}
