//! Role-structured prompt construction.
//!
//! Pure: the same request and config always produce the same messages.
//! Sampling settings come from [`AiConfig`]; only the quiz question count is
//! caller-controlled, and it is clamped to the configured maximum.

use coursesage_chat::ChatMessage;
use coursesage_core::{AiConfig, QuizSettings};

use crate::types::{SkillLevel, TaskType};

const SUMMARY_SYSTEM: &str = "You are a helpful assistant that creates concise summaries of \
    educational content. Focus on key concepts and learning objectives.";

const QUIZ_SYSTEM: &str = "You are an educational expert. Generate quiz questions based on the \
    provided content. Return strictly a JSON array of objects with the fields: question \
    (string), options (array of strings), correctAnswer (zero-based index into options), \
    explanation (string). Do not add any text outside the JSON array.";

const RECOMMENDATION_SYSTEM: &str = "You are a course recommendation expert. Based on user \
    interests and completed courses, recommend the most suitable courses from the available \
    options. Only recommend courses from the available list and refer to them by their exact \
    title.";

const QA_SYSTEM: &str = "You are an AI learning assistant for an educational platform. Provide \
    helpful, accurate, and educational responses. If you don't know something, say so.";

/// One pipeline call, described by task.
#[derive(Debug, Clone)]
pub enum AnalysisRequest<'a> {
    Summary {
        content: &'a str,
    },
    Quiz {
        content: &'a str,
        num_questions: Option<usize>,
    },
    Recommendation {
        interests: &'a [String],
        completed: &'a [String],
        available: &'a [String],
        learning_goals: &'a [String],
        skill_level: SkillLevel,
    },
    Qa {
        question: &'a str,
        context: Option<&'a str>,
    },
}

impl AnalysisRequest<'_> {
    pub fn task_type(&self) -> TaskType {
        match self {
            AnalysisRequest::Summary { .. } => TaskType::Summary,
            AnalysisRequest::Quiz { .. } => TaskType::Quiz,
            AnalysisRequest::Recommendation { .. } => TaskType::Recommendation,
            AnalysisRequest::Qa { .. } => TaskType::Qa,
        }
    }
}

/// Messages plus the fixed sampling settings for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPlan {
    pub task: TaskType,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f64,
}

/// Requested question count, defaulted and clamped to `1..=max_questions`.
pub fn clamp_question_count(requested: Option<usize>, settings: &QuizSettings) -> usize {
    let max = settings.max_questions.max(1);
    requested.unwrap_or(settings.default_questions).clamp(1, max)
}

pub fn build_prompt(request: &AnalysisRequest<'_>, config: &AiConfig) -> PromptPlan {
    let completion = &config.completion;
    let mut max_tokens = completion.max_tokens;

    let messages = match request {
        AnalysisRequest::Summary { content } => vec![
            ChatMessage::system(SUMMARY_SYSTEM),
            ChatMessage::user(format!(
                "Please create a brief summary ({} words max) of the following content:\n\n{}",
                config.content_analysis.summary_length, content
            )),
        ],
        AnalysisRequest::Quiz {
            content,
            num_questions,
        } => {
            // Structured output needs room for every question.
            max_tokens = completion.max_tokens.saturating_mul(2);
            let count = clamp_question_count(*num_questions, &config.quiz);
            vec![
                ChatMessage::system(QUIZ_SYSTEM),
                ChatMessage::user(format!(
                    "Generate {} multiple-choice questions based on this content:\n\n{}",
                    count, content
                )),
            ]
        }
        AnalysisRequest::Recommendation {
            interests,
            completed,
            available,
            learning_goals,
            skill_level,
        } => {
            let mut user = format!(
                "User interests: {}\nCompleted courses: {}\nSkill level: {}\n",
                join_or_none(interests),
                join_or_none(completed),
                skill_level.as_str()
            );
            if !learning_goals.is_empty() {
                user.push_str(&format!("Learning goals: {}\n", learning_goals.join(", ")));
            }
            user.push_str(&format!(
                "Available courses: {}\n\nRecommend the top 3 most suitable courses with brief explanations.",
                join_or_none(available)
            ));
            vec![ChatMessage::system(RECOMMENDATION_SYSTEM), ChatMessage::user(user)]
        }
        AnalysisRequest::Qa { question, context } => {
            let user = match context.map(str::trim).filter(|c| !c.is_empty()) {
                Some(ctx) => format!("Context: {}\n\nQuestion: {}", ctx, question),
                None => format!("Question: {}", question),
            };
            vec![ChatMessage::system(QA_SYSTEM), ChatMessage::user(user)]
        }
    };

    PromptPlan {
        task: request.task_type(),
        messages,
        max_tokens,
        temperature: completion.temperature,
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
