//! Response interpretation with observable fallback.
//!
//! Text tasks pass provider output through unchanged. Quiz output must be a
//! JSON array of well-formed questions; anything else becomes the
//! single-question fallback. Each fallback bumps a counter and emits a `warn!`
//! on the `coursesage::fallback` target.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use coursesage_chat::CompletionError;

use crate::types::{QuestionType, QuizQuestion, TaskType};

pub const SUMMARY_DISABLED: &str =
    "AI summary generation is not available. Please configure an AI provider API key.";
pub const SUMMARY_FAILED: &str = "Unable to generate summary at this time.";

pub const RECOMMENDATION_DISABLED: &str =
    "AI recommendations are not available. Please configure an AI provider API key.";
pub const RECOMMENDATION_FAILED: &str = "Unable to generate recommendations at this time.";

pub const QA_DISABLED: &str = "I apologize, but the AI assistant is currently not available. \
    Please configure an AI provider API key to enable this feature.";
pub const QA_FAILED: &str = "I apologize, but I'm having trouble processing your request right \
    now. Please try again later.";

pub const QUIZ_DISABLED_QUESTION: &str =
    "AI quiz generation is not available. Please configure an AI provider API key.";
const QUIZ_DISABLED_OPTION: &str = "Feature disabled";
const QUIZ_DISABLED_EXPLANATION: &str = "Enable an AI provider API key to use this feature.";

pub const QUIZ_FAILED_QUESTION: &str = "Unable to generate quiz questions at this time.";
const QUIZ_FAILED_OPTION: &str = "Please try again later";
const QUIZ_FAILED_EXPLANATION: &str = "There was an error generating the quiz.";

/// Why a task fell back to its canned payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    Unavailable,
    ProviderError,
    MalformedOutput,
    Cancelled,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackKind::Unavailable => "unavailable",
            FallbackKind::ProviderError => "provider_error",
            FallbackKind::MalformedOutput => "malformed_output",
            FallbackKind::Cancelled => "cancelled",
        }
    }
}

impl From<&CompletionError> for FallbackKind {
    fn from(err: &CompletionError) -> Self {
        match err {
            CompletionError::ProviderUnavailable => FallbackKind::Unavailable,
            CompletionError::ProviderError(_) => FallbackKind::ProviderError,
            CompletionError::Cancelled => FallbackKind::Cancelled,
        }
    }
}

/// Per-kind fallback counts since process start.
#[derive(Debug, Default)]
pub struct FallbackCounters {
    unavailable: AtomicU64,
    provider_error: AtomicU64,
    malformed_output: AtomicU64,
    cancelled: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSnapshot {
    pub unavailable: u64,
    pub provider_error: u64,
    pub malformed_output: u64,
    pub cancelled: u64,
    pub total: u64,
}

impl FallbackCounters {
    fn counter(&self, kind: FallbackKind) -> &AtomicU64 {
        match kind {
            FallbackKind::Unavailable => &self.unavailable,
            FallbackKind::ProviderError => &self.provider_error,
            FallbackKind::MalformedOutput => &self.malformed_output,
            FallbackKind::Cancelled => &self.cancelled,
        }
    }

    pub fn record(&self, kind: FallbackKind) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: FallbackKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> FallbackSnapshot {
        let unavailable = self.get(FallbackKind::Unavailable);
        let provider_error = self.get(FallbackKind::ProviderError);
        let malformed_output = self.get(FallbackKind::MalformedOutput);
        let cancelled = self.get(FallbackKind::Cancelled);
        FallbackSnapshot {
            unavailable,
            provider_error,
            malformed_output,
            cancelled,
            total: unavailable + provider_error + malformed_output + cancelled,
        }
    }
}

/// Count a fallback and emit the diagnostic event.
pub fn report_fallback(counters: &FallbackCounters, task: TaskType, kind: FallbackKind, detail: &str) {
    counters.record(kind);
    warn!(
        target: "coursesage::fallback",
        task = task.as_str(),
        kind = kind.as_str(),
        detail,
        "AI {} fell back to canned response",
        task.as_str()
    );
}

/// A parsed value and, when degraded, the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub fallback: Option<FallbackKind>,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    pub fn degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Canned text for a text task. Provider absence gets the "not available"
/// wording; every other failure gets the "try again" wording.
pub fn text_fallback(task: TaskType, kind: FallbackKind) -> &'static str {
    let disabled = kind == FallbackKind::Unavailable;
    match (task, disabled) {
        (TaskType::Summary, true) => SUMMARY_DISABLED,
        (TaskType::Summary, false) => SUMMARY_FAILED,
        (TaskType::Recommendation, true) => RECOMMENDATION_DISABLED,
        (TaskType::Recommendation, false) => RECOMMENDATION_FAILED,
        (TaskType::Qa, true) | (TaskType::Quiz, true) => QA_DISABLED,
        (TaskType::Qa, false) | (TaskType::Quiz, false) => QA_FAILED,
    }
}

/// Interpret summary, recommendation or Q&A output. Never fails.
pub fn interpret_text(
    task: TaskType,
    result: Result<String, CompletionError>,
    counters: &FallbackCounters,
) -> Parsed<String> {
    let (kind, detail) = match result {
        Ok(text) if !text.trim().is_empty() => return Parsed::ok(text.trim().to_string()),
        Ok(_) => (FallbackKind::MalformedOutput, "empty completion".to_string()),
        Err(e) => (FallbackKind::from(&e), e.to_string()),
    };
    report_fallback(counters, task, kind, &detail);
    Parsed {
        value: text_fallback(task, kind).to_string(),
        fallback: Some(kind),
    }
}

/// The single placeholder question returned instead of a broken quiz.
pub fn fallback_questions(kind: FallbackKind) -> Vec<QuizQuestion> {
    let (question, option, explanation) = if kind == FallbackKind::Unavailable {
        (QUIZ_DISABLED_QUESTION, QUIZ_DISABLED_OPTION, QUIZ_DISABLED_EXPLANATION)
    } else {
        (QUIZ_FAILED_QUESTION, QUIZ_FAILED_OPTION, QUIZ_FAILED_EXPLANATION)
    };
    vec![QuizQuestion {
        question: question.to_string(),
        options: vec![option.to_string()],
        correct_answer: 0,
        explanation: explanation.to_string(),
        question_type: QuestionType::MultipleChoice,
    }]
}

/// Interpret quiz output, keeping at most `limit` questions of the
/// `allowed` types.
pub fn interpret_quiz(
    result: Result<String, CompletionError>,
    limit: usize,
    allowed: &[QuestionType],
    counters: &FallbackCounters,
) -> Parsed<Vec<QuizQuestion>> {
    let (kind, detail) = match result {
        Ok(text) => match parse_quiz_questions(&text, limit, allowed) {
            Ok(questions) => return Parsed::ok(questions),
            Err(reason) => (FallbackKind::MalformedOutput, reason),
        },
        Err(e) => (FallbackKind::from(&e), e.to_string()),
    };
    report_fallback(counters, TaskType::Quiz, kind, &detail);
    Parsed {
        value: fallback_questions(kind),
        fallback: Some(kind),
    }
}

/// Question as the model may emit it, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: Option<String>,
    options: Option<Vec<String>>,
    correct_answer: Option<i64>,
    explanation: Option<String>,
    question_type: Option<QuestionType>,
}

/// Parse and validate a JSON question array. `Err` carries the reason.
/// An empty `allowed` list accepts every question type.
pub fn parse_quiz_questions(
    raw: &str,
    limit: usize,
    allowed: &[QuestionType],
) -> Result<Vec<QuizQuestion>, String> {
    let body = strip_code_fence(raw);
    let value: serde_json::Value = serde_json::from_str(body)
        .or_else(|_| match (body.find('['), body.rfind(']')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end]),
            _ => serde_json::from_str(body),
        })
        .map_err(|e| format!("not JSON: {}", e))?;

    // Accept a bare array or {"questions": [...]}.
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("questions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err("expected a JSON array of questions".into()),
        },
        _ => return Err("expected a JSON array of questions".into()),
    };
    if items.is_empty() {
        return Err("empty question array".into());
    }

    items
        .into_iter()
        .take(limit.max(1))
        .enumerate()
        .map(|(i, item)| validate_question(item, allowed).map_err(|reason| format!("question {}: {}", i, reason)))
        .collect()
}

fn validate_question(item: serde_json::Value, allowed: &[QuestionType]) -> Result<QuizQuestion, String> {
    let raw: RawQuestion = serde_json::from_value(item).map_err(|e| e.to_string())?;

    let question = raw
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or("missing question")?;
    let options = raw
        .options
        .filter(|o| !o.is_empty())
        .ok_or("missing options")?;
    let correct_answer = raw.correct_answer.ok_or("missing correctAnswer")?;
    if correct_answer < 0 || correct_answer as usize >= options.len() {
        return Err(format!(
            "correctAnswer {} out of range for {} options",
            correct_answer,
            options.len()
        ));
    }
    let explanation = raw.explanation.ok_or("missing explanation")?;

    let permits = |kind: QuestionType| allowed.is_empty() || allowed.contains(&kind);
    let question_type = match raw.question_type {
        Some(kind) => kind,
        None if is_true_false(&options) && permits(QuestionType::TrueFalse) => QuestionType::TrueFalse,
        None => QuestionType::MultipleChoice,
    };
    if !permits(question_type) {
        return Err(format!("questionType {} is not enabled", question_type.as_str()));
    }

    Ok(QuizQuestion {
        question,
        options,
        correct_answer: correct_answer as usize,
        explanation,
        question_type,
    })
}

fn is_true_false(options: &[String]) -> bool {
    options.len() == 2
        && options[0].trim().eq_ignore_ascii_case("true")
        && options[1].trim().eq_ignore_ascii_case("false")
}

/// Drop a surrounding ``` fence (with optional language tag).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
