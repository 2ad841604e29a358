//! AI routes: assistant chat, summaries, content analysis, quizzes and
//! recommendations.
//!
//! AI failures never surface as 5xx. Each handler owns a cancellation token
//! behind a drop guard, so a dropped request aborts the provider call.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use coursesage_pipeline::{
    CourseCandidate, Difficulty, QuizRequest, RecommendationOutcome, RecommendationRequest,
    SkillLevel, Strategy,
};
use coursesage_store::NewQuiz;

use super::{failure, store_failure, ApiResponse, RefId};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ai/chat", post(chat))
        .route("/ai/summary", post(summary))
        .route("/ai/analyze", post(analyze))
        .route("/ai/quiz", post(generate_quiz))
        .route("/ai/quiz/{course_id}", get(list_quizzes))
        .route("/ai/recommendations", post(generate_recommendations))
        .route("/ai/recommendations/{user_id}", get(get_recommendations))
        .route("/ai/status", get(status))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizGenerateRequest {
    course_id: RefId,
    #[serde(default)]
    section_id: Option<RefId>,
    #[serde(default)]
    subsection_id: Option<RefId>,
    content: String,
    #[serde(default)]
    num_questions: Option<usize>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    time_limit: Option<u32>,
    #[serde(default)]
    passing_score: Option<u32>,
    #[serde(default)]
    created_by: Option<RefId>,
    #[serde(default = "default_persist")]
    persist: bool,
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationsRequest {
    user_id: RefId,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default)]
    skill_level: Option<SkillLevel>,
    #[serde(default)]
    completed_courses: Vec<RefId>,
    #[serde(default)]
    learning_goals: Vec<String>,
    #[serde(default)]
    strategy: Option<Strategy>,
}

/// Token cancelled when the returned guard drops.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

// ---------------------------------------------------------------
// Assistant, summary, analysis
// ---------------------------------------------------------------

/// POST /api/v1/ai/chat: learning assistant Q&A.
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> ApiResponse {
    if req.message.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "message is required");
    }
    let (cancel, _guard) = request_token();
    let answer = state
        .ai
        .learning_assistant(&req.message, req.context.as_deref(), &cancel)
        .await;
    (StatusCode::OK, Json(json!({ "ai": answer })))
}

async fn summary(State(state): State<Arc<AppState>>, Json(req): Json<SummaryRequest>) -> ApiResponse {
    if req.content.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "content is required");
    }
    let (cancel, _guard) = request_token();
    let summary = state.ai.generate_summary(&req.content, &cancel).await;
    (StatusCode::OK, Json(json!({ "success": true, "summary": summary })))
}

async fn analyze(State(state): State<Arc<AppState>>, Json(req): Json<AnalyzeRequest>) -> ApiResponse {
    let features = state.ai.analyze(&req.text);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "keywords": features.keywords,
            "entities": features.entities,
        })),
    )
}

// ---------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------

/// POST /api/v1/ai/quiz: generate (and by default persist) a quiz.
/// Fallback quizzes are returned but never stored.
async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuizGenerateRequest>,
) -> ApiResponse {
    if req.content.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "content is required");
    }

    let request = QuizRequest {
        course_ref: req.course_id.to_string(),
        section_ref: req.section_id.as_ref().map(RefId::to_string),
        subsection_ref: req.subsection_id.as_ref().map(RefId::to_string),
        content: req.content,
        num_questions: req.num_questions,
        title: req.title,
        description: req.description,
        difficulty: req.difficulty,
        time_limit: req.time_limit,
        passing_score: req.passing_score,
    };

    let (cancel, _guard) = request_token();
    let outcome = state.ai.generate_quiz(&request, &cancel).await;

    let quiz_id = if req.persist && !outcome.degraded {
        let created_by = req.created_by.as_ref().map(RefId::to_string);
        let saved = state.store.save_quiz(NewQuiz {
            course_ref: &request.course_ref,
            section_ref: request.section_ref.as_deref(),
            subsection_ref: request.subsection_ref.as_deref(),
            created_by: created_by.as_deref(),
            quiz: &outcome.quiz,
        });
        match saved {
            Ok(id) => Some(id),
            Err(e) => return store_failure(e),
        }
    } else {
        None
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "degraded": outcome.degraded,
            "quizId": quiz_id,
            "data": outcome.quiz,
        })),
    )
}

/// GET /api/v1/ai/quiz/{courseId}: stored quizzes, newest first.
async fn list_quizzes(State(state): State<Arc<AppState>>, Path(course_id): Path<String>) -> ApiResponse {
    match state.store.quizzes_for_course(course_id.trim()) {
        Ok(quizzes) => (StatusCode::OK, Json(json!({ "success": true, "data": quizzes }))),
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------

/// POST /api/v1/ai/recommendations: rank the published catalog for a user
/// and store the result as their active set.
async fn generate_recommendations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendationsRequest>,
) -> ApiResponse {
    let catalog: Vec<CourseCandidate> = match state.store.list_published_courses() {
        Ok(courses) => courses
            .into_iter()
            .map(|c| CourseCandidate {
                course_ref: c.id.to_string(),
                title: c.title,
                description: c.description,
                category: c.category_name,
            })
            .collect(),
        Err(e) => return store_failure(e),
    };

    let request = RecommendationRequest {
        user_ref: req.user_id.to_string(),
        interests: req.interests,
        completed_courses: req.completed_courses.iter().map(RefId::to_string).collect(),
        learning_goals: req.learning_goals,
        skill_level: req.skill_level.unwrap_or_default(),
        strategy: req.strategy.unwrap_or_default(),
    };

    let (cancel, _guard) = request_token();
    match state.ai.generate_recommendations(&request, &catalog, &cancel).await {
        RecommendationOutcome::Success(set) => {
            match state.store.replace_recommendations(&request.user_ref, &set) {
                Ok(id) => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "id": id, "data": set })),
                ),
                Err(e) => store_failure(e),
            }
        }
        RecommendationOutcome::Unavailable(message) => (
            StatusCode::OK,
            Json(json!({ "success": false, "message": message })),
        ),
    }
}

/// GET /api/v1/ai/recommendations/{userId}: the user's active set.
async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResponse {
    match state.store.active_recommendations(user_id.trim()) {
        Ok(Some(stored)) => (StatusCode::OK, Json(json!({ "success": true, "data": stored }))),
        Ok(None) => failure(StatusCode::NOT_FOUND, "No recommendations found"),
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------
// Status
// ---------------------------------------------------------------

/// GET /api/v1/ai/status: provider availability and fallback counts.
async fn status(State(state): State<Arc<AppState>>) -> ApiResponse {
    let ai_config = state.ai.config();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "available": state.ai.is_available(),
            "model": state.ai.model(),
            "provider": state.llm_config.to_response(),
            "fallbacks": state.ai.fallback_counts(),
            "limits": {
                "maxQuestions": ai_config.quiz.max_questions,
                "maxRecommendations": ai_config.recommendation.max_recommendations,
                "minSimilarityScore": ai_config.recommendation.min_similarity_score,
            },
        })),
    )
}
