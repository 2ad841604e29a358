//! Router-level tests: response shapes the web client reads, driven through
//! the real router with a temporary database.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use coursesage_chat::{ChatCompleter, ChatMessage, CompletionError, LLMConfig};
use coursesage_core::{AiConfig, CourseSageConfig, DataPaths};
use coursesage_server::{build_router, AppState};
use coursesage_store::SqliteStore;

/// Replays canned replies in order.
struct Scripted {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
}

impl Scripted {
    fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }
}

#[async_trait]
impl ChatCompleter for Scripted {
    fn is_available(&self) -> bool {
        true
    }

    fn model(&self) -> Option<&str> {
        Some("scripted")
    }

    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _max_tokens: usize,
        _temperature: f64,
        _cancel: &CancellationToken,
    ) -> Result<String, CompletionError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::ProviderError("script exhausted".into())))
    }
}

fn parts(dir: &TempDir) -> (CourseSageConfig, SqliteStore, LLMConfig) {
    let data_paths = DataPaths::new(dir.path()).unwrap();
    let store = SqliteStore::open(&data_paths.db).unwrap();
    let config = CourseSageConfig {
        port: 0,
        data_paths,
        ai: AiConfig::default(),
    };
    let llm = LLMConfig::default().with_env_fallback(|_| None);
    (config, store, llm)
}

/// Router with no provider configured.
fn unconfigured_app(dir: &TempDir) -> Router {
    let (config, store, llm) = parts(dir);
    build_router(Arc::new(AppState::new(config, store, llm).unwrap()))
}

fn scripted_app(dir: &TempDir, replies: Vec<Result<String, CompletionError>>) -> Router {
    let (config, store, llm) = parts(dir);
    build_router(Arc::new(AppState::with_completer(
        config,
        store,
        llm,
        Scripted::new(replies),
    )))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn published_course(app: &Router, title: &str, description: &str) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/course/createCourse",
        Some(json!({ "title": title, "description": description, "status": "Published" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().unwrap()
}

const QUIZ_JSON: &str = r#"```json
[
  {
    "question": "What do plants convert light energy into?",
    "options": ["Heat", "Chemical energy", "Sound", "Motion"],
    "correctAnswer": 1,
    "explanation": "Photosynthesis stores light energy as chemical energy.",
    "questionType": "multiple-choice"
  }
]
```"#;

#[tokio::test]
async fn test_root_welcome() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Your server is up and running....");
}

#[tokio::test]
async fn test_status_reports_unavailable_without_leaking_keys() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(&app, Method::GET, "/api/v1/ai/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert!(body["model"].is_null());
    assert_eq!(body["provider"]["preferredProvider"], "auto");
    assert_eq!(body["provider"]["openaiConfigured"], false);
    assert!(body["provider"]["activeProvider"].is_null());
    assert!(body["fallbacks"]["total"].is_number());
    assert_eq!(body["limits"]["maxQuestions"], 10);
    assert!(!body.to_string().to_lowercase().contains("api_key"));
}

#[tokio::test]
async fn test_chat_without_provider_returns_canned_answer() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/chat",
        Some(json!({ "message": "What is a closure?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["ai"].as_str().unwrap().contains("not available"));

    let (_, status_body) = call(&app, Method::GET, "/api/v1/ai/status", None).await;
    assert_eq!(status_body["fallbacks"]["unavailable"], 1);
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(&app, Method::POST, "/api/v1/ai/chat", Some(json!({ "message": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_summary_uses_provider_text() {
    let dir = TempDir::new().unwrap();
    let app = scripted_app(&dir, vec![Ok("  Plants turn light into sugar.  ".into())]);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/summary",
        Some(json!({ "content": "Photosynthesis converts light energy into chemical energy." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"], "Plants turn light into sugar.");
}

#[tokio::test]
async fn test_analyze_returns_keywords_and_entities() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/analyze",
        Some(json!({ "text": "Python programming with Python libraries for data analysis." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["keywords"].as_array().unwrap().is_empty());
    assert!(body["entities"].is_object());
}

#[tokio::test]
async fn test_fallback_quiz_is_returned_but_not_stored() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/quiz",
        Some(json!({
            "courseId": 7,
            "content": "Photosynthesis converts light energy into chemical energy in plants.",
            "numQuestions": 3,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], true);
    assert!(body["quizId"].is_null());
    assert_eq!(body["data"]["questions"].as_array().unwrap().len(), 1);

    let (_, stored) = call(&app, Method::GET, "/api/v1/ai/quiz/7", None).await;
    assert!(stored["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_quiz_is_persisted() {
    let dir = TempDir::new().unwrap();
    let app = scripted_app(&dir, vec![Ok(QUIZ_JSON.into())]);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/quiz",
        Some(json!({
            "courseId": "bio-101",
            "sectionId": 2,
            "content": "Photosynthesis converts light energy into chemical energy in plants.",
            "difficulty": "easy",
            "passingScore": 80,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], false);
    assert!(body["quizId"].is_number());
    assert_eq!(body["data"]["difficulty"], "easy");
    assert_eq!(body["data"]["passingScore"], 80);
    assert_eq!(body["data"]["questions"][0]["correctAnswer"], 1);

    let (_, stored) = call(&app, Method::GET, "/api/v1/ai/quiz/bio-101", None).await;
    let quizzes = stored["data"].as_array().unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0]["courseRef"], "bio-101");
    assert_eq!(quizzes[0]["sectionRef"], "2");
    assert_eq!(quizzes[0]["isActive"], true);
}

#[tokio::test]
async fn test_quiz_requires_content() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/ai/quiz",
        Some(json!({ "courseId": 1, "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_recommendations_unavailable_without_provider() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    published_course(&app, "HTML Basics", "Learn HTML and CSS").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/recommendations",
        Some(json!({ "userId": 1, "interests": ["web"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::GET, "/api/v1/ai/recommendations/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similarity_recommendations_are_stored_and_superseded() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let html = published_course(&app, "HTML Basics", "Learn HTML and CSS").await;
    published_course(&app, "Kitchen Skills", "Advanced cooking techniques").await;

    let request = json!({
        "userId": "u-1",
        "interests": ["html css"],
        "strategy": "similarity",
    });
    let (status, first) = call(&app, Method::POST, "/api/v1/ai/recommendations", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    let entries = first["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["courseRef"], html.to_string());
    assert_eq!(entries[0]["score"], 0.5);

    let (_, second) = call(&app, Method::POST, "/api/v1/ai/recommendations", Some(request)).await;
    assert_ne!(first["id"], second["id"]);

    let (status, active) = call(&app, Method::GET, "/api/v1/ai/recommendations/u-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["data"]["id"], second["id"]);
    assert_eq!(active["data"]["strategy"], "similarity");
}

#[tokio::test]
async fn test_completed_courses_are_not_recommended() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    let html = published_course(&app, "HTML Basics", "Learn HTML and CSS").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/recommendations",
        Some(json!({
            "userId": 3,
            "interests": ["html css"],
            "completedCourses": [html],
            "strategy": "similarity",
        })),
    )
    .await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_recommendations_map_narrative() {
    let dir = TempDir::new().unwrap();
    let app = scripted_app(
        &dir,
        vec![Ok("1. HTML Basics - start with markup.\n2. Something else entirely.".into())],
    );
    let html = published_course(&app, "HTML Basics", "Learn HTML and CSS").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/ai/recommendations",
        Some(json!({ "userId": 9, "interests": ["web"], "skillLevel": "beginner" })),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["strategy"], "provider");
    assert_eq!(body["data"]["entries"][0]["courseRef"], html.to_string());
    assert!(body["data"]["narrative"].as_str().unwrap().contains("HTML Basics"));
}

#[tokio::test]
async fn test_category_flow() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/v1/course/createCategory",
        Some(json!({ "name": "Data Science", "description": "Numbers" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "Category created successfully");
    let category_id = created["data"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/course/createCategory",
        Some(json!({ "name": "Data Science" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, Method::POST, "/api/v1/course/createCategory", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let course_id = published_course(&app, "Statistics 101", "Intro to statistics").await;
    let link = json!({ "courseId": course_id, "categoryId": category_id });
    let (_, added) = call(&app, Method::POST, "/api/v1/course/addCourseToCategory", Some(link.clone())).await;
    assert_eq!(added["success"], true);
    let (status, again) = call(&app, Method::POST, "/api/v1/course/addCourseToCategory", Some(link)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["success"], true);
    assert_eq!(again["message"], "Course already exists in the category");

    let (status, page) = call(
        &app,
        Method::POST,
        "/api/v1/course/getCategoryPageDetails",
        Some(json!({ "categoryId": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["selectedCategory"]["name"], "Data Science");
    assert_eq!(page["selectedCourses"][0]["title"], "Statistics 101");
    assert!(page["differentCourses"].is_array());
    assert!(page["mostSellingCourses"].is_array());

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/course/getCategoryPageDetails",
        Some(json!({ "categoryId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = call(&app, Method::GET, "/api/v1/course/showAllCategories", None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_all_courses_lists_published_only() {
    let dir = TempDir::new().unwrap();
    let app = unconfigured_app(&dir);
    published_course(&app, "Live", "Published course").await;
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/course/createCourse",
        Some(json!({ "title": "Hidden", "description": "Draft course" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/v1/course/getAllCourses", None).await;
    let courses = body["data"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Live");
    assert_eq!(courses[0]["status"], "Published");
}
