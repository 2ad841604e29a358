//! Course catalog routes: categories and courses.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use coursesage_store::{AddCourseOutcome, CourseStatus, NewCourse};

use super::{failure, store_failure, ApiResponse};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/course/createCategory", post(create_category))
        .route("/course/showAllCategories", get(show_all_categories))
        .route("/course/getCategoryPageDetails", post(category_page_details))
        .route("/course/addCourseToCategory", post(add_course_to_category))
        .route("/course/createCourse", post(create_course))
        .route("/course/getAllCourses", get(get_all_courses))
}

#[derive(Debug, Deserialize)]
struct CreateCategoryRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryIdRequest {
    category_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCourseRequest {
    course_id: i64,
    category_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCourseRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    status: Option<CourseStatus>,
    #[serde(default)]
    students_enrolled: Option<i64>,
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResponse {
    if req.name.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "All fields are required");
    }
    match state.store.create_category(&req.name, req.description.as_deref()) {
        Ok(category) => {
            info!("Created category {} ({})", category.name, category.id);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Category created successfully",
                    "data": category,
                })),
            )
        }
        Err(e) => store_failure(e),
    }
}

async fn show_all_categories(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.store.list_categories() {
        Ok(categories) => (StatusCode::OK, Json(json!({ "success": true, "data": categories }))),
        Err(e) => store_failure(e),
    }
}

/// Courses in the category, courses elsewhere, and the top sellers.
async fn category_page_details(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CategoryIdRequest>,
) -> ApiResponse {
    match state.store.category_page_details(req.category_id) {
        Ok(details) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "selectedCategory": details.selected_category,
                "selectedCourses": details.selected_courses,
                "differentCourses": details.different_courses,
                "mostSellingCourses": details.most_selling_courses,
            })),
        ),
        Err(e) => store_failure(e),
    }
}

async fn add_course_to_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddCourseRequest>,
) -> ApiResponse {
    match state.store.add_course_to_category(req.course_id, req.category_id) {
        Ok(AddCourseOutcome::Added) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Course added to category successfully" })),
        ),
        Ok(AddCourseOutcome::AlreadyPresent) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Course already exists in the category" })),
        ),
        Err(e) => store_failure(e),
    }
}

async fn create_course(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResponse {
    let course = NewCourse {
        title: req.title,
        description: req.description,
        category_id: req.category_id,
        status: req.status.unwrap_or_default(),
        students_enrolled: req.students_enrolled.unwrap_or(0).max(0),
    };
    match state.store.create_course(course) {
        Ok(course) => {
            info!("Created course {} ({})", course.title, course.id);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Course created successfully",
                    "data": course,
                })),
            )
        }
        Err(e) => store_failure(e),
    }
}

/// Published courses only.
async fn get_all_courses(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.store.list_published_courses() {
        Ok(courses) => (StatusCode::OK, Json(json!({ "success": true, "data": courses }))),
        Err(e) => store_failure(e),
    }
}
