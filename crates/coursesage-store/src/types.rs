//! Row types for catalog and generated content.

use serde::{Deserialize, Serialize};

use coursesage_pipeline::{Quiz, RecommendationSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "Draft",
            CourseStatus::Published => "Published",
        }
    }

    pub(crate) fn from_db(value: &str) -> Self {
        if value == "Published" {
            CourseStatus::Published
        } else {
            CourseStatus::Draft
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub status: CourseStatus,
    pub students_enrolled: i64,
    pub created_at: i64,
}

/// Fields for a new course.
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub status: CourseStatus,
    pub students_enrolled: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddCourseOutcome {
    Added,
    AlreadyPresent,
}

/// Published courses grouped for a category page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageDetails {
    pub selected_category: Category,
    pub selected_courses: Vec<Course>,
    pub different_courses: Vec<Course>,
    /// Top ten by enrolled students.
    pub most_selling_courses: Vec<Course>,
}

/// Where a quiz belongs and who asked for it.
#[derive(Debug, Clone, Copy)]
pub struct NewQuiz<'a> {
    pub course_ref: &'a str,
    pub section_ref: Option<&'a str>,
    pub subsection_ref: Option<&'a str>,
    pub created_by: Option<&'a str>,
    pub quiz: &'a Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuiz {
    pub id: i64,
    pub course_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsection_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub quiz: Quiz,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecommendation {
    pub id: i64,
    pub user_ref: String,
    #[serde(flatten)]
    pub set: RecommendationSet,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
