//! SQLite-backed catalog and generated-content store.
//!
//! One connection behind a mutex, WAL journal. Quizzes are versioned: every
//! save inserts a new row and readers see newest first. Recommendation sets
//! supersede: saving a set deactivates the user's previous active set in the
//! same transaction, keeping it as history.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use coursesage_core::{Error, Result};
use coursesage_pipeline::{Difficulty, QuizQuestion, RecommendationSet};

use crate::schema::{AI_SQL, CATALOG_SQL};
use crate::types::*;

/// Categories created on first start, when the table is empty.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Web Development", "Learn to build modern web applications using various technologies and frameworks."),
    ("Mobile Development", "Master mobile app development for iOS and Android platforms."),
    ("Data Science", "Explore data analysis, machine learning, and artificial intelligence."),
    ("Design", "Learn UI/UX design, graphic design, and creative skills."),
    ("Business", "Develop business skills, entrepreneurship, and management expertise."),
    ("Marketing", "Master digital marketing, SEO, and growth strategies."),
    ("Programming", "Learn programming fundamentals and various programming languages."),
    ("Photography", "Develop photography skills and creative visual storytelling."),
];

const COURSE_SELECT: &str = "SELECT c.id, c.title, c.description, c.category_id, \
     cat.name AS category_name, c.status, c.students_enrolled, c.created_at \
     FROM courses c LEFT JOIN categories cat ON cat.id = c.category_id";

const MOST_SELLING_LIMIT: i64 = 10;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl SqliteStore {
    /// Open or create the store. The file is `db_dir/coursesage.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("coursesage.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteStore initialized: {} categories, {} courses, path={}",
            store.count("categories")?,
            store.count("courses")?,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(&format!("{}\n{}", CATALOG_SQL, AI_SQL))
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))
    }

    fn count(&self, table: &'static str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .map_err(db_err)
    }

    // ---------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------

    pub fn create_category(&self, name: &str, description: Option<&str>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Category name is required".into()));
        }
        let now = now_millis();

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached("INSERT INTO categories (name, description, created_at) VALUES (?1, ?2, ?3)")
            .map_err(db_err)?
            .insert(params![name, description, now])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::Conflict(format!("Category '{}'", name))
                } else {
                    db_err(e)
                }
            })?;

        debug!("Created category {} ({})", id, name);
        Ok(Category {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
        })
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn.lock();
        let result = conn.prepare_cached("SELECT id, name, description, created_at FROM categories WHERE id = ?1")
            .map_err(db_err)?
            .query_row(params![id], Self::row_to_category)
            .optional()
            .map_err(db_err);
        result
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT id, name, description, created_at FROM categories ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], Self::row_to_category)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    /// Insert [`DEFAULT_CATEGORIES`] when no category exists yet.
    /// Returns how many were created.
    pub fn seed_default_categories(&self) -> Result<usize> {
        if self.count("categories")? > 0 {
            return Ok(0);
        }
        let now = now_millis();
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        for (name, description) in DEFAULT_CATEGORIES {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, description, created_at) VALUES (?1, ?2, ?3)",
                params![name, description, now],
            )
            .map_err(db_err)?;
        }
        tx.commit().map_err(db_err)?;
        info!("Default categories created: {}", DEFAULT_CATEGORIES.len());
        Ok(DEFAULT_CATEGORIES.len())
    }

    /// Link a course to a category. Linking twice is a no-op.
    pub fn add_course_to_category(&self, course_id: i64, category_id: i64) -> Result<AddCourseOutcome> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;

        if !Self::exists(&tx, "categories", category_id)? {
            return Err(Error::NotFound("Category not found".into()));
        }
        if !Self::exists(&tx, "courses", course_id)? {
            return Err(Error::NotFound("Course not found".into()));
        }

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO category_courses (category_id, course_id) VALUES (?1, ?2)",
                params![category_id, course_id],
            )
            .map_err(db_err)?;
        tx.execute(
            "UPDATE courses SET category_id = ?1 WHERE id = ?2 AND category_id IS NULL",
            params![category_id, course_id],
        )
        .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        Ok(if inserted == 0 {
            AddCourseOutcome::AlreadyPresent
        } else {
            AddCourseOutcome::Added
        })
    }

    /// Published courses of the category, of every other category, and the
    /// ten most enrolled across all categories.
    pub fn category_page_details(&self, category_id: i64) -> Result<CategoryPageDetails> {
        let selected_category = self
            .get_category(category_id)?
            .ok_or_else(|| Error::NotFound("Category not found".into()))?;

        let selected_courses = self.query_courses(
            &format!(
                "{} JOIN category_courses cc ON cc.course_id = c.id \
                 WHERE cc.category_id = ?1 AND c.status = 'Published' ORDER BY cc.rowid",
                COURSE_SELECT
            ),
            params![category_id],
        )?;
        let different_courses = self.query_courses(
            &format!(
                "{} WHERE c.status = 'Published' AND c.id IN \
                 (SELECT course_id FROM category_courses WHERE category_id != ?1) ORDER BY c.id",
                COURSE_SELECT
            ),
            params![category_id],
        )?;
        let most_selling_courses = self.query_courses(
            &format!(
                "{} WHERE c.status = 'Published' AND c.id IN (SELECT course_id FROM category_courses) \
                 ORDER BY c.students_enrolled DESC, c.id LIMIT ?1",
                COURSE_SELECT
            ),
            params![MOST_SELLING_LIMIT],
        )?;

        Ok(CategoryPageDetails {
            selected_category,
            selected_courses,
            different_courses,
            most_selling_courses,
        })
    }

    fn exists(conn: &Connection, table: &'static str, id: i64) -> Result<bool> {
        conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table),
            params![id],
            |row| row.get(0),
        )
        .map_err(db_err)
    }

    // ---------------------------------------------------------------
    // Courses
    // ---------------------------------------------------------------

    /// Insert a course, linking it to its category when one is given.
    pub fn create_course(&self, course: NewCourse) -> Result<Course> {
        let title = course.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Course title is required".into()));
        }
        let now = now_millis();

        let id = {
            let mut conn = self.conn.lock();
            let tx = conn.transaction().map_err(db_err)?;
            if let Some(category_id) = course.category_id {
                if !Self::exists(&tx, "categories", category_id)? {
                    return Err(Error::NotFound("Category not found".into()));
                }
            }
            tx.execute(
                "INSERT INTO courses (title, description, category_id, status, students_enrolled, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    title,
                    course.description,
                    course.category_id,
                    course.status.as_str(),
                    course.students_enrolled.max(0),
                    now
                ],
            )
            .map_err(db_err)?;
            let id = tx.last_insert_rowid();
            if let Some(category_id) = course.category_id {
                tx.execute(
                    "INSERT OR IGNORE INTO category_courses (category_id, course_id) VALUES (?1, ?2)",
                    params![category_id, id],
                )
                .map_err(db_err)?;
            }
            tx.commit().map_err(db_err)?;
            id
        };

        debug!("Created course {} ({})", id, title);
        self.get_course(id)?
            .ok_or_else(|| Error::Internal(format!("Course {} vanished after insert", id)))
    }

    pub fn get_course(&self, id: i64) -> Result<Option<Course>> {
        let mut courses =
            self.query_courses(&format!("{} WHERE c.id = ?1", COURSE_SELECT), params![id])?;
        Ok(courses.pop())
    }

    /// Published catalog in insertion order.
    pub fn list_published_courses(&self) -> Result<Vec<Course>> {
        self.query_courses(
            &format!("{} WHERE c.status = 'Published' ORDER BY c.id", COURSE_SELECT),
            [],
        )
    }

    fn query_courses(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Course>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params, Self::row_to_course)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    // ---------------------------------------------------------------
    // Quizzes
    // ---------------------------------------------------------------

    /// Store a quiz as a new active version. Returns its id.
    pub fn save_quiz(&self, new: NewQuiz<'_>) -> Result<i64> {
        let questions_json = serde_json::to_string(&new.quiz.questions)?;
        let now = now_millis();

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO quizzes (course_ref, section_ref, subsection_ref, title, description, \
                 questions_json, difficulty, time_limit, passing_score, is_active, created_by, \
                 created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?11, ?11)",
            )
            .map_err(db_err)?
            .insert(params![
                new.course_ref,
                new.section_ref,
                new.subsection_ref,
                new.quiz.title,
                new.quiz.description,
                questions_json,
                new.quiz.difficulty.as_str(),
                new.quiz.time_limit,
                new.quiz.passing_score,
                new.created_by,
                now
            ])
            .map_err(db_err)?;

        info!(
            "Saved quiz {} for course {} ({} questions)",
            id,
            new.course_ref,
            new.quiz.questions.len()
        );
        Ok(id)
    }

    /// Active quizzes for a course, newest first.
    pub fn quizzes_for_course(&self, course_ref: &str) -> Result<Vec<StoredQuiz>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, course_ref, section_ref, subsection_ref, title, description, \
                 questions_json, difficulty, time_limit, passing_score, is_active, created_by, \
                 created_at, updated_at \
                 FROM quizzes WHERE course_ref = ?1 AND is_active = 1 \
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![course_ref], QuizRow::from_row)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        rows.into_iter().map(QuizRow::into_stored).collect()
    }

    // ---------------------------------------------------------------
    // Recommendations
    // ---------------------------------------------------------------

    /// Make `set` the user's active recommendation set. Earlier active sets
    /// are deactivated, not deleted. Returns the new row id.
    pub fn replace_recommendations(&self, user_ref: &str, set: &RecommendationSet) -> Result<i64> {
        let set_json = serde_json::to_string(set)?;
        let now = now_millis();

        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        let superseded = tx
            .execute(
                "UPDATE recommendations SET is_active = 0, updated_at = ?2 \
                 WHERE user_ref = ?1 AND is_active = 1",
                params![user_ref, now],
            )
            .map_err(db_err)?;
        tx.execute(
            "INSERT INTO recommendations (user_ref, set_json, is_active, created_at, updated_at) \
             VALUES (?1, ?2, 1, ?3, ?3)",
            params![user_ref, set_json, now],
        )
        .map_err(db_err)?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(db_err)?;

        info!(
            "Stored recommendation set {} for user {} ({} entries, {} superseded)",
            id,
            user_ref,
            set.entries.len(),
            superseded
        );
        Ok(id)
    }

    pub fn active_recommendations(&self, user_ref: &str) -> Result<Option<StoredRecommendation>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT id, user_ref, set_json, is_active, created_at, updated_at \
                 FROM recommendations WHERE user_ref = ?1 AND is_active = 1 \
                 ORDER BY id DESC LIMIT 1",
            )
            .map_err(db_err)?
            .query_row(params![user_ref], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })
            .optional()
            .map_err(db_err)?;

        match row {
            Some((id, user_ref, set_json, is_active, created_at, updated_at)) => {
                Ok(Some(StoredRecommendation {
                    id,
                    user_ref,
                    set: serde_json::from_str(&set_json)?,
                    is_active,
                    created_at,
                    updated_at,
                }))
            }
            None => Ok(None),
        }
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_course(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
        Ok(Course {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
            status: CourseStatus::from_db(&row.get::<_, String>("status")?),
            students_enrolled: row.get("students_enrolled")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Quiz row before the questions JSON is decoded.
struct QuizRow {
    id: i64,
    course_ref: String,
    section_ref: Option<String>,
    subsection_ref: Option<String>,
    title: String,
    description: Option<String>,
    questions_json: String,
    difficulty: String,
    time_limit: u32,
    passing_score: u8,
    is_active: bool,
    created_by: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl QuizRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            course_ref: row.get("course_ref")?,
            section_ref: row.get("section_ref")?,
            subsection_ref: row.get("subsection_ref")?,
            title: row.get("title")?,
            description: row.get("description")?,
            questions_json: row.get("questions_json")?,
            difficulty: row.get("difficulty")?,
            time_limit: row.get("time_limit")?,
            passing_score: row.get("passing_score")?,
            is_active: row.get("is_active")?,
            created_by: row.get("created_by")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_stored(self) -> Result<StoredQuiz> {
        let questions: Vec<QuizQuestion> = serde_json::from_str(&self.questions_json)?;
        Ok(StoredQuiz {
            id: self.id,
            course_ref: self.course_ref,
            section_ref: self.section_ref,
            subsection_ref: self.subsection_ref,
            created_by: self.created_by,
            quiz: coursesage_pipeline::Quiz {
                title: self.title,
                description: self.description.unwrap_or_default(),
                questions,
                difficulty: Difficulty::parse(&self.difficulty).unwrap_or_default(),
                time_limit: self.time_limit,
                passing_score: self.passing_score,
            },
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursesage_pipeline::{
        QuestionType, Quiz, RecommendationEntry, SkillLevel, Strategy,
    };
    use tempfile::TempDir;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn published(title: &str, category_id: Option<i64>, students: i64) -> NewCourse {
        NewCourse {
            title: title.into(),
            description: format!("About {}", title),
            category_id,
            status: CourseStatus::Published,
            students_enrolled: students,
        }
    }

    fn sample_quiz(title: &str) -> Quiz {
        Quiz {
            title: title.into(),
            description: "Basics".into(),
            questions: vec![QuizQuestion {
                question: "Is water wet?".into(),
                options: vec!["True".into(), "False".into()],
                correct_answer: 0,
                explanation: "Mostly.".into(),
                question_type: QuestionType::TrueFalse,
            }],
            difficulty: Difficulty::Easy,
            time_limit: 15,
            passing_score: 60,
        }
    }

    fn sample_set(course_ref: &str) -> RecommendationSet {
        RecommendationSet {
            strategy: Strategy::Similarity,
            skill_level: SkillLevel::Intermediate,
            user_interests: vec!["web".into()],
            completed_courses: vec![],
            learning_goals: vec!["get a job".into()],
            entries: vec![RecommendationEntry {
                course_ref: course_ref.into(),
                title: "Course".into(),
                score: 0.5,
                reason: "Matches".into(),
                category: None,
            }],
            narrative: None,
        }
    }

    #[test]
    fn test_seed_defaults_once() {
        let (store, _dir) = test_store();
        assert_eq!(store.seed_default_categories().unwrap(), 8);
        assert_eq!(store.seed_default_categories().unwrap(), 0);

        let names: Vec<String> = store.list_categories().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names[0], "Web Development");
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_category_validation_and_uniqueness() {
        let (store, _dir) = test_store();
        assert!(matches!(store.create_category("  ", None), Err(Error::Validation(_))));

        let cat = store.create_category("Science", Some("Natural sciences")).unwrap();
        assert_eq!(store.get_category(cat.id).unwrap().unwrap(), cat);
        assert!(matches!(store.create_category("Science", None), Err(Error::Conflict(_))));
    }

    #[test]
    fn test_add_course_to_category_is_idempotent() {
        let (store, _dir) = test_store();
        let cat = store.create_category("Design", None).unwrap();
        let course = store.create_course(published("Figma 101", None, 0)).unwrap();
        assert_eq!(course.category_id, None);

        assert_eq!(store.add_course_to_category(course.id, cat.id).unwrap(), AddCourseOutcome::Added);
        assert_eq!(
            store.add_course_to_category(course.id, cat.id).unwrap(),
            AddCourseOutcome::AlreadyPresent
        );
        let course = store.get_course(course.id).unwrap().unwrap();
        assert_eq!(course.category_name.as_deref(), Some("Design"));

        assert!(matches!(store.add_course_to_category(999, cat.id), Err(Error::NotFound(_))));
        assert!(matches!(store.add_course_to_category(course.id, 999), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_category_page_details() {
        let (store, _dir) = test_store();
        let web = store.create_category("Web", None).unwrap();
        let data = store.create_category("Data", None).unwrap();

        store.create_course(published("HTML", Some(web.id), 10)).unwrap();
        store.create_course(published("React", Some(web.id), 50)).unwrap();
        store.create_course(published("Pandas", Some(data.id), 30)).unwrap();
        store
            .create_course(NewCourse {
                title: "Draft course".into(),
                category_id: Some(web.id),
                ..Default::default()
            })
            .unwrap();

        let details = store.category_page_details(web.id).unwrap();
        let titles = |cs: &[Course]| cs.iter().map(|c| c.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&details.selected_courses), vec!["HTML", "React"]);
        assert_eq!(titles(&details.different_courses), vec!["Pandas"]);
        assert_eq!(titles(&details.most_selling_courses), vec!["React", "Pandas", "HTML"]);

        assert!(matches!(store.category_page_details(404), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_published_listing_and_validation() {
        let (store, _dir) = test_store();
        store.create_course(published("One", None, 0)).unwrap();
        store
            .create_course(NewCourse {
                title: "Hidden".into(),
                ..Default::default()
            })
            .unwrap();
        let listed = store.list_published_courses().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, CourseStatus::Published);

        assert!(matches!(store.create_course(NewCourse::default()), Err(Error::Validation(_))));
        assert!(matches!(
            store.create_course(published("Orphan", Some(77), 0)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_quiz_versions_newest_first() {
        let (store, _dir) = test_store();
        let first = sample_quiz("v1");
        let second = sample_quiz("v2");
        let new = |quiz| NewQuiz {
            course_ref: "42",
            section_ref: Some("s1"),
            subsection_ref: None,
            created_by: Some("instructor-7"),
            quiz,
        };
        store.save_quiz(new(&first)).unwrap();
        store.save_quiz(new(&second)).unwrap();

        let stored = store.quizzes_for_course("42").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].quiz.title, "v2");
        assert_eq!(stored[1].quiz, first);
        assert_eq!(stored[0].section_ref.as_deref(), Some("s1"));
        assert!(store.quizzes_for_course("other").unwrap().is_empty());
    }

    #[test]
    fn test_recommendations_supersede_and_keep_history() {
        let (store, _dir) = test_store();
        assert!(store.active_recommendations("u1").unwrap().is_none());

        store.replace_recommendations("u1", &sample_set("a")).unwrap();
        let second = store.replace_recommendations("u1", &sample_set("b")).unwrap();
        store.replace_recommendations("u2", &sample_set("c")).unwrap();

        let active = store.active_recommendations("u1").unwrap().unwrap();
        assert_eq!(active.id, second);
        assert_eq!(active.set.entries[0].course_ref, "b");
        assert_eq!(active.set.skill_level, SkillLevel::Intermediate);

        let conn = store.conn.lock();
        let (total, live): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), SUM(is_active) FROM recommendations WHERE user_ref = 'u1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((total, live), (2, 1));
    }
}
