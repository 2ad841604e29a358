//! Database schema SQL.

/// Catalog tables: categories, courses and the category ↔ course links.
pub const CATALOG_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    status TEXT NOT NULL DEFAULT 'Draft',
    students_enrolled INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS category_courses (
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    PRIMARY KEY (category_id, course_id)
);

CREATE INDEX IF NOT EXISTS idx_courses_status ON courses(status);
CREATE INDEX IF NOT EXISTS idx_category_courses_course ON category_courses(course_id);
"#;

/// Generated content: quizzes (versioned) and recommendation sets
/// (one active per user, older sets retained).
pub const AI_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS quizzes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_ref TEXT NOT NULL,
    section_ref TEXT,
    subsection_ref TEXT,
    title TEXT NOT NULL,
    description TEXT,
    questions_json TEXT NOT NULL,
    difficulty TEXT NOT NULL DEFAULT 'medium',
    time_limit INTEGER NOT NULL DEFAULT 30,
    passing_score INTEGER NOT NULL DEFAULT 70,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_by TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quizzes_course ON quizzes(course_ref, is_active);

CREATE TABLE IF NOT EXISTS recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_ref TEXT NOT NULL,
    set_json TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recommendations_user ON recommendations(user_ref, is_active);
CREATE INDEX IF NOT EXISTS idx_recommendations_created ON recommendations(created_at DESC);
"#;
