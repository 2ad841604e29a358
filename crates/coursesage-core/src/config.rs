//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths to all CourseSage data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
    /// AI tuning parameters (`data/ai-config.json`).
    pub ai_config_file: PathBuf,
    /// Completion provider configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            ai_config_file: root.join("ai-config.json"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        std::fs::create_dir_all(&paths.db)?;
        Ok(paths)
    }
}

/// Top-level CourseSage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSageConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// AI pipeline tuning.
    pub ai: AiConfig,
}

impl CourseSageConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5001);

        let data_paths = DataPaths::new(data_dir)?;
        let ai = AiConfig::load(&data_paths.ai_config_file);

        Ok(Self {
            port,
            data_paths,
            ai,
        })
    }
}

/// Fixed sampling and transport settings for completion calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub max_tokens: usize,
    pub temperature: f64,
    /// Per-request timeout applied to every outbound provider call.
    pub request_timeout_secs: u64,
    /// Pause before the single retry on a transient failure.
    pub retry_backoff_ms: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
            request_timeout_secs: 30,
            retry_backoff_ms: 500,
        }
    }
}

/// Upper bound on `completion.max_tokens` read from the config file.
pub const MAX_COMPLETION_TOKENS: usize = 32_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAnalysisSettings {
    pub min_keywords: usize,
    pub max_keywords: usize,
    /// Word budget handed to the summary prompt.
    pub summary_length: usize,
}

impl Default for ContentAnalysisSettings {
    fn default() -> Self {
        Self {
            min_keywords: 3,
            max_keywords: 10,
            summary_length: 150,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    pub min_similarity_score: f64,
    pub max_recommendations: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            min_similarity_score: 0.3,
            max_recommendations: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub max_questions: usize,
    pub default_questions: usize,
    pub question_types: Vec<String>,
    /// Minutes.
    pub default_time_limit: u32,
    /// Percentage.
    pub default_passing_score: u8,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            max_questions: 10,
            default_questions: 5,
            question_types: vec![
                "multiple-choice".into(),
                "true-false".into(),
                "short-answer".into(),
            ],
            default_time_limit: 30,
            default_passing_score: 70,
        }
    }
}

/// AI pipeline configuration (persisted to ai-config.json).
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub completion: CompletionSettings,
    pub content_analysis: ContentAnalysisSettings,
    pub recommendation: RecommendationSettings,
    pub quiz: QuizSettings,
}

impl AiConfig {
    /// Load config from file, falling back to defaults when absent or invalid.
    pub fn load(config_path: &Path) -> Self {
        let raw = match std::fs::read_to_string(config_path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str::<AiConfig>(&raw) {
            Ok(config) => {
                info!("Loaded AI config from {}", config_path.display());
                config.sanitized()
            }
            Err(e) => {
                warn!(
                    "Ignoring invalid AI config at {}: {}",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Clamp values that would make the pipeline misbehave.
    fn sanitized(mut self) -> Self {
        self.completion.max_tokens = self.completion.max_tokens.clamp(1, MAX_COMPLETION_TOKENS);
        let analysis = &mut self.content_analysis;
        analysis.min_keywords = analysis.min_keywords.max(1);
        analysis.max_keywords = analysis.max_keywords.max(analysis.min_keywords);
        self.quiz.question_types = self
            .quiz
            .question_types
            .iter()
            .map(|name| name.trim().to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        if self.quiz.question_types.is_empty() {
            self.quiz.question_types = QuizSettings::default().question_types;
        }
        self.recommendation.min_similarity_score =
            self.recommendation.min_similarity_score.clamp(0.0, 1.0);
        self.quiz.max_questions = self.quiz.max_questions.max(1);
        self.quiz.default_questions = self.quiz.default_questions.clamp(1, self.quiz.max_questions);
        self.quiz.default_passing_score = self.quiz.default_passing_score.min(100);
        self.quiz.default_time_limit = self.quiz.default_time_limit.max(1);
        self
    }
}
