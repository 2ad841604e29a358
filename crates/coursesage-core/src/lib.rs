//! CourseSage Core: configuration, data directories, shared error type.

pub mod config;
pub mod error;

pub use config::{
    AiConfig, CompletionSettings, ContentAnalysisSettings, CourseSageConfig, DataPaths,
    QuizSettings, RecommendationSettings,
};
pub use error::{Error, Result};
