//! CourseSage Pipeline: prompt → completion → parse, with fallback.
//!
//! [`AiService`] is the only entry point the HTTP layer uses. Every public
//! operation returns a well-typed value: provider absence, transport errors,
//! cancellation and malformed output are absorbed here and reported through
//! [`FallbackCounters`] and `coursesage::fallback` log events.

pub mod parser;
pub mod prompts;
pub mod recommend;
pub mod service;
pub mod types;

pub use parser::{FallbackCounters, FallbackKind, FallbackSnapshot};
pub use prompts::{AnalysisRequest, PromptPlan};
pub use service::AiService;
pub use types::*;
