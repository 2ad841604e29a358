//! AI service façade: prompt → completion → parse.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use coursesage_chat::{ChatCompleter, CompletionError};
use coursesage_core::AiConfig;
use coursesage_extract::{analyze, extract_keywords, ContentFeatures};

use crate::parser::{
    self, report_fallback, FallbackCounters, FallbackKind, FallbackSnapshot,
};
use crate::prompts::{build_prompt, clamp_question_count, AnalysisRequest, PromptPlan};
use crate::recommend::{map_narrative, open_candidates, score_by_similarity};
use crate::types::*;

/// Request-scoped AI operations over one completion provider.
///
/// Holds no per-request state; concurrent calls share only the
/// read-only config and the atomic fallback counters.
pub struct AiService {
    completer: Arc<dyn ChatCompleter>,
    config: AiConfig,
    counters: FallbackCounters,
}

impl AiService {
    pub fn new(completer: Arc<dyn ChatCompleter>, config: AiConfig) -> Self {
        Self {
            completer,
            config,
            counters: FallbackCounters::default(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.completer.is_available()
    }

    pub fn model(&self) -> Option<&str> {
        self.completer.model()
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn fallback_counts(&self) -> FallbackSnapshot {
        self.counters.snapshot()
    }

    async fn run(
        &self,
        plan: &PromptPlan,
        cancel: &CancellationToken,
    ) -> Result<String, CompletionError> {
        debug!(
            "Running {} prompt ({} messages, max_tokens={})",
            plan.task.as_str(),
            plan.messages.len(),
            plan.max_tokens
        );
        self.completer
            .complete(&plan.messages, plan.max_tokens, plan.temperature, cancel)
            .await
    }

    /// Keywords and entities for a text. No provider involved.
    pub fn analyze(&self, text: &str) -> ContentFeatures {
        let settings = &self.config.content_analysis;
        let features = analyze(text, settings.max_keywords.max(settings.min_keywords));
        if features.keywords.len() < settings.min_keywords {
            debug!(
                "Sparse text: {} keywords, expected at least {}",
                features.keywords.len(),
                settings.min_keywords
            );
        }
        features
    }

    /// Configured question types the parser accepts. Unknown names are ignored.
    fn allowed_question_types(&self) -> Vec<QuestionType> {
        self.config
            .quiz
            .question_types
            .iter()
            .filter_map(|name| QuestionType::parse(name))
            .collect()
    }

    /// Concise summary, or a canned message when the provider fails.
    pub async fn generate_summary(&self, content: &str, cancel: &CancellationToken) -> String {
        let plan = build_prompt(&AnalysisRequest::Summary { content }, &self.config);
        let result = self.run(&plan, cancel).await;
        parser::interpret_text(TaskType::Summary, result, &self.counters).value
    }

    /// Answer a learner's question with optional lesson context.
    pub async fn learning_assistant(
        &self,
        question: &str,
        context: Option<&str>,
        cancel: &CancellationToken,
    ) -> String {
        let plan = build_prompt(&AnalysisRequest::Qa { question, context }, &self.config);
        let result = self.run(&plan, cancel).await;
        parser::interpret_text(TaskType::Qa, result, &self.counters).value
    }

    /// Generate a quiz. Always returns a structurally valid quiz; when the
    /// provider is off or misbehaves it holds the single fallback question
    /// and `degraded` is set.
    pub async fn generate_quiz(&self, request: &QuizRequest, cancel: &CancellationToken) -> QuizOutcome {
        let settings = &self.config.quiz;
        let count = clamp_question_count(request.num_questions, settings);

        let plan = build_prompt(
            &AnalysisRequest::Quiz {
                content: &request.content,
                num_questions: Some(count),
            },
            &self.config,
        );
        let result = self.run(&plan, cancel).await;
        let parsed = parser::interpret_quiz(result, count, &self.allowed_question_types(), &self.counters);
        if !parsed.degraded() {
            info!(
                "Generated {} quiz questions for course {}",
                parsed.value.len(),
                request.course_ref
            );
        }

        let keywords = extract_keywords(&request.content);
        let title = non_blank(request.title.as_deref()).unwrap_or_else(|| default_title(&keywords));
        let description = non_blank(request.description.as_deref())
            .unwrap_or_else(|| default_description(&keywords));

        QuizOutcome {
            degraded: parsed.degraded(),
            quiz: Quiz {
                title,
                description,
                questions: parsed.value,
                difficulty: request.difficulty.unwrap_or_default(),
                time_limit: request.time_limit.unwrap_or(settings.default_time_limit).max(1),
                passing_score: request
                    .passing_score
                    .map(|p| p.min(100) as u8)
                    .unwrap_or(settings.default_passing_score)
                    .min(100),
            },
        }
    }

    /// Rank the catalog for a user.
    ///
    /// The provider strategy yields `Unavailable` when the provider is off or
    /// fails; the similarity strategy never calls the provider.
    pub async fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
        catalog: &[CourseCandidate],
        cancel: &CancellationToken,
    ) -> RecommendationOutcome {
        let candidates = open_candidates(catalog, &request.completed_courses);

        let (entries, narrative) = match request.strategy {
            Strategy::Similarity => (
                score_by_similarity(&request.interests, &candidates, &self.config.recommendation),
                None,
            ),
            Strategy::Provider => {
                let available: Vec<String> = candidates.iter().map(|c| c.title.clone()).collect();
                let plan = build_prompt(
                    &AnalysisRequest::Recommendation {
                        interests: &request.interests,
                        completed: &completed_titles(catalog, &request.completed_courses),
                        available: &available,
                        learning_goals: &request.learning_goals,
                        skill_level: request.skill_level,
                    },
                    &self.config,
                );
                let result = self.run(&plan, cancel).await;
                let parsed = parser::interpret_text(TaskType::Recommendation, result, &self.counters);
                if parsed.degraded() {
                    return RecommendationOutcome::Unavailable(parsed.value);
                }

                let entries = map_narrative(&parsed.value, &candidates);
                if entries.is_empty() && !candidates.is_empty() {
                    // Narrative kept for display; nothing resolvable to the catalog.
                    report_fallback(
                        &self.counters,
                        TaskType::Recommendation,
                        FallbackKind::MalformedOutput,
                        "no catalog title found in narrative",
                    );
                }
                (entries, Some(parsed.value))
            }
        };

        info!(
            "Recommended {} courses for user {} ({})",
            entries.len(),
            request.user_ref,
            request.strategy.as_str()
        );

        RecommendationOutcome::Success(RecommendationSet {
            strategy: request.strategy,
            skill_level: request.skill_level,
            user_interests: request.interests.clone(),
            completed_courses: request.completed_courses.clone(),
            learning_goals: request.learning_goals.clone(),
            entries,
            narrative,
        })
    }
}

/// Completed course refs shown to the model as titles where the catalog
/// knows them.
fn completed_titles(catalog: &[CourseCandidate], completed: &[String]) -> Vec<String> {
    completed
        .iter()
        .map(|c| {
            catalog
                .iter()
                .find(|course| &course.course_ref == c)
                .map(|course| course.title.clone())
                .unwrap_or_else(|| c.clone())
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn default_title(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "Course Quiz".to_string()
    } else {
        format!("Quiz: {}", keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", "))
    }
}

fn default_description(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "Questions generated from the course content.".to_string()
    } else {
        format!("Questions covering {}.", keywords.join(", "))
    }
}
