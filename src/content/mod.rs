pub mod bundled;
pub mod client;
pub mod prompt;

use thiserror::Error;

use crate::lesson::plan::{LessonPlan, PlanError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("content request failed: {0}")]
    Network(String),
    #[error("content service returned HTTP {0}")]
    Status(u16),
    #[error("content service returned no lesson text")]
    EmptyResponse,
    #[error("could not parse lesson JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("generated lesson is unusable: {0}")]
    InvalidPlan(#[from] PlanError),
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("network support was disabled at build time")]
    Disabled,
}

/// What to ask the content generator for.
#[derive(Clone, Debug)]
pub struct LessonRequest {
    pub topic: String,
    pub node_index: usize,
    /// Language used for code widgets.
    pub language: String,
}

impl LessonRequest {
    pub fn new(topic: &str, node_index: usize) -> Self {
        Self {
            topic: topic.to_string(),
            node_index,
            language: "python".to_string(),
        }
    }
}

pub trait ContentGenerator {
    fn generate_lesson(&self, request: &LessonRequest) -> Result<LessonPlan, GenerateError>;
}

/// Parse generator output into a checked plan. Tolerates Markdown fences and
/// prose around the JSON object.
pub fn parse_plan(text: &str) -> Result<LessonPlan, GenerateError> {
    let body = extract_json_object(text).ok_or(GenerateError::EmptyResponse)?;
    let plan: LessonPlan = serde_json::from_str(body)?;
    plan.validate()?;
    Ok(plan)
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
