use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content::prompt::{SYSTEM_PROMPT, lesson_prompt};
use crate::content::{ContentGenerator, GenerateError, LessonRequest, parse_plan};
use crate::lesson::plan::LessonPlan;

/// Content generator backed by a chat-completions style HTTP API.
pub struct HttpGenerator {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl HttpGenerator {
    pub fn from_config(config: &Config) -> Result<Self, GenerateError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerateError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self {
            endpoint: format!(
                "{}/chat/completions",
                config.content_api_base.trim_end_matches('/')
            ),
            model: config.content_model.clone(),
            api_key,
            timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn request_body(&self, request: &LessonRequest) -> Result<String, GenerateError> {
        let prompt = lesson_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        Ok(serde_json::to_string(&body)?)
    }

    #[cfg(feature = "network")]
    fn post(&self, body: String) -> Result<String, GenerateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| GenerateError::Network(e.to_string()))?;
        let response = client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| GenerateError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Status(status.as_u16()));
        }
        response
            .text()
            .map_err(|e| GenerateError::Network(e.to_string()))
    }

    #[cfg(not(feature = "network"))]
    fn post(&self, _body: String) -> Result<String, GenerateError> {
        Err(GenerateError::Disabled)
    }
}

impl ContentGenerator for HttpGenerator {
    fn generate_lesson(&self, request: &LessonRequest) -> Result<LessonPlan, GenerateError> {
        tracing::info!(topic = %request.topic, model = %self.model, "requesting lesson");
        let body = self.request_body(request)?;
        let raw = self.post(body)?;
        let plan = parse_plan(&reply_text(&raw)?)?;
        tracing::info!(title = %plan.title, screens = plan.screens.len(), "lesson generated");
        Ok(plan)
    }
}

/// Pull the assistant message out of a chat-completions response body.
fn reply_text(raw: &str) -> Result<String, GenerateError> {
    let response: ChatResponse = serde_json::from_str(raw)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GenerateError::EmptyResponse)
}
