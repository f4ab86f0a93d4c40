//! Best-effort AI drafting of job descriptions and onboarding checklists.
//!
//! Failures never reach the caller: a missing credential or a failed call is
//! logged and replaced by a fixed fallback.

use std::future::Future;
use std::time::Duration;

use entity::employee::Operator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::repo::MAX_NAME_LEN;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const MISSING_CONFIG_DESCRIPTION: &str = "AI Configuration missing. Please set API_KEY.";
pub const FAILED_DESCRIPTION: &str = "Error generating description.";
pub const EMPTY_DESCRIPTION: &str = "No description generated.";
pub const MISSING_CONFIG_TASKS: [&str; 2] = ["Complete HR Paperwork", "IT Equipment Setup"];
pub const FAILED_TASKS: [&str; 1] = ["Error generating tasks"];

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("invalid {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Clone, Debug)]
pub struct DraftingConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DraftingConfig {
    /// Reads `API_KEY` (or `GEMINI_API_KEY`), `AI_MODEL`, `AI_ENDPOINT` and
    /// `AI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DraftError> {
        let var = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self {
            api_key: var("API_KEY").or_else(|| var("GEMINI_API_KEY")),
            ..Self::default()
        };
        if let Some(model) = var("AI_MODEL") {
            config.model = model;
        }
        if let Some(endpoint) = var("AI_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(raw) = var("AI_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(DraftError::InvalidConfig {
                    key: "AI_TIMEOUT_SECS",
                    value: raw,
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// Turns a prompt into completion text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, DraftError>> + Send;
}

/// Gemini `generateContent` over HTTPS.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    config: DraftingConfig,
}

impl GeminiClient {
    pub fn new(config: DraftingConfig) -> Result<Self, DraftError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DraftError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(DraftError::MissingCredential);
        };
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };
        debug!(model = %self.config.model, "requesting completion");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: GeminiResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub(crate) fn job_description_prompt(title: &str, department: &str, operator: Operator) -> String {
    format!(
        "Write a professional, concise job description (max 100 words) for a {title} position in the {department} department at {operator}. Focus on key responsibilities."
    )
}

pub(crate) fn onboarding_tasks_prompt(position_title: &str) -> String {
    format!(
        "List 5 key onboarding tasks for a new {position_title}. Return only the task names as a comma-separated list, no numbering or extra text."
    )
}

/// Splits a comma-separated completion into trimmed, non-empty names.
///
/// Names longer than [`MAX_NAME_LEN`] are cut so a prose reply still yields
/// storable tasks.
pub(crate) fn split_task_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.char_indices().nth(MAX_NAME_LEN) {
            Some((cut, _)) => name[..cut].trim_end().to_string(),
            None => name.to_string(),
        })
        .collect()
}

/// Drafting facade used by the resolvers and the checklist helpers.
#[derive(Clone, Debug)]
pub struct Drafter<G = GeminiClient> {
    generator: G,
}

impl Drafter<GeminiClient> {
    pub fn from_config(config: DraftingConfig) -> Result<Self, DraftError> {
        Ok(Self::new(GeminiClient::new(config)?))
    }
}

impl<G: TextGenerator> Drafter<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub async fn generate_job_description(
        &self,
        title: &str,
        department: &str,
        operator: Operator,
    ) -> String {
        let prompt = job_description_prompt(title, department, operator);
        match self.generator.generate(&prompt).await {
            Ok(text) if text.is_empty() => EMPTY_DESCRIPTION.to_string(),
            Ok(text) => text,
            Err(DraftError::MissingCredential) => {
                warn!("AI drafting requested without an API key");
                MISSING_CONFIG_DESCRIPTION.to_string()
            }
            Err(err) => {
                error!(error = %err, "job description generation failed");
                FAILED_DESCRIPTION.to_string()
            }
        }
    }

    pub async fn suggest_onboarding_tasks(&self, position_title: &str) -> Vec<String> {
        let prompt = onboarding_tasks_prompt(position_title);
        match self.generator.generate(&prompt).await {
            Ok(text) => split_task_list(&text),
            Err(DraftError::MissingCredential) => {
                warn!("AI task suggestions requested without an API key");
                MISSING_CONFIG_TASKS.iter().map(|s| s.to_string()).collect()
            }
            Err(err) => {
                error!(error = %err, "onboarding task suggestion failed");
                FAILED_TASKS.iter().map(|s| s.to_string()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    struct Canned(Result<&'static str, fn() -> DraftError>);

    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, DraftError> {
            match &self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    fn config_for(server: &Server, api_key: Option<&str>) -> DraftingConfig {
        DraftingConfig {
            api_key: api_key.map(str::to_string),
            endpoint: format!("{}/v1beta", server.url()),
            ..DraftingConfig::default()
        }
    }

    #[test]
    fn prompts_carry_the_inputs() {
        let prompt = job_description_prompt("Chef", "Kitchen", Operator::Kien);
        assert!(prompt.contains("for a Chef position in the Kitchen department at Kien"));
        assert!(prompt.contains("max 100 words"));
        assert!(onboarding_tasks_prompt("Driver").contains("for a new Driver"));
    }

    #[test]
    fn task_list_is_split_and_trimmed() {
        assert_eq!(
            split_task_list(" Safety briefing, ,Uniform fitting ,Route training,"),
            vec!["Safety briefing", "Uniform fitting", "Route training"]
        );
        assert!(split_task_list("  ").is_empty());
    }

    #[test]
    fn prose_reply_is_cut_to_a_storable_name() {
        let prose = "x".repeat(300);
        let names = split_task_list(&prose);
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].chars().count(), MAX_NAME_LEN);

        let multibyte = "é".repeat(MAX_NAME_LEN + 1);
        assert_eq!(split_task_list(&multibyte)[0].chars().count(), MAX_NAME_LEN);
    }

    #[tokio::test]
    async fn missing_credential_uses_configuration_fallbacks() {
        let drafter = Drafter::new(Canned(Err(|| DraftError::MissingCredential)));
        assert_eq!(
            drafter
                .generate_job_description("Chef", "Kitchen", Operator::DohaOasis)
                .await,
            MISSING_CONFIG_DESCRIPTION
        );
        assert_eq!(
            drafter.suggest_onboarding_tasks("Chef").await,
            vec!["Complete HR Paperwork", "IT Equipment Setup"]
        );
    }

    #[tokio::test]
    async fn failures_and_empty_replies_use_error_fallbacks() {
        let failing = Drafter::new(Canned(Err(|| DraftError::Status {
            status: 503,
            body: "overloaded".into(),
        })));
        assert_eq!(
            failing
                .generate_job_description("Chef", "Kitchen", Operator::Kien)
                .await,
            FAILED_DESCRIPTION
        );
        assert_eq!(
            failing.suggest_onboarding_tasks("Chef").await,
            vec!["Error generating tasks"]
        );

        let empty = Drafter::new(Canned(Ok("")));
        assert_eq!(
            empty
                .generate_job_description("Chef", "Kitchen", Operator::Kien)
                .await,
            EMPTY_DESCRIPTION
        );

        let blank = Drafter::new(Canned(Ok("  ")));
        assert_eq!(
            blank
                .generate_job_description("Chef", "Kitchen", Operator::Kien)
                .await,
            "  "
        );
    }

    #[tokio::test]
    async fn gemini_client_reads_first_candidate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex("onboarding tasks for a new Barista".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "Coffee machine training, "}, {"text": "Hygiene briefing"}],
                        "role": "model"
                    },
                    "finishReason": "STOP",
                    "index": 0
                }]
            }"#,
            )
            .create_async()
            .await;

        let drafter = Drafter::from_config(config_for(&server, Some("test-key"))).unwrap();
        let tasks = drafter.suggest_onboarding_tasks("Barista").await;
        assert_eq!(tasks, vec!["Coffee machine training", "Hygiene briefing"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_client_maps_http_errors_to_fallback() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let drafter = Drafter::from_config(config_for(&server, Some("test-key"))).unwrap();
        let text = drafter
            .generate_job_description("Chef", "Kitchen", Operator::Kien)
            .await;
        assert_eq!(text, FAILED_DESCRIPTION);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_client_without_key_never_calls_out() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let drafter = Drafter::from_config(config_for(&server, None)).unwrap();
        let text = drafter
            .generate_job_description("Chef", "Kitchen", Operator::Kien)
            .await;
        assert_eq!(text, MISSING_CONFIG_DESCRIPTION);
        mock.assert_async().await;
    }
}
