use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::i18n::Language;
use crate::models::BiblicalMessage;

use super::provider::{observation_prompt, verse_prompt, AdvisoryProvider, ReadingSummary};

// Set to true to log rejected requests with the provider's error body
const ENABLE_LOGS: bool = true;

use crate::log_error;

const OBSERVATION_TEMPERATURE: f32 = 0.4;
const OBSERVATION_TOP_P: f32 = 0.8;

/// Advisory provider backed by the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: Value,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiProvider {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build advisory HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn generate(&self, prompt: &str, generation_config: Value) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("no advisory provider credential configured"))?;

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let request = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .context("advisory request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log_error!("{} rejected request: {status} {}", self.model, detail.trim());
            bail!("advisory provider returned status {status}");
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("advisory response was not valid JSON")?;
        debug!("advisory provider answered with {} candidates", body.candidates.len());

        body.text()
            .ok_or_else(|| anyhow!("advisory response carried no text"))
    }
}

#[async_trait]
impl AdvisoryProvider for GeminiProvider {
    async fn observe(&self, summaries: &[ReadingSummary], language: Language) -> Result<String> {
        let prompt = observation_prompt(summaries, language)?;
        self.generate(
            &prompt,
            json!({
                "temperature": OBSERVATION_TEMPERATURE,
                "topP": OBSERVATION_TOP_P,
            }),
        )
        .await
    }

    async fn verse(&self, language: Language) -> Result<BiblicalMessage> {
        let text = self
            .generate(
                &verse_prompt(language),
                json!({
                    "responseMimeType": "application/json",
                    "responseSchema": {
                        "type": "OBJECT",
                        "properties": {
                            "verse": { "type": "STRING" },
                            "reference": { "type": "STRING" },
                        },
                        "required": ["verse", "reference"],
                    },
                }),
            )
            .await?;

        parse_verse(&text)
    }
}

fn parse_verse(text: &str) -> Result<BiblicalMessage> {
    let message: BiblicalMessage =
        serde_json::from_str(text.trim()).context("verse payload did not match the schema")?;
    if !message.is_complete() {
        bail!("verse payload had empty fields");
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Stable " }, { "text": "trend." }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("Stable trend."));
    }

    #[test]
    fn blank_or_missing_candidates_have_no_text() {
        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());

        let blank: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }))
                .unwrap();
        assert!(blank.text().is_none());
    }

    #[test]
    fn verse_requires_both_fields() {
        let verse = parse_verse(r#"{"verse":"Be still.","reference":"Psalm 46:10"}"#).unwrap();
        assert_eq!(verse.reference, "Psalm 46:10");

        assert!(parse_verse(r#"{"verse":"Be still."}"#).is_err());
        assert!(parse_verse(r#"{"verse":"","reference":"Psalm 46:10"}"#).is_err());
        assert!(parse_verse("not json").is_err());
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let provider = GeminiProvider::new(&AppConfig::default()).unwrap();
        let err = provider.verse(Language::En).await.unwrap_err();
        assert!(err.to_string().contains("credential"));
    }
}
