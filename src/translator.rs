//! Machine-translation provider client.
//!
//! Speaks a Translate-v2-shaped REST API: one POST per text, with the target
//! language and a format hint (`html` keeps markup intact, `text` treats the
//! input as plain text). The client is injected into the service layer so it
//! can be swapped for a mock in tests.
//!
//! An unconfigured client (missing endpoint or API key) degrades to an
//! identity function: every call returns its input unchanged. Callers decide
//! whether a provider *error* is fatal; unconfigured is never an error.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::language::Language;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationData,
}

#[derive(Debug, Deserialize)]
struct TranslationData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Clone)]
pub struct Translator {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    provider: String,
}

impl Translator {
    /// Build a translator. `endpoint` and `api_key` are both required for
    /// the client to be configured; leaving either out yields the identity
    /// passthrough client.
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        provider: String,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint,
            api_key,
            provider,
        }
    }

    /// Identity-only translator for environments without a provider.
    pub fn unconfigured() -> Self {
        Self::new(None, None, "none".to_string(), Duration::from_secs(30))
    }

    /// The provider name recorded in translation metadata.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    /// Translate an HTML body, preserving markup.
    pub async fn translate_html(
        &self,
        html: &str,
        target: Language,
    ) -> Result<String, EngineError> {
        self.translate(html, target, "html").await
    }

    /// Translate a plain-text snippet.
    pub async fn translate_text(
        &self,
        text: &str,
        target: Language,
    ) -> Result<String, EngineError> {
        self.translate(text, target, "text").await
    }

    async fn translate(
        &self,
        input: &str,
        target: Language,
        format: &str,
    ) -> Result<String, EngineError> {
        let (Some(endpoint), Some(api_key)) = (&self.endpoint, &self.api_key) else {
            debug!(target = target.code(), "translator unconfigured, passing input through");
            return Ok(input.to_string());
        };

        if input.is_empty() {
            return Ok(String::new());
        }

        let request = TranslateRequest {
            q: input,
            target: target.code(),
            format,
        };

        let response = self
            .client
            .post(endpoint)
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::TranslationProviderError {
                detail: format!("request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(EngineError::TranslationProviderError {
                detail: format!("{}: {}", status, body),
            });
        }

        let parsed: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| EngineError::TranslationProviderError {
                    detail: format!("invalid response: {}", e),
                })?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| EngineError::TranslationProviderError {
                detail: "response contained no translations".to_string(),
            })
    }
}
