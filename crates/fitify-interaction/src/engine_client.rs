//! Shared HTTP plumbing for the engine endpoints.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use fitify_core::config::EngineSettings;
use fitify_core::generator::GenerationError;
use fitify_core::image::ImageRef;
use fitify_core::{FitifyError, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Error code the engine reports when the user is out of credit.
pub const INSUFFICIENT_CREDIT_CODE: &str = "INSUFFICIENT_COINS";

/// A configured connection to the generation engine.
#[derive(Clone)]
pub struct EngineClient {
    client: Client,
    base_url: String,
    user_id: Option<u64>,
}

impl EngineClient {
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| FitifyError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            user_id: settings.user_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `body` and decodes the JSON response, classifying failures.
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "Engine request");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::generic(format!("Engine request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|err| GenerationError::generic(format!("Failed to parse engine response: {err}")))
    }

    /// GETs a JSON document; failures are plain remote errors.
    pub(crate) async fn get_json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FitifyError::remote(format!("Request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FitifyError::remote(format!("{url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|err| FitifyError::remote(format!("Failed to parse response from {url}: {err}")))
    }
}

#[derive(serde::Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Classifies a non-success engine response.
///
/// `402 Payment Required` and an `INSUFFICIENT_COINS` code anywhere in the
/// error body mean the user is out of credit; everything else is generic.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
    let out_of_credit = status == StatusCode::PAYMENT_REQUIRED
        || [&parsed.code, &parsed.detail, &parsed.error, &parsed.message]
            .into_iter()
            .flatten()
            .any(|field| field == INSUFFICIENT_CREDIT_CODE);

    let message = [parsed.message, parsed.detail, parsed.error]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty() && m != INSUFFICIENT_CREDIT_CODE);

    if out_of_credit {
        GenerationError::insufficient_credit(
            message.unwrap_or_else(|| "Not enough credit".to_string()),
        )
    } else {
        let message = message
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| status.to_string());
        GenerationError::generic(message)
    }
}

/// Prepares an image for a request body.
///
/// Remote URLs and data URLs pass through; anything else is read as a local
/// file and sent as a base64 data URL.
pub async fn encode_image(image: &ImageRef) -> std::result::Result<String, GenerationError> {
    if image.is_remote() || image.is_inline() {
        return Ok(image.as_str().to_string());
    }

    let path = image.as_str().strip_prefix("file://").unwrap_or(image.as_str());
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| GenerationError::generic(format!("Failed to read image '{path}': {err}")))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        BASE64_STANDARD.encode(bytes)
    ))
}
