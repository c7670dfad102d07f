use anyhow::{anyhow, Result};
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::Backend;

const BASE_URL: &str = "https://api.openai.com/v1";

/// Completion cap and sampling, pinned for all text modes.
pub const MAX_COMPLETION_TOKENS: u32 = 200;
pub const COMPLETION_TEMPERATURE: f64 = 0.5;

/// Every image operation requests exactly one result at this size.
pub const IMAGE_COUNT: u32 = 1;
pub const IMAGE_SIZE: &str = "1024x1024";

// ── Client ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).unwrap(),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Single-shot text completion against the given model.
    async fn completion(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(self.headers())
            .json(&completion_body(model, prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let data: Value = response.json().await?;
        Ok(data["choices"][0]["text"].as_str().unwrap_or("").to_string())
    }

    /// Text-to-image; the response carries a URL to the hosted result.
    async fn generation(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/images/generations", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(self.headers())
            .json(&generation_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let data: Value = response.json().await?;
        image_url(&data)
    }

    /// Image-to-image variation. The endpoint only accepts alpha-capable
    /// containers, so `png` must already be the re-encoded photo.
    async fn variation(&self, png: Vec<u8>) -> Result<String> {
        let part = Part::bytes(png)
            .file_name("photo.png")
            .mime_str("image/png")?;
        let form = Form::new()
            .part("image", part)
            .text("n", IMAGE_COUNT.to_string())
            .text("size", IMAGE_SIZE);

        let url = format!("{}/images/variations", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let data: Value = response.json().await?;
        image_url(&data)
    }
}

impl Backend for OpenAiClient {
    fn complete<'a>(&'a self, model: &'a str, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.completion(model, prompt))
    }

    fn generate_image<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.generation(prompt))
    }

    fn vary_image(&self, png: Vec<u8>) -> BoxFuture<'_, Result<String>> {
        Box::pin(self.variation(png))
    }
}

// ── Request / response helpers ──────────────────────────────────────────

fn completion_body(model: &str, prompt: &str) -> Value {
    // No stop sequence; the token cap ends the completion.
    serde_json::json!({
        "model": model,
        "prompt": prompt,
        "max_tokens": MAX_COMPLETION_TOKENS,
        "n": 1,
        "temperature": COMPLETION_TEMPERATURE,
    })
}

fn generation_body(prompt: &str) -> Value {
    serde_json::json!({
        "prompt": prompt,
        "n": IMAGE_COUNT,
        "size": IMAGE_SIZE,
    })
}

fn image_url(data: &Value) -> Result<String> {
    data["data"][0]["url"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("image response carries no URL"))
}

async fn api_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(json) = serde_json::from_str::<Value>(&body) {
        if let Some(mapped) = parse_openai_error(&json) {
            return anyhow!("OpenAI API error {}: {}", status, mapped);
        }
    }
    let preview: String = body.chars().take(200).collect();
    anyhow!("OpenAI API error {}: {}", status, preview)
}

fn parse_openai_error(data: &Value) -> Option<String> {
    let error = data.get("error")?;
    let message = error
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown error");
    match error.get("type").and_then(|v| v.as_str()) {
        Some(kind) => Some(format!("{} ({})", message, kind)),
        None => Some(message.to_string()),
    }
}
