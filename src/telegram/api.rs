use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::types::{FileInfo, InlineKeyboardMarkup, Update};

const BASE_URL: &str = "https://api.telegram.org";

/// Non-ok Bot API envelope, e.g. a bad chat id or a malformed keyboard.
#[derive(Debug, thiserror::Error)]
#[error("telegram {method} failed: {description} (code {code})")]
pub struct ApiError {
    pub method: String,
    pub code: i64,
    pub description: String,
}

/// Every Bot API response arrives in this envelope, errors included.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        if self.ok {
            self.result
                .ok_or_else(|| anyhow!("telegram {}: ok response without result", method))
        } else {
            Err(ApiError {
                method: method.to_string(),
                code: self.error_code.unwrap_or(0),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            }
            .into())
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let response = self.http.post(&url).json(&body).send().await?;
        // The envelope is JSON for error statuses too; parse before checking.
        let raw = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&raw).map_err(|e| {
            let preview: String = raw.chars().take(200).collect();
            anyhow!("telegram {}: invalid response ({}): {}", method, e, preview)
        })?;
        envelope.into_result(method)
    }

    /// Long poll for inbound events, confirming everything before `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            serde_json::json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: Value = self
            .call(
                "sendMessage",
                serde_json::json!({ "chat_id": chat_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    pub async fn send_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        markup: &InlineKeyboardMarkup,
    ) -> Result<()> {
        let _: Value = self
            .call(
                "sendMessage",
                serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "reply_markup": markup,
                }),
            )
            .await?;
        Ok(())
    }

    /// Sends a photo by URL; the platform fetches and renders it.
    pub async fn send_photo(&self, chat_id: i64, url: &str) -> Result<()> {
        let _: Value = self
            .call(
                "sendPhoto",
                serde_json::json!({ "chat_id": chat_id, "photo": url }),
            )
            .await?;
        Ok(())
    }

    /// Callbacks must always be answered, some clients keep the button
    /// spinner running otherwise.
    pub async fn answer_callback_query(&self, query_id: &str) -> Result<()> {
        let _: Value = self
            .call(
                "answerCallbackQuery",
                serde_json::json!({ "callback_query_id": query_id }),
            )
            .await?;
        Ok(())
    }

    pub async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        let _: Value = self
            .call(
                "editMessageText",
                serde_json::json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": text,
                }),
            )
            .await?;
        Ok(())
    }

    /// Resolves a file id and downloads its bytes through the file endpoint.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let info: FileInfo = self
            .call("getFile", serde_json::json!({ "file_id": file_id }))
            .await?;
        let path = info
            .file_path
            .ok_or_else(|| anyhow!("telegram getFile: no file_path for {}", file_id))?;

        let url = format!("{}/file/bot{}/{}", self.base_url, self.token, path);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "telegram file download failed: HTTP {}",
                response.status()
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_unwraps_the_result() {
        let raw = r#"{
            "ok": true,
            "result": [{ "update_id": 3, "message": {
                "message_id": 1, "chat": { "id": 5 }, "text": "hi"
            }}]
        }"#;
        let envelope: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        let updates = envelope.into_result("getUpdates").unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 3);
    }

    #[test]
    fn error_envelope_maps_to_api_error() {
        let raw = r#"{ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" }"#;
        let envelope: ApiResponse<Value> = serde_json::from_str(raw).unwrap();
        let err = envelope.into_result("sendMessage").unwrap_err();
        let api = err.downcast::<ApiError>().unwrap();
        assert_eq!(api.code, 400);
        assert_eq!(api.method, "sendMessage");
        assert!(api.description.contains("chat not found"));
    }

    #[test]
    fn ok_envelope_without_result_is_an_error() {
        let raw = r#"{ "ok": true }"#;
        let envelope: ApiResponse<Value> = serde_json::from_str(raw).unwrap();
        let err = envelope.into_result("getFile").unwrap_err().to_string();
        assert!(err.contains("without result"));
    }
}
