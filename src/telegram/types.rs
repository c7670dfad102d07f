//! Bot API payload types, limited to the fields the relay reads or writes.

use serde::{Deserialize, Serialize};

/// One inbound event from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

impl Message {
    /// The highest-resolution rendition of an attached photo.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo
            .iter()
            .max_by_key(|size| u64::from(size.width) * u64::from(size.height))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// A menu-selection event. `data` carries the wire identifier of the chosen
/// mode; `message` is the menu message the button was attached to.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// `getFile` result; `file_path` feeds the file download endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_update_deserializes() {
        let raw = r#"{
            "update_id": 7,
            "message": {
                "message_id": 101,
                "chat": { "id": 42 },
                "text": "Hello"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert_eq!(update.update_id, 7);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("Hello"));
        assert!(message.photo.is_empty());
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn largest_photo_picks_by_dimensions() {
        let raw = r#"{
            "message_id": 5,
            "chat": { "id": 9 },
            "caption": "look at this",
            "photo": [
                { "file_id": "small", "width": 90, "height": 90, "file_size": 1200 },
                { "file_id": "big", "width": 1280, "height": 1280 },
                { "file_id": "medium", "width": 320, "height": 320 }
            ]
        }"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.largest_photo().unwrap().file_id, "big");
        assert_eq!(message.caption.as_deref(), Some("look at this"));
        assert!(message.text.is_none());
    }

    #[test]
    fn callback_query_update_deserializes() {
        let raw = r#"{
            "update_id": 8,
            "callback_query": {
                "id": "cb-1",
                "data": "image-generator",
                "message": {
                    "message_id": 77,
                    "chat": { "id": 42 },
                    "text": "Please choose:"
                }
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.id, "cb-1");
        assert_eq!(query.data.as_deref(), Some("image-generator"));
        assert_eq!(query.message.unwrap().message_id, 77);
    }

    #[test]
    fn keyboard_serializes_to_bot_api_shape() {
        let markup = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "text-davinci-003".to_string(),
                callback_data: "text-davinci-003".to_string(),
            }]],
        };
        let value = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            value["inline_keyboard"][0][0]["callback_data"],
            "text-davinci-003"
        );
    }
}
