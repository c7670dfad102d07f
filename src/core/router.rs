use super::Mode;
use crate::telegram::types::Message;

/// One inbound content event, reduced to what routing needs: best-effort
/// text and the reference to the largest attached photo, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentEvent {
    pub text: String,
    pub photo: Option<String>,
}

impl ContentEvent {
    /// Extracts the routable view of a chat message. Text falls back to the
    /// caption and then to the empty string, so an unsupported attachment
    /// still produces a routable event.
    pub fn from_message(message: &Message) -> Self {
        Self {
            text: message
                .text
                .clone()
                .or_else(|| message.caption.clone())
                .unwrap_or_default(),
            photo: message.largest_photo().map(|p| p.file_id.clone()),
        }
    }
}

/// The three response paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Produce a visually varied version of the attached photo.
    VaryImage { file_id: String },
    /// Synthesize an image from the message text.
    GenerateImage { prompt: String },
    /// Complete the message text against the selected model.
    Complete {
        model: &'static str,
        prompt: String,
    },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::VaryImage { .. } => "image-variation",
            Route::GenerateImage { .. } => "image-generation",
            Route::Complete { .. } => "text-completion",
        }
    }
}

/// Decides the response path for one message. The priority order is fixed:
/// an attached photo always wins, then the image-generation mode, then text
/// completion against the current mode's model.
pub fn route(event: ContentEvent, mode: Mode) -> Route {
    if let Some(file_id) = event.photo {
        return Route::VaryImage { file_id };
    }
    match mode {
        Mode::ImageGen => Route::GenerateImage { prompt: event.text },
        mode => Route::Complete {
            model: mode.id(),
            prompt: event.text,
        },
    }
}
