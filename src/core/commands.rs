use super::Mode;
use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Prompt shown above the selection keyboard.
pub const CHOOSE_PROMPT: &str = "Please choose:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Any other slash command; never routed to the backend.
    Other(String),
}

/// Parses a leading slash command. Plain text returns `None` and stays on
/// the reply path.
pub fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let name = trimmed.split_whitespace().next().unwrap_or(trimmed);
    // Group chats address commands as /start@botname.
    let name = name.split('@').next().unwrap_or(name).to_lowercase();
    match name.as_str() {
        "/start" => Some(Command::Start),
        "/help" => Some(Command::Help),
        _ => Some(Command::Other(name)),
    }
}

/// The selection keyboard: one button per mode, labeled with its wire
/// identifier, code models on the first row.
pub fn mode_keyboard() -> InlineKeyboardMarkup {
    let button = |mode: Mode| InlineKeyboardButton {
        text: mode.id().to_string(),
        callback_data: mode.id().to_string(),
    };
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![button(Mode::CodeLarge), button(Mode::CodeFast)],
            vec![button(Mode::GeneralText)],
            vec![button(Mode::ImageGen)],
        ],
    }
}

/// Acknowledgment text sent after a selection event.
pub fn selection_ack(mode: Mode) -> String {
    format!("Selected option: {}", mode.id())
}

pub fn help_text() -> String {
    let modes: Vec<String> = Mode::ALL.iter().map(|m| format!("  - {}", m.id())).collect();
    format!(
        "Send a message and the selected model replies.\n\n\
         Models (pick one with /start):\n{}\n\n\
         In image-generator mode your text becomes a 1024x1024 image.\n\
         Attach a photo to get a varied version of it, whatever the mode.",
        modes.join("\n")
    )
}
