pub mod commands;
pub mod dispatch;
pub mod modes;
pub mod router;

/// The currently active backend selection, governing how the next text
/// message is handled. Closed set; selection events carry one of the four
/// wire identifiers and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// General text generation (text-davinci-003).
    GeneralText,
    /// Code generation (code-davinci-002).
    CodeLarge,
    /// Faster code generation (code-cushman-001).
    CodeFast,
    /// Text-to-image generation.
    ImageGen,
}

impl Mode {
    /// Menu order: code models first, matching the selection keyboard.
    pub const ALL: [Mode; 4] = [
        Mode::CodeLarge,
        Mode::CodeFast,
        Mode::GeneralText,
        Mode::ImageGen,
    ];

    /// Wire identifier. Doubles as the completion model name for the text
    /// modes and as the callback data of the selection menu.
    pub fn id(&self) -> &'static str {
        match self {
            Mode::GeneralText => "text-davinci-003",
            Mode::CodeLarge => "code-davinci-002",
            Mode::CodeFast => "code-cushman-001",
            Mode::ImageGen => "image-generator",
        }
    }

    /// Resolves a wire identifier back to a mode. Anything outside the
    /// closed set yields `None`; the caller decides whether to ignore it.
    pub fn parse(s: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.id() == s)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::GeneralText
    }
}
