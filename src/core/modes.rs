use std::collections::HashMap;
use std::sync::Mutex;

use super::Mode;

/// Whether one selected mode is shared by every chat or tracked per chat.
///
/// The global scope matches the original single-operator behavior: a
/// selection in any chat affects every in-flight message. Per-chat scope
/// isolates conversations from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeScope {
    Global,
    PerChat,
}

impl ModeScope {
    pub fn parse(s: &str) -> Option<ModeScope> {
        match s {
            "global" => Some(ModeScope::Global),
            "per-chat" => Some(ModeScope::PerChat),
            _ => None,
        }
    }
}

/// Holds the active mode for the dispatch layer. Reads and writes are
/// mutex-guarded; there is no other shared mutable state in the process.
#[derive(Debug)]
pub struct ModeStore {
    scope: ModeScope,
    default: Mode,
    global: Mutex<Mode>,
    per_chat: Mutex<HashMap<i64, Mode>>,
}

impl ModeStore {
    pub fn new(scope: ModeScope, default: Mode) -> Self {
        Self {
            scope,
            default,
            global: Mutex::new(default),
            per_chat: Mutex::new(HashMap::new()),
        }
    }

    /// The mode governing the next message in `chat_id`. A chat that never
    /// made a selection gets the startup default.
    pub fn get(&self, chat_id: i64) -> Mode {
        match self.scope {
            ModeScope::Global => *self.global.lock().unwrap(),
            ModeScope::PerChat => self
                .per_chat
                .lock()
                .unwrap()
                .get(&chat_id)
                .copied()
                .unwrap_or(self.default),
        }
    }

    pub fn set(&self, chat_id: i64, mode: Mode) {
        match self.scope {
            ModeScope::Global => *self.global.lock().unwrap() = mode,
            ModeScope::PerChat => {
                self.per_chat.lock().unwrap().insert(chat_id, mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parsing() {
        assert_eq!(ModeScope::parse("global"), Some(ModeScope::Global));
        assert_eq!(ModeScope::parse("per-chat"), Some(ModeScope::PerChat));
        assert_eq!(ModeScope::parse("per_chat"), None);
        assert_eq!(ModeScope::parse(""), None);
    }

    #[test]
    fn global_scope_shares_one_mode_across_chats() {
        let store = ModeStore::new(ModeScope::Global, Mode::GeneralText);
        assert_eq!(store.get(1), Mode::GeneralText);

        store.set(1, Mode::ImageGen);
        assert_eq!(store.get(1), Mode::ImageGen);
        assert_eq!(store.get(2), Mode::ImageGen);
    }

    #[test]
    fn per_chat_scope_isolates_selections() {
        let store = ModeStore::new(ModeScope::PerChat, Mode::GeneralText);

        store.set(1, Mode::CodeLarge);
        store.set(2, Mode::ImageGen);

        assert_eq!(store.get(1), Mode::CodeLarge);
        assert_eq!(store.get(2), Mode::ImageGen);
        assert_eq!(store.get(3), Mode::GeneralText);
    }

    #[test]
    fn reselecting_the_same_mode_is_idempotent() {
        let store = ModeStore::new(ModeScope::Global, Mode::GeneralText);
        store.set(1, Mode::CodeFast);
        store.set(1, Mode::CodeFast);
        assert_eq!(store.get(1), Mode::CodeFast);
    }
}
