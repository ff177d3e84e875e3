//! App state: chat pane, input bar, log panel, command palette.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Who a chat message came from; drives the label and colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// One row group in the chat pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEntry {
    Message(Message),
    /// Client-side note (help text, reset confirmation). Never sent anywhere.
    Notice(String),
}

/// Somewhere chat messages can be shown.
pub trait MessageSink {
    /// Add a new entry at the end and bring it into view. Never deduplicates.
    fn append(&mut self, sender: Sender, text: String);
}

/// Chat pane: append-only entries plus scroll position.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub entries: Vec<ChatEntry>,
    /// Lines scrolled up from the bottom edge; 0 means the newest line is visible.
    pub scroll_back: usize,
    /// Largest useful `scroll_back`, refreshed on every draw.
    pub max_scroll: usize,
}

impl MessageSink for ChatState {
    fn append(&mut self, sender: Sender, text: String) {
        self.entries.push(ChatEntry::Message(Message { sender, text }));
        self.scroll_to_bottom();
    }
}

impl ChatState {
    pub fn notice(&mut self, text: impl Into<String>) {
        self.entries.push(ChatEntry::Notice(text.into()));
        self.scroll_to_bottom();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_back = 0;
        self.max_scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_back = self.max_scroll;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    /// Called by the renderer once it knows how many lines overflow the pane.
    pub fn set_max_scroll(&mut self, max: usize) {
        self.max_scroll = max;
        self.scroll_back = self.scroll_back.min(max);
    }
}

/// Input bar: text, byte cursor, focus.
#[derive(Clone, Debug)]
pub struct InputState {
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    pub cursor: usize,
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            focused: true,
        }
    }
}

impl InputState {
    pub fn insert(&mut self, c: char) {
        let pos = self.cursor.min(self.buffer.len());
        self.buffer.insert(pos, c);
        self.cursor = pos + c.len_utf8();
    }

    pub fn backspace(&mut self) {
        let pos = self.cursor.min(self.buffer.len());
        if let Some((idx, _)) = self.buffer[..pos].char_indices().next_back() {
            self.buffer.remove(idx);
            self.cursor = idx;
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

const MAX_LOG_ENTRIES: usize = 500;

/// In-app diagnostics panel, mirrored from the tracing log.
#[derive(Clone, Debug, Default)]
pub struct LogState {
    pub entries: VecDeque<LogEntry>,
    pub visible: bool,
}

impl LogState {
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.entries.len() == MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            level,
            message: message.into(),
            timestamp: Local::now(),
        });
    }
}

/// One local command offered by the palette.
#[derive(Clone, Debug)]
pub struct CommandEntry {
    pub name: String,
    pub description: String,
}

/// Command palette: visible, query after "/", filtered list, selection index.
#[derive(Clone, Debug, Default)]
pub struct PaletteState {
    pub visible: bool,
    pub query: String,
    pub commands: Vec<CommandEntry>,
    /// Indices into `commands` that match the query, best first.
    pub filtered: Vec<usize>,
    pub selected_index: usize,
    /// Set once the user moves the selection with the arrow keys.
    pub navigated: bool,
}

impl PaletteState {
    pub fn selected_command(&self) -> Option<&CommandEntry> {
        self.filtered.get(self.selected_index).and_then(|&i| self.commands.get(i))
    }

    /// What Enter should run for the typed `buffer`, if anything.
    ///
    /// A fuzzy hit alone is not enough: the selection counts only when it was
    /// picked by hand or when the buffer is the start of a command name.
    /// Otherwise the text is sent as typed.
    pub fn command_for_enter(&self, buffer: &str) -> Option<&CommandEntry> {
        if self.navigated {
            return self.selected_command();
        }
        let typed = buffer.trim().to_lowercase();
        if typed.len() <= 1 {
            return None;
        }
        self.filtered
            .iter()
            .filter_map(|&i| self.commands.get(i))
            .find(|c| c.name.starts_with(&typed))
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub chat: ChatState,
    pub input: InputState,
    pub history: Vec<String>,
    pub history_index: usize,
    pub palette: PaletteState,
    pub logs: LogState,
}
