//! Global state container, action dispatch, and the request lifecycle.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::actions::Action;
use crate::backend::{ChatBackend, ChatReply};
use crate::commands::{help_text, registry, update_palette_filter, LocalCommand};
use crate::error::ClientError;
use crate::services::{parse_local_command, prepare_message, reply_text, CONNECTION_ERROR_TEXT};
use crate::state::{AppState, LogLevel, MessageSink, Sender};

const PAGE_LINES: usize = 10;
const RESET_NOTICE: &str = "Conversation réinitialisée.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    Chat,
    Reset,
}

impl RequestKind {
    /// Outcome for a request whose task died before answering.
    fn abandoned(self) -> Outcome {
        match self {
            RequestKind::Chat => Outcome::Chat(Err(ClientError::Abandoned)),
            RequestKind::Reset => Outcome::Reset(Err(ClientError::Abandoned)),
        }
    }
}

#[derive(Debug)]
enum Outcome {
    Chat(Result<ChatReply, ClientError>),
    Reset(Result<(), ClientError>),
}

/// The single request allowed in flight. The input bar is disabled for exactly
/// as long as one of these is held by `App`.
struct PendingRequest {
    kind: RequestKind,
    rx: oneshot::Receiver<Outcome>,
}

pub struct App {
    pub state: AppState,
    backend: Arc<dyn ChatBackend>,
    runtime: Handle,
    pending: Option<PendingRequest>,
    pub should_quit: bool,
    /// For spinner animation (incremented each tick).
    pub tick: usize,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, runtime: Handle) -> Self {
        Self {
            state: AppState::default(),
            backend,
            runtime,
            pending: None,
            should_quit: false,
            tick: 0,
        }
    }

    pub fn bootstrap(&mut self) {
        self.state.palette.commands = registry();
        update_palette_filter(&mut self.state.palette);
        let url = self.backend.base_url().to_string();
        self.record(LogLevel::Info, format!("using server {url}"));
        self.state.chat.notice(format!(
            "Connecté à {url}. Tapez un message puis Entrée. / pour les commandes."
        ));
    }

    pub fn server_url(&self) -> &str {
        self.backend.base_url()
    }

    pub fn input_disabled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn input_has_focus(&self) -> bool {
        self.state.input.focused && !self.input_disabled()
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,

            Action::Char(c) => {
                if self.input_disabled() {
                    return;
                }
                self.state.input.focused = true;
                self.state.input.insert(c);
                self.sync_palette_query();
            }
            Action::Backspace => {
                if self.input_disabled() {
                    return;
                }
                self.state.input.backspace();
                if self.state.palette.visible && !self.state.input.buffer.starts_with('/') {
                    self.state.palette.visible = false;
                } else {
                    self.sync_palette_query();
                }
            }
            Action::ClearInput => {
                if self.input_disabled() {
                    return;
                }
                self.state.input.clear();
                self.state.palette.visible = false;
            }
            Action::Submit => self.submit_input(),

            Action::FocusInput => {
                if !self.input_disabled() {
                    self.state.input.focused = true;
                }
            }
            Action::UnfocusInput => self.state.input.focused = false,
            Action::ToggleLogs => self.state.logs.visible = !self.state.logs.visible,

            Action::ChatScrollUp => self.state.chat.scroll_up(1),
            Action::ChatScrollDown => self.state.chat.scroll_down(1),
            Action::ChatScrollPageUp => self.state.chat.scroll_up(PAGE_LINES),
            Action::ChatScrollPageDown => self.state.chat.scroll_down(PAGE_LINES),
            Action::ChatScrollTop => self.state.chat.scroll_to_top(),
            Action::ChatScrollBottom => self.state.chat.scroll_to_bottom(),

            Action::HistoryUp => self.history_up(),
            Action::HistoryDown => self.history_down(),

            Action::PaletteShow => {
                if self.input_disabled() {
                    return;
                }
                self.state.input.focused = true;
                self.state.palette.visible = true;
                self.state.palette.query.clear();
                self.state.input.set("/");
                update_palette_filter(&mut self.state.palette);
            }
            Action::PaletteHide => {
                self.state.palette.visible = false;
            }
            Action::PaletteUp => {
                if !self.state.palette.filtered.is_empty() {
                    let len = self.state.palette.filtered.len();
                    self.state.palette.selected_index = (self.state.palette.selected_index + len - 1) % len;
                    self.state.palette.navigated = true;
                }
            }
            Action::PaletteDown => {
                if !self.state.palette.filtered.is_empty() {
                    let len = self.state.palette.filtered.len();
                    self.state.palette.selected_index = (self.state.palette.selected_index + 1) % len;
                    self.state.palette.navigated = true;
                }
            }
            Action::PaletteSelect => {
                if let Some(cmd) = self.state.palette.selected_command() {
                    let name = cmd.name.clone();
                    self.state.input.set(name);
                    self.state.palette.visible = false;
                }
            }
        }
    }

    fn sync_palette_query(&mut self) {
        if self.state.palette.visible {
            self.state.palette.query = self.state.input.buffer.get(1..).unwrap_or("").to_string();
            update_palette_filter(&mut self.state.palette);
        }
    }

    /// Send whatever is in the input bar. Whitespace-only input does nothing.
    fn submit_input(&mut self) {
        if self.input_disabled() {
            self.record(LogLevel::Debug, "submit ignored: a request is already in flight");
            return;
        }

        if self.state.palette.visible {
            if let Some(cmd) = self.state.palette.command_for_enter(&self.state.input.buffer) {
                let name = cmd.name.clone();
                self.state.input.set(name);
            }
            self.state.palette.visible = false;
        }

        let Some(message) = prepare_message(&self.state.input.buffer) else {
            return;
        };

        if self.state.history.last() != Some(&message) {
            self.state.history.push(message.clone());
        }
        self.state.history_index = self.state.history.len();

        if let Some(cmd) = parse_local_command(&message) {
            self.state.input.clear();
            self.run_command(cmd);
            return;
        }

        self.state.chat.append(Sender::User, message.clone());
        self.state.input.clear();
        self.start_chat(message);
    }

    fn run_command(&mut self, cmd: LocalCommand) {
        match cmd {
            LocalCommand::Reset => self.start_reset(),
            LocalCommand::Clear => self.state.chat.clear(),
            LocalCommand::Logs => self.state.logs.visible = !self.state.logs.visible,
            LocalCommand::Help => self.state.chat.notice(help_text()),
            LocalCommand::Quit => self.should_quit = true,
        }
    }

    fn start_chat(&mut self, message: String) {
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let result = backend.send(&message).await;
            let _ = tx.send(Outcome::Chat(result));
        });
        self.hold(RequestKind::Chat, rx);
    }

    fn start_reset(&mut self) {
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let result = backend.reset().await;
            let _ = tx.send(Outcome::Reset(result));
        });
        self.hold(RequestKind::Reset, rx);
    }

    fn hold(&mut self, kind: RequestKind, rx: oneshot::Receiver<Outcome>) {
        tracing::debug!(?kind, "request started");
        self.pending = Some(PendingRequest { kind, rx });
        self.state.input.focused = false;
    }

    /// Non-blocking check for the in-flight request; settles it if done.
    pub fn poll_results(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => pending.kind.abandoned(),
        };
        self.settle(outcome);
    }

    fn settle(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Chat(result) => {
                match &result {
                    Ok(ChatReply::Response(_)) => {}
                    Ok(ChatReply::Error(e)) => {
                        self.record(LogLevel::Warn, format!("server reported an error: {e}"));
                    }
                    Err(e) => self.record(LogLevel::Error, format!("chat request failed: {e}")),
                }
                self.state.chat.append(Sender::Bot, reply_text(&result));
            }
            Outcome::Reset(Ok(())) => {
                self.state.chat.clear();
                self.state.chat.notice(RESET_NOTICE);
                self.record(LogLevel::Info, "conversation reset");
            }
            Outcome::Reset(Err(e)) => {
                self.record(LogLevel::Error, format!("reset failed: {e}"));
                self.state.chat.append(Sender::Bot, CONNECTION_ERROR_TEXT.to_string());
            }
        }

        // Runs on every path: release the input and hand focus back.
        self.pending = None;
        self.state.input.focused = true;
    }

    fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
        self.state.logs.push(level, message);
    }

    fn history_up(&mut self) {
        if self.state.palette.visible || self.input_disabled() {
            return;
        }
        if !self.state.history.is_empty() && self.state.history_index > 0 {
            self.state.history_index -= 1;
            let text = self.state.history[self.state.history_index].clone();
            self.state.input.set(text);
        }
    }

    fn history_down(&mut self) {
        if self.state.palette.visible || self.input_disabled() {
            return;
        }
        if self.state.history_index < self.state.history.len() {
            self.state.history_index += 1;
            let text = self
                .state
                .history
                .get(self.state.history_index)
                .cloned()
                .unwrap_or_default();
            self.state.input.set(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::state::{ChatEntry, Message};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// In-memory server: answers every message with `reply()` and every reset
    /// with `reset_reply()`, optionally holding each request until the test
    /// calls `release()`.
    struct ScriptedBackend {
        reply: fn() -> Result<ChatReply>,
        reset_reply: fn() -> Result<()>,
        gate: Option<Notify>,
        sent: Mutex<Vec<String>>,
        resets: AtomicUsize,
    }

    impl ScriptedBackend {
        fn build(reply: fn() -> Result<ChatReply>, reset_reply: fn() -> Result<()>, gated: bool) -> Arc<Self> {
            Arc::new(Self {
                reply,
                reset_reply,
                gate: gated.then(Notify::new),
                sent: Mutex::new(Vec::new()),
                resets: AtomicUsize::new(0),
            })
        }

        fn new(reply: fn() -> Result<ChatReply>) -> Arc<Self> {
            Self::build(reply, reset_ok, false)
        }

        fn gated(reply: fn() -> Result<ChatReply>) -> Arc<Self> {
            Self::build(reply, reset_ok, true)
        }

        fn gated_reset(reset_reply: fn() -> Result<()>) -> Arc<Self> {
            Self::build(hi_there, reset_reply, true)
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, message: &str) -> Result<ChatReply> {
            self.sent.lock().unwrap().push(message.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.reply)()
        }

        async fn reset(&self) -> Result<()> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.resets.fetch_add(1, Ordering::SeqCst);
            (self.reset_reply)()
        }

        fn base_url(&self) -> &str {
            "http://test.invalid"
        }
    }

    struct PanickingBackend;

    #[async_trait]
    impl ChatBackend for PanickingBackend {
        async fn send(&self, _message: &str) -> Result<ChatReply> {
            panic!("backend blew up");
        }

        async fn reset(&self) -> Result<()> {
            panic!("backend blew up");
        }

        fn base_url(&self) -> &str {
            "http://test.invalid"
        }
    }

    fn hi_there() -> Result<ChatReply> {
        Ok(ChatReply::Response("Hi there".into()))
    }

    fn rate_limited() -> Result<ChatReply> {
        Ok(ChatReply::Error("rate limited".into()))
    }

    fn bad_gateway() -> Result<ChatReply> {
        Err(ClientError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".into(),
        })
    }

    fn reset_ok() -> Result<()> {
        Ok(())
    }

    fn reset_refused() -> Result<()> {
        Err(ClientError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "reset unavailable".into(),
        })
    }

    fn app_with(backend: Arc<dyn ChatBackend>) -> App {
        App::new(backend, Handle::current())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Char(c));
        }
    }

    async fn run_until_settled(app: &mut App) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while app.input_disabled() {
                tokio::task::yield_now().await;
                app.poll_results();
            }
        })
        .await
        .expect("request never settled");
    }

    /// Chat messages in order, notices left out.
    fn messages(app: &App) -> Vec<Message> {
        app.state
            .chat
            .entries
            .iter()
            .filter_map(|e| match e {
                ChatEntry::Message(m) => Some(m.clone()),
                ChatEntry::Notice(_) => None,
            })
            .collect()
    }

    /// Let the request task run without letting it finish, then check the
    /// input is still held.
    async fn assert_still_waiting(app: &mut App) {
        for _ in 0..5 {
            tokio::task::yield_now().await;
            app.poll_results();
        }
        assert!(app.input_disabled());
        assert!(!app.input_has_focus());
    }

    fn user(text: &str) -> Message {
        Message { sender: Sender::User, text: text.into() }
    }

    fn bot(text: &str) -> Message {
        Message { sender: Sender::Bot, text: text.into() }
    }

    #[tokio::test]
    async fn whitespace_only_submit_does_nothing() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());

        for raw in ["", "   ", "\t"] {
            app.state.input.set(raw);
            app.dispatch(Action::Submit);
            assert!(!app.input_disabled());
            assert_eq!(app.state.input.buffer, raw);
        }
        tokio::task::yield_now().await;

        assert!(app.state.chat.entries.is_empty());
        assert!(backend.sent().is_empty());
    }

    #[tokio::test]
    async fn input_is_disabled_until_the_reply_lands() {
        let backend = ScriptedBackend::gated(hi_there);
        let mut app = app_with(backend.clone());

        type_text(&mut app, "  Hello  ");
        app.dispatch(Action::Submit);

        assert_eq!(messages(&app), vec![user("Hello")]);
        assert!(app.state.input.is_empty());
        assert!(app.input_disabled());
        assert!(!app.input_has_focus());

        // Still pending after the task has had a chance to run.
        assert_still_waiting(&mut app).await;
        assert_eq!(backend.sent(), vec!["Hello".to_string()]);

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(messages(&app), vec![user("Hello"), bot("Hi there")]);
        assert!(!app.input_disabled());
        assert!(app.input_has_focus());
    }

    #[tokio::test]
    async fn server_error_is_shown_with_prefix() {
        let backend = ScriptedBackend::gated(rate_limited);
        let mut app = app_with(backend.clone());

        type_text(&mut app, "hi");
        app.dispatch(Action::Submit);
        assert_still_waiting(&mut app).await;
        assert_eq!(messages(&app), vec![user("hi")]);

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(messages(&app)[1], bot("Erreur: rate limited"));
        assert!(app.input_has_focus());
        assert!(app.state.logs.entries.iter().any(|e| e.level == LogLevel::Warn));
    }

    #[tokio::test]
    async fn transport_failure_shows_generic_text_and_logs_detail() {
        let backend = ScriptedBackend::gated(bad_gateway);
        let mut app = app_with(backend.clone());

        type_text(&mut app, "hi");
        app.dispatch(Action::Submit);
        assert_still_waiting(&mut app).await;
        assert_eq!(messages(&app), vec![user("hi")]);

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(messages(&app)[1], bot("Erreur de connexion"));
        assert!(app.input_has_focus());
        let logged = app
            .state
            .logs
            .entries
            .iter()
            .find(|e| e.level == LogLevel::Error)
            .expect("error logged");
        assert!(logged.message.contains("upstream down"), "{}", logged.message);
    }

    #[tokio::test]
    async fn dead_request_task_still_releases_input() {
        let mut app = app_with(Arc::new(PanickingBackend));

        type_text(&mut app, "hi");
        app.dispatch(Action::Submit);
        run_until_settled(&mut app).await;

        assert_eq!(messages(&app), vec![user("hi"), bot("Erreur de connexion")]);
        assert!(app.input_has_focus());
    }

    #[tokio::test]
    async fn second_submit_is_rejected_while_in_flight() {
        let backend = ScriptedBackend::gated(hi_there);
        let mut app = app_with(backend.clone());

        type_text(&mut app, "one");
        app.dispatch(Action::Submit);

        // Keystrokes are swallowed by the disabled input...
        type_text(&mut app, "two");
        assert!(app.state.input.is_empty());

        // ...and a programmatic submit is refused outright.
        app.state.input.set("two");
        app.dispatch(Action::Submit);
        assert_eq!(app.state.input.buffer, "two");
        assert_eq!(messages(&app), vec![user("one")]);

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(backend.sent(), vec!["one".to_string()]);
        assert_eq!(messages(&app), vec![user("one"), bot("Hi there")]);
    }

    #[tokio::test]
    async fn exactly_one_bot_reply_per_submission() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());

        for text in ["a", "b", "c"] {
            type_text(&mut app, text);
            app.dispatch(Action::Submit);
            run_until_settled(&mut app).await;
        }
        // Nothing left to deliver.
        app.poll_results();

        let senders: Vec<Sender> = messages(&app).iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot, Sender::User, Sender::Bot]
        );
        assert_eq!(backend.sent(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn reset_command_goes_through_admission_and_clears_pane() {
        let backend = ScriptedBackend::gated(hi_there);
        let mut app = app_with(backend.clone());
        app.state.chat.append(Sender::User, "old".into());

        type_text(&mut app, "/reset");
        app.dispatch(Action::Submit);
        assert!(app.input_disabled());
        assert!(backend.sent().is_empty());

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(backend.resets.load(Ordering::SeqCst), 1);
        assert_eq!(app.state.chat.entries, vec![ChatEntry::Notice(RESET_NOTICE.into())]);
        assert!(app.input_has_focus());
    }

    #[tokio::test]
    async fn reset_failure_keeps_pane_and_releases_input() {
        let backend = ScriptedBackend::gated_reset(reset_refused);
        let mut app = app_with(backend.clone());
        app.state.chat.append(Sender::User, "old".into());

        type_text(&mut app, "/reset");
        app.dispatch(Action::Submit);
        assert_still_waiting(&mut app).await;

        backend.release();
        run_until_settled(&mut app).await;

        assert_eq!(backend.resets.load(Ordering::SeqCst), 1);
        assert_eq!(messages(&app), vec![user("old"), bot("Erreur de connexion")]);
        assert!(!app.state.chat.entries.contains(&ChatEntry::Notice(RESET_NOTICE.into())));
        assert!(app.input_has_focus());
        let logged = app
            .state
            .logs
            .entries
            .iter()
            .find(|e| e.level == LogLevel::Error)
            .expect("error logged");
        assert!(logged.message.contains("reset unavailable"), "{}", logged.message);
    }

    #[tokio::test]
    async fn local_commands_never_reach_the_server() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());
        app.state.chat.append(Sender::Bot, "before".into());

        type_text(&mut app, "/clear");
        app.dispatch(Action::Submit);
        assert!(app.state.chat.entries.is_empty());

        type_text(&mut app, "/help");
        app.dispatch(Action::Submit);
        assert!(matches!(app.state.chat.entries.as_slice(), [ChatEntry::Notice(_)]));

        type_text(&mut app, "/logs");
        app.dispatch(Action::Submit);
        assert!(app.state.logs.visible);

        type_text(&mut app, "/quit");
        app.dispatch(Action::Submit);
        assert!(app.should_quit);

        tokio::task::yield_now().await;
        assert!(backend.sent().is_empty());
        assert!(!app.input_disabled());
    }

    #[tokio::test]
    async fn palette_enter_runs_the_selected_command() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());
        app.bootstrap();

        app.dispatch(Action::PaletteShow);
        assert_eq!(app.state.input.buffer, "/");
        type_text(&mut app, "clear");
        app.dispatch(Action::Submit);

        assert!(!app.state.palette.visible);
        assert!(app.state.chat.entries.is_empty());
        assert!(backend.sent().is_empty());
    }

    #[tokio::test]
    async fn palette_leaves_unknown_slash_words_alone() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());
        app.bootstrap();

        app.dispatch(Action::PaletteShow);
        type_text(&mut app, "test");
        app.dispatch(Action::Submit);
        run_until_settled(&mut app).await;

        assert_eq!(backend.sent(), vec!["/test".to_string()]);
        assert_eq!(backend.resets.load(Ordering::SeqCst), 0);
        assert_eq!(messages(&app), vec![user("/test"), bot("Hi there")]);
    }

    #[tokio::test]
    async fn palette_enter_after_arrow_runs_the_highlighted_command() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend.clone());
        app.bootstrap();
        app.state.chat.append(Sender::Bot, "before".into());

        app.dispatch(Action::PaletteShow);
        let palette = &app.state.palette;
        let len = palette.filtered.len();
        let at = palette
            .filtered
            .iter()
            .position(|&i| palette.commands[i].name == "/clear")
            .expect("/clear listed");
        // A full lap plus the offset, so the selection always moves at least once.
        for _ in 0..(len + at) {
            app.dispatch(Action::PaletteDown);
        }
        assert_eq!(app.state.palette.selected_command().map(|c| c.name.as_str()), Some("/clear"));
        assert_eq!(app.state.input.buffer, "/");
        app.dispatch(Action::Submit);

        assert!(app.state.chat.entries.is_empty());
        assert!(backend.sent().is_empty());
    }

    #[tokio::test]
    async fn history_recalls_previous_messages() {
        let backend = ScriptedBackend::new(hi_there);
        let mut app = app_with(backend);

        for text in ["first", "second"] {
            type_text(&mut app, text);
            app.dispatch(Action::Submit);
            run_until_settled(&mut app).await;
        }

        app.dispatch(Action::HistoryUp);
        assert_eq!(app.state.input.buffer, "second");
        app.dispatch(Action::HistoryUp);
        assert_eq!(app.state.input.buffer, "first");
        app.dispatch(Action::HistoryDown);
        assert_eq!(app.state.input.buffer, "second");
        app.dispatch(Action::HistoryDown);
        assert!(app.state.input.is_empty());
    }
}
