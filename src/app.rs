use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::Config;
use crate::event::Event;
use crate::feed::FeedSource;
use crate::pagination::{Effect, FeedState, FetchRequest, Msg};
use crate::scroll::ScrollPosition;
use crate::tui;
use crate::types::Item;

/// Rows taken by one item card, spacer included.
pub const CARD_HEIGHT: usize = 4;

/// Header + status bar + list borders
const CHROME_ROWS: u16 = 4;

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Query,
}

pub struct App {
    pub feed: FeedState,
    pub selected: usize,
    pub scroll_top: usize,
    pub rows: u16,
    pub mode: InputMode,
    pub query_input: String,
    pub last_loaded: Option<DateTime<Local>>,
    pub notice: Option<String>,
    notice_at: Option<Instant>,
    /// Errors outside the feed (browser, clipboard)
    pub error: Option<String>,
    pub should_quit: bool,
    source: Arc<dyn FeedSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    /// Build the app and request the first page of the configured query.
    pub fn new(
        source: Arc<dyn FeedSource>,
        config: &Config,
        action_tx: mpsc::UnboundedSender<Action>,
        (cols, rows): (u16, u16),
    ) -> Self {
        let (feed, effects) = FeedState::start(
            &config.feed.default_query,
            &config.feed.random_query,
            config.scroll.proximity_rows,
        );

        let mut app = Self {
            feed,
            selected: 0,
            scroll_top: 0,
            rows,
            mode: InputMode::default(),
            query_input: String::new(),
            last_loaded: None,
            notice: None,
            notice_at: None,
            error: None,
            should_quit: false,
            source,
            action_tx,
        };
        app.run_effects(effects);
        app.resize(cols, rows);
        app
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(rows) => Action::ScrollLines(rows),
            Event::Resize(cols, rows) => Action::Resize { cols, rows },
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.mode == InputMode::Query {
            return match key.code {
                KeyCode::Esc => Action::ExitQueryMode,
                KeyCode::Enter => Action::QueryConfirm,
                KeyCode::Backspace => Action::QueryBackspace,
                KeyCode::Char(c) => Action::QueryInput(c),
                _ => Action::None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('r') => Action::RandomQuery,
            KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('/') => Action::EnterQueryMode,
            KeyCode::Enter | KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some()
            && !matches!(
                action,
                Action::Tick | Action::None | Action::PageLoaded { .. } | Action::PageFailed { .. }
            )
        {
            self.error = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollDown => self.select(self.selected.saturating_add(1)),
            Action::ScrollUp => self.select(self.selected.saturating_sub(1)),
            Action::PageDown => self.select(self.selected.saturating_add(self.cards_per_page())),
            Action::PageUp => self.select(self.selected.saturating_sub(self.cards_per_page())),
            Action::GoToTop => self.select(0),
            Action::GoToBottom => self.select(self.feed.items().len().saturating_sub(1)),
            Action::ScrollLines(rows) => self.scroll_by(rows),
            Action::Resize { cols, rows } => self.resize(cols, rows),

            Action::RandomQuery => {
                self.selected = 0;
                self.scroll_top = 0;
                self.apply(Msg::RandomQueryRequested);
            }
            Action::Refresh => {
                let query = self.feed.request_query().to_string();
                self.request_query(query);
            }
            Action::PageLoaded { request, response } => {
                self.apply(Msg::FetchSucceeded { request, response });
            }
            Action::PageFailed { request, error } => {
                self.apply(Msg::FetchFailed { request, error });
            }

            Action::EnterQueryMode => {
                self.mode = InputMode::Query;
                self.query_input.clear();
            }
            Action::ExitQueryMode => {
                self.mode = InputMode::Normal;
                self.query_input.clear();
            }
            Action::QueryInput(c) => {
                self.query_input.push(c);
            }
            Action::QueryBackspace => {
                self.query_input.pop();
            }
            Action::QueryConfirm => {
                self.mode = InputMode::Normal;
                let query = std::mem::take(&mut self.query_input);
                self.request_query(query);
            }

            Action::OpenInBrowser => {
                let follow = self.open_selected();
                self.update(follow);
            }
            Action::YankUrl => {
                let follow = self.yank_selected();
                self.update(follow);
            }

            Action::Tick => {
                if self.notice_at.is_some_and(|at| at.elapsed() >= NOTICE_TTL) {
                    self.notice = None;
                    self.notice_at = None;
                }
            }
            Action::Error(msg) => {
                warn!(%msg, "action failed");
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.feed.items().get(self.selected)
    }

    /// Rows available to the item list.
    pub fn body_height(&self) -> usize {
        self.rows.saturating_sub(CHROME_ROWS) as usize
    }

    pub fn scroll_position(&self) -> ScrollPosition {
        ScrollPosition {
            scroll_top: self.scroll_top,
            scroll_height: self.feed.items().len() * CARD_HEIGHT,
            client_height: self.body_height(),
        }
    }

    fn max_scroll(&self) -> usize {
        (self.feed.items().len() * CARD_HEIGHT).saturating_sub(self.body_height())
    }

    fn cards_per_page(&self) -> usize {
        (self.body_height() / CARD_HEIGHT).max(1)
    }

    fn open_selected(&mut self) -> Action {
        let Some(url) = self.selected_item().map(Item::target_url) else {
            return Action::None;
        };
        match open::that_detached(&url) {
            Ok(()) => {
                self.set_notice(format!("Opened {}", url));
                Action::None
            }
            Err(e) => Action::Error(format!("Could not open browser: {}", e)),
        }
    }

    fn yank_selected(&mut self) -> Action {
        let Some(url) = self.selected_item().map(Item::target_url) else {
            return Action::None;
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
            Ok(()) => {
                self.set_notice(format!("Copied {}", url));
                Action::None
            }
            Err(e) => Action::Error(format!("Clipboard unavailable: {}", e)),
        }
    }

    fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.notice_at = Some(Instant::now());
    }

    fn request_query(&mut self, query: String) {
        if self.feed.is_loading() {
            self.set_notice("Still loading, try again in a moment".to_string());
            return;
        }
        self.apply(Msg::FetchRequested(query));
    }

    /// Move the selection and scroll just enough to keep it in view.
    fn select(&mut self, index: usize) {
        let len = self.feed.items().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = index.min(len - 1);

        let top = self.selected * CARD_HEIGHT;
        let body = self.body_height();
        if top < self.scroll_top {
            self.scroll_top = top;
        } else if top + CARD_HEIGHT > self.scroll_top + body {
            self.scroll_top = (top + CARD_HEIGHT).saturating_sub(body);
        }
        self.scroll_top = self.scroll_top.min(self.max_scroll());
        self.notify_scroll();
    }

    /// Scroll by rows and drag the selection into the visible range.
    fn scroll_by(&mut self, rows: isize) {
        self.scroll_top = self
            .scroll_top
            .saturating_add_signed(rows)
            .min(self.max_scroll());

        let len = self.feed.items().len();
        if len > 0 {
            let first = self.scroll_top.div_ceil(CARD_HEIGHT);
            let last = ((self.scroll_top + self.body_height()) / CARD_HEIGHT)
                .saturating_sub(1)
                .max(first);
            self.selected = self.selected.clamp(first, last).min(len - 1);
        }
        self.notify_scroll();
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.rows = rows;
        self.scroll_top = self.scroll_top.min(self.max_scroll());

        let geometry = tui::window_geometry(cols, rows);
        self.apply(Msg::Resized {
            geometry,
            client_height: self.body_height(),
        });
        self.notify_scroll();
    }

    fn notify_scroll(&mut self) {
        let position = self.scroll_position();
        self.apply(Msg::ScrollPositionChanged(position));
    }

    fn apply(&mut self, msg: Msg) {
        let (feed, effects) = std::mem::take(&mut self.feed).update(msg);
        self.feed = feed;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(request) => self.spawn_fetch(request),
                Effect::PageAppended { count } => {
                    debug!(count, "page appended");
                    self.last_loaded = Some(Local::now());
                    // Content shorter than the viewport never scrolls; keep filling.
                    self.notify_scroll();
                }
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let action = match source.fetch_page(&request.query, &request.after).await {
                Ok(response) => Action::PageLoaded {
                    request: request.id,
                    response,
                },
                Err(error) => Action::PageFailed {
                    request: request.id,
                    error,
                },
            };
            tx.send(action).ok();
        });
    }
}
