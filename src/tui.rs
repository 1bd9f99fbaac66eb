use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, EventStream,
        MouseEventKind,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::event::Event;
use crate::viewport::ViewportGeometry;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Nominal cell size for terminals that don't report pixel dimensions.
const CELL_WIDTH: u32 = 8;
const CELL_HEIGHT: u32 = 16;

/// Rows scrolled per mouse wheel notch
const WHEEL_ROWS: isize = 3;

pub fn init() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Current window geometry in pixels, estimated from the cell grid when the
/// terminal reports no pixel size.
pub fn window_geometry(cols: u16, rows: u16) -> ViewportGeometry {
    let (width, height) = match terminal::window_size() {
        Ok(size) if size.width > 0 && size.height > 0 => (size.width as u32, size.height as u32),
        _ => cells_to_pixels(cols, rows),
    };
    ViewportGeometry::new(width, height)
}

fn cells_to_pixels(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32 * CELL_WIDTH, rows as u32 * CELL_HEIGHT)
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = interval(tick_rate);
            let mut render_interval = interval(render_rate);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tick_interval.tick() => {
                        tx.send(Event::Tick).ok();
                    }
                    _ = render_interval.tick() => {
                        tx.send(Event::Render).ok();
                    }
                    Some(Ok(evt)) = reader.next() => {
                        match evt {
                            CrosstermEvent::Key(key) if key.kind == event::KeyEventKind::Press => {
                                tx.send(Event::Key(key)).ok();
                            }
                            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                                MouseEventKind::ScrollDown => {
                                    tx.send(Event::Scroll(WHEEL_ROWS)).ok();
                                }
                                MouseEventKind::ScrollUp => {
                                    tx.send(Event::Scroll(-WHEEL_ROWS)).ok();
                                }
                                _ => {}
                            },
                            CrosstermEvent::Resize(cols, rows) => {
                                tx.send(Event::Resize(cols, rows)).ok();
                            }
                            _ => {}
                        }
                    }
                }
            }
        });

        Self { rx, cancel, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
