use crate::error::FeedError;
use crate::pagination::RequestId;
use crate::types::PageResponse;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ScrollLines(isize),
    Resize { cols: u16, rows: u16 },

    // Feed
    RandomQuery,
    Refresh,
    PageLoaded {
        request: RequestId,
        response: PageResponse,
    },
    PageFailed {
        request: RequestId,
        error: FeedError,
    },

    // Query prompt
    EnterQueryMode,
    ExitQueryMode,
    QueryInput(char),
    QueryBackspace,
    QueryConfirm,

    OpenInBrowser,
    YankUrl,

    Tick,
    Error(String),
    None,
}
