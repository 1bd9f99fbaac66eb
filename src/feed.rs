use async_trait::async_trait;

use crate::error::Result;
use crate::types::PageResponse;

/// A paged, forward-only feed.
#[async_trait]
pub trait FeedSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Fetch one page of `query` starting at the `after` cursor. An empty
    /// cursor asks for the first page.
    async fn fetch_page(&self, query: &str, after: &str) -> Result<PageResponse>;
}
