use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{FeedError, Result};
use crate::feed::FeedSource;
use crate::types::{Item, MediaKind, PageResponse};

/// Feed proxy reached over HTTP at `{base_url}/reddit`.
#[derive(Debug)]
pub struct HttpFeed {
    client: Client,
    base_url: String,
}

impl HttpFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scrollfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, query: &str, after: &str) -> String {
        format!(
            "{}/reddit?query={}&after={}",
            self.base_url,
            urlencoding::encode(query.trim()),
            urlencoding::encode(after.trim())
        )
    }
}

// Proxy response types

#[derive(Deserialize)]
struct RawPage {
    children: Vec<RawItem>,
    after: Option<String>,
    before: Option<String>,
    subreddit: Option<String>,
}

#[derive(Deserialize)]
struct RawItem {
    id: String,
    preview: Option<String>,
    permalink: String,
    title: String,
    ups: i64,
    post_hint: Option<String>,
    media_embed: Option<String>,
    url: Option<String>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let preview = raw.preview.unwrap_or_default();
        Item {
            id: raw.id,
            title: raw.title,
            permalink: raw.permalink,
            kind: MediaKind::from_post_hint(raw.post_hint.as_deref()),
            score: raw.ups,
            image: preview.clone(),
            media_src: preview,
            embed: raw.media_embed.unwrap_or_default(),
            link: raw.url.unwrap_or_default(),
        }
    }
}

/// Decode a proxy payload. Any malformed item fails the whole page.
pub fn decode_page(body: &str) -> Result<PageResponse> {
    let raw: RawPage =
        serde_json::from_str(body).map_err(|e| FeedError::BadBody(e.to_string()))?;

    Ok(PageResponse {
        items: raw.children.into_iter().map(Item::from).collect(),
        after: raw.after.unwrap_or_default(),
        before: raw.before.unwrap_or_default(),
        query: raw.subreddit.unwrap_or_default(),
    })
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, query: &str, after: &str) -> Result<PageResponse> {
        let url = self.page_url(query, after);
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "feed returned an error status");
            return Err(FeedError::BadStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Other(e.to_string()))?;

        decode_page(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed(server: &MockServer) -> HttpFeed {
        HttpFeed::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn decode_defaults_optional_fields() {
        let body = r#"{
            "children": [
                {"id": "a1", "permalink": "/r/pics/a1", "title": "First", "ups": 12}
            ]
        }"#;
        let page = decode_page(body).unwrap();
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.kind, MediaKind::Unknown);
        assert_eq!(item.image, "");
        assert_eq!(item.embed, "");
        assert_eq!(item.link, "");
        assert_eq!(page.after, "");
        assert_eq!(page.before, "");
        assert_eq!(page.query, "");
    }

    #[test]
    fn decode_reads_preview_into_both_media_fields() {
        let body = r#"{
            "children": [
                {"id": "a1", "permalink": "/p", "title": "t", "ups": 1,
                 "preview": "https://i.example.com/a1.jpg", "post_hint": "image"}
            ],
            "after": "t3_a1",
            "subreddit": "pics"
        }"#;
        let page = decode_page(body).unwrap();
        let item = &page.items[0];
        assert_eq!(item.image, "https://i.example.com/a1.jpg");
        assert_eq!(item.media_src, "https://i.example.com/a1.jpg");
        assert_eq!(item.kind, MediaKind::Image);
        assert_eq!(page.after, "t3_a1");
        assert_eq!(page.query, "pics");
    }

    #[test]
    fn decode_unknown_post_hint_is_unknown() {
        let body = r#"{"children": [
            {"id": "a", "permalink": "/p", "title": "t", "ups": 1, "post_hint": "self"}
        ]}"#;
        assert_eq!(decode_page(body).unwrap().items[0].kind, MediaKind::Unknown);
    }

    #[test]
    fn decode_missing_required_field_fails_page() {
        let body = r#"{"children": [
            {"id": "a", "permalink": "/p", "title": "ok", "ups": 1},
            {"id": "b", "permalink": "/p", "ups": 2}
        ]}"#;
        let err = decode_page(body).unwrap_err();
        assert!(matches!(err, FeedError::BadBody(msg) if msg.contains("title")));
    }

    #[test]
    fn decode_mistyped_score_fails_page() {
        let body = r#"{"children": [
            {"id": "a", "permalink": "/p", "title": "t", "ups": "many"}
        ]}"#;
        assert!(matches!(decode_page(body), Err(FeedError::BadBody(_))));
    }

    #[tokio::test]
    async fn fetch_trims_and_sends_query_and_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit"))
            .and(query_param("query", "earth porn"))
            .and(query_param("after", "t3_x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "children": [
                    {"id": "1", "permalink": "/1", "title": "one", "ups": 1},
                    {"id": "2", "permalink": "/2", "title": "two", "ups": 2}
                ],
                "after": "t3_2",
                "subreddit": "EarthPorn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = feed(&server)
            .fetch_page("  earth porn ", " t3_x\n")
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(page.after, "t3_2");
        assert_eq!(page.query, "EarthPorn");
    }

    #[tokio::test]
    async fn fetch_first_page_sends_empty_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit"))
            .and(query_param("query", "pics"))
            .and(query_param("after", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "children": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let page = feed(&server).fetch_page("pics", "").await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn fetch_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = feed(&server).fetch_page("pics", "").await.unwrap_err();
        assert_eq!(err, FeedError::BadStatus(503));
        assert_eq!(err.to_string(), "503");
    }

    #[tokio::test]
    async fn fetch_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = feed(&server).fetch_page("pics", "").await.unwrap_err();
        assert!(matches!(err, FeedError::BadBody(_)));
    }

    #[tokio::test]
    async fn fetch_unreachable_is_other() {
        let feed = HttpFeed::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = feed.fetch_page("pics", "").await.unwrap_err();
        assert!(matches!(err, FeedError::Other(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let feed = HttpFeed::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            feed.page_url("pics", ""),
            "http://localhost:8080/reddit?query=pics&after="
        );
    }
}
