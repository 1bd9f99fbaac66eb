use std::fmt;

/// Host prepended to site-relative permalinks.
pub const PERMALINK_HOST: &str = "https://www.reddit.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[allow(dead_code)]
    Video,
    Image,
    Link,
    Gif,
    #[default]
    Unknown,
}

impl MediaKind {
    /// Map the remote `post_hint` field. Absent or unrecognized hints are `Unknown`.
    pub fn from_post_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("rich:video") => MediaKind::Gif,
            Some("link") => MediaKind::Link,
            Some("image") => MediaKind::Image,
            _ => MediaKind::Unknown,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Image => write!(f, "image"),
            MediaKind::Link => write!(f, "link"),
            MediaKind::Gif => write!(f, "gif"),
            MediaKind::Unknown => write!(f, "post"),
        }
    }
}

/// One entry of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub permalink: String,
    pub kind: MediaKind,
    pub score: i64,
    /// Display image source
    pub image: String,
    pub media_src: String,
    pub embed: String,
    /// Outbound link of the post
    pub link: String,
}

impl Item {
    /// Absolute URL of the item's discussion page.
    pub fn display_url(&self) -> String {
        if self.permalink.starts_with("http://") || self.permalink.starts_with("https://") {
            self.permalink.clone()
        } else {
            format!("{}{}", PERMALINK_HOST, self.permalink)
        }
    }

    /// The URL worth opening: the outbound link when present, else the permalink.
    pub fn target_url(&self) -> String {
        if self.link.is_empty() {
            self.display_url()
        } else {
            self.link.clone()
        }
    }
}

/// One decoded page of the remote feed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageResponse {
    pub items: Vec<Item>,
    pub after: String,
    pub before: String,
    /// Query name as resolved by the server; may be empty.
    pub query: String,
}

#[cfg(test)]
pub(crate) fn item(id: &str) -> Item {
    Item {
        id: id.to_string(),
        title: format!("title {}", id),
        permalink: format!("/r/pics/comments/{}/", id),
        kind: MediaKind::Image,
        score: 1,
        image: String::new(),
        media_src: String::new(),
        embed: String::new(),
        link: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_hint_mapping() {
        assert_eq!(MediaKind::from_post_hint(Some("rich:video")), MediaKind::Gif);
        assert_eq!(MediaKind::from_post_hint(Some("link")), MediaKind::Link);
        assert_eq!(MediaKind::from_post_hint(Some("image")), MediaKind::Image);
        assert_eq!(MediaKind::from_post_hint(Some("hosted:video")), MediaKind::Unknown);
        assert_eq!(MediaKind::from_post_hint(None), MediaKind::Unknown);
    }

    #[test]
    fn relative_permalink_gets_host() {
        let it = item("abc");
        assert_eq!(
            it.display_url(),
            "https://www.reddit.com/r/pics/comments/abc/"
        );
    }

    #[test]
    fn absolute_permalink_unchanged() {
        let mut it = item("abc");
        it.permalink = "https://example.com/p/abc".to_string();
        assert_eq!(it.display_url(), "https://example.com/p/abc");
    }

    #[test]
    fn target_prefers_outbound_link() {
        let mut it = item("abc");
        assert_eq!(it.target_url(), it.display_url());
        it.link = "https://i.example.com/abc.png".to_string();
        assert_eq!(it.target_url(), "https://i.example.com/abc.png");
    }
}
