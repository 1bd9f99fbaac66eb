use thiserror::Error;

/// Failure of a single page fetch.
///
/// `Display` is the text shown to the user: the bare status code, the decode
/// message, or a generic fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("{0}")]
    BadStatus(u16),

    #[error("{0}")]
    BadBody(String),

    #[error("Something went wrong while loading the feed")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_displays_code() {
        assert_eq!(FeedError::BadStatus(503).to_string(), "503");
    }

    #[test]
    fn bad_body_displays_message() {
        let err = FeedError::BadBody("missing field `id`".to_string());
        assert_eq!(err.to_string(), "missing field `id`");
    }

    #[test]
    fn other_hides_transport_detail() {
        let err = FeedError::Other("connection refused".to_string());
        assert!(!err.to_string().contains("refused"));
    }
}
