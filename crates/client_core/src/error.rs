use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("server url '{0}' cannot be used as a base for request paths")]
    UnsupportedBaseUrl(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Network-level failures, as opposed to a reachable server sending something unexpected.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
