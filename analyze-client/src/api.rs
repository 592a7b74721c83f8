use serde::Deserialize;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an analyze backend. Callers that only need to know
/// "the request failed" can treat the variants uniformly; the split exists so
/// the log can distinguish a dead service from a misbehaving one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced an HTTP response (connect failure, timeout,
    /// broken body stream).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("http error: {0}")]
    Http(String),

    /// The service answered 2xx but the body did not match the expected
    /// shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// One ranked source page returned alongside the answer text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub title: String,
    pub url: String,
}

/// Successful result of an analyze call: the answer text (lightweight
/// markdown) plus the pages the service leaned on most while producing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub summary: String,
    #[serde(default)]
    pub central_pages: Vec<PageRef>,
}

/// Interface to the analyze service. The service exposes a single endpoint;
/// tests swap in fakes behind this trait.
#[async_trait::async_trait]
pub trait AnalyzeBackend: Send + Sync {
    /// Submit one question and wait for the complete structured answer. No
    /// streaming; the service replies only once its research pass is done.
    async fn analyze(&self, question: &str) -> Result<AnalyzeResponse>;
}
