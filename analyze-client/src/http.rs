use std::time::Duration;

use serde_json::json;

use crate::AnalyzeBackend;
use crate::AnalyzeResponse;
use crate::Error;
use crate::Result;

/// The service runs a full search/scrape/summarize pass before answering, so
/// give it far longer than an ordinary API round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Cap on how much of an error body we copy into an error message.
const BODY_SNIPPET_MAX: usize = 2048;

/// HTTP implementation of [`AnalyzeBackend`] against a running analyze
/// service.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClient {
    /// `base_url` is the service root, e.g. `http://localhost:5000`; any
    /// trailing slashes are dropped so path joins stay predictable.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("building http client failed: {e}")))?;
        Ok(Self { base_url, http })
    }
}

#[async_trait::async_trait]
impl AnalyzeBackend for HttpClient {
    async fn analyze(&self, question: &str) -> Result<AnalyzeResponse> {
        let url = format!("{}/analyze", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&json!({ "question": question }))
            .send()
            .await
            .map_err(|e| Error::Transport(format!("POST {url} failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::Transport(format!("POST {url} body read failed: {e}")))?;
        if !status.is_success() {
            return Err(Error::Http(format!(
                "POST {url} returned {status}; body: {}",
                snippet(&body)
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Decode(format!(
                "POST {url} returned undecodable body: {e}; body: {}",
                snippet(&body)
            ))
        })
    }
}

fn snippet(body: &str) -> &str {
    let mut end = body.len().min(BODY_SNIPPET_MAX);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(BODY_SNIPPET_MAX);
        let cut = snippet(&long);
        assert!(cut.len() <= BODY_SNIPPET_MAX);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn new_strips_trailing_slashes() {
        let client = match HttpClient::new("http://localhost:5000///") {
            Ok(client) => client,
            Err(e) => panic!("client construction failed: {e}"),
        };
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
