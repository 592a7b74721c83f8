#![deny(clippy::unwrap_used, clippy::expect_used)]

pub use api::AnalyzeBackend;
pub use api::AnalyzeResponse;
pub use api::Error;
pub use api::PageRef;
pub use api::Result;

mod api;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "online")]
mod http;

#[cfg(feature = "mock")]
pub use mock::MockClient;

#[cfg(feature = "online")]
pub use http::HttpClient;
