use crate::AnalyzeBackend;
use crate::AnalyzeResponse;
use crate::Error;
use crate::PageRef;
use crate::Result;

/// Offline stand-in for the analyze service. Returns a canned answer that
/// exercises every shape the renderer handles (sections, paragraphs, fenced
/// code), echoing the question so screenshots stay legible.
#[derive(Clone, Default)]
pub struct MockClient;

#[async_trait::async_trait]
impl AnalyzeBackend for MockClient {
    async fn analyze(&self, question: &str) -> Result<AnalyzeResponse> {
        // Questions mentioning "fail" trigger the error path so the banner
        // can be exercised without a live service.
        if question.to_lowercase().contains("fail") {
            return Err(Error::Http(
                "POST /analyze returned 500 Internal Server Error (mock)".to_string(),
            ));
        }

        let summary = format!(
            "## Answer\n\
             You asked: **{question}**\n\
             This build is running against canned data. Start the analyze \
             service and relaunch without the mock flag for live answers.\n\
             ## How the live service works\n\
             The service searches the web for your question, scrapes the top \
             results, and builds a link graph.\n\
             The most central pages in that graph are summarized into the \
             answer you see here.\n\
             ## Example output\n\
             ```python\n\
             pages = rank_pages(build_graph(scrape(search(question))))\n\
             print(summarize(pages))\n\
             ```\n\
             ## Sources\n\
             The pages the mock pretends to have leaned on are listed below."
        );

        Ok(AnalyzeResponse {
            summary,
            central_pages: vec![
                PageRef {
                    title: "Mock result one".to_string(),
                    url: "https://example.com/one".to_string(),
                },
                PageRef {
                    title: "Mock result two".to_string(),
                    url: "https://example.com/two".to_string(),
                },
            ],
        })
    }
}
