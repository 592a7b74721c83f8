use clap::Parser;

/// Terminal client for the web-research analyze service.
#[derive(Parser, Debug)]
#[command(name = "quarry", version, about = "Ask research questions from your terminal")]
pub struct Cli {
    /// Question to submit as soon as the UI is up.
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Base URL of the analyze service.
    #[arg(
        long,
        value_name = "URL",
        env = "QUARRY_ANALYZE_BASE_URL",
        default_value = "http://localhost:5000"
    )]
    pub base_url: String,

    /// Answer from a canned offline backend instead of the HTTP service.
    #[arg(long)]
    pub mock: bool,
}
