use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Scrape(#[from] adgen_scrape::ScrapeError),

    #[error("LLM request failed: {0}")]
    LlmRequest(#[from] reqwest::Error),

    #[error("LLM returned HTTP {status}: {message}")]
    LlmStatus { status: u16, message: String },

    #[error("all LLM models failed, last error: {0}")]
    AllModelsFailed(String),

    #[error("LLM response carried no content")]
    EmptyResponse,

    #[error("could not parse ad script from LLM response: {0}")]
    MalformedScript(#[from] serde_json::Error),

    #[error("all video providers failed: {0}")]
    AllProvidersFailed(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
