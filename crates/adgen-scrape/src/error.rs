use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("page fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("page returned HTTP {0}")]
    HttpStatus(u16),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
