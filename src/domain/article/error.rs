use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("fetching disallowed by robots.txt: {0}")]
    DisallowedByRobots(String),

    #[error("could not fetch page: {0}")]
    Fetch(String),

    #[error("no readable content found")]
    NoContent,

    #[error("provide exactly one of 'url' or 'text'")]
    AmbiguousSource,
}

impl From<ArticleServiceError> for AppError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::InvalidUrl(url) => {
                AppError::BadRequest(format!("invalid url: {url}"))
            }
            ArticleServiceError::DisallowedByRobots(url) => {
                AppError::BadRequest(format!("fetching disallowed by robots.txt: {url}"))
            }
            ArticleServiceError::Fetch(msg) => AppError::ExternalService(msg),
            ArticleServiceError::NoContent => {
                AppError::NotFound("no readable content found at the given source".to_string())
            }
            ArticleServiceError::AmbiguousSource => {
                AppError::BadRequest("provide exactly one of 'url' or 'text'".to_string())
            }
        }
    }
}
