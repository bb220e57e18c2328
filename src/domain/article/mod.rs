pub mod attribution;
pub mod error;
pub mod model;
pub mod service;

pub use attribution::generate_attribution;
pub use error::ArticleServiceError;
pub use model::{Article, ArticleMetadata};
pub use service::{ArticleService, ExcerptLimits};
