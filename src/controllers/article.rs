use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::article::{generate_attribution, ArticleMetadata, ArticleService},
    error::{AppError, AppResult},
    infrastructure::config::Config,
};

/// Request for POST /api/articles/preview
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub url: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub content: String,
    pub metadata: ArticleMetadata,
    pub attribution: String,
    pub fetched_at: DateTime<Utc>,
}

pub struct ArticleController {
    article_service: Arc<ArticleService>,
    config: Arc<Config>,
}

impl ArticleController {
    pub fn new(article_service: Arc<ArticleService>, config: Arc<Config>) -> Self {
        Self {
            article_service,
            config,
        }
    }

    /// POST /api/articles/preview - Extract content and attribution
    /// without synthesizing anything
    pub async fn preview(
        State(controller): State<Arc<ArticleController>>,
        Json(request): Json<PreviewRequest>,
    ) -> AppResult<Json<PreviewResponse>> {
        if let Some(text) = &request.text {
            if text.chars().count() > controller.config.max_content_chars {
                return Err(AppError::PayloadTooLarge(format!(
                    "Text must be {} characters or less",
                    controller.config.max_content_chars
                )));
            }
        }

        let article = controller
            .article_service
            .resolve(request.url.as_deref(), request.text.as_deref())
            .await?;

        let content = controller
            .article_service
            .apply_excerpt_limits(&article.content);
        let attribution = generate_attribution(&article.metadata);

        Ok(Json(PreviewResponse {
            content,
            metadata: article.metadata,
            attribution,
            fetched_at: article.fetched_at,
        }))
    }
}
