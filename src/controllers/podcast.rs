use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{
        article::ArticleService,
        podcast::{PipelineConfig, PodcastService},
        tts::{detect_language, LanguageCode},
    },
    error::{AppError, AppResult},
    infrastructure::config::Config,
};

/// Request for POST /api/podcasts
#[derive(Debug, Deserialize)]
pub struct PodcastRequest {
    pub url: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
    pub speed: Option<f32>,
    pub title: Option<String>,
    pub author: Option<String>,
}

pub struct PodcastController {
    article_service: Arc<ArticleService>,
    podcast_service: Arc<PodcastService>,
    config: Arc<Config>,
}

impl PodcastController {
    pub fn new(
        article_service: Arc<ArticleService>,
        podcast_service: Arc<PodcastService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            article_service,
            podcast_service,
            config,
        }
    }

    /// POST /api/podcasts - Convert a blog post into a podcast
    pub async fn generate(
        State(controller): State<Arc<PodcastController>>,
        Json(request): Json<PodcastRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
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

        let language = match &request.language {
            Some(code) => LanguageCode::parse(code).ok_or_else(|| {
                AppError::BadRequest(format!("Unsupported language: {code}"))
            })?,
            None => detect_language(&content),
        };

        let speed = request.speed.unwrap_or(controller.config.default_speed);
        if !(0.5..=2.0).contains(&speed) {
            return Err(AppError::BadRequest(
                "Speed must be between 0.5 and 2.0".to_string(),
            ));
        }

        let pipeline_config = PipelineConfig {
            language,
            speed_factor: speed,
            max_chunk_chars: controller.config.max_chunk_chars,
            inter_segment_silence_millis: controller.config.inter_segment_silence_millis,
        };

        let title = request
            .title
            .clone()
            .or_else(|| article.metadata.title.clone());
        let author = request
            .author
            .clone()
            .or_else(|| article.metadata.author.clone());

        tracing::info!(
            source = %article.metadata.url,
            content_length = content.len(),
            language = %language,
            speed,
            "Podcast generation request"
        );

        let podcast = controller
            .podcast_service
            .generate(&content, &pipeline_config, title.as_deref(), author.as_deref())
            .await
            .map_err(AppError::from)?;

        for warning in &podcast.warnings {
            tracing::warn!(warning = %warning, "Pipeline warning");
        }

        // The caller owns the artifact: hand over the bytes, then the
        // last trace of the run is gone from scratch storage
        let audio = tokio::fs::read(&podcast.path)
            .await
            .map_err(|e| AppError::Internal(format!("could not read generated audio: {e}")))?;
        let _ = tokio::fs::remove_file(&podcast.path).await;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "audio/mpeg".parse().unwrap());
        headers.insert(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"podcast.mp3\"".parse().unwrap(),
        );
        headers.insert(
            "X-Duration-Seconds",
            format!("{:.1}", podcast.duration_seconds).parse().unwrap(),
        );
        headers.insert(
            "X-Segment-Count",
            podcast.segment_count.to_string().parse().unwrap(),
        );
        headers.insert("X-Language", language.to_string().parse().unwrap());
        headers.insert("X-Degraded", podcast.degraded.to_string().parse().unwrap());

        Ok((StatusCode::OK, headers, Body::from(audio)))
    }
}
