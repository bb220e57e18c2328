use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogcast_backend::controllers::article::ArticleController;
use blogcast_backend::controllers::health::ReadyState;
use blogcast_backend::controllers::podcast::PodcastController;
use blogcast_backend::domain::article::{ArticleService, ExcerptLimits};
use blogcast_backend::domain::podcast::PodcastService;
use blogcast_backend::infrastructure::audio::AudioToolchain;
use blogcast_backend::infrastructure::cache::ArticleCache;
use blogcast_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use blogcast_backend::infrastructure::fetcher::BlogFetcher;
use blogcast_backend::infrastructure::http::start_http_server;
use blogcast_backend::infrastructure::repositories::{
    GoogleTtsRepository, PollyTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Blogcast Backend on {}:{}",
        config.host,
        config.port
    );

    // Scratch storage for pipeline runs
    let scratch_dir = PathBuf::from(&config.scratch_dir);
    tokio::fs::create_dir_all(&scratch_dir).await?;

    let toolchain = Arc::new(AudioToolchain::new(
        &config.ffmpeg_path,
        &config.ffprobe_path,
    ));
    if !toolchain.is_available().await {
        tracing::warn!(
            "ffmpeg not found; multi-segment podcasts will fall back to their first segment"
        );
    }

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate infrastructure collaborators
    tracing::info!("Instantiating collaborators...");
    let fetcher = Arc::new(BlogFetcher::new(Duration::from_secs(
        config.request_timeout_secs,
    )));
    let cache = Arc::new(ArticleCache::new(
        config.cache_enabled,
        Duration::from_secs(config.cache_expiry_hours * 3600),
    ));

    // 2. Instantiate the TTS provider
    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::Google => {
            tracing::info!("Using Google TTS provider");
            Arc::new(GoogleTtsRepository::new(reqwest::Client::new()))
        }
        TtsProvider::Polly => {
            tracing::info!(
                "Initializing AWS Polly client with region: {}",
                config.aws_region
            );
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            Arc::new(PollyTtsRepository::new(Arc::new(aws_sdk_polly::Client::new(
                &aws_config,
            ))))
        }
    };

    // 3. Instantiate services (inject collaborators)
    tracing::info!("Instantiating services...");
    let article_service = Arc::new(ArticleService::new(
        fetcher,
        cache,
        config.max_content_chars,
        ExcerptLimits {
            enabled: config.enable_excerpt_limits,
            max_chars: config.max_excerpt_chars,
        },
    ));
    let podcast_service = Arc::new(PodcastService::new(
        tts_repo,
        toolchain.clone(),
        scratch_dir.clone(),
    ));

    // 4. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let config = Arc::new(config);
    let article_controller = Arc::new(ArticleController::new(
        article_service.clone(),
        config.clone(),
    ));
    let podcast_controller = Arc::new(PodcastController::new(
        article_service,
        podcast_service,
        config.clone(),
    ));
    let ready_state = Arc::new(ReadyState {
        toolchain,
        scratch_dir,
    });

    // Start HTTP server with all routes
    start_http_server(config, ready_state, article_controller, podcast_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "blogcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "blogcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
