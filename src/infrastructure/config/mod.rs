use crate::domain::tts::LanguageCode;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TTS
    pub tts_provider: TtsProvider,
    pub aws_region: String,
    pub default_language: LanguageCode,
    pub default_speed: f32,
    // Pipeline
    pub max_chunk_chars: usize,
    pub inter_segment_silence_millis: u64,
    pub scratch_dir: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    // Article fetching
    pub request_timeout_secs: u64,
    pub max_content_chars: usize,
    pub cache_enabled: bool,
    pub cache_expiry_hours: u64,
    // Legal compliance
    pub enable_excerpt_limits: bool,
    pub max_excerpt_chars: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Google,
    Polly,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            tts_provider: env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "polly" => TtsProvider::Polly,
                    _ => TtsProvider::Google,
                })?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            default_language: env::var("DEFAULT_LANGUAGE")
                .ok()
                .and_then(|code| LanguageCode::parse(&code))
                .unwrap_or(LanguageCode::English),
            default_speed: env::var("DEFAULT_SPEED")
                .unwrap_or_else(|_| "1.0".to_string())
                .parse()?,
            max_chunk_chars: env::var("MAX_CHUNK_CHARS")
                .unwrap_or_else(|_| "4500".to_string())
                .parse()?,
            inter_segment_silence_millis: env::var("INTER_SEGMENT_SILENCE_MILLIS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            scratch_dir: env::var("SCRATCH_DIR").unwrap_or_else(|_| "./temp".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            max_content_chars: env::var("MAX_CONTENT_CHARS")
                .unwrap_or_else(|_| "50000".to_string())
                .parse()?,
            cache_enabled: env::var("CACHE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(true),
            cache_expiry_hours: env::var("CACHE_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()?,
            enable_excerpt_limits: env::var("ENABLE_EXCERPT_LIMITS")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            max_excerpt_chars: env::var("MAX_EXCERPT_CHARS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
