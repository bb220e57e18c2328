use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::audio::AudioToolchain;

/// Shared dependencies for the readiness probe
pub struct ReadyState {
    pub toolchain: Arc<AudioToolchain>,
    pub scratch_dir: PathBuf,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready = scratch storage is writable. A missing ffmpeg is reported
/// but not fatal: stitching falls back to the first segment.
pub async fn health_ready(State(state): State<Arc<ReadyState>>) -> impl IntoResponse {
    let scratch_writable = scratch_writable(&state.scratch_dir).await;
    let ffmpeg = if state.toolchain.is_available().await {
        "available"
    } else {
        "missing"
    };

    if scratch_writable {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "scratch": "writable",
                "ffmpeg": ffmpeg
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "scratch": "unwritable",
                "ffmpeg": ffmpeg
            })),
        )
    }
}

async fn scratch_writable(scratch_dir: &PathBuf) -> bool {
    if tokio::fs::create_dir_all(scratch_dir).await.is_err() {
        return false;
    }
    let probe = scratch_dir.join(format!("probe_{}", Uuid::new_v4()));
    match tokio::fs::write(&probe, b"ok").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&probe).await;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scratch_writable_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scratch_writable(&dir.path().to_path_buf()).await);
    }

    #[tokio::test]
    async fn test_scratch_not_writable_under_missing_root() {
        let path = PathBuf::from("/proc/nonexistent/scratch");
        assert!(!scratch_writable(&path).await);
    }
}
