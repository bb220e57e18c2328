pub mod chunker;
pub mod error;
pub mod model;
pub mod service;

pub use error::{ChunkError, PodcastError, PostProcessError, StitchError, SynthesisError};
pub use model::{
    AudioSegment, GeneratedPodcast, PipelineConfig, PipelineWarning, StitchResult, TextSegment,
};
pub use service::PodcastService;
