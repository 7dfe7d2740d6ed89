use thiserror::Error;

/// Errors returned by feature extraction and similarity scoring.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    #[error("waveform too short: need at least {min_samples} samples, got {got_samples}")]
    EmptyWaveform {
        min_samples: usize,
        got_samples: usize,
    },

    #[error("feature extraction failed: {0}")]
    Extraction(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("zero vector: cosine similarity is undefined")]
    DegenerateVector,
}
