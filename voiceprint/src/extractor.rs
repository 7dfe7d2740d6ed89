use std::sync::Arc;

use nova_audio::Waveform;

use crate::error::VoiceprintError;
use crate::mfcc::{compute_mfcc, MfccConfig};
use crate::model::SpeakerModel;

/// Strategy interface: maps a normalized waveform to a fixed-length feature
/// vector ("voiceprint").
///
/// The dimension is constant for a given strategy and configuration, and
/// vectors from different strategies are not comparable. Extraction is
/// deterministic: identical waveform in, identical vector out.
pub trait FeatureExtractor: Send + Sync {
    /// Extracts a feature vector. Every component is finite.
    fn extract(&self, waveform: &Waveform) -> Result<Vec<f32>, VoiceprintError>;

    /// Dimensionality of the produced vectors.
    fn dimension(&self) -> usize;

    /// Strategy name for logs and reports (e.g. "embedding").
    fn name(&self) -> &'static str;
}

/// Embedding strategy: delegates to a [`SpeakerModel`] backend.
pub struct EmbeddingExtractor {
    model: Arc<dyn SpeakerModel>,
}

impl EmbeddingExtractor {
    pub fn new(model: Arc<dyn SpeakerModel>) -> Self {
        Self { model }
    }
}

impl FeatureExtractor for EmbeddingExtractor {
    fn extract(&self, waveform: &Waveform) -> Result<Vec<f32>, VoiceprintError> {
        let emb = self.model.embed(waveform)?;
        if emb.len() != self.model.dimension() {
            return Err(VoiceprintError::Extraction(format!(
                "model returned {} dims, declared {}",
                emb.len(),
                self.model.dimension()
            )));
        }
        ensure_finite(&emb)?;
        Ok(emb)
    }

    fn dimension(&self) -> usize {
        self.model.dimension()
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

/// Statistical strategy: summary statistics over per-frame MFCCs.
///
/// Reduces the `[num_frames][n_mfcc]` matrix with four statistics per
/// coefficient — mean, standard deviation, max, min — concatenated in that
/// order into a `4 x n_mfcc` vector (52 dims with the default 13
/// coefficients).
pub struct MfccStatsExtractor {
    cfg: MfccConfig,
}

impl MfccStatsExtractor {
    pub fn new() -> Self {
        Self::with_config(MfccConfig::default())
    }

    pub fn with_config(cfg: MfccConfig) -> Self {
        Self { cfg }
    }
}

impl Default for MfccStatsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for MfccStatsExtractor {
    fn extract(&self, waveform: &Waveform) -> Result<Vec<f32>, VoiceprintError> {
        let frames =
            compute_mfcc(waveform.samples(), &self.cfg).ok_or(VoiceprintError::EmptyWaveform {
                min_samples: self.cfg.frame_length,
                got_samples: waveform.len(),
            })?;

        let n = self.cfg.n_mfcc;
        let t = frames.len() as f64;
        let mut features = vec![0.0f32; 4 * n];

        for c in 0..n {
            let mut sum: f64 = 0.0;
            let mut max = f32::NEG_INFINITY;
            let mut min = f32::INFINITY;
            for frame in &frames {
                let v = frame[c];
                sum += v as f64;
                max = max.max(v);
                min = min.min(v);
            }
            let mean = sum / t;

            let mut var_sum: f64 = 0.0;
            for frame in &frames {
                let d = frame[c] as f64 - mean;
                var_sum += d * d;
            }

            features[c] = mean as f32;
            features[n + c] = (var_sum / t).sqrt() as f32;
            features[2 * n + c] = max;
            features[3 * n + c] = min;
        }

        ensure_finite(&features)?;
        Ok(features)
    }

    fn dimension(&self) -> usize {
        4 * self.cfg.n_mfcc
    }

    fn name(&self) -> &'static str {
        "mfcc"
    }
}

fn ensure_finite(values: &[f32]) -> Result<(), VoiceprintError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(VoiceprintError::Extraction(
            "non-finite component in feature vector".to_string(),
        ));
    }
    Ok(())
}
