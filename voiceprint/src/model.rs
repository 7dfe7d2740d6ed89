use nova_audio::Waveform;

use crate::error::VoiceprintError;
use crate::fbank::{compute_fbank, l2_normalize, FbankConfig};

/// Maps a normalized waveform to a fixed-length speaker embedding.
///
/// The input must be mono at the model's expected sample rate (16kHz for the
/// built-in model). The output is a dense f32 vector whose dimensionality is
/// returned by [`SpeakerModel::dimension`]. Silence handling and voice
/// activity trimming are the implementation's concern.
///
/// Implementations must be deterministic for identical input and safe for
/// concurrent use.
pub trait SpeakerModel: Send + Sync {
    /// Computes a speaker embedding from a normalized waveform.
    fn embed(&self, waveform: &Waveform) -> Result<Vec<f32>, VoiceprintError>;

    /// Returns the dimensionality of the embedding vectors.
    fn dimension(&self) -> usize;
}

/// Built-in dependency-free [`SpeakerModel`].
///
/// Pools log mel filterbank features into a spectral signature: mean and
/// standard deviation per mel bin across all frames, concatenated and
/// L2-normalized. With the default 80-mel configuration the embedding has
/// 160 dimensions.
///
/// Deterministic and cheap; a neural backend can replace it through the
/// [`SpeakerModel`] trait without touching the rest of the pipeline.
pub struct SpectralModel {
    fbank_cfg: FbankConfig,
}

impl SpectralModel {
    pub fn new() -> Self {
        Self::with_config(FbankConfig::default())
    }

    pub fn with_config(fbank_cfg: FbankConfig) -> Self {
        Self { fbank_cfg }
    }
}

impl Default for SpectralModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerModel for SpectralModel {
    fn embed(&self, waveform: &Waveform) -> Result<Vec<f32>, VoiceprintError> {
        let features = compute_fbank(waveform.samples(), &self.fbank_cfg).ok_or(
            VoiceprintError::EmptyWaveform {
                min_samples: self.fbank_cfg.frame_length,
                got_samples: waveform.len(),
            },
        )?;

        let num_mels = self.fbank_cfg.num_mels;
        let t = features.len() as f64;

        // Mean and std per mel bin across frames, f64 accumulation.
        let mut emb = vec![0.0f32; 2 * num_mels];
        for m in 0..num_mels {
            let mut sum: f64 = 0.0;
            for frame in &features {
                sum += frame[m] as f64;
            }
            let mean = sum / t;

            let mut var_sum: f64 = 0.0;
            for frame in &features {
                let d = frame[m] as f64 - mean;
                var_sum += d * d;
            }
            emb[m] = mean as f32;
            emb[num_mels + m] = (var_sum / t).sqrt() as f32;
        }

        l2_normalize(&mut emb);
        Ok(emb)
    }

    fn dimension(&self) -> usize {
        2 * self.fbank_cfg.num_mels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_waveform(freq_hz: f64, n: usize) -> Waveform {
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f64 / 16000.0;
                ((freq_hz * 2.0 * std::f64::consts::PI * t).sin() * 0.5) as f32
            })
            .collect();
        Waveform::new(samples, 16000)
    }

    #[test]
    fn spectral_model_dimension() {
        assert_eq!(SpectralModel::new().dimension(), 160);
    }

    #[test]
    fn spectral_model_unit_norm() {
        let model = SpectralModel::new();
        let emb = model.embed(&sine_waveform(440.0, 16000)).unwrap();
        assert_eq!(emb.len(), 160);

        let norm: f64 = emb
            .iter()
            .map(|&x| (x as f64) * (x as f64))
            .sum::<f64>()
            .sqrt();
        assert!(
            (norm - 1.0).abs() < 1e-4,
            "embedding should be unit length, got {norm}"
        );
    }

    #[test]
    fn spectral_model_deterministic() {
        let model = SpectralModel::new();
        let wav = sine_waveform(330.0, 8000);
        let a = model.embed(&wav).unwrap();
        let b = model.embed(&wav).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn spectral_model_separates_tones() {
        let model = SpectralModel::new();
        let low = model.embed(&sine_waveform(220.0, 16000)).unwrap();
        let high = model.embed(&sine_waveform(3500.0, 16000)).unwrap();

        let dot: f64 = low
            .iter()
            .zip(&high)
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();
        // Both are unit vectors, so the dot is their cosine.
        assert!(dot < 0.999, "distinct tones should not collapse, got {dot}");
    }

    #[test]
    fn spectral_model_too_short() {
        let model = SpectralModel::new();
        let err = model.embed(&sine_waveform(440.0, 100)).unwrap_err();
        assert!(matches!(err, VoiceprintError::EmptyWaveform { .. }));
    }
}
