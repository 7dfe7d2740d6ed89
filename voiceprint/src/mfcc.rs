use crate::fbank::{compute_fbank, FbankConfig};

/// Configures MFCC extraction for the statistical voiceprint strategy.
///
/// Defaults match the common analysis setup for speech at 16kHz: 13
/// coefficients over 2048-sample windows with a 512-sample hop.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: u32,
    /// Number of cepstral coefficients per frame (default: 13).
    pub n_mfcc: usize,
    /// Number of mel bands feeding the DCT (default: 40).
    pub num_mels: usize,
    /// Analysis window size in samples (default: 2048).
    pub frame_length: usize,
    /// Hop between windows in samples (default: 512).
    pub frame_shift: usize,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_mfcc: 13,
            num_mels: 40,
            frame_length: 2048,
            frame_shift: 512,
        }
    }
}

impl MfccConfig {
    fn fbank_config(&self) -> FbankConfig {
        FbankConfig {
            sample_rate: self.sample_rate,
            num_mels: self.num_mels,
            frame_length: self.frame_length,
            frame_shift: self.frame_shift,
            low_freq: 0.0,
            // Full band up to Nyquist.
            high_freq: self.sample_rate as f64 / 2.0,
            povey_window: false,
            ..FbankConfig::default()
        }
    }
}

/// Computes per-frame MFCCs: log mel energies followed by an orthonormal
/// DCT-II, keeping the first `n_mfcc` coefficients.
///
/// Output: `[num_frames][n_mfcc]`. Pure function of its inputs.
/// Returns `None` if the waveform is too short for a single frame.
pub fn compute_mfcc(samples: &[f32], cfg: &MfccConfig) -> Option<Vec<Vec<f32>>> {
    if cfg.n_mfcc == 0 || cfg.n_mfcc > cfg.num_mels {
        return None;
    }
    let mels = compute_fbank(samples, &cfg.fbank_config())?;
    Some(mels.iter().map(|frame| dct2(frame, cfg.n_mfcc)).collect())
}

/// Orthonormal DCT-II, truncated to `n_out` coefficients.
fn dct2(frame: &[f32], n_out: usize) -> Vec<f32> {
    let m = frame.len();
    let scale0 = (1.0 / m as f64).sqrt();
    let scale = (2.0 / m as f64).sqrt();

    (0..n_out)
        .map(|k| {
            let mut acc: f64 = 0.0;
            for (i, &x) in frame.iter().enumerate() {
                let angle = std::f64::consts::PI * k as f64 * (2 * i + 1) as f64 / (2 * m) as f64;
                acc += x as f64 * angle.cos();
            }
            let s = if k == 0 { scale0 } else { scale };
            (acc * s) as f32
        })
        .collect()
}
