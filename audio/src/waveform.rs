use std::time::Duration;

/// Decoded, normalized audio signal: mono f32 samples at a fixed sample rate.
///
/// Sample values always lie in [-1.0, 1.0]; the constructor clamps out-of-range
/// values and maps non-finite values to 0. The waveform is owned by the
/// pipeline stage that produced it and is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Creates a waveform, enforcing the sample range invariant.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        for s in &mut samples {
            if !s.is_finite() {
                *s = 0.0;
            } else {
                *s = s.clamp(-1.0, 1.0);
            }
        }
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration at the waveform's sample rate.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
