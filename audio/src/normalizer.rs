use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::decode::{decode_with_deadline, DecodeBackend, HoundBackend, SymphoniaBackend};
use crate::error::AudioError;
use crate::resample::{downmix_mono, resample};
use crate::waveform::Waveform;

/// File extensions the normalizer accepts, lowercase, without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "aac", "ogg", "m4a"];

/// Configuration for [`Normalizer`].
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Output sample rate in Hz (default: 16000).
    pub target_rate: u32,
    /// Output channel count (default: 1). Only mono targets are supported;
    /// multi-channel input is downmixed by channel averaging.
    pub target_channels: u16,
    /// Time budget for a single backend decode call (default: 60s).
    /// An exceeded budget counts as that backend failing.
    pub decode_budget: Duration,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_rate: 16000,
            target_channels: 1,
            decode_budget: Duration::from_secs(60),
        }
    }
}

/// Converts an on-disk audio file into a normalized [`Waveform`].
///
/// Decoding backends are tried in a fixed priority order; the normalizer only
/// fails with [`AudioError::Conversion`] after every backend has been
/// exhausted, and the error detail carries the per-backend failure log.
///
/// Normalization is idempotent: input that is already mono at the target rate
/// passes through without a resampler in the path.
pub struct Normalizer {
    cfg: NormalizerConfig,
    backends: Vec<Arc<dyn DecodeBackend>>,
}

impl Normalizer {
    /// Creates a Normalizer with the default configuration (16kHz mono).
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Creates a Normalizer with the given configuration and the default
    /// backend chain: symphonia probe first, plain WAV reader second.
    pub fn with_config(cfg: NormalizerConfig) -> Self {
        Self {
            cfg,
            backends: vec![Arc::new(SymphoniaBackend), Arc::new(HoundBackend)],
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.cfg
    }

    /// Returns true if the path's extension is on the whitelist.
    pub fn is_supported(path: &Path) -> bool {
        extension_of(path)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Decodes, downmixes and resamples one file into a [`Waveform`].
    pub fn normalize(&self, path: &Path) -> Result<Waveform, AudioError> {
        if !path.exists() {
            return Err(AudioError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let ext = extension_of(path).unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AudioError::UnsupportedFormat {
                path: path.to_path_buf(),
                ext,
            });
        }

        // Backend fallback chain: collect each failure, stop on first success.
        let mut failures: Vec<String> = Vec::new();
        let mut decoded = None;
        for backend in &self.backends {
            let name = backend.name();
            match decode_with_deadline(
                Arc::clone(backend),
                path.to_path_buf(),
                self.cfg.decode_budget,
            ) {
                Ok(d) => {
                    tracing::debug!(
                        backend = name,
                        rate = d.sample_rate,
                        channels = d.channels,
                        frames = d.samples.len() / d.channels.max(1) as usize,
                        "decoded {}",
                        path.display()
                    );
                    decoded = Some(d);
                    break;
                }
                Err(e) => {
                    tracing::debug!(backend = name, "decode failed for {}: {e}", path.display());
                    failures.push(format!("{name}: {e}"));
                }
            }
        }

        let decoded = decoded.ok_or_else(|| AudioError::Conversion {
            path: path.to_path_buf(),
            detail: failures.join("; "),
        })?;

        if self.cfg.target_channels != 1 && decoded.channels != self.cfg.target_channels {
            return Err(AudioError::Conversion {
                path: path.to_path_buf(),
                detail: format!(
                    "cannot convert {} channels to {}: only mono targets are supported",
                    decoded.channels, self.cfg.target_channels
                ),
            });
        }

        let mono = downmix_mono(&decoded.samples, decoded.channels);
        let samples = resample(&mono, decoded.sample_rate, self.cfg.target_rate).map_err(|e| {
            AudioError::Conversion {
                path: path.to_path_buf(),
                detail: e,
            }
        })?;

        if samples.is_empty() {
            return Err(AudioError::Conversion {
                path: path.to_path_buf(),
                detail: "decoded no samples".to_string(),
            });
        }

        Ok(Waveform::new(samples, self.cfg.target_rate))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Materializes a waveform as a 16-bit PCM WAV file.
///
/// Convenience for callers that need a file path; not part of the core
/// normalization contract.
pub fn write_wav(waveform: &Waveform, path: &Path) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let to_conversion = |detail: String| AudioError::Conversion {
        path: path.to_path_buf(),
        detail,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| to_conversion(e.to_string()))?;
    for &s in waveform.samples() {
        let v = (s * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer
            .write_sample(v)
            .map_err(|e| to_conversion(e.to_string()))?;
    }
    writer.finalize().map_err(|e| to_conversion(e.to_string()))?;
    Ok(())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
