use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Raw decoder output before normalization: interleaved f32 samples.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples, `channels` values per frame.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// A single decoding backend.
///
/// Backends report failures as plain strings; the normalizer aggregates them
/// into the conversion failure log when every backend has been exhausted.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use: decoding runs on a helper
/// thread to enforce the time budget.
pub trait DecodeBackend: Send + Sync {
    /// Short backend name used in failure logs (e.g. "symphonia").
    fn name(&self) -> &'static str;

    /// Decodes the file into interleaved f32 samples.
    fn decode(&self, path: &Path) -> Result<DecodedAudio, String>;
}

/// Runs a backend under a bounded time budget.
///
/// The decode executes on a helper thread; if the budget elapses first the
/// worker is abandoned and the call reports failure. Computing the result
/// twice is never possible since the receiver is dropped on timeout.
pub(crate) fn decode_with_deadline(
    backend: Arc<dyn DecodeBackend>,
    path: PathBuf,
    budget: Duration,
) -> Result<DecodedAudio, String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(backend.decode(&path));
    });
    match rx.recv_timeout(budget) {
        Ok(result) => result,
        Err(_) => Err(format!(
            "decode exceeded time budget of {:.1}s",
            budget.as_secs_f64()
        )),
    }
}

/// Primary backend: symphonia format probe.
///
/// Handles every whitelisted container/codec (wav, mp3, flac, aac, ogg, m4a)
/// through symphonia's default probe and codec registry.
pub struct SymphoniaBackend;

impl DecodeBackend for SymphoniaBackend {
    fn name(&self) -> &'static str {
        "symphonia"
    }

    fn decode(&self, path: &Path) -> Result<DecodedAudio, String> {
        let file = std::fs::File::open(path).map_err(|e| format!("open: {e}"))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| format!("probe: {e}"))?;

        let mut format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| "no default audio track".to_string())?;
        let codec_params = track.codec_params.clone();
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| format!("codec: {e}"))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_rate = 0u32;
        let mut channels = 0u16;

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                // End of stream or unrecoverable container error.
                Err(_) => break,
            };
            if packet.track_id() != track_id {
                continue;
            }
            // Skip undecodable packets; a partially corrupt stream can still
            // yield usable audio.
            let Ok(decoded) = decoder.decode(&packet) else {
                continue;
            };

            let spec = *decoded.spec();
            if sample_rate == 0 {
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;
            }

            let num_frames = decoded.frames();
            let mut buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }

        if samples.is_empty() || sample_rate == 0 {
            return Err("no audio samples decoded".to_string());
        }

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels: channels.max(1),
        })
    }
}

/// Fallback backend: plain WAV reader.
///
/// Only handles RIFF/WAV, but does so without the probe machinery and covers
/// integer widths symphonia's PCM reader occasionally rejects.
pub struct HoundBackend;

impl DecodeBackend for HoundBackend {
    fn name(&self) -> &'static str {
        "wav"
    }

    fn decode(&self, path: &Path) -> Result<DecodedAudio, String> {
        let reader = hound::WavReader::open(path).map_err(|e| format!("open: {e}"))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| format!("read: {e}"))?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| format!("read: {e}"))?
            }
        };

        if samples.is_empty() {
            return Err("no audio samples decoded".to_string());
        }

        Ok(DecodedAudio {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn hound_backend_reads_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = (0..1600)
            .map(|i| {
                let t = i as f64 / 16000.0;
                ((440.0 * 2.0 * std::f64::consts::PI * t).sin() * 16000.0) as i16
            })
            .collect();
        write_test_wav(&path, 16000, 1, &samples);

        let decoded = HoundBackend.decode(&path).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 1600);
        // 16-bit int samples scale into [-1, 1].
        assert!(decoded.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn symphonia_backend_reads_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = (0..3200).map(|i| (i % 100) as i16 * 100).collect();
        write_test_wav(&path, 16000, 2, &samples);

        let decoded = SymphoniaBackend.decode(&path).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.samples.len(), 3200);
    }

    #[test]
    fn backends_reject_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"this is not a wav file at all").unwrap();

        assert!(SymphoniaBackend.decode(&path).is_err());
        assert!(HoundBackend.decode(&path).is_err());
    }

    #[test]
    fn deadline_passes_through_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        write_test_wav(&path, 16000, 1, &[0i16; 160]);

        let backend: Arc<dyn DecodeBackend> = Arc::new(HoundBackend);
        let result = decode_with_deadline(backend, path, Duration::from_secs(10));
        assert!(result.is_ok());
    }

    #[test]
    fn deadline_times_out() {
        struct SlowBackend;
        impl DecodeBackend for SlowBackend {
            fn name(&self) -> &'static str {
                "slow"
            }
            fn decode(&self, _path: &Path) -> Result<DecodedAudio, String> {
                std::thread::sleep(Duration::from_secs(5));
                Err("unreachable".into())
            }
        }

        let backend: Arc<dyn DecodeBackend> = Arc::new(SlowBackend);
        let result = decode_with_deadline(
            backend,
            PathBuf::from("ignored.wav"),
            Duration::from_millis(50),
        );
        let err = result.unwrap_err();
        assert!(err.contains("time budget"), "got: {err}");
    }
}
