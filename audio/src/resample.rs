use rubato::{FftFixedInOut, Resampler};

/// Downmixes interleaved multi-channel samples to mono by channel averaging.
///
/// Mono input is returned unchanged. A trailing partial frame is dropped.
pub fn downmix_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let ch = channels.max(1) as usize;
    if ch == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Resamples a mono signal from `from_rate` to `to_rate`.
///
/// Same-rate input passes through untouched, which keeps normalization
/// idempotent for already-normalized audio. The final block is zero-padded to
/// the resampler's chunk size and the output trimmed back to the expected
/// length.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, String> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(format!("invalid sample rate: {from_rate} -> {to_rate}"));
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler =
        FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, 1024, 1)
            .map_err(|e| format!("resampler init: {e}"))?;

    let expected = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let mut out: Vec<f32> = Vec::with_capacity(expected + 1024);
    let mut pos = 0;

    while pos < samples.len() {
        let needed = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; needed];
        let n = needed.min(samples.len() - pos);
        chunk[..n].copy_from_slice(&samples[pos..pos + n]);
        pos += n;

        let frames = resampler
            .process(&[chunk], None)
            .map_err(|e| format!("resample: {e}"))?;
        out.extend_from_slice(&frames[0]);
    }

    out.truncate(expected);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_stereo_averages() {
        // L=0.2, R=0.4 -> 0.3
        let interleaved = vec![0.2, 0.4, -0.2, -0.4];
        let mono = downmix_mono(&interleaved, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert!((mono[1] + 0.3).abs() < 1e-6);
    }

    #[test]
    fn downmix_mono_is_identity() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(downmix_mono(&samples, 1), samples);
    }

    #[test]
    fn resample_same_rate_passthrough() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 100.0).sin()).collect();
        let out = resample(&samples, 16000, 16000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn resample_downsample_length() {
        let samples = vec![0.0f32; 44100];
        let out = resample(&samples, 44100, 16000).unwrap();
        assert_eq!(out.len(), 16000);
    }

    #[test]
    fn resample_upsample_length() {
        let samples = vec![0.0f32; 8000];
        let out = resample(&samples, 8000, 16000).unwrap();
        assert_eq!(out.len(), 16000);
    }

    #[test]
    fn resample_preserves_tone_energy() {
        // A 440 Hz tone should survive 44.1kHz -> 16kHz with comparable RMS.
        let samples: Vec<f32> = (0..44100)
            .map(|i| {
                let t = i as f64 / 44100.0;
                ((440.0 * 2.0 * std::f64::consts::PI * t).sin() * 0.5) as f32
            })
            .collect();
        let out = resample(&samples, 44100, 16000).unwrap();

        let rms_in: f64 = (samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>()
            / samples.len() as f64)
            .sqrt();
        let rms_out: f64 =
            (out.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / out.len() as f64).sqrt();
        assert!(
            (rms_in - rms_out).abs() < 0.05,
            "rms drifted: {rms_in} -> {rms_out}"
        );
    }

    #[test]
    fn resample_zero_rate_fails() {
        assert!(resample(&[0.0], 0, 16000).is_err());
        assert!(resample(&[0.0], 16000, 0).is_err());
    }
}
