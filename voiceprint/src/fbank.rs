use std::f64::consts::PI;

/// Configures mel filterbank feature extraction.
///
/// Defaults follow the Kaldi conventions used by speaker embedding models:
/// Povey window, 25ms frames, 10ms shift, 80 mel bins, 20-7600 Hz range.
#[derive(Debug, Clone)]
pub struct FbankConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: u32,
    /// Number of mel filterbank channels (default: 80).
    pub num_mels: usize,
    /// Frame length in samples (default: 400 = 25ms @ 16kHz).
    pub frame_length: usize,
    /// Frame shift in samples (default: 160 = 10ms @ 16kHz).
    pub frame_shift: usize,
    /// Pre-emphasis coefficient (default: 0.97).
    pub pre_emphasis: f64,
    /// Floor for log energy (default: 1e-10).
    pub energy_floor: f64,
    /// Low cutoff frequency for mel bins (default: 20 Hz).
    pub low_freq: f64,
    /// High cutoff frequency; zero or negative means offset from Nyquist
    /// (default: -400, i.e. 7600 Hz at 16kHz).
    pub high_freq: f64,
    /// Remove DC offset per frame (default: true).
    pub remove_dc: bool,
    /// Use Povey window (hamming^0.85) instead of Hamming (default: true).
    pub povey_window: bool,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            num_mels: 80,
            frame_length: 400,
            frame_shift: 160,
            pre_emphasis: 0.97,
            energy_floor: 1e-10,
            low_freq: 20.0,
            high_freq: -400.0,
            remove_dc: true,
            povey_window: true,
        }
    }
}

/// Extracts log mel filterbank features from a mono waveform.
///
/// Input: f32 samples in [-1, 1] at the configured sample rate.
/// Output: 2D vec `[num_frames][num_mels]` of log mel energies.
///
/// Returns `None` if the waveform is too short for a single frame.
pub fn compute_fbank(samples: &[f32], cfg: &FbankConfig) -> Option<Vec<Vec<f32>>> {
    if cfg.frame_shift == 0 || cfg.frame_length == 0 || cfg.num_mels == 0 {
        return None;
    }
    if samples.len() < cfg.frame_length {
        return None;
    }

    let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let num_frames = (signal.len() - cfg.frame_length) / cfg.frame_shift + 1;

    // FFT size: next power of 2 >= frame_length.
    let fft_size = next_pow2(cfg.frame_length);
    let half_fft = fft_size / 2 + 1;

    let window = if cfg.povey_window {
        povey_window(cfg.frame_length)
    } else {
        hamming_window(cfg.frame_length)
    };

    // Zero/negative high_freq is an offset from Nyquist.
    let high_freq = if cfg.high_freq <= 0.0 {
        cfg.sample_rate as f64 / 2.0 + cfg.high_freq
    } else {
        cfg.high_freq
    };

    let filterbank = mel_filterbank(
        cfg.num_mels,
        fft_size,
        cfg.sample_rate,
        cfg.low_freq,
        high_freq,
    );

    let mut result = Vec::with_capacity(num_frames);
    let mut fft_buf = vec![(0.0f64, 0.0f64); fft_size];

    for f in 0..num_frames {
        let offset = f * cfg.frame_shift;
        let mut frame: Vec<f64> = signal[offset..offset + cfg.frame_length].to_vec();

        if cfg.remove_dc {
            let mean: f64 = frame.iter().sum::<f64>() / cfg.frame_length as f64;
            for v in &mut frame {
                *v -= mean;
            }
        }

        // Pre-emphasis, in reverse so each sample sees its original neighbor.
        if cfg.pre_emphasis > 0.0 {
            for i in (1..cfg.frame_length).rev() {
                frame[i] -= cfg.pre_emphasis * frame[i - 1];
            }
            frame[0] *= 1.0 - cfg.pre_emphasis;
        }

        // Window, zero-pad, FFT.
        for v in &mut fft_buf {
            *v = (0.0, 0.0);
        }
        for i in 0..cfg.frame_length {
            fft_buf[i] = (frame[i] * window[i], 0.0);
        }
        fft(&mut fft_buf);

        let mut power_spec = vec![0.0f64; half_fft];
        for (k, p) in power_spec.iter_mut().enumerate() {
            let (re, im) = fft_buf[k];
            *p = re * re + im * im;
        }

        // Mel filterbank energies, floored before the log.
        let mut mels = vec![0.0f32; cfg.num_mels];
        for m in 0..cfg.num_mels {
            let mut energy: f64 = 0.0;
            for (k, &w) in filterbank[m].iter().enumerate() {
                energy += w * power_spec[k];
            }
            if energy < cfg.energy_floor {
                energy = cfg.energy_floor;
            }
            mels[m] = energy.ln() as f32;
        }
        result.push(mels);
    }

    Some(result)
}

/// L2-normalizes a vector to unit length in-place.
/// Uses f64 intermediate precision.
pub fn l2_normalize(v: &mut [f32]) {
    let mut norm: f64 = 0.0;
    for &x in v.iter() {
        norm += (x as f64) * (x as f64);
    }
    norm = norm.sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}

fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

fn hamming_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Povey window (hamming^0.85) used by Kaldi.
fn povey_window(n: usize) -> Vec<f64> {
    hamming_window(n).into_iter().map(|w| w.powf(0.85)).collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Computes triangular mel filterbank weights, `[num_mels][half_fft]`.
fn mel_filterbank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    // Equally spaced points on the mel scale, mapped to FFT bin indices.
    let bin_indices: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let mel = mel_low + i as f64 * (mel_high - mel_low) / (num_mels + 1) as f64;
            let hz = mel_to_hz(mel);
            let bin = (hz * fft_size as f64 / sample_rate as f64).floor() as isize;
            bin.max(0).min(half_fft as isize - 1) as usize
        })
        .collect();

    let mut fb = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let mut filter = vec![0.0f64; half_fft];
        let left = bin_indices[m];
        let center = bin_indices[m + 1];
        let right = bin_indices[m + 2];

        if center > left {
            for k in left..=center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        fb.push(filter);
    }
    fb
}

/// In-place Cooley-Tukey FFT over (real, imag) tuples.
/// Input length must be a power of 2.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    // Butterfly passes.
    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let t_re = w.0 * x[start + k + half].0 - w.1 * x[start + k + half].1;
                let t_im = w.0 * x[start + k + half].1 + w.1 * x[start + k + half].0;
                x[start + k] = (u.0 + t_re, u.1 + t_im);
                x[start + k + half] = (u.0 - t_re, u.1 - t_im);
                let w_re = w.0 * wn.0 - w.1 * wn.1;
                let w_im = w.0 * wn.1 + w.1 * wn.0;
                w = (w_re, w_im);
            }
            start += size;
        }
        size <<= 1;
    }
}
