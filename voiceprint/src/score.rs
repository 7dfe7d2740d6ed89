use std::fmt;

use crate::error::VoiceprintError;

/// Default decay constant for [`Metric::Euclidean`].
///
/// Calibration parameter: hand-tuned for MFCC statistic vectors, re-tune when
/// switching embedding models.
pub const DEFAULT_EUCLIDEAN_SCALE: f64 = 100.0;

/// Distance metric for comparing two feature vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Raw cosine similarity, dot(A,B) / (|A|*|B|).
    ///
    /// Mathematically in [-1, 1]; never clamped, since the downstream
    /// threshold bands assume the raw scale.
    Cosine,
    /// Euclidean distance mapped through exponential decay:
    /// `exp(-distance / scale)`, in (0, 1].
    Euclidean { scale: f64 },
}

impl Metric {
    /// Euclidean metric with the default scale.
    pub fn euclidean() -> Self {
        Self::Euclidean {
            scale: DEFAULT_EUCLIDEAN_SCALE,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Euclidean { .. } => write!(f, "euclidean"),
        }
    }
}

/// Computes a bounded similarity score between two feature vectors.
///
/// Symmetric in its arguments. Fails with `DimensionMismatch` when the
/// vectors differ in length (never truncates or pads) and with
/// `DegenerateVector` when cosine is requested against a zero vector
/// (never returns NaN).
pub fn score(a: &[f32], b: &[f32], metric: Metric) -> Result<f64, VoiceprintError> {
    if a.len() != b.len() {
        return Err(VoiceprintError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    match metric {
        Metric::Cosine => {
            let mut dot: f64 = 0.0;
            let mut norm_a: f64 = 0.0;
            let mut norm_b: f64 = 0.0;
            for (&x, &y) in a.iter().zip(b.iter()) {
                dot += x as f64 * y as f64;
                norm_a += x as f64 * x as f64;
                norm_b += y as f64 * y as f64;
            }
            if norm_a == 0.0 || norm_b == 0.0 {
                return Err(VoiceprintError::DegenerateVector);
            }
            Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
        }
        Metric::Euclidean { scale } => {
            // Non-positive scale falls back to the default.
            let scale = if scale > 0.0 {
                scale
            } else {
                DEFAULT_EUCLIDEAN_SCALE
            };
            let mut sq_sum: f64 = 0.0;
            for (&x, &y) in a.iter().zip(b.iter()) {
                let d = x as f64 - y as f64;
                sq_sum += d * d;
            }
            Ok((-sq_sum.sqrt() / scale).exp())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identity() {
        let v = vec![0.3f32, -0.7, 0.2, 0.9];
        let s = score(&v, &v, Metric::Cosine).unwrap();
        assert!((s - 1.0).abs() < 1e-12, "self-similarity should be 1, got {s}");
    }

    #[test]
    fn cosine_symmetry() {
        let a = vec![0.1f32, 0.5, -0.3];
        let b = vec![0.9f32, -0.2, 0.4];
        let ab = score(&a, &b, Metric::Cosine).unwrap();
        let ba = score(&b, &a, Metric::Cosine).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn cosine_not_clamped() {
        // Opposed vectors give -1; the raw value must be reported.
        let a = vec![1.0f32, 0.0];
        let b = vec![-1.0f32, 0.0];
        let s = score(&a, &b, Metric::Cosine).unwrap();
        assert!((s + 1.0).abs() < 1e-12, "expected -1, got {s}");
    }

    #[test]
    fn cosine_zero_vector_is_degenerate() {
        let a = vec![0.0f32; 4];
        let b = vec![1.0f32, 0.0, 0.0, 0.0];
        let err = score(&a, &b, Metric::Cosine).unwrap_err();
        assert!(matches!(err, VoiceprintError::DegenerateVector));

        let err = score(&b, &a, Metric::Cosine).unwrap_err();
        assert!(matches!(err, VoiceprintError::DegenerateVector));
    }

    #[test]
    fn dimension_mismatch_never_truncates() {
        // A 256-dim embedding against a 52-dim statistic vector must fail.
        let emb = vec![0.1f32; 256];
        let stats = vec![0.1f32; 52];
        let err = score(&emb, &stats, Metric::Cosine).unwrap_err();
        match err {
            VoiceprintError::DimensionMismatch { expected, got } => {
                assert_eq!(expected, 256);
                assert_eq!(got, 52);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }

        let err = score(&emb, &stats, Metric::euclidean()).unwrap_err();
        assert!(matches!(err, VoiceprintError::DimensionMismatch { .. }));
    }

    #[test]
    fn euclidean_identical_is_one() {
        let v = vec![5.0f32, -2.0, 8.0];
        let s = score(&v, &v, Metric::euclidean()).unwrap();
        assert_eq!(s, 1.0);
    }

    #[test]
    fn euclidean_decays_with_distance() {
        let origin = vec![0.0f32, 0.0];
        let near = vec![1.0f32, 0.0];
        let far = vec![50.0f32, 0.0];

        let s_near = score(&origin, &near, Metric::euclidean()).unwrap();
        let s_far = score(&origin, &far, Metric::euclidean()).unwrap();
        assert!(s_near > s_far);
        assert!(s_near > 0.0 && s_near <= 1.0);
        assert!(s_far > 0.0 && s_far <= 1.0);

        // exp(-1/100) and exp(-50/100).
        assert!((s_near - (-0.01f64).exp()).abs() < 1e-12);
        assert!((s_far - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn euclidean_symmetry() {
        let a = vec![1.0f32, 2.0, 3.0];
        let b = vec![4.0f32, 6.0, 8.0];
        assert_eq!(
            score(&a, &b, Metric::euclidean()).unwrap(),
            score(&b, &a, Metric::euclidean()).unwrap()
        );
    }

    #[test]
    fn euclidean_zero_vectors_allowed() {
        // Zero vectors are only degenerate for cosine.
        let z = vec![0.0f32; 3];
        let s = score(&z, &z, Metric::euclidean()).unwrap();
        assert_eq!(s, 1.0);
    }

    #[test]
    fn euclidean_bad_scale_uses_default() {
        let a = vec![0.0f32, 0.0];
        let b = vec![1.0f32, 0.0];
        let s = score(&a, &b, Metric::Euclidean { scale: 0.0 }).unwrap();
        assert!((s - (-0.01f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn metric_display() {
        assert_eq!(Metric::Cosine.to_string(), "cosine");
        assert_eq!(Metric::euclidean().to_string(), "euclidean");
    }
}
