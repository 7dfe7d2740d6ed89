/// Qualitative similarity bands for report rendering.
///
/// The thresholds are hand-tuned calibration values; they assume the raw
/// cosine scale and may need re-tuning for a different embedding model.
#[derive(Debug, Clone)]
pub struct Bands {
    /// "very high" at or above this score (default: 0.9).
    pub very_high: f64,
    /// "high" at or above this score (default: 0.8).
    pub high: f64,
    /// "medium" at or above this score (default: 0.7). Also the cutoff the
    /// advisory identity tags key on.
    pub medium: f64,
    /// "low" at or above this score (default: 0.5); anything below is
    /// "very low".
    pub low: f64,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            very_high: 0.9,
            high: 0.8,
            medium: 0.7,
            low: 0.5,
        }
    }
}

impl Bands {
    /// Maps a score to its qualitative description.
    pub fn describe(&self, score: f64) -> &'static str {
        if score >= self.very_high {
            "very high"
        } else if score >= self.high {
            "high"
        } else if score >= self.medium {
            "medium"
        } else if score >= self.low {
            "low"
        } else {
            "very low"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        let bands = Bands::default();
        assert_eq!(bands.describe(0.95), "very high");
        assert_eq!(bands.describe(0.9), "very high");
        assert_eq!(bands.describe(0.85), "high");
        assert_eq!(bands.describe(0.8), "high");
        assert_eq!(bands.describe(0.7), "medium");
        assert_eq!(bands.describe(0.5), "low");
        assert_eq!(bands.describe(0.49), "very low");
        assert_eq!(bands.describe(-0.3), "very low");
    }

    #[test]
    fn custom_thresholds() {
        let bands = Bands {
            very_high: 0.99,
            high: 0.95,
            medium: 0.9,
            low: 0.8,
        };
        assert_eq!(bands.describe(0.96), "high");
        assert_eq!(bands.describe(0.85), "low");
    }
}
