use std::path::{Path, PathBuf};

use chrono::Utc;
use nova_audio::{Normalizer, NormalizerConfig};
use nova_voiceprint::{score, FeatureExtractor, Metric};

use crate::bands::Bands;
use crate::identity::analyze_pair;
use crate::report::{summarize, PairResult, Report, STATUS_FAILURE, STATUS_SUCCESS};

/// Configuration for [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub metric: Metric,
    pub bands: Bands,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            metric: Metric::Cosine,
            bands: Bands::default(),
        }
    }
}

/// Pairwise comparison engine.
///
/// Runs every asset through normalize+extract exactly once, then scores all
/// unordered pairs: extraction cost is O(N), scoring O(N^2). Pairs are
/// emitted for i < j in input order, so the report ordering is stable and
/// reproducible.
///
/// A failing asset is isolated: every pair involving it is recorded as a
/// failure with the error, all other pairs proceed. Each run is independent;
/// the feature cache lives only for the duration of one `compare_all` call.
pub struct Engine {
    normalizer: Normalizer,
    extractor: Box<dyn FeatureExtractor>,
    metric: Metric,
    bands: Bands,
}

impl Engine {
    /// Creates an Engine with the default configuration (16kHz mono, cosine).
    pub fn new(extractor: Box<dyn FeatureExtractor>) -> Self {
        Self::with_config(extractor, EngineConfig::default())
    }

    /// Creates an Engine with the given configuration.
    pub fn with_config(extractor: Box<dyn FeatureExtractor>, cfg: EngineConfig) -> Self {
        Self {
            normalizer: Normalizer::with_config(cfg.normalizer),
            extractor,
            metric: cfg.metric,
            bands: cfg.bands,
        }
    }

    /// Compares all unordered pairs of the given assets.
    ///
    /// Produces exactly C(N, 2) results: no self-pairs, no duplicates.
    pub fn compare_all(&self, assets: &[PathBuf]) -> Report {
        // Per-run feature cache: each asset normalized and extracted once.
        let features: Vec<Result<Vec<f32>, String>> =
            assets.iter().map(|path| self.prepare(path)).collect();

        let n = assets.len();
        let mut results = Vec::with_capacity(n.saturating_sub(1) * n / 2);
        let mut index = 0;
        for i in 0..n {
            for j in i + 1..n {
                index += 1;
                results.push(self.compare_pair(
                    index,
                    &assets[i],
                    &assets[j],
                    &features[i],
                    &features[j],
                ));
            }
        }

        let summary = summarize(&results);
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "comparison run complete"
        );

        Report {
            generated_at: Utc::now().to_rfc3339(),
            strategy: self.extractor.name().to_string(),
            metric: self.metric.to_string(),
            results,
            summary,
        }
    }

    /// Normalizes and extracts one asset. Failures come back as strings that
    /// already name the offending path.
    fn prepare(&self, path: &Path) -> Result<Vec<f32>, String> {
        let waveform = self
            .normalizer
            .normalize(path)
            .map_err(|e| e.to_string())
            .inspect_err(|e| tracing::warn!("{e}"))?;
        tracing::debug!(
            samples = waveform.len(),
            secs = waveform.duration().as_secs_f64(),
            "normalized {}",
            path.display()
        );
        self.extractor
            .extract(&waveform)
            .map_err(|e| format!("extract {}: {e}", path.display()))
            .inspect_err(|e| tracing::warn!("{e}"))
    }

    fn compare_pair(
        &self,
        index: usize,
        path1: &Path,
        path2: &Path,
        feat1: &Result<Vec<f32>, String>,
        feat2: &Result<Vec<f32>, String>,
    ) -> PairResult {
        let file1 = file_name_of(path1);
        let file2 = file_name_of(path2);

        let mut result = PairResult {
            index,
            file1,
            file2,
            file1_path: path1.display().to_string(),
            file2_path: path2.display().to_string(),
            score: None,
            status: STATUS_FAILURE.to_string(),
            error: String::new(),
            band: "N/A".to_string(),
            tag: String::new(),
        };

        // Per-asset failures fail the pair but never the run.
        match (feat1, feat2) {
            (Err(e1), Err(e2)) => {
                result.error = format!("{e1}; {e2}");
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => {
                result.error = e.clone();
            }
            (Ok(a), Ok(b)) => match score(a, b, self.metric) {
                Ok(s) => {
                    result.score = Some(s);
                    result.status = STATUS_SUCCESS.to_string();
                    result.band = self.bands.describe(s).to_string();
                    result.tag = analyze_pair(&result.file1, &result.file2, s, self.bands.medium)
                        .unwrap_or_default()
                        .to_string();
                }
                Err(e) => {
                    result.error = format!("score {} vs {}: {e}", result.file1, result.file2);
                }
            },
        }

        result
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
