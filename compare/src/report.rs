use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::identity::{TAG_DIFFERENT_PERSON_HIGH, TAG_SAME_PERSON_MISMATCH};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

/// Result of comparing one unordered pair of assets.
///
/// `score` is present iff `status` is "success"; failed pairs carry the
/// error instead, so every requested pair appears exactly once either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    /// 1-based position in the report, ascending (i, j) by input order.
    pub index: usize,
    pub file1: String,
    pub file2: String,
    pub file1_path: String,
    pub file2_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub status: String, // "success", "failure"
    #[serde(default)]
    pub error: String,
    /// Qualitative band ("very high" .. "very low"), "N/A" on failure.
    pub band: String,
    /// Advisory identity tag; empty when names cannot be parsed or the
    /// combination is unremarkable.
    #[serde(default)]
    pub tag: String,
}

impl PairResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Score formatted to 4 decimals, or "N/A".
    pub fn score_text(&self) -> String {
        match self.score {
            Some(s) => format!("{s:.4}"),
            None => "N/A".to_string(),
        }
    }

    /// Score as a percentage to 2 decimals, or "N/A".
    pub fn percent_text(&self) -> String {
        match self.score {
            Some(s) => format!("{:.2}%", s * 100.0),
            None => "N/A".to_string(),
        }
    }
}

/// Reference to one scored pair, used for the summary extremes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRef {
    pub file1: String,
    pub file2: String,
    pub score: f64,
}

/// Aggregate statistics over one comparison run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tagged: usize,
    pub same_person_mismatch: usize,
    pub different_person_high: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest: Option<PairRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest: Option<PairRef>,
}

/// Full output of one comparison run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: String,
    pub strategy: String,
    pub metric: String,
    pub results: Vec<PairResult>,
    pub summary: Summary,
}

/// Computes summary statistics from the result set.
pub fn summarize(results: &[PairResult]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Summary::default()
    };

    for r in results {
        if r.is_success() {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        if !r.tag.is_empty() {
            summary.tagged += 1;
        }
        if r.tag == TAG_SAME_PERSON_MISMATCH {
            summary.same_person_mismatch += 1;
        }
        if r.tag == TAG_DIFFERENT_PERSON_HIGH {
            summary.different_person_high += 1;
        }

        if let Some(score) = r.score {
            let pair = PairRef {
                file1: r.file1.clone(),
                file2: r.file2.clone(),
                score,
            };
            if summary.highest.as_ref().is_none_or(|h| score > h.score) {
                summary.highest = Some(pair.clone());
            }
            if summary.lowest.as_ref().is_none_or(|l| score < l.score) {
                summary.lowest = Some(pair);
            }
        }
    }

    summary
}

/// Prints the comparison table and summary to stdout.
pub fn print_summary(report: &Report) {
    println!("\n{}", "=".repeat(130));
    println!(
        "AUDIO SIMILARITY COMPARISON ({} strategy, {} metric)",
        report.strategy, report.metric
    );
    println!("{}", "=".repeat(130));

    println!(
        "{:<5} {:<24} {:<24} {:>10} {:>10} {:<10} {:<8} {:<32}",
        "#", "File 1", "File 2", "Score", "Percent", "Band", "Status", "Tag"
    );
    println!("{}", "-".repeat(130));

    for r in &report.results {
        println!(
            "{:<5} {:<24} {:<24} {:>10} {:>10} {:<10} {:<8} {:<32}",
            r.index,
            truncate(&r.file1, 24),
            truncate(&r.file2, 24),
            r.score_text(),
            r.percent_text(),
            r.band,
            r.status,
            r.tag
        );
    }
    println!("{}", "-".repeat(130));

    let s = &report.summary;
    println!("Total: {}  Succeeded: {}  Failed: {}", s.total, s.succeeded, s.failed);
    println!(
        "Tagged: {}  ({}: {}, {}: {})",
        s.tagged,
        TAG_SAME_PERSON_MISMATCH,
        s.same_person_mismatch,
        TAG_DIFFERENT_PERSON_HIGH,
        s.different_person_high
    );
    if let Some(h) = &s.highest {
        println!("Highest: {:.4} ({} vs {})", h.score, h.file1, h.file2);
    }
    if let Some(l) = &s.lowest {
        println!("Lowest:  {:.4} ({} vs {})", l.score, l.file1, l.file2);
    }
    println!("{}", "=".repeat(130));
}

/// Renders the report as CSV with a header row, one record per pair.
pub fn render_csv(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(
        "index,file1,file2,file1_path,file2_path,score,percent,band,status,error,tag\n",
    );
    for r in &report.results {
        let fields = [
            r.index.to_string(),
            r.file1.clone(),
            r.file2.clone(),
            r.file1_path.clone(),
            r.file2_path.clone(),
            r.score_text(),
            r.percent_text(),
            r.band.clone(),
            r.status.clone(),
            r.error.clone(),
            r.tag.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Renders the report as plain text, the fallback serialization when the
/// CSV write fails.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Audio similarity comparison ({} strategy, {} metric)\n",
        report.strategy, report.metric
    ));
    out.push_str(&format!("Generated at {}\n\n", report.generated_at));

    for r in &report.results {
        out.push_str(&format!("Comparison {}:\n", r.index));
        out.push_str(&format!("  file1: {} ({})\n", r.file1, r.file1_path));
        out.push_str(&format!("  file2: {} ({})\n", r.file2, r.file2_path));
        if r.is_success() {
            out.push_str(&format!("  score: {} ({})\n", r.score_text(), r.percent_text()));
            out.push_str(&format!("  band: {}\n", r.band));
        } else {
            out.push_str("  status: failure\n");
            out.push_str(&format!("  error: {}\n", r.error));
        }
        if !r.tag.is_empty() {
            out.push_str(&format!("  tag: {}\n", r.tag));
        }
        out.push('\n');
    }

    let s = &report.summary;
    out.push_str(&format!(
        "Total: {}  Succeeded: {}  Failed: {}  Tagged: {}\n",
        s.total, s.succeeded, s.failed, s.tagged
    ));
    if let Some(h) = &s.highest {
        out.push_str(&format!("Highest: {:.4} ({} vs {})\n", h.score, h.file1, h.file2));
    }
    if let Some(l) = &s.lowest {
        out.push_str(&format!("Lowest: {:.4} ({} vs {})\n", l.score, l.file1, l.file2));
    }
    out
}

/// Saves the report as pretty-printed JSON.
pub fn save_json(report: &Report, path: &Path) -> io::Result<()> {
    let data = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    std::fs::write(path, data)
}

/// Saves the report as CSV; falls back to a plain-text rendering alongside
/// when the CSV write fails, so results are never lost. Returns the path
/// actually written.
pub fn save_table(report: &Report, path: &Path) -> io::Result<PathBuf> {
    match std::fs::write(path, render_csv(report)) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) => {
            tracing::warn!("csv write to {} failed ({e}), falling back to text", path.display());
            let alt = path.with_extension("txt");
            std::fs::write(&alt, render_text(report))?;
            Ok(alt)
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(2)).collect();
    format!("{cut}..")
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<PairResult> {
        vec![
            PairResult {
                index: 1,
                file1: "a.wav".into(),
                file2: "b.wav".into(),
                file1_path: "/tmp/a.wav".into(),
                file2_path: "/tmp/b.wav".into(),
                score: Some(0.912345),
                status: STATUS_SUCCESS.into(),
                error: String::new(),
                band: "very high".into(),
                tag: String::new(),
            },
            PairResult {
                index: 2,
                file1: "a.wav".into(),
                file2: "c.wav".into(),
                file1_path: "/tmp/a.wav".into(),
                file2_path: "/tmp/c.wav".into(),
                score: Some(0.41),
                status: STATUS_SUCCESS.into(),
                error: String::new(),
                band: "very low".into(),
                tag: TAG_SAME_PERSON_MISMATCH.into(),
            },
            PairResult {
                index: 3,
                file1: "b.wav".into(),
                file2: "c.wav".into(),
                file1_path: "/tmp/b.wav".into(),
                file2_path: "/tmp/c.wav".into(),
                score: None,
                status: STATUS_FAILURE.into(),
                error: "conversion failed".into(),
                band: "N/A".into(),
                tag: String::new(),
            },
        ]
    }

    fn sample_report() -> Report {
        let results = sample_results();
        let summary = summarize(&results);
        Report {
            generated_at: "2025-01-01T00:00:00Z".into(),
            strategy: "embedding".into(),
            metric: "cosine".into(),
            results,
            summary,
        }
    }

    #[test]
    fn summarize_counts() {
        let s = summarize(&sample_results());
        assert_eq!(s.total, 3);
        assert_eq!(s.succeeded, 2);
        assert_eq!(s.failed, 1);
        assert_eq!(s.tagged, 1);
        assert_eq!(s.same_person_mismatch, 1);
        assert_eq!(s.different_person_high, 0);

        let highest = s.highest.unwrap();
        assert_eq!(highest.file2, "b.wav");
        assert!((highest.score - 0.912345).abs() < 1e-12);
        let lowest = s.lowest.unwrap();
        assert_eq!(lowest.file2, "c.wav");
    }

    #[test]
    fn summarize_empty() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert!(s.highest.is_none());
        assert!(s.lowest.is_none());
    }

    #[test]
    fn csv_has_header_and_na() {
        let csv = render_csv(&sample_report());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "index,file1,file2,file1_path,file2_path,score,percent,band,status,error,tag"
        );
        assert_eq!(csv.lines().count(), 4);

        // Failed pair carries N/A in score and percent columns.
        let failed = csv.lines().last().unwrap();
        assert!(failed.contains("N/A,N/A"), "row: {failed}");
        assert!(failed.contains("conversion failed"));

        // Percent formatted to 2 decimals.
        assert!(csv.contains("91.23%"), "csv: {csv}");
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        let mut report = sample_report();
        report.results[0].file1 = "a,\"b\".wav".into();
        let csv = render_csv(&report);
        assert!(csv.contains("\"a,\"\"b\"\".wav\""), "csv: {csv}");
    }

    #[test]
    fn text_rendering_keeps_failures() {
        let text = render_text(&sample_report());
        assert!(text.contains("Comparison 3:"));
        assert!(text.contains("error: conversion failed"));
        assert!(text.contains("Highest: 0.9123"));
    }

    #[test]
    fn json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample_report();

        save_json(&report, &path).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let back: Report = serde_json::from_str(&data).unwrap();
        assert_eq!(back.results.len(), 3);
        assert_eq!(back.summary.succeeded, 2);
        // Failed pair serializes without a score field.
        assert!(back.results[2].score.is_none());
    }

    #[test]
    fn save_table_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let written = save_table(&sample_report(), &path).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("index,"));
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short.wav", 24), "short.wav");
        let long = "a_very_long_audio_file_name_indeed.wav";
        let t = truncate(long, 24);
        assert_eq!(t.chars().count(), 24);
        assert!(t.ends_with(".."));
    }
}
