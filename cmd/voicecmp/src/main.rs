//! voicecmp - Batch voiceprint similarity comparison over audio files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use nova_audio::{Normalizer, NormalizerConfig};
use nova_compare::{print_summary, save_json, save_table, Engine, EngineConfig};
use nova_voiceprint::{
    EmbeddingExtractor, FeatureExtractor, Metric, MfccStatsExtractor, SpectralModel,
    DEFAULT_EUCLIDEAN_SCALE,
};

/// Compare all pairs of audio files by voiceprint similarity.
#[derive(Parser, Debug)]
#[command(name = "voicecmp")]
#[command(about = "Compare all pairs of audio files by voiceprint similarity")]
struct Args {
    /// Audio files to compare
    files: Vec<PathBuf>,

    /// Directory to scan for audio files (wav, mp3, flac, aac, ogg, m4a)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Feature extraction strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Embedding)]
    strategy: StrategyArg,

    /// Similarity metric
    #[arg(short, long, value_enum, default_value_t = MetricArg::Cosine)]
    metric: MetricArg,

    /// Decay constant for the euclidean metric
    #[arg(long, default_value_t = DEFAULT_EUCLIDEAN_SCALE)]
    scale: f64,

    /// Target sample rate in Hz
    #[arg(long, default_value_t = 16000)]
    rate: u32,

    /// Write the report as JSON to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the report as CSV to this file (default: timestamped name)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Quiet mode (no console table)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Speaker embedding model
    Embedding,
    /// MFCC summary statistics
    Mfcc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Cosine,
    Euclidean,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    let assets = gather_inputs(&args)?;
    if assets.len() < 2 {
        anyhow::bail!(
            "need at least 2 audio files to compare, found {}",
            assets.len()
        );
    }

    if !args.quiet {
        println!("=== Comparing {} audio files ===", assets.len());
        for (i, path) in assets.iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
    }

    let extractor: Box<dyn FeatureExtractor> = match args.strategy {
        StrategyArg::Embedding => Box::new(EmbeddingExtractor::new(Arc::new(SpectralModel::new()))),
        StrategyArg::Mfcc => Box::new(MfccStatsExtractor::new()),
    };

    let metric = match args.metric {
        MetricArg::Cosine => Metric::Cosine,
        MetricArg::Euclidean => Metric::Euclidean { scale: args.scale },
    };

    let engine = Engine::with_config(
        extractor,
        EngineConfig {
            normalizer: NormalizerConfig {
                target_rate: args.rate,
                ..NormalizerConfig::default()
            },
            metric,
            ..EngineConfig::default()
        },
    );

    let report = engine.compare_all(&assets);

    if !args.quiet {
        print_summary(&report);
    }

    let csv_path = args.csv.clone().unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("voicecmp_results_{stamp}.csv"))
    });
    let written = save_table(&report, &csv_path)?;
    println!("\nReport saved to {}", written.display());

    if let Some(output) = &args.output {
        save_json(&report, output)?;
        println!("JSON report saved to {}", output.display());
    }

    Ok(())
}

/// Collects input files: explicit paths first, then a directory scan.
/// Scanned entries are sorted for reproducible report ordering.
fn gather_inputs(args: &Args) -> Result<Vec<PathBuf>> {
    let mut assets = args.files.clone();

    if let Some(dir) = &args.dir {
        let mut scanned = scan_dir(dir)?;
        assets.append(&mut scanned);
    }

    Ok(assets)
}

/// Scans a directory for files with whitelisted audio extensions.
fn scan_dir(dir: &PathBuf) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && Normalizer::is_supported(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
