//! Pairwise audio similarity comparison.
//!
//! [`Engine::compare_all`] runs a batch of audio files through the full
//! pipeline: normalize and extract features for each file exactly once, score
//! every unordered pair, attach advisory identity tags, and aggregate
//! everything into a [`Report`].
//!
//! A failing asset never aborts the run: every pair touching it is recorded
//! with failure status and the error, all other pairs proceed normally. The
//! report renders as a console table and persists as JSON or CSV, with a
//! plain-text fallback when the CSV write fails.

mod bands;
mod engine;
mod identity;
mod report;

pub use bands::Bands;
pub use engine::{Engine, EngineConfig};
pub use identity::{
    analyze_pair, extract_name, TAG_DIFFERENT_PERSON_HIGH, TAG_SAME_PERSON_MISMATCH,
};
pub use report::{
    print_summary, render_csv, render_text, save_json, save_table, summarize, PairRef, PairResult,
    Report, Summary, STATUS_FAILURE, STATUS_SUCCESS,
};
