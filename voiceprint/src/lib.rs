//! Voiceprint feature extraction and similarity scoring.
//!
//! # Architecture
//!
//! The pipeline maps a normalized waveform to a bounded similarity score in
//! two stages:
//!
//! 1. [`FeatureExtractor::extract`]: mono 16kHz waveform -> fixed-length f32
//!    feature vector ("voiceprint")
//! 2. [`score`]: two feature vectors + [`Metric`] -> similarity score
//!
//! # Extraction Strategies
//!
//! Two interchangeable strategies implement [`FeatureExtractor`]:
//!
//! - [`EmbeddingExtractor`]: delegates to a [`SpeakerModel`] backend. The
//!   built-in [`SpectralModel`] pools log mel filterbank statistics into a
//!   160-dim L2-normalized vector; external neural backends plug in through
//!   the same trait.
//! - [`MfccStatsExtractor`]: mean/std/max/min of per-frame MFCCs, concatenated
//!   into a `4 x n_mfcc` vector (52 dims by default).
//!
//! # Feature Extraction Internals
//!
//! The [`fbank`] module provides Kaldi-style log mel filterbank extraction:
//! Povey window (hamming^0.85), pre-emphasis 0.97, Cooley-Tukey FFT, mel
//! triangular filterbank. The [`mfcc`] module adds a DCT-II on top of the
//! log-mel energies.

mod error;
mod extractor;
pub mod fbank;
pub mod mfcc;
mod model;
mod score;

pub use error::VoiceprintError;
pub use extractor::{EmbeddingExtractor, FeatureExtractor, MfccStatsExtractor};
pub use fbank::{compute_fbank, l2_normalize, FbankConfig};
pub use mfcc::{compute_mfcc, MfccConfig};
pub use model::{SpeakerModel, SpectralModel};
pub use score::{score, Metric, DEFAULT_EUCLIDEAN_SCALE};
