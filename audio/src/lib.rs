//! Audio decoding and normalization.
//!
//! This crate turns an on-disk audio file of any whitelisted format into a
//! [`Waveform`]: mono f32 samples in [-1, 1] at a fixed sample rate.
//!
//! # Pipeline
//!
//! 1. [`Normalizer::normalize`]: path -> decode (backend fallback chain) ->
//!    downmix -> resample -> [`Waveform`]
//! 2. [`write_wav`]: optional on-disk WAV materialization for callers that
//!    need a file path instead of samples
//!
//! Decoding backends are tried in a fixed priority order (symphonia probe
//! first, then a plain WAV reader); the normalizer only fails after every
//! backend has been exhausted.

mod decode;
mod error;
mod normalizer;
mod resample;
mod waveform;

pub use decode::{DecodeBackend, DecodedAudio, HoundBackend, SymphoniaBackend};
pub use error::AudioError;
pub use normalizer::{write_wav, Normalizer, NormalizerConfig, SUPPORTED_EXTENSIONS};
pub use resample::{downmix_mono, resample};
pub use waveform::Waveform;
