//! Analysis windows: generation, millisecond conversion, and the
//! shared read-only cache.
//!
//! All supported families are non-negative with coefficients in
//! `[0, 1]` and symmetric about the window center, which overlap-add
//! normalization relies on.

use std::f32::consts::PI;
use std::sync::Arc;

use hashbrown::HashMap;
use libm::cosf;

use crate::error::ConfigError;

/// Hamming cosine coefficients.
const HAMMING_A0: f32 = 0.54;
const HAMMING_A1: f32 = 0.46;

/// Blackman cosine coefficients. `A0 - A1 + A2` is exactly zero, so the
/// endpoint coefficients round to zero (clamped below against f32
/// rounding the wrong way).
const BLACKMAN_A0: f32 = 0.42;
const BLACKMAN_A1: f32 = 0.5;
const BLACKMAN_A2: f32 = 0.08;

/// Supported window families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    /// All-ones window; no tapering.
    Rectangular,
    /// Raised cosine on a 0.08 pedestal.
    #[default]
    Hamming,
    /// Raised cosine reaching zero at both ends.
    Hanning,
    /// Three-term cosine window with stronger sidelobe rejection.
    Blackman,
}

impl WindowKind {
    /// Parse a window name as it appears in configuration.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "boxcar" => Ok(WindowKind::Rectangular),
            "hamming" => Ok(WindowKind::Hamming),
            "hanning" | "hann" => Ok(WindowKind::Hanning),
            "blackman" => Ok(WindowKind::Blackman),
            _ => Err(ConfigError::UnknownWindow),
        }
    }
}

/// Generate a window of exactly `len` coefficients, symmetric about the
/// center. A single-sample window is `[1.0]` regardless of family.
pub fn generate(kind: WindowKind, len: usize) -> Result<Vec<f32>, ConfigError> {
    if len == 0 {
        return Err(ConfigError::ZeroWindowLength);
    }
    if len == 1 {
        return Ok(vec![1.0]);
    }
    let denom = (len - 1) as f32;
    let w = match kind {
        WindowKind::Rectangular => vec![1.0; len],
        WindowKind::Hamming => (0..len)
            .map(|i| HAMMING_A0 - HAMMING_A1 * cosf(2.0 * PI * i as f32 / denom))
            .collect(),
        WindowKind::Hanning => (0..len)
            .map(|i| 0.5 - 0.5 * cosf(2.0 * PI * i as f32 / denom))
            .collect(),
        WindowKind::Blackman => (0..len)
            .map(|i| {
                let x = i as f32 / denom;
                (BLACKMAN_A0 - BLACKMAN_A1 * cosf(2.0 * PI * x) + BLACKMAN_A2 * cosf(4.0 * PI * x))
                    .max(0.0)
            })
            .collect(),
    };
    Ok(w)
}

/// Convert a duration in milliseconds to a sample count at
/// `sample_rate`, rounded to the nearest sample with a floor of 1.
pub fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    let samples = (ms * sample_rate as f32 / 1000.0).round();
    (samples as usize).max(1)
}

/// Shared, read-only window cache keyed by family and length.
///
/// Entries are immutable `Arc` slices; once inserted they are never
/// replaced, so there is no invalidation rule to get wrong. One cache
/// can back any number of engines and transform calls.
#[derive(Default)]
pub struct WindowCache {
    entries: HashMap<(WindowKind, usize), Arc<[f32]>>,
}

impl WindowCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Fetch the cached window for `(kind, len)`, generating and
    /// inserting it on first use.
    pub fn get(&mut self, kind: WindowKind, len: usize) -> Result<Arc<[f32]>, ConfigError> {
        if let Some(w) = self.entries.get(&(kind, len)) {
            return Ok(Arc::clone(w));
        }
        let w: Arc<[f32]> = generate(kind, len)?.into();
        self.entries.insert((kind, len), Arc::clone(&w));
        Ok(w)
    }

    /// Number of distinct windows generated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
