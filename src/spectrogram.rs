//! Derived magnitude, power, and phase views over an STFT tensor.
//!
//! A spectrogram is a read-only projection: it shares no storage with
//! the tensor it was derived from, and the magnitude and power modes
//! discard phase. Reconstructing a signal from a magnitude or power
//! spectrogram alone is unsupported — without the phase half of the
//! tensor the inverse transform has nothing to synthesize from.

use rustfft::num_complex::Complex32;

use crate::error::ConfigError;
use crate::stft::StftTensor;

/// Additive floor used by log compression: `ln(value + LOG_EPSILON)`.
/// One crate-wide constant, so compressed values from different calls
/// are comparable.
pub const LOG_EPSILON: f32 = 1e-14;

/// Projection applied to each complex bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectrogramMode {
    /// `sqrt(re² + im²)`
    #[default]
    Magnitude,
    /// `re² + im²`
    Power,
    /// `atan2(im, re)`, defined as exactly 0 when both parts are
    /// exactly zero.
    Phase,
}

/// Per-bin real view with the same `(batch, frame, bin)` indexing as
/// the tensor it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    batch: usize,
    frames: usize,
    bins: usize,
    mode: SpectrogramMode,
    log_compressed: bool,
    data: Vec<f32>,
}

impl Spectrogram {
    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn mode(&self) -> SpectrogramMode {
        self.mode
    }

    pub fn log_compressed(&self) -> bool {
        self.log_compressed
    }

    /// One frame's bin values.
    pub fn frame(&self, batch: usize, frame: usize) -> &[f32] {
        let start = (batch * self.frames + frame) * self.bins;
        &self.data[start..start + self.bins]
    }

    /// Single bin value.
    pub fn value(&self, batch: usize, frame: usize, bin: usize) -> f32 {
        self.frame(batch, frame)[bin]
    }

    /// The flat `(batch, frame, bin)`-major storage.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[inline]
fn project(c: Complex32, mode: SpectrogramMode, log_compress: bool) -> f32 {
    let v = match mode {
        SpectrogramMode::Power => c.re * c.re + c.im * c.im,
        SpectrogramMode::Magnitude => (c.re * c.re + c.im * c.im).sqrt(),
        SpectrogramMode::Phase => {
            if c.re == 0.0 && c.im == 0.0 {
                0.0
            } else {
                c.im.atan2(c.re)
            }
        }
    };
    if log_compress {
        (v + LOG_EPSILON).ln()
    } else {
        v
    }
}

/// Derive a spectrogram from `tensor`. Log compression of phase has no
/// meaning and fails eagerly.
pub fn derive(
    tensor: &StftTensor,
    mode: SpectrogramMode,
    log_compress: bool,
) -> Result<Spectrogram, ConfigError> {
    if log_compress && mode == SpectrogramMode::Phase {
        return Err(ConfigError::LogCompressedPhase);
    }
    let data = tensor
        .as_slice()
        .iter()
        .map(|&c| project(c, mode, log_compress))
        .collect();
    Ok(Spectrogram {
        batch: tensor.batch(),
        frames: tensor.frames(),
        bins: tensor.bins(),
        mode,
        log_compressed: log_compress,
        data,
    })
}

/// Parallel [`derive`]: bins are independent, so the projection maps
/// over the flat storage without coordination.
#[cfg(feature = "parallel")]
pub fn derive_parallel(
    tensor: &StftTensor,
    mode: SpectrogramMode,
    log_compress: bool,
) -> Result<Spectrogram, ConfigError> {
    use rayon::prelude::*;

    if log_compress && mode == SpectrogramMode::Phase {
        return Err(ConfigError::LogCompressedPhase);
    }
    let data = tensor
        .as_slice()
        .par_iter()
        .map(|&c| project(c, mode, log_compress))
        .collect();
    Ok(Spectrogram {
        batch: tensor.batch(),
        frames: tensor.frames(),
        bins: tensor.bins(),
        mode,
        log_compressed: log_compress,
        data,
    })
}
