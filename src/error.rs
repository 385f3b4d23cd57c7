//! Error taxonomy: configuration errors and shape errors.
//!
//! Every variant here is detected eagerly, at call entry, before any
//! transform work begins. Numerical degeneracies during overlap-add
//! synthesis are deliberately *not* errors; they are recovered locally
//! (zero-fill) and surfaced as a count on
//! [`Reconstruction`](crate::stft::Reconstruction).

use core::fmt;

/// Invalid or mutually inconsistent engine parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Window length of zero samples.
    ZeroWindowLength,
    /// Hop length of zero samples.
    ZeroHopLength,
    /// Transform length of zero samples.
    ZeroFftLength,
    /// Sample rate of zero Hz.
    ZeroSampleRate,
    /// `n_fft` smaller than the window length; the windowed frame would
    /// not fit in the transform buffer.
    FftShorterThanWindow { n_fft: usize, win_length: usize },
    /// Window name not recognized by [`WindowKind::parse`](crate::window::WindowKind::parse).
    UnknownWindow,
    /// Pad policy name not recognized by [`PadPolicy::parse`](crate::frame::PadPolicy::parse).
    UnknownPadPolicy,
    /// An injected kernel planned for a length other than `n_fft`.
    KernelLength { expected: usize, actual: usize },
    /// The window/hop pair leaves steady-state output samples with
    /// accumulated window energy below the normalization floor, so
    /// overlap-add synthesis could not cover them.
    WindowGap { min_energy: f32 },
    /// Log compression requested for a phase spectrogram.
    LogCompressedPhase,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindowLength => write!(f, "window length must be at least 1 sample"),
            ConfigError::ZeroHopLength => write!(f, "hop length must be at least 1 sample"),
            ConfigError::ZeroFftLength => write!(f, "fft length must be at least 1 sample"),
            ConfigError::ZeroSampleRate => write!(f, "sample rate must be positive"),
            ConfigError::FftShorterThanWindow { n_fft, win_length } => {
                write!(f, "n_fft ({n_fft}) is smaller than the window length ({win_length})")
            }
            ConfigError::UnknownWindow => write!(f, "unknown window name"),
            ConfigError::UnknownPadPolicy => write!(f, "unknown pad policy name"),
            ConfigError::KernelLength { expected, actual } => {
                write!(f, "kernel planned for length {actual}, engine requires {expected}")
            }
            ConfigError::WindowGap { min_energy } => {
                write!(
                    f,
                    "window/hop pair leaves output samples uncovered (min accumulated energy {min_energy:e})"
                )
            }
            ConfigError::LogCompressedPhase => {
                write!(f, "log compression is undefined for phase spectrograms")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tensor dimensions that do not match what the configuration expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Frequency-bin count differs from `n_fft / 2 + 1`.
    BinCount { expected: usize, actual: usize },
    /// Frame count cannot have been produced from a signal of the
    /// hinted length under the configured window, hop, and padding.
    FrameCount { expected: usize, actual: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::BinCount { expected, actual } => {
                write!(f, "tensor has {actual} frequency bins, expected {expected}")
            }
            ShapeError::FrameCount { expected, actual } => {
                write!(f, "tensor has {actual} frames, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Union of the failure classes an engine entry point can report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StftError {
    Config(ConfigError),
    Shape(ShapeError),
}

impl fmt::Display for StftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StftError::Config(e) => e.fmt(f),
            StftError::Shape(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for StftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StftError::Config(e) => Some(e),
            StftError::Shape(e) => Some(e),
        }
    }
}

impl From<ConfigError> for StftError {
    fn from(e: ConfigError) -> Self {
        StftError::Config(e)
    }
}

impl From<ShapeError> for StftError {
    fn from(e: ShapeError) -> Self {
        StftError::Shape(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = ConfigError::FftShorterThanWindow {
            n_fft: 256,
            win_length: 400,
        };
        let msg = e.to_string();
        assert!(msg.contains("256"));
        assert!(msg.contains("400"));
    }

    #[test]
    fn shape_error_wraps_into_stft_error() {
        let e = ShapeError::BinCount {
            expected: 201,
            actual: 129,
        };
        let wrapped: StftError = e.into();
        assert_eq!(wrapped, StftError::Shape(e));
    }
}
