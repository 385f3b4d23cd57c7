//! # framespec — batch STFT analysis/synthesis
//!
//! A Short-Time Fourier Transform engine for offline or buffered batch
//! processing: it converts real-valued signals into overlapping,
//! windowed frequency-domain frames, reconstructs signals from such
//! frames by overlap-add synthesis, and derives magnitude/power/phase
//! spectrogram views.
//!
//! The single-sequence DFT kernel is an injected capability behind the
//! [`FftKernel`] trait; the default implementation wraps `rustfft`. The
//! engine owns everything around the kernel: window generation and
//! caching, boundary padding, framing, half-spectrum storage under
//! conjugate symmetry, and window-energy-normalized reconstruction.
//!
//! ## Example
//!
//! ```
//! use framespec::{PadPolicy, StftConfig, StftEngine};
//!
//! // 25 ms windows, 10 ms hop at 16 kHz: 400/160 samples.
//! let config = StftConfig::from_millis(16_000, 25.0, 10.0, 400)
//!     .with_pad_policy(PadPolicy::None);
//! let engine = StftEngine::new(config)?;
//!
//! let signal: Vec<f32> = (0..1600).map(|i| (0.05 * i as f32).sin()).collect();
//! let tensor = engine.stft(&signal)?;
//! assert_eq!((tensor.frames(), tensor.bins()), (8, 201));
//!
//! let rec = engine.istft(&tensor, Some(signal.len()))?;
//! assert_eq!(rec.signal(0).len(), signal.len());
//! # Ok::<(), framespec::StftError>(())
//! ```
//!
//! ## Cargo features
//!
//! - `parallel`: rayon-backed forward/inverse/derivation paths. The
//!   `(batch, frame)` pairs of the forward pass and the bins of a
//!   spectrogram are independent; the inverse pass synthesizes frames
//!   into private buffers and sum-reduces, so overlapping accumulation
//!   never races.

/// Error taxonomy: configuration and shape errors, detected eagerly.
pub mod error;

/// Injected FFT kernel seam and the default `rustfft`-backed kernel.
pub mod fft;

/// Signal framing: boundary padding and frame arithmetic.
pub mod frame;

/// Derived magnitude/power/phase spectrogram views.
pub mod spectrogram;

/// The STFT engine: configuration, forward analysis, and overlap-add
/// synthesis.
pub mod stft;

/// Window generation and the shared read-only window cache.
pub mod window;

pub use error::{ConfigError, ShapeError, StftError};
pub use fft::{FftKernel, RustFftKernel};
pub use frame::PadPolicy;
pub use spectrogram::{derive, Spectrogram, SpectrogramMode, LOG_EPSILON};
#[cfg(feature = "parallel")]
pub use spectrogram::derive_parallel;
pub use stft::{
    NormalizationMode, Reconstruction, StftConfig, StftEngine, StftTensor, NORM_EPSILON,
};
pub use window::{WindowCache, WindowKind};

pub use rustfft::num_complex::{Complex, Complex32};
