//! STFT engine: forward analysis, inverse overlap-add synthesis, and
//! the configuration surface shared by both.
//!
//! The forward pass slices a (possibly batched) signal into overlapping
//! windowed frames and stores each frame's non-redundant half spectrum
//! in an [`StftTensor`]. The inverse pass rebuilds full spectra by
//! conjugate symmetry, runs the inverse kernel, and recombines frames by
//! overlap-add with per-sample window-energy normalization.

use std::sync::Arc;

use rustfft::num_complex::Complex32;

use crate::error::{ConfigError, ShapeError, StftError};
use crate::fft::{FftKernel, RustFftKernel};
use crate::frame::{self, PadPolicy};
use crate::window::{self, WindowCache, WindowKind};

/// Normalization floor for overlap-add synthesis. Output samples whose
/// accumulated window energy falls below this are left at zero and
/// counted on [`Reconstruction::degenerate_samples`] instead of being
/// divided.
pub const NORM_EPSILON: f32 = 1e-8;

/// Overlap-add normalization scheme for the inverse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    /// Plain overlap-add: synthesized frames are accumulated as-is and
    /// the normalization buffer accumulates the window itself.
    Window,
    /// Weighted overlap-add: the analysis window is re-applied to each
    /// synthesized frame and the normalization buffer accumulates the
    /// squared window.
    #[default]
    WindowSquared,
}

impl NormalizationMode {
    #[inline]
    fn weight(self, w: f32) -> f32 {
        match self {
            NormalizationMode::Window => w,
            NormalizationMode::WindowSquared => w * w,
        }
    }

    /// Synthesis-side window factor applied to a reconstructed frame.
    #[inline]
    fn synthesis(self, w: f32) -> f32 {
        match self {
            NormalizationMode::Window => 1.0,
            NormalizationMode::WindowSquared => w,
        }
    }
}

/// Engine configuration. Lengths are in samples; use
/// [`from_millis`](StftConfig::from_millis) for the millisecond form.
///
/// The sample rate takes no part in transform math; it drives the
/// millisecond conversion and [`bin_frequency`](StftConfig::bin_frequency)
/// labeling only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StftConfig {
    pub sample_rate: u32,
    pub win_length: usize,
    pub hop_length: usize,
    pub n_fft: usize,
    pub window: WindowKind,
    pub pad_policy: PadPolicy,
    pub normalization: NormalizationMode,
}

impl StftConfig {
    /// Configuration with window and hop lengths in samples.
    pub fn new(sample_rate: u32, win_length: usize, hop_length: usize, n_fft: usize) -> Self {
        Self {
            sample_rate,
            win_length,
            hop_length,
            n_fft,
            window: WindowKind::default(),
            pad_policy: PadPolicy::default(),
            normalization: NormalizationMode::default(),
        }
    }

    /// Configuration with window and hop lengths in milliseconds,
    /// rounded to the nearest sample (minimum 1).
    pub fn from_millis(sample_rate: u32, win_ms: f32, hop_ms: f32, n_fft: usize) -> Self {
        Self::new(
            sample_rate,
            window::ms_to_samples(win_ms, sample_rate),
            window::ms_to_samples(hop_ms, sample_rate),
            n_fft,
        )
    }

    pub fn with_window(mut self, window: WindowKind) -> Self {
        self.window = window;
        self
    }

    pub fn with_pad_policy(mut self, pad_policy: PadPolicy) -> Self {
        self.pad_policy = pad_policy;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationMode) -> Self {
        self.normalization = normalization;
        self
    }

    /// Check the parameters for internal consistency. Runs before any
    /// transform work; a failing configuration fails identically on
    /// every retry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.win_length == 0 {
            return Err(ConfigError::ZeroWindowLength);
        }
        if self.hop_length == 0 {
            return Err(ConfigError::ZeroHopLength);
        }
        if self.n_fft == 0 {
            return Err(ConfigError::ZeroFftLength);
        }
        if self.n_fft < self.win_length {
            return Err(ConfigError::FftShorterThanWindow {
                n_fft: self.n_fft,
                win_length: self.win_length,
            });
        }
        Ok(())
    }

    /// Non-redundant frequency bins per frame: `n_fft / 2 + 1`.
    pub fn bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Length of a signal of `signal_len` samples after boundary padding.
    pub fn padded_len(&self, signal_len: usize) -> usize {
        signal_len + 2 * frame::pad_amount(self.pad_policy, self.win_length)
    }

    /// Frames produced for a signal of `signal_len` raw samples.
    pub fn frame_count(&self, signal_len: usize) -> usize {
        frame::frame_count(
            self.padded_len(signal_len),
            self.win_length,
            self.hop_length,
        )
    }

    /// Center frequency of bin `k` in Hz. Labeling only.
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.n_fft as f32
    }
}

/// Half-spectrum arena indexed by `(batch, frame, bin)`.
///
/// Storage is one flat buffer of `batch * frames * bins` complex values,
/// produced once by the forward pass and treated as read-only afterward.
/// Bins run `0 ..= n_fft / 2`; the redundant conjugate half is rebuilt
/// on demand by the inverse pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StftTensor {
    batch: usize,
    frames: usize,
    bins: usize,
    data: Vec<Complex32>,
}

impl StftTensor {
    /// All-zero tensor of the given shape.
    pub fn zeroed(batch: usize, frames: usize, bins: usize) -> Self {
        Self {
            batch,
            frames,
            bins,
            data: vec![Complex32::new(0.0, 0.0); batch * frames * bins],
        }
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Half spectrum of one frame.
    pub fn frame(&self, batch: usize, frame: usize) -> &[Complex32] {
        let start = (batch * self.frames + frame) * self.bins;
        &self.data[start..start + self.bins]
    }

    pub fn frame_mut(&mut self, batch: usize, frame: usize) -> &mut [Complex32] {
        let start = (batch * self.frames + frame) * self.bins;
        &mut self.data[start..start + self.bins]
    }

    /// Single bin value.
    pub fn bin(&self, batch: usize, frame: usize, bin: usize) -> Complex32 {
        self.frame(batch, frame)[bin]
    }

    /// The flat `(batch, frame, bin)`-major storage.
    pub fn as_slice(&self) -> &[Complex32] {
        &self.data
    }

    #[cfg(feature = "parallel")]
    fn frames_mut(&mut self) -> &mut [Complex32] {
        &mut self.data
    }
}

/// Result of overlap-add synthesis: one reconstructed signal per batch
/// row, plus the count of output samples zero-filled because no frame
/// contributed usable window energy there.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    signals: Vec<Vec<f32>>,
    degenerate_samples: usize,
}

impl Reconstruction {
    pub fn signals(&self) -> &[Vec<f32>] {
        &self.signals
    }

    pub fn signal(&self, batch: usize) -> &[f32] {
        &self.signals[batch]
    }

    pub fn into_signals(self) -> Vec<Vec<f32>> {
        self.signals
    }

    /// Output samples left at zero during normalization. Non-zero counts
    /// are a known edge condition (signal boundaries, sparse overlap),
    /// not a failure.
    pub fn degenerate_samples(&self) -> usize {
        self.degenerate_samples
    }
}

/// Batch STFT analysis/synthesis engine around an injected FFT kernel.
pub struct StftEngine<K: FftKernel = RustFftKernel> {
    config: StftConfig,
    window: Arc<[f32]>,
    kernel: K,
}

impl<K: FftKernel> core::fmt::Debug for StftEngine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StftEngine")
            .field("config", &self.config)
            .field("window_len", &self.window.len())
            .finish_non_exhaustive()
    }
}

impl StftEngine<RustFftKernel> {
    /// Build an engine with the default `rustfft`-backed kernel.
    pub fn new(config: StftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let win: Arc<[f32]> = window::generate(config.window, config.win_length)?.into();
        Self::assemble(config, win, RustFftKernel::new(config.n_fft))
    }

    /// Like [`new`](Self::new), but sharing window coefficients through
    /// `cache` across engines.
    pub fn with_cache(config: StftConfig, cache: &mut WindowCache) -> Result<Self, ConfigError> {
        config.validate()?;
        let win = cache.get(config.window, config.win_length)?;
        Self::assemble(config, win, RustFftKernel::new(config.n_fft))
    }
}

impl<K: FftKernel> StftEngine<K> {
    /// Build an engine around an externally supplied kernel. The kernel
    /// must be planned for exactly `config.n_fft`.
    pub fn with_kernel(config: StftConfig, kernel: K) -> Result<Self, ConfigError> {
        config.validate()?;
        let win: Arc<[f32]> = window::generate(config.window, config.win_length)?.into();
        Self::assemble(config, win, kernel)
    }

    fn assemble(config: StftConfig, window: Arc<[f32]>, kernel: K) -> Result<Self, ConfigError> {
        if kernel.len() != config.n_fft {
            return Err(ConfigError::KernelLength {
                expected: config.n_fft,
                actual: kernel.len(),
            });
        }
        let engine = Self {
            config,
            window,
            kernel,
        };
        engine.check_overlap()?;
        Ok(engine)
    }

    /// Reconstruction feasibility: in an infinite frame train, the
    /// window energy accumulated at hop phase `p` is the sum over all
    /// window indices congruent to `p` modulo the hop. Every phase must
    /// clear the normalization floor, or steady-state output samples
    /// (not just edges) would be zero-filled on synthesis.
    fn check_overlap(&self) -> Result<(), ConfigError> {
        let hop = self.config.hop_length;
        if hop > self.config.win_length {
            // Samples between consecutive windows are never covered.
            return Err(ConfigError::WindowGap { min_energy: 0.0 });
        }
        let mut period = vec![0.0f32; hop];
        for (i, &w) in self.window.iter().enumerate() {
            period[i % hop] += self.config.normalization.weight(w);
        }
        let min_energy = period.iter().copied().fold(f32::INFINITY, f32::min);
        if min_energy < NORM_EPSILON {
            return Err(ConfigError::WindowGap { min_energy });
        }
        Ok(())
    }

    pub fn config(&self) -> &StftConfig {
        &self.config
    }

    /// The analysis window coefficients.
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Forward transform of a single signal; a batch of one.
    pub fn stft(&self, signal: &[f32]) -> Result<StftTensor, StftError> {
        self.stft_batch(&[signal])
    }

    /// Forward transform of a batch of independent signals. Shorter rows
    /// are zero-extended to the longest before boundary padding, so the
    /// tensor is rectangular.
    pub fn stft_batch(&self, signals: &[&[f32]]) -> Result<StftTensor, StftError> {
        let rows = self.padded_rows(signals);
        let frames = rows
            .first()
            .map(|r| frame::frame_count(r.len(), self.config.win_length, self.config.hop_length))
            .unwrap_or(0);
        let bins = self.config.bins();
        let mut tensor = StftTensor::zeroed(signals.len(), frames, bins);
        log::trace!(
            "stft: batch={} frames={} bins={} n_fft={}",
            signals.len(),
            frames,
            bins,
            self.config.n_fft
        );

        let mut buf = vec![Complex32::new(0.0, 0.0); self.config.n_fft];
        let mut scratch = vec![Complex32::new(0.0, 0.0); self.kernel.scratch_len()];
        for (b, row) in rows.iter().enumerate() {
            for (f, samples) in
                frame::frames(row, self.config.win_length, self.config.hop_length).enumerate()
            {
                self.load_frame(samples, &mut buf);
                self.kernel.forward(&mut buf, &mut scratch);
                tensor.frame_mut(b, f).copy_from_slice(&buf[..bins]);
            }
        }
        Ok(tensor)
    }

    /// Parallel forward transform: each `(batch, frame)` pair is an
    /// independent unit of work with its own buffers.
    #[cfg(feature = "parallel")]
    pub fn stft_batch_parallel(&self, signals: &[&[f32]]) -> Result<StftTensor, StftError> {
        use rayon::prelude::*;

        let rows = self.padded_rows(signals);
        let frames = rows
            .first()
            .map(|r| frame::frame_count(r.len(), self.config.win_length, self.config.hop_length))
            .unwrap_or(0);
        let bins = self.config.bins();
        let mut tensor = StftTensor::zeroed(signals.len(), frames, bins);
        if frames == 0 {
            return Ok(tensor);
        }

        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let win_length = self.config.win_length;
        let scratch_len = self.kernel.scratch_len();
        tensor
            .frames_mut()
            .par_chunks_mut(bins)
            .enumerate()
            .for_each_init(
                || {
                    (
                        vec![Complex32::new(0.0, 0.0); n_fft],
                        vec![Complex32::new(0.0, 0.0); scratch_len],
                    )
                },
                |(buf, scratch), (idx, out)| {
                    let b = idx / frames;
                    let f = idx % frames;
                    let start = f * hop;
                    self.load_frame(&rows[b][start..start + win_length], buf);
                    self.kernel.forward(buf, scratch);
                    out.copy_from_slice(&buf[..bins]);
                },
            );
        Ok(tensor)
    }

    /// Inverse transform via overlap-add synthesis.
    ///
    /// `output_length_hint`, when given, is the raw signal length the
    /// caller expects back: the result is trimmed or zero-padded to it
    /// after any boundary padding from the analysis pass has been
    /// stripped, and the tensor's frame count is checked against it.
    /// Without a hint the natural overlap-add length
    /// `(frames - 1) * hop + win_length` (pad-stripped) is returned.
    pub fn istft(
        &self,
        tensor: &StftTensor,
        output_length_hint: Option<usize>,
    ) -> Result<Reconstruction, StftError> {
        self.check_tensor(tensor, output_length_hint)?;
        let win_length = self.config.win_length;
        let hop = self.config.hop_length;
        let natural = natural_len(tensor.frames(), hop, win_length);
        let norm = self.synthesis_norm(tensor.frames(), natural);
        log::trace!(
            "istft: batch={} frames={} natural_len={}",
            tensor.batch(),
            tensor.frames(),
            natural
        );

        let mut full = vec![Complex32::new(0.0, 0.0); self.config.n_fft];
        let mut scratch = vec![Complex32::new(0.0, 0.0); self.kernel.scratch_len()];
        let mut signals = Vec::with_capacity(tensor.batch());
        let mut degenerate = 0usize;
        for b in 0..tensor.batch() {
            let mut out = vec![0.0f32; natural];
            for f in 0..tensor.frames() {
                unfold_spectrum(tensor.frame(b, f), &mut full);
                self.kernel.inverse(&mut full, &mut scratch);
                let start = f * hop;
                for i in 0..win_length {
                    out[start + i] +=
                        full[i].re * self.config.normalization.synthesis(self.window[i]);
                }
            }
            signals.push(self.finalize_row(out, &norm, output_length_hint, &mut degenerate));
        }
        if degenerate > 0 {
            log::debug!(
                "istft: zero-filled {degenerate} samples with accumulated window energy below {NORM_EPSILON:e}"
            );
        }
        Ok(Reconstruction {
            signals,
            degenerate_samples: degenerate,
        })
    }

    /// Parallel inverse transform. Frames are synthesized into private
    /// buffers concurrently and sum-reduced serially, so the overlapping
    /// accumulation never races.
    #[cfg(feature = "parallel")]
    pub fn istft_parallel(
        &self,
        tensor: &StftTensor,
        output_length_hint: Option<usize>,
    ) -> Result<Reconstruction, StftError> {
        use rayon::prelude::*;

        self.check_tensor(tensor, output_length_hint)?;
        let win_length = self.config.win_length;
        let hop = self.config.hop_length;
        let n_fft = self.config.n_fft;
        let scratch_len = self.kernel.scratch_len();
        let natural = natural_len(tensor.frames(), hop, win_length);
        let norm = self.synthesis_norm(tensor.frames(), natural);

        let mut signals = Vec::with_capacity(tensor.batch());
        let mut degenerate = 0usize;
        for b in 0..tensor.batch() {
            let partials: Vec<(usize, Vec<f32>)> = (0..tensor.frames())
                .into_par_iter()
                .map_init(
                    || {
                        (
                            vec![Complex32::new(0.0, 0.0); n_fft],
                            vec![Complex32::new(0.0, 0.0); scratch_len],
                        )
                    },
                    |(full, scratch), f| {
                        unfold_spectrum(tensor.frame(b, f), full);
                        self.kernel.inverse(full, scratch);
                        let mut acc = vec![0.0f32; win_length];
                        for (i, a) in acc.iter_mut().enumerate() {
                            *a = full[i].re * self.config.normalization.synthesis(self.window[i]);
                        }
                        (f * hop, acc)
                    },
                )
                .collect();

            let mut out = vec![0.0f32; natural];
            for (start, acc) in partials {
                for (i, a) in acc.into_iter().enumerate() {
                    out[start + i] += a;
                }
            }
            signals.push(self.finalize_row(out, &norm, output_length_hint, &mut degenerate));
        }
        if degenerate > 0 {
            log::debug!(
                "istft: zero-filled {degenerate} samples with accumulated window energy below {NORM_EPSILON:e}"
            );
        }
        Ok(Reconstruction {
            signals,
            degenerate_samples: degenerate,
        })
    }

    /// Window and zero-extend one frame of samples into the transform
    /// buffer. Samples beyond the window length are the trailing zero
    /// padding that lifts the frame to `n_fft`.
    fn load_frame(&self, samples: &[f32], buf: &mut [Complex32]) {
        for (i, c) in buf.iter_mut().enumerate() {
            *c = if i < samples.len() {
                Complex32::new(samples[i] * self.window[i], 0.0)
            } else {
                Complex32::new(0.0, 0.0)
            };
        }
    }

    /// Zero-extend each batch row to the longest, then apply boundary
    /// padding, so every row frames identically.
    fn padded_rows(&self, signals: &[&[f32]]) -> Vec<Vec<f32>> {
        let max_len = signals.iter().map(|s| s.len()).max().unwrap_or(0);
        signals
            .iter()
            .map(|s| {
                if s.len() == max_len {
                    frame::pad(s, self.config.win_length, self.config.pad_policy)
                } else {
                    let mut row = s.to_vec();
                    row.resize(max_len, 0.0);
                    frame::pad(&row, self.config.win_length, self.config.pad_policy)
                }
            })
            .collect()
    }

    fn check_tensor(
        &self,
        tensor: &StftTensor,
        output_length_hint: Option<usize>,
    ) -> Result<(), ShapeError> {
        let bins = self.config.bins();
        if tensor.bins() != bins {
            return Err(ShapeError::BinCount {
                expected: bins,
                actual: tensor.bins(),
            });
        }
        if let Some(hint) = output_length_hint {
            let expected = self.config.frame_count(hint);
            if tensor.frames() != expected {
                return Err(ShapeError::FrameCount {
                    expected,
                    actual: tensor.frames(),
                });
            }
        }
        Ok(())
    }

    /// Accumulated window energy per output sample. Identical for every
    /// batch row, so it is computed once per call.
    fn synthesis_norm(&self, frames: usize, natural: usize) -> Vec<f32> {
        let mut norm = vec![0.0f32; natural];
        for f in 0..frames {
            let start = f * self.config.hop_length;
            for (i, &w) in self.window.iter().enumerate() {
                norm[start + i] += self.config.normalization.weight(w);
            }
        }
        norm
    }

    /// Normalize, zero-fill degenerate samples, strip the analysis-side
    /// boundary padding, and apply the length hint.
    fn finalize_row(
        &self,
        mut out: Vec<f32>,
        norm: &[f32],
        output_length_hint: Option<usize>,
        degenerate: &mut usize,
    ) -> Vec<f32> {
        for (x, &n) in out.iter_mut().zip(norm.iter()) {
            if n > NORM_EPSILON {
                *x /= n;
            } else {
                *x = 0.0;
                *degenerate += 1;
            }
        }
        let lead = frame::pad_amount(self.config.pad_policy, self.config.win_length);
        if lead > 0 {
            out.drain(..lead.min(out.len()));
        }
        if let Some(hint) = output_length_hint {
            out.resize(hint, 0.0);
        }
        out
    }
}

/// Natural overlap-add output length: the last frame starts at
/// `(frames - 1) * hop` and contributes `win_length` samples.
fn natural_len(frames: usize, hop_length: usize, win_length: usize) -> usize {
    if frames == 0 {
        0
    } else {
        (frames - 1) * hop_length + win_length
    }
}

/// Expand a non-redundant half spectrum into the full transform buffer
/// using conjugate symmetry: `full[n - k] = conj(full[k])`.
fn unfold_spectrum(half: &[Complex32], full: &mut [Complex32]) {
    let n = full.len();
    full[..half.len()].copy_from_slice(half);
    for k in 1..(n - half.len() + 1) {
        full[n - k] = half[k].conj();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(win: usize, hop: usize, n_fft: usize) -> StftEngine {
        let config = StftConfig::new(16_000, win, hop, n_fft)
            .with_window(WindowKind::Rectangular)
            .with_pad_policy(PadPolicy::None);
        StftEngine::new(config).unwrap()
    }

    #[test]
    fn unfold_restores_even_length_spectrum() {
        let n = 8;
        let half: Vec<Complex32> = (0..=n / 2)
            .map(|k| Complex32::new(k as f32, if k == 0 || k == n / 2 { 0.0 } else { -1.0 }))
            .collect();
        let mut full = vec![Complex32::new(0.0, 0.0); n];
        unfold_spectrum(&half, &mut full);
        for k in 1..n / 2 {
            assert_eq!(full[n - k], full[k].conj());
        }
        assert_eq!(full[n / 2], half[n / 2]);
    }

    #[test]
    fn unfold_restores_odd_length_spectrum() {
        let n = 7;
        let half: Vec<Complex32> = (0..=n / 2)
            .map(|k| Complex32::new(1.0 + k as f32, k as f32))
            .collect();
        let mut full = vec![Complex32::new(0.0, 0.0); n];
        unfold_spectrum(&half, &mut full);
        for k in 1..=n / 2 {
            assert_eq!(full[n - k], full[k].conj());
        }
    }

    #[test]
    fn small_roundtrip_rectangular() {
        let eng = engine(4, 2, 4);
        let signal = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let tensor = eng.stft(&signal).unwrap();
        assert_eq!(tensor.frames(), 3);
        assert_eq!(tensor.bins(), 3);
        let rec = eng.istft(&tensor, None).unwrap();
        // Natural length covers samples 0..8; all are overlap-covered.
        for (a, b) in signal.iter().zip(rec.signal(0).iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
        assert_eq!(rec.degenerate_samples(), 0);
    }

    #[test]
    fn hint_checks_frame_count() {
        let eng = engine(4, 2, 4);
        let tensor = StftTensor::zeroed(1, 3, 3);
        // 8 raw samples -> 3 frames: accepted.
        assert!(eng.istft(&tensor, Some(8)).is_ok());
        // 16 raw samples would need 7 frames.
        let err = eng.istft(&tensor, Some(16)).unwrap_err();
        assert_eq!(
            err,
            StftError::Shape(ShapeError::FrameCount {
                expected: 7,
                actual: 3
            })
        );
    }

    #[test]
    fn bin_mismatch_is_rejected() {
        let eng = engine(4, 2, 4);
        let tensor = StftTensor::zeroed(1, 3, 5);
        let err = eng.istft(&tensor, None).unwrap_err();
        assert_eq!(
            err,
            StftError::Shape(ShapeError::BinCount {
                expected: 3,
                actual: 5
            })
        );
    }

    #[test]
    fn window_gap_rejected_at_construction() {
        // Hop beyond the window leaves every (hop - win) phase uncovered.
        let config = StftConfig::new(16_000, 4, 6, 8)
            .with_window(WindowKind::Rectangular)
            .with_pad_policy(PadPolicy::None);
        match StftEngine::new(config) {
            Err(ConfigError::WindowGap { min_energy }) => assert_eq!(min_energy, 0.0),
            other => panic!("expected WindowGap, got {other:?}"),
        }
    }

    #[test]
    fn hanning_at_full_hop_has_gap() {
        // Hanning reaches zero at its ends, so hop == win leaves the
        // frame-boundary phase without energy.
        let config = StftConfig::new(16_000, 8, 8, 8)
            .with_window(WindowKind::Hanning)
            .with_pad_policy(PadPolicy::None);
        assert!(matches!(
            StftEngine::new(config),
            Err(ConfigError::WindowGap { .. })
        ));
    }

    #[test]
    fn eager_validation_covers_all_parameters() {
        assert_eq!(
            StftConfig::new(0, 4, 2, 4).validate(),
            Err(ConfigError::ZeroSampleRate)
        );
        assert_eq!(
            StftConfig::new(16_000, 0, 2, 4).validate(),
            Err(ConfigError::ZeroWindowLength)
        );
        assert_eq!(
            StftConfig::new(16_000, 4, 0, 4).validate(),
            Err(ConfigError::ZeroHopLength)
        );
        assert_eq!(
            StftConfig::new(16_000, 4, 2, 0).validate(),
            Err(ConfigError::ZeroFftLength)
        );
        assert_eq!(
            StftConfig::new(16_000, 8, 2, 4).validate(),
            Err(ConfigError::FftShorterThanWindow {
                n_fft: 4,
                win_length: 8
            })
        );
    }

    #[test]
    fn short_signal_yields_empty_tensor() {
        let eng = engine(8, 4, 8);
        let tensor = eng.stft(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tensor.frames(), 0);
        let rec = eng.istft(&tensor, None).unwrap();
        assert!(rec.signal(0).is_empty());
    }

    #[test]
    fn bin_frequency_spans_to_nyquist() {
        let config = StftConfig::new(16_000, 400, 160, 400);
        assert_eq!(config.bin_frequency(0), 0.0);
        assert_eq!(config.bin_frequency(config.bins() - 1), 8_000.0);
    }

    #[test]
    fn millisecond_constructor_matches_samples() {
        let a = StftConfig::from_millis(16_000, 25.0, 10.0, 400);
        let b = StftConfig::new(16_000, 400, 160, 400);
        assert_eq!(a, b);
    }
}
