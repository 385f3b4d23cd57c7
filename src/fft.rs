//! Injected FFT kernel seam.
//!
//! The engine never implements a DFT itself: it frames, windows, and
//! stitches around a kernel supplied through [`FftKernel`]. Any correct
//! O(N log N) transform over a complex buffer satisfies the contract.
//! [`RustFftKernel`] is the default implementation, planning both
//! directions once per transform length.
//!
//! Scale convention: the forward pass is unscaled and the inverse pass
//! divides by the transform length, so `inverse(forward(x)) == x` and
//! `Σ|X[k]|² == len · Σ|x[n]|²` (Parseval).

use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// Black-box DFT capability over in-place complex buffers.
///
/// Implementations must be shareable across worker threads; the engine
/// hands each worker its own buffer and scratch space and calls the
/// kernel concurrently. Buffers passed to [`forward`](Self::forward) and
/// [`inverse`](Self::inverse) always have length [`len`](Self::len) and
/// scratch always has length [`scratch_len`](Self::scratch_len) — the
/// engine validates its configuration before any kernel call exists, so
/// the trait itself is infallible.
pub trait FftKernel: Send + Sync {
    /// Transform length the kernel was planned for.
    fn len(&self) -> usize;

    /// Scratch space (in complex elements) the kernel needs per call.
    fn scratch_len(&self) -> usize {
        0
    }

    /// In-place forward DFT, unscaled.
    fn forward(&self, buf: &mut [Complex32], scratch: &mut [Complex32]);

    /// In-place inverse DFT, scaled by `1 / len`.
    fn inverse(&self, buf: &mut [Complex32], scratch: &mut [Complex32]);
}

/// Default kernel backed by `rustfft`.
///
/// Both directions are planned up front for a fixed, non-zero length;
/// planning is the only mutable step, so the kernel itself is `Sync`
/// and shared by reference across parallel workers.
pub struct RustFftKernel {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    len: usize,
    inv_scale: f32,
}

impl RustFftKernel {
    /// Plan a kernel for transforms of `len` complex samples.
    /// `len` must be non-zero; the engine guarantees this by validating
    /// `n_fft` before construction.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        Self {
            forward,
            inverse,
            len,
            inv_scale: 1.0 / len as f32,
        }
    }
}

impl FftKernel for RustFftKernel {
    fn len(&self) -> usize {
        self.len
    }

    fn scratch_len(&self) -> usize {
        self.forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len())
    }

    fn forward(&self, buf: &mut [Complex32], scratch: &mut [Complex32]) {
        debug_assert_eq!(buf.len(), self.len);
        self.forward.process_with_scratch(buf, scratch);
    }

    fn inverse(&self, buf: &mut [Complex32], scratch: &mut [Complex32]) {
        debug_assert_eq!(buf.len(), self.len);
        self.inverse.process_with_scratch(buf, scratch);
        for c in buf.iter_mut() {
            *c *= self.inv_scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel_buffers(kernel: &RustFftKernel) -> (Vec<Complex32>, Vec<Complex32>) {
        (
            vec![Complex32::new(0.0, 0.0); kernel.len()],
            vec![Complex32::new(0.0, 0.0); kernel.scratch_len()],
        )
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let kernel = RustFftKernel::new(8);
        let (mut buf, mut scratch) = kernel_buffers(&kernel);
        buf[0] = Complex32::new(1.0, 0.0);
        kernel.forward(&mut buf, &mut scratch);
        for c in &buf {
            assert!((c.re - 1.0).abs() < 1e-6, "re = {}", c.re);
            assert!(c.im.abs() < 1e-6, "im = {}", c.im);
        }
    }

    #[test]
    fn inverse_applies_one_over_n() {
        // DC-only spectrum of value N must invert to all ones.
        let kernel = RustFftKernel::new(16);
        let (mut buf, mut scratch) = kernel_buffers(&kernel);
        buf[0] = Complex32::new(16.0, 0.0);
        kernel.inverse(&mut buf, &mut scratch);
        for c in &buf {
            assert!((c.re - 1.0).abs() < 1e-6);
            assert!(c.im.abs() < 1e-6);
        }
    }

    #[test]
    fn roundtrip_recovers_input() {
        let kernel = RustFftKernel::new(12);
        let (mut buf, mut scratch) = kernel_buffers(&kernel);
        for (i, c) in buf.iter_mut().enumerate() {
            *c = Complex32::new(i as f32 - 3.5, (i as f32).cos());
        }
        let orig = buf.clone();
        kernel.forward(&mut buf, &mut scratch);
        kernel.inverse(&mut buf, &mut scratch);
        for (a, b) in buf.iter().zip(orig.iter()) {
            assert!((a.re - b.re).abs() < 1e-5, "re: {} vs {}", a.re, b.re);
            assert!((a.im - b.im).abs() < 1e-5, "im: {} vs {}", a.im, b.im);
        }
    }

    #[test]
    fn real_input_spectrum_is_conjugate_symmetric() {
        let n = 16;
        let kernel = RustFftKernel::new(n);
        let (mut buf, mut scratch) = kernel_buffers(&kernel);
        for (i, c) in buf.iter_mut().enumerate() {
            *c = Complex32::new((0.3 * i as f32).sin() + 0.1 * i as f32, 0.0);
        }
        kernel.forward(&mut buf, &mut scratch);
        for k in 1..n / 2 {
            let a = buf[k];
            let b = buf[n - k];
            assert!((a.re - b.re).abs() < 1e-4, "bin {k}: {} vs {}", a.re, b.re);
            assert!((a.im + b.im).abs() < 1e-4, "bin {k}: {} vs {}", a.im, b.im);
        }
    }

    #[test]
    fn parseval_under_inverse_scaling() {
        let n = 32;
        let kernel = RustFftKernel::new(n);
        let (mut buf, mut scratch) = kernel_buffers(&kernel);
        for (i, c) in buf.iter_mut().enumerate() {
            *c = Complex32::new((0.7 * i as f32).sin(), 0.0);
        }
        let time_energy: f32 = buf.iter().map(|c| c.re * c.re + c.im * c.im).sum();
        kernel.forward(&mut buf, &mut scratch);
        let freq_energy: f32 = buf.iter().map(|c| c.re * c.re + c.im * c.im).sum();
        let expected = n as f32 * time_energy;
        assert!(
            (freq_energy - expected).abs() < 1e-3 * expected.max(1.0),
            "{freq_energy} vs {expected}"
        );
    }
}
