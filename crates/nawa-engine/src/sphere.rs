// ─────────────────────────────────────────────────────────────────────
// Nawa — Sphere (single recurrent layer)
// ─────────────────────────────────────────────────────────────────────
//! Gated complex recurrent update for one layer:
//!
//!   total_i = Σ_j R_ij s_j + u_i w^in_i + f_i w^fb_i
//!   g_i     = σ(Re(w^gate_i · total_i))
//!   s_i    ← (1 - g_i) s_i + g_i total_i
//!   s_i    ← tanh(|s_i|) · s_i / |s_i|
//!
//! The scratch vector is pre-allocated, so integration never allocates.

use nawa_types::LayerState;

use crate::memory::Memory;
use crate::params::{time_ratio, NORM_EPSILON};
use crate::planes::{cmul, ComplexPlanes};

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// One layer of the stack: state, staging buffers and weights.
#[derive(Debug, Clone)]
pub struct Sphere {
    layer_id: usize,
    time_ratio: u64,
    state: ComplexPlanes,
    input: ComplexPlanes,
    feedback: ComplexPlanes,
    memory: Memory,
    epsilon: f64,
    finite_guard: bool,
    // Scratch
    next: ComplexPlanes,
}

impl Sphere {
    /// Sphere with zeroed weights.
    pub fn new(layer_id: usize, dim: usize) -> Self {
        Self::with_memory(layer_id, Memory::new(dim), NORM_EPSILON, true)
    }

    /// Sphere whose weights are initialised from `seed`.
    pub fn seeded(layer_id: usize, dim: usize, seed: u64) -> Self {
        Self::with_memory(layer_id, Memory::seeded(dim, seed), NORM_EPSILON, true)
    }

    /// Sphere around an existing memory. State and buffers start at zero.
    pub fn with_memory(
        layer_id: usize,
        memory: Memory,
        epsilon: f64,
        finite_guard: bool,
    ) -> Self {
        let dim = memory.dim();
        Self {
            layer_id,
            time_ratio: time_ratio(layer_id),
            state: ComplexPlanes::zeros(dim),
            input: ComplexPlanes::zeros(dim),
            feedback: ComplexPlanes::zeros(dim),
            memory,
            epsilon,
            finite_guard,
            next: ComplexPlanes::zeros(dim),
        }
    }

    pub fn layer_id(&self) -> usize {
        self.layer_id
    }

    pub fn time_ratio(&self) -> u64 {
        self.time_ratio
    }

    pub fn dim(&self) -> usize {
        self.memory.dim()
    }

    /// Whether this layer integrates on global tick `tick`.
    #[inline]
    pub fn is_active(&self, tick: u64) -> bool {
        tick % self.time_ratio == 0
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn state_planes(&self) -> &ComplexPlanes {
        &self.state
    }

    pub fn input_buffer(&self) -> &ComplexPlanes {
        &self.input
    }

    pub fn feedback_buffer(&self) -> &ComplexPlanes {
        &self.feedback
    }

    /// Copy of the current state.
    pub fn state(&self) -> LayerState {
        let (re, im) = self.state.to_vecs();
        LayerState::new(re, im)
    }

    /// Replace the input buffer. Returns `false` (buffer kept) on a
    /// length mismatch.
    pub fn set_input(&mut self, re: &[f64], im: &[f64]) -> bool {
        self.input.copy_from(re, im)
    }

    /// Replace the feedback buffer. Returns `false` (buffer kept) on a
    /// length mismatch.
    pub fn set_feedback(&mut self, re: &[f64], im: &[f64]) -> bool {
        self.feedback.copy_from(re, im)
    }

    /// Advance the state by one micro-tick.
    pub fn integrate(&mut self) {
        let n = self.dim();
        let mem = &self.memory;
        let recurrent = mem.recurrent();
        let mut reset = 0usize;

        for i in 0..n {
            let row = i * n;
            let (mut rec_re, mut rec_im) = (0.0, 0.0);
            for j in 0..n {
                let (wr, wi) = recurrent.get(row + j);
                let (sr, si) = self.state.get(j);
                rec_re += wr * sr - wi * si;
                rec_im += wr * si + wi * sr;
            }

            let (in_re, in_im) = cmul(self.input.get(i), mem.input().get(i));
            let (fb_re, fb_im) = cmul(self.feedback.get(i), mem.feedback().get(i));
            let total_re = rec_re + in_re + fb_re;
            let total_im = rec_im + in_im + fb_im;

            let (gr, gi) = mem.gate().get(i);
            let g = sigmoid(gr * total_re - gi * total_im);

            let (sr, si) = self.state.get(i);
            let mut new_re = (1.0 - g) * sr + g * total_re;
            let mut new_im = (1.0 - g) * si + g * total_im;

            if self.finite_guard && !(new_re.is_finite() && new_im.is_finite()) {
                new_re = 0.0;
                new_im = 0.0;
                reset += 1;
            }
            self.next.set(i, (new_re, new_im));
        }

        std::mem::swap(&mut self.state, &mut self.next);
        self.normalize();

        if reset > 0 {
            log::warn!(
                "layer {}: {reset} non-finite state components reset to zero",
                self.layer_id
            );
        }
    }

    /// Soft-bound every component into the unit disk, keeping phase.
    pub fn normalize(&mut self) {
        let eps = self.epsilon;
        let (re, im) = self.state.split_mut();
        for (r, i) in re.iter_mut().zip(im.iter_mut()) {
            let mag = (*r * *r + *i * *i).sqrt();
            if mag > eps {
                let scale = mag.tanh() / mag;
                *r *= scale;
                *i *= scale;
            } else {
                *r = 0.0;
                *i = 0.0;
            }
        }
    }

    /// Local Hebbian-style weight update driven by an error signal.
    ///
    /// For every (i, j) the recurrent weight moves by
    /// `learning_rate · err_i · conj(in_j)` and is then scaled by
    /// `decay`; the input weight gets the diagonal (`in_i`) update.
    /// Returns `false` and changes nothing if any plane length differs
    /// from the layer width.
    pub fn adapt(
        &mut self,
        input_re: &[f64],
        input_im: &[f64],
        error_re: &[f64],
        error_im: &[f64],
        learning_rate: f64,
        decay: f64,
    ) -> bool {
        let n = self.dim();
        if [input_re, input_im, error_re, error_im]
            .iter()
            .any(|plane| plane.len() != n)
        {
            return false;
        }

        let (rec_re, rec_im) = self.memory.recurrent_mut().split_mut();
        for i in 0..n {
            let (er, ei) = (error_re[i], error_im[i]);
            let row = i * n;
            for j in 0..n {
                let (xr, xi) = (input_re[j], input_im[j]);
                let grad_re = er * xr + ei * xi;
                let grad_im = ei * xr - er * xi;
                rec_re[row + j] = (rec_re[row + j] + learning_rate * grad_re) * decay;
                rec_im[row + j] = (rec_im[row + j] + learning_rate * grad_im) * decay;
            }
        }

        let (w_re, w_im) = self.memory.input_mut().split_mut();
        for i in 0..n {
            let (er, ei) = (error_re[i], error_im[i]);
            let (xr, xi) = (input_re[i], input_im[i]);
            w_re[i] = (w_re[i] + learning_rate * (er * xr + ei * xi)) * decay;
            w_im[i] = (w_im[i] + learning_rate * (ei * xr - er * xi)) * decay;
        }
        true
    }

    /// Zero state and staging buffers, keeping the weights.
    pub fn reset_state(&mut self) {
        self.state.fill_zero();
        self.input.fill_zero();
        self.feedback.fill_zero();
    }

    #[cfg(test)]
    fn force_state(&mut self, re: &[f64], im: &[f64]) {
        assert!(self.state.copy_from(re, im));
    }

    #[cfg(test)]
    fn set_finite_guard(&mut self, on: bool) {
        self.finite_guard = on;
    }
}
