// ─────────────────────────────────────────────────────────────────────
// Nawa — Layered System (tick scheduler)
// ─────────────────────────────────────────────────────────────────────
//! Stack of spheres advanced on a shared tick counter.
//!
//! Per `step`:
//!   1. tick += 1
//!   2. external input → layer 0 input buffer
//!   3. for k = 0..L, if tick % 2^k == 0:
//!        input_k    ← state_{k-1}   (already updated this tick)
//!        feedback_k ← state_{k+1}   (from its last firing)
//!        integrate layer k

use std::path::Path;

use nawa_types::{LayerState, NawaConfig, NawaError, NawaResult, RestoreReport, StepReport};

use crate::memory::Memory;
use crate::params::DEFAULT_LAYERS;
use crate::sphere::Sphere;

/// Hierarchical multi-rate recurrent system.
#[derive(Debug, Clone)]
pub struct System {
    cfg: NawaConfig,
    tick: u64,
    spheres: Vec<Sphere>,
}

impl System {
    /// Build `cfg.n_layers` spheres of width `cfg.dim`; layer k is
    /// seeded with `cfg.base_seed + k`.
    pub fn new(cfg: NawaConfig) -> NawaResult<Self> {
        cfg.validate()?;
        let spheres = (0..cfg.n_layers)
            .map(|k| {
                let seed = cfg.base_seed.wrapping_add(k as u64);
                Sphere::with_memory(
                    k,
                    Memory::seeded(cfg.dim, seed),
                    cfg.epsilon,
                    cfg.finite_guard,
                )
            })
            .collect();
        log::info!(
            "nawa system: {} layers × dim {} (base seed {})",
            cfg.n_layers,
            cfg.dim,
            cfg.base_seed
        );
        Ok(Self {
            cfg,
            tick: 0,
            spheres,
        })
    }

    /// Default stack (9 layers) at width `dim`.
    pub fn with_defaults(dim: usize) -> NawaResult<Self> {
        Self::new(NawaConfig {
            dim,
            n_layers: DEFAULT_LAYERS,
            ..NawaConfig::default()
        })
    }

    pub fn config(&self) -> &NawaConfig {
        &self.cfg
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn dim(&self) -> usize {
        self.cfg.dim
    }

    pub fn n_layers(&self) -> usize {
        self.spheres.len()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn sphere(&self, index: usize) -> Option<&Sphere> {
        self.spheres.get(index)
    }

    pub fn sphere_mut(&mut self, index: usize) -> Option<&mut Sphere> {
        self.spheres.get_mut(index)
    }

    /// Advance one global tick.
    ///
    /// An external input of the wrong width is ignored; layer 0 then
    /// integrates with its previous input buffer.
    pub fn step(&mut self, ext_re: &[f64], ext_im: &[f64]) -> StepReport {
        self.tick += 1;
        let tick = self.tick;

        if !self.spheres[0].set_input(ext_re, ext_im) {
            log::debug!(
                "tick {tick}: external input ignored (len {}/{}, dim {})",
                ext_re.len(),
                ext_im.len(),
                self.cfg.dim
            );
        }

        let n_layers = self.spheres.len();
        let mut fired = Vec::new();
        for k in 0..n_layers {
            if !self.spheres[k].is_active(tick) {
                continue;
            }
            if k > 0 {
                let (lower, upper) = self.spheres.split_at_mut(k);
                let below = lower[k - 1].state_planes();
                upper[0].set_input(below.re(), below.im());
            }
            if k + 1 < n_layers {
                let (lower, upper) = self.spheres.split_at_mut(k + 1);
                let above = upper[0].state_planes();
                lower[k].set_feedback(above.re(), above.im());
            }
            self.spheres[k].integrate();
            fired.push(k);
        }

        StepReport { tick, fired }
    }

    /// Run `n` steps with the same external input.
    pub fn run(&mut self, ext_re: &[f64], ext_im: &[f64], n: u64) -> StepReport {
        let mut last = StepReport {
            tick: self.tick,
            fired: Vec::new(),
        };
        for _ in 0..n {
            last = self.step(ext_re, ext_im);
        }
        last
    }

    /// Adapt one layer's weights with the configured learning rate.
    ///
    /// Out-of-range `index` or mismatched lengths are a no-op (`false`).
    pub fn adapt_layer(
        &mut self,
        index: usize,
        input_re: &[f64],
        input_im: &[f64],
        error_re: &[f64],
        error_im: &[f64],
    ) -> bool {
        let (lr, decay) = (self.cfg.learning_rate, self.cfg.weight_decay);
        match self.spheres.get_mut(index) {
            Some(sphere) => sphere.adapt(input_re, input_im, error_re, error_im, lr, decay),
            None => {
                log::debug!("adapt_layer: index {index} out of range");
                false
            }
        }
    }

    /// Copy of layer `index`'s state; empty when out of range.
    pub fn layer_state(&self, index: usize) -> LayerState {
        self.spheres
            .get(index)
            .map(Sphere::state)
            .unwrap_or_default()
    }

    /// Zero every layer's state and buffers and rewind the tick counter.
    /// Weights are kept.
    pub fn reset(&mut self) {
        for sphere in &mut self.spheres {
            sphere.reset_state();
        }
        self.tick = 0;
    }

    /// Every layer's memory, layer 0 first, as one contiguous stream.
    pub fn persist(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for sphere in &self.spheres {
            out.extend_from_slice(&sphere.memory().serialize());
        }
        out
    }

    /// Load a stream produced by `persist`.
    ///
    /// A block whose declared width differs from its layer is skipped
    /// (its full declared length is consumed) and the next layer is
    /// still attempted. A truncated stream stops with an error; layers
    /// before the truncation keep their new weights.
    pub fn restore(&mut self, bytes: &[u8]) -> NawaResult<RestoreReport> {
        let mut report = RestoreReport::default();
        let mut offset = 0usize;

        for (k, sphere) in self.spheres.iter_mut().enumerate() {
            let rest = &bytes[offset..];
            let declared = Memory::peek_dim(rest)
                .map_err(|e| NawaError::Persistence(format!("layer {k}: {e}")))?;
            let block = Memory::encoded_len(declared).ok_or_else(|| {
                NawaError::Persistence(format!("layer {k}: declared dim {declared} overflows"))
            })?;
            if rest.len() < block {
                return Err(NawaError::Persistence(format!(
                    "layer {k}: truncated block, need {block} bytes, have {}",
                    rest.len()
                )));
            }

            if declared == sphere.dim() {
                sphere.memory_mut().deserialize(&rest[..block])?;
                report.restored.push(k);
            } else {
                log::debug!(
                    "layer {k}: skipping block of dim {declared} (layer dim {})",
                    sphere.dim()
                );
                report.skipped.push(k);
            }
            offset += block;
        }

        if offset < bytes.len() {
            log::debug!("restore: {} trailing bytes ignored", bytes.len() - offset);
        }
        log::info!(
            "restore: {} layers loaded, {} skipped",
            report.restored.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Write `persist()` to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> NawaResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.persist())?;
        log::info!("saved {} layers to {}", self.spheres.len(), path.display());
        Ok(())
    }

    /// Read `path` and `restore` from it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> NawaResult<RestoreReport> {
        let bytes = std::fs::read(path.as_ref())?;
        self.restore(&bytes)
    }
}
