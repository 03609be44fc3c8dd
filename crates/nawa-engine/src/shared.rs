// ─────────────────────────────────────────────────────────────────────
// Nawa — Shared System Handle
// ─────────────────────────────────────────────────────────────────────
//! Thread-safe wrapper for callers that drive one system from several
//! threads. Every operation takes the lock for its full duration, so at
//! most one step, adaptation or persistence call is in flight.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use nawa_types::{LayerState, NawaConfig, NawaResult, RestoreReport, StepReport};

use crate::system::System;

/// Cloneable, mutex-guarded handle to a `System`.
#[derive(Debug, Clone)]
pub struct SharedSystem {
    inner: Arc<Mutex<System>>,
}

impl SharedSystem {
    pub fn new(cfg: NawaConfig) -> NawaResult<Self> {
        Ok(Self::from_system(System::new(cfg)?))
    }

    pub fn from_system(system: System) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    pub fn step(&self, ext_re: &[f64], ext_im: &[f64]) -> StepReport {
        self.inner.lock().step(ext_re, ext_im)
    }

    pub fn adapt_layer(
        &self,
        index: usize,
        input_re: &[f64],
        input_im: &[f64],
        error_re: &[f64],
        error_im: &[f64],
    ) -> bool {
        self.inner
            .lock()
            .adapt_layer(index, input_re, input_im, error_re, error_im)
    }

    pub fn layer_state(&self, index: usize) -> LayerState {
        self.inner.lock().layer_state(index)
    }

    pub fn tick(&self) -> u64 {
        self.inner.lock().tick()
    }

    pub fn persist(&self) -> Vec<u8> {
        self.inner.lock().persist()
    }

    pub fn restore(&self, bytes: &[u8]) -> NawaResult<RestoreReport> {
        self.inner.lock().restore(bytes)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> NawaResult<()> {
        self.inner.lock().save(path)
    }

    pub fn load(&self, path: impl AsRef<Path>) -> NawaResult<RestoreReport> {
        self.inner.lock().load(path)
    }

    /// Run `f` with exclusive access to the system.
    pub fn with<R>(&self, f: impl FnOnce(&mut System) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NawaConfig {
        NawaConfig {
            dim: 4,
            n_layers: 3,
            ..NawaConfig::default()
        }
    }

    #[test]
    fn test_concurrent_steps_all_counted() {
        let shared = SharedSystem::new(cfg()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        s.step(&[0.1; 4], &[0.0; 4]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.tick(), 100);
        assert!(shared.layer_state(2).max_magnitude() < 1.0);
    }

    #[test]
    fn test_matches_plain_system() {
        let shared = SharedSystem::new(cfg()).unwrap();
        let mut plain = System::new(cfg()).unwrap();
        for _ in 0..6 {
            shared.step(&[0.2; 4], &[-0.1; 4]);
            plain.step(&[0.2; 4], &[-0.1; 4]);
        }
        for k in 0..3 {
            assert_eq!(shared.layer_state(k), plain.layer_state(k));
        }
    }

    #[test]
    fn test_persist_restore_through_handle() {
        let a = SharedSystem::new(cfg()).unwrap();
        let b = SharedSystem::new(NawaConfig {
            base_seed: 9,
            ..cfg()
        })
        .unwrap();
        let report = b.restore(&a.persist()).unwrap();
        assert_eq!(report.restored.len(), 3);
        assert_eq!(a.persist(), b.persist());
    }

    #[test]
    fn test_with_exclusive_access() {
        let shared = SharedSystem::new(cfg()).unwrap();
        let n = shared.with(|sys| {
            sys.step(&[0.0; 4], &[0.0; 4]);
            sys.n_layers()
        });
        assert_eq!(n, 3);
        assert_eq!(shared.tick(), 1);
        assert!(!shared.adapt_layer(3, &[0.0; 4], &[0.0; 4], &[0.0; 4], &[0.0; 4]));
    }
}
