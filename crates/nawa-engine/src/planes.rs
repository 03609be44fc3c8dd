// ─────────────────────────────────────────────────────────────────────
// Nawa — Complex Planes
// ─────────────────────────────────────────────────────────────────────
//! Complex vectors stored as two parallel real arrays.
//!
//! The length is fixed at construction; callers may mutate elements
//! through the slice accessors but never resize.

/// Complex product `(ar + i·ai)(br + i·bi)`.
#[inline]
pub fn cmul(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0 * b.0 - a.1 * b.1, a.0 * b.1 + a.1 * b.0)
}

/// Fixed-length complex vector as separate real and imaginary planes.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPlanes {
    re: Vec<f64>,
    im: Vec<f64>,
}

impl ComplexPlanes {
    pub fn zeros(len: usize) -> Self {
        Self {
            re: vec![0.0; len],
            im: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    pub fn re(&self) -> &[f64] {
        &self.re
    }

    pub fn im(&self) -> &[f64] {
        &self.im
    }

    pub fn re_mut(&mut self) -> &mut [f64] {
        &mut self.re
    }

    pub fn im_mut(&mut self) -> &mut [f64] {
        &mut self.im
    }

    /// Both planes mutably at once.
    pub fn split_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.re, &mut self.im)
    }

    #[inline]
    pub fn get(&self, i: usize) -> (f64, f64) {
        (self.re[i], self.im[i])
    }

    #[inline]
    pub fn set(&mut self, i: usize, value: (f64, f64)) {
        self.re[i] = value.0;
        self.im[i] = value.1;
    }

    /// Replace every element. Returns `false` and leaves `self`
    /// untouched if either plane has a different length.
    pub fn copy_from(&mut self, re: &[f64], im: &[f64]) -> bool {
        if re.len() != self.len() || im.len() != self.len() {
            return false;
        }
        self.re.copy_from_slice(re);
        self.im.copy_from_slice(im);
        true
    }

    pub fn fill_zero(&mut self) {
        self.re.fill(0.0);
        self.im.fill(0.0);
    }

    pub fn to_vecs(&self) -> (Vec<f64>, Vec<f64>) {
        (self.re.clone(), self.im.clone())
    }
}
