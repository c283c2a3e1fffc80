//! Gaussian deposit kernel for displaced sand

use tracing::debug;

/// Normalized gaussian footprint truncated to a disk.
///
/// `sigma = 0.75 * radius`; weights over all included offsets sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositKernel {
    radius: i32,
    offsets: Vec<(i32, i32)>,
    weights: Vec<f32>,
}

impl DepositKernel {
    /// Build the kernel. A radius below one collapses to a single cell.
    pub fn build(radius: i32) -> Self {
        if radius < 1 {
            return Self {
                radius: 0,
                offsets: vec![(0, 0)],
                weights: vec![1.0],
            };
        }

        let sigma = 0.75 * radius as f64;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let r_sq = radius * radius;

        let mut offsets = Vec::new();
        let mut raw = Vec::new();
        for sy in -radius..=radius {
            for sx in -radius..=radius {
                let d_sq = sx * sx + sy * sy;
                if d_sq > r_sq {
                    continue;
                }
                offsets.push((sx, sy));
                raw.push((-(d_sq as f64) / two_sigma_sq).exp());
            }
        }

        let total: f64 = raw.iter().sum();
        let weights = raw.iter().map(|w| (w / total) as f32).collect();

        Self { radius, offsets, weights }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Iterate `(dx, dy, weight)`
    pub fn entries(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        self.offsets
            .iter()
            .zip(&self.weights)
            .map(|(&(dx, dy), &w)| (dx, dy, w))
    }
}

/// Holds the kernel for the most recent spread radius
#[derive(Debug, Default)]
pub struct KernelCache {
    kernel: Option<DepositKernel>,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel for `radius`, rebuilt if the radius changed
    pub fn resolve(&mut self, radius: i32) -> &DepositKernel {
        let radius = radius.max(0);
        let stale = self.kernel.as_ref().is_none_or(|k| k.radius() != radius);
        if stale {
            debug!("KernelCache: rebuilding deposit kernel r={}", radius);
            self.kernel = Some(DepositKernel::build(radius));
        }
        self.kernel.get_or_insert_with(|| DepositKernel::build(radius))
    }

    pub fn invalidate(&mut self) {
        self.kernel = None;
    }
}
