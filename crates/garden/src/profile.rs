//! Radial target-height profile of a single tine
//!
//! The profile is a groove with a raised lip:
//! - `t < 0.6`: channel, falling fastest near the center (cubic ease)
//! - `0.6 <= t < 0.85`: rim rising to `1 + rim`
//! - `0.85 <= t <= 1`: rim falling back to `1`
//! - `t > 1`: outside the tine ([`PROFILE_SENTINEL`])

use tracing::debug;

use crate::constants::{FLAT_HEIGHT, PROFILE_SENTINEL};

/// Target height for a normalized distance `t = dist / radius`.
/// Returns None outside the tine.
pub fn profile_height(t: f32, depth: f32, rim: f32) -> Option<f32> {
    if t < 0.6 {
        let u = t / 0.6;
        Some(FLAT_HEIGHT - depth * (1.0 - u * u * u))
    } else if t < 0.85 {
        let u = (t - 0.6) / 0.25;
        Some(FLAT_HEIGHT + u * rim)
    } else if t <= 1.0 {
        let u = (t - 0.85) / 0.15;
        Some((FLAT_HEIGHT + rim) - u * rim)
    } else {
        None
    }
}

/// A square `(2r+1)^2` lookup of target heights around a tine center
#[derive(Debug, Clone, PartialEq)]
pub struct TineProfile {
    radius: i32,
    side: usize,
    values: Vec<f32>,
}

impl TineProfile {
    /// Build the profile. A radius below one yields an empty profile.
    pub fn build(radius: i32, depth: f32, rim: f32) -> Self {
        if radius < 1 {
            return Self {
                radius: 0,
                side: 0,
                values: Vec::new(),
            };
        }

        let side = (2 * radius + 1) as usize;
        let mut values = vec![PROFILE_SENTINEL; side * side];
        let r = radius as f32;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if let Some(h) = profile_height(dist / r, depth, rim) {
                    let index = ((dy + radius) as usize) * side + (dx + radius) as usize;
                    // Keep real targets non-negative so they never read as sentinel
                    values[index] = h.max(0.0);
                }
            }
        }

        Self { radius, side, values }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Side length of the square buffer (0 for an empty profile)
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw buffer, sentinel included
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Target height at offset `(dx, dy)` from the center, or None
    /// if the offset falls outside the tine
    #[inline]
    pub fn sample(&self, dx: i32, dy: i32) -> Option<f32> {
        if self.is_empty() || dx.abs() > self.radius || dy.abs() > self.radius {
            return None;
        }
        let index = ((dy + self.radius) as usize) * self.side + (dx + self.radius) as usize;
        let value = self.values[index];
        (value >= 0.0).then_some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProfileKey {
    radius: i32,
    depth: u32,
    rim: u32,
}

impl ProfileKey {
    fn new(radius: i32, depth: f32, rim: f32) -> Self {
        Self {
            radius,
            depth: depth.to_bits(),
            rim: rim.to_bits(),
        }
    }
}

/// Holds the profile for the most recent `(radius, depth, rim)` key
#[derive(Debug, Default)]
pub struct ProfileCache {
    key: Option<ProfileKey>,
    profile: Option<TineProfile>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for the given parameters, rebuilt if the key changed.
    /// `radius` is floored before lookup.
    pub fn resolve(&mut self, radius: f32, depth: f32, rim: f32) -> &TineProfile {
        let radius = if radius.is_finite() { radius.floor() as i32 } else { 0 };
        let key = ProfileKey::new(radius, depth, rim);
        if self.key != Some(key) || self.profile.is_none() {
            debug!(
                "ProfileCache: rebuilding profile r={}, depth={:.3}, rim={:.3}",
                radius, depth, rim
            );
            self.profile = Some(TineProfile::build(radius, depth, rim));
            self.key = Some(key);
        }
        self.profile.get_or_insert_with(|| TineProfile::build(radius, depth, rim))
    }

    /// Drop the cached profile so the next resolve rebuilds it
    pub fn invalidate(&mut self) {
        self.key = None;
        self.profile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_zones() {
        let depth = 0.3;
        let rim = 0.1;
        assert!((profile_height(0.0, depth, rim).unwrap() - 0.7).abs() < 1e-6);
        assert!((profile_height(0.6, depth, rim).unwrap() - 1.0).abs() < 1e-6);
        assert!((profile_height(0.85, depth, rim).unwrap() - 1.1).abs() < 1e-6);
        assert!((profile_height(1.0, depth, rim).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(profile_height(1.01, depth, rim), None);
    }

    #[test]
    fn test_channel_falls_fastest_near_center() {
        let near = profile_height(0.1, 0.3, 0.1).unwrap();
        let mid = profile_height(0.3, 0.3, 0.1).unwrap();
        // Cubic ease: the first 0.1 barely rises, later segments rise faster
        assert!(near - 0.7 < mid - near);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = TineProfile::build(10, 0.3, 0.1);
        let b = TineProfile::build(10, 0.3, 0.1);
        let bits_a: Vec<u32> = a.values().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);

        let c = TineProfile::build(7, 0.3, 0.1);
        assert_ne!(a.values().len(), c.values().len());
        assert_eq!(c.side(), 15);
    }

    #[test]
    fn test_corners_are_sentinel() {
        let profile = TineProfile::build(5, 0.3, 0.1);
        assert_eq!(profile.values()[0], PROFILE_SENTINEL);
        assert_eq!(profile.sample(5, 5), None);
        assert_eq!(profile.sample(6, 0), None);
        assert!(profile.sample(5, 0).is_some());
    }

    #[test]
    fn test_degenerate_radius_is_empty() {
        assert!(TineProfile::build(0, 0.3, 0.1).is_empty());
        assert!(TineProfile::build(-3, 0.3, 0.1).is_empty());

        let mut cache = ProfileCache::new();
        assert!(cache.resolve(0.9, 0.3, 0.1).is_empty());
        assert!(cache.resolve(f32::NAN, 0.3, 0.1).is_empty());
    }

    #[test]
    fn test_cache_rebuilds_on_key_change() {
        let mut cache = ProfileCache::new();
        assert_eq!(cache.resolve(6.7, 0.3, 0.1).radius(), 6);
        let center = cache.resolve(6.2, 0.3, 0.1).sample(0, 0).unwrap();
        assert!((center - 0.7).abs() < 1e-6);

        // Depth change must not serve the stale profile
        let center = cache.resolve(6.2, 0.5, 0.1).sample(0, 0).unwrap();
        assert!((center - 0.5).abs() < 1e-6);

        assert_eq!(cache.resolve(9.0, 0.5, 0.1).side(), 19);
    }
}
