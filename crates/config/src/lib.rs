//! Shared settings for the sand garden
//!
//! This crate is the single source of truth for every tunable the
//! garden engine reads: rake geometry, carve strength, mirror axes,
//! lighting and history depth. Settings are plain serde structs so the
//! host can persist them however it likes; missing fields fall back to
//! the defaults below.

use serde::{Deserialize, Serialize};

/// Default number of tines on the rake
pub const DEFAULT_TINE_COUNT: u32 = 5;

/// Default tine radius in cells
pub const DEFAULT_TINE_RADIUS: f32 = 6.0;

/// Default distance between neighbouring tine centers in cells
pub const DEFAULT_TINE_SPACING: f32 = 14.0;

/// Default channel depth below the flat surface
pub const DEFAULT_DEPTH: f32 = 0.35;

/// Default rim height above the flat surface
pub const DEFAULT_RIM: f32 = 0.12;

/// Default per-step convergence toward the tine profile
pub const DEFAULT_BLEND: f32 = 0.35;

/// Default deposit kernel radius in cells
pub const DEFAULT_SPREAD_RADIUS: u32 = 3;

/// Forward deposit distance as a multiple of tine radius
pub const DEFAULT_FORWARD_DISTANCE: f32 = 1.2;

/// Side deposit distance as a multiple of tine radius
pub const DEFAULT_SIDE_DISTANCE: f32 = 1.0;

/// Stroke interpolation step as a fraction of tine radius
pub const DEFAULT_STEP_FRACTION: f32 = 0.35;

/// Default undo depth
pub const DEFAULT_MAX_UNDO: usize = 10;

/// Default seed for the static noise field
pub const DEFAULT_NOISE_SEED: u64 = 0x5A4E_D6A2_DE11;

/// Rake geometry and carve strength
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RakeSettings {
    /// Number of tines placed along the rake axis
    pub tine_count: u32,
    /// Tine radius in cells (floored before profile lookup)
    pub tine_radius: f32,
    /// Distance between neighbouring tines in cells
    pub tine_spacing: f32,
    /// How far the channel floor sits below 1.0
    pub depth: f32,
    /// How far the lip rises above 1.0
    pub rim: f32,
    /// Fraction of the way toward the profile per carve, in (0, 1]
    pub blend: f32,
    /// Radius of the gaussian deposit kernel in cells
    pub spread_radius: u32,
    /// Forward deposit offset, multiple of tine radius
    pub forward_distance: f32,
    /// Side deposit offset, multiple of tine radius
    pub side_distance: f32,
    /// Interpolation step, fraction of tine radius
    pub step_fraction: f32,
}

impl Default for RakeSettings {
    fn default() -> Self {
        Self {
            tine_count: DEFAULT_TINE_COUNT,
            tine_radius: DEFAULT_TINE_RADIUS,
            tine_spacing: DEFAULT_TINE_SPACING,
            depth: DEFAULT_DEPTH,
            rim: DEFAULT_RIM,
            blend: DEFAULT_BLEND,
            spread_radius: DEFAULT_SPREAD_RADIUS,
            forward_distance: DEFAULT_FORWARD_DISTANCE,
            side_distance: DEFAULT_SIDE_DISTANCE,
            step_fraction: DEFAULT_STEP_FRACTION,
        }
    }
}

impl RakeSettings {
    /// Tine count, never below one
    pub fn effective_tine_count(&self) -> u32 {
        self.tine_count.max(1)
    }

    /// Blend clamped to (0, 1]
    pub fn effective_blend(&self) -> f32 {
        if self.blend.is_nan() {
            return DEFAULT_BLEND;
        }
        self.blend.clamp(0.001, 1.0)
    }

    /// Interpolation step in cells
    pub fn step_distance(&self) -> f32 {
        self.tine_radius.max(1.0) * self.step_fraction.max(0.05)
    }
}

/// Mirror axes applied to every carve
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetrySettings {
    /// Reflect left/right
    pub mirror_v: bool,
    /// Reflect top/bottom
    pub mirror_h: bool,
    /// Swap axes in normalized canvas space
    pub mirror_d: bool,
    /// Lay the rake along the radial direction from canvas center
    pub align_center: bool,
}

/// Pseudo-3D shading parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Neighbour distance for the central-difference gradient
    pub normal_sample_distance: u32,
    /// Light direction, x component
    pub light_x: f32,
    /// Light direction, y component
    pub light_y: f32,
    /// Gradient-to-brightness gain
    pub light_mul: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            normal_sample_distance: 2,
            light_x: -0.6,
            light_y: -0.8,
            light_mul: 3.0,
        }
    }
}

/// Undo/redo depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_undo: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
        }
    }
}

/// Everything the garden engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenSettings {
    pub rake: RakeSettings,
    pub symmetry: SymmetrySettings,
    pub lighting: LightingSettings,
    pub history: HistorySettings,
    /// Seed for the static noise field and particle jitter
    pub noise_seed: u64,
    /// Emit cosmetic particles while raking
    pub particles: bool,
}

impl Default for GardenSettings {
    fn default() -> Self {
        Self {
            rake: RakeSettings::default(),
            symmetry: SymmetrySettings::default(),
            lighting: LightingSettings::default(),
            history: HistorySettings::default(),
            noise_seed: DEFAULT_NOISE_SEED,
            particles: false,
        }
    }
}
