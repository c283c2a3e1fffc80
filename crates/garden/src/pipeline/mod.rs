//! Complete raking pipeline
//!
//! This module connects:
//! - Input handling (pointer samples via `begin_stroke`/`stroke_to`)
//! - Stroke interpolation and symmetry expansion
//! - Tine carving into the grid
//! - Dirty tracking and incremental rendering
//! - Undo/redo and digging mode
//!
//! The pipeline is single-threaded and frame-driven: carving happens
//! synchronously per input sample, and `render_frame` coalesces all
//! carves since the previous frame into one flush.

mod script;
mod stroke;
mod surface_ops;
mod undo;

use garden_config::GardenSettings;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::carve::{CarveEngine, CarveParams};
use crate::digging::{DiggingController, LayerPalette};
use crate::dirty::DirtyRegionTracker;
use crate::grid::{GridState, Snapshot};
use crate::particles::ParticlePool;
use crate::rake::{AxisLock, StrokeInterpolator};
use crate::render::Renderer;
use crate::symmetry::SymmetryTransform;
use crate::types::CarveMode;

pub use script::ScriptedStroke;
pub use surface_ops::FrameUpdate;
pub use undo::History;

/// Particle pool size
const PARTICLE_CAPACITY: usize = 512;

/// Who currently drives the stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrokeOwner {
    User,
    Script,
}

/// Complete sand garden for one canvas
///
/// 1. Input comes in via `begin_stroke`, `stroke_to`, `end_stroke`
/// 2. The interpolator turns it into evenly spaced samples
/// 3. Each sample is mirrored and expanded into tines
/// 4. Tines are carved into the grid
/// 5. The dirty rectangle is rendered once per frame
pub struct GardenPipeline {
    pub(crate) grid: GridState,
    pub(crate) engine: CarveEngine,
    pub(crate) dirty: DirtyRegionTracker,
    pub(crate) renderer: Renderer,
    pub(crate) digging: DiggingController,
    pub(crate) history: History,
    pub(crate) particles: ParticlePool,
    pub(crate) settings: GardenSettings,
    pub(crate) palette: LayerPalette,
    pub(crate) interpolator: StrokeInterpolator,
    pub(crate) stroke_owner: Option<StrokeOwner>,
    /// Grid as it was when the current stroke began
    pub(crate) stroke_origin: Option<Snapshot>,
    /// Whether the current stroke left an entry in `history`
    pub(crate) stroke_recorded: bool,
    pub(crate) axis_lock: AxisLock,
    pub(crate) script: Option<ScriptedStroke>,
    pub(crate) rng: StdRng,
}

impl GardenPipeline {
    /// Create a flat garden of the given size
    pub fn new(width: u32, height: u32, settings: GardenSettings) -> Self {
        let mut rng = StdRng::seed_from_u64(settings.noise_seed);
        let mut grid = GridState::new(width, height);
        grid.reset_flat(&mut rng);

        let mut dirty = DirtyRegionTracker::new();
        dirty.mark_all(width, height);

        Self {
            grid,
            engine: CarveEngine::new(),
            dirty,
            renderer: Renderer::new(width, height),
            digging: DiggingController::new(),
            history: History::new(settings.history.max_undo),
            particles: ParticlePool::new(PARTICLE_CAPACITY),
            settings,
            palette: LayerPalette::default(),
            interpolator: StrokeInterpolator::new(),
            stroke_owner: None,
            stroke_origin: None,
            stroke_recorded: false,
            axis_lock: AxisLock::None,
            script: None,
            rng,
        }
    }

    /// Create a garden with default settings
    pub fn with_default_settings(width: u32, height: u32) -> Self {
        Self::new(width, height, GardenSettings::default())
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn settings(&self) -> &GardenSettings {
        &self.settings
    }

    /// Replace settings. Takes effect from the next carve.
    pub fn set_settings(&mut self, settings: GardenSettings) {
        self.history.set_max_depth(settings.history.max_undo);
        self.settings = settings;
        // lighting may have changed
        self.dirty.mark_all(self.grid.width, self.grid.height);
    }

    pub fn set_axis_lock(&mut self, lock: AxisLock) {
        self.axis_lock = lock;
    }

    pub fn set_palette(&mut self, palette: LayerPalette) {
        self.palette = palette;
    }

    /// Current carve mode
    pub fn mode(&self) -> CarveMode {
        self.digging.mode()
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    /// Advance the cosmetic particles
    pub fn step_particles(&mut self, dt: f32) {
        self.particles.step(dt);
    }

    pub(crate) fn carve_params(&self) -> CarveParams {
        CarveParams::from_settings(&self.settings.rake, self.palette)
    }

    pub(crate) fn symmetry(&self) -> SymmetryTransform {
        SymmetryTransform::from(&self.settings.symmetry)
    }
}
