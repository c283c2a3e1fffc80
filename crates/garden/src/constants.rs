/// Lowest height any cell may reach.
pub const MIN_HEIGHT: f32 = 0.1;

/// Height ceiling while raking.
pub const NORMAL_MAX_HEIGHT: f32 = 1.5;

/// Height ceiling while digging. Also the digging surface level.
pub const DIGGING_MAX_HEIGHT: f32 = 2.0;

/// Height of an untouched garden.
pub const FLAT_HEIGHT: f32 = 1.0;

/// Default sand tone (r, g, b in 0..255).
pub const SAND_COLOR: [f32; 3] = [222.0, 205.0, 170.0];

/// Tone the hidden message blends toward once exposed.
pub const REVEAL_ACCENT: [f32; 3] = [196.0, 148.0, 52.0];

/// Normalized dig depth at which the message starts to show.
pub const REVEAL_THRESHOLD: f32 = 0.85;

/// Amplitude of the static per-cell noise, in color units.
pub const NOISE_AMPLITUDE: f32 = 6.0;

/// Profile value for cells outside the tine radius.
pub const PROFILE_SENTINEL: f32 = -1.0;

/// Share of displaced mass sent forward along the stroke.
pub const FORWARD_SHARE: f32 = 0.70;

/// Share of displaced mass sent to each side of the stroke.
pub const SIDE_SHARE: f32 = 0.15;

/// Kernel weight totals below this are treated as fully clipped.
pub const MIN_KERNEL_TOTAL: f32 = 1e-6;

/// Stroke axis used when the direction vector is degenerate.
pub const DEFAULT_AXIS: [f32; 2] = [0.0, 1.0];

/// Extra cells marked dirty around every carve and deposit footprint.
pub const DIRTY_PAD: i32 = 2;

/// Alpha at or above which a rasterized text pixel is part of the mask.
pub const MASK_ALPHA_THRESHOLD: u8 = 128;
