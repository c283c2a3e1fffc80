//! Sand garden engine - raked height field with redistribution
//!
//! This crate provides the core of the raking garden:
//! - [`grid`] - Per-cell height, color and noise arrays
//! - [`profile`] - Cached tine cross-section lookups
//! - [`kernel`] - Cached Gaussian deposit kernels
//! - [`carve`] - Mass-conserving tine carving (normal and digging modes)
//! - [`symmetry`] - Mirrored and center-aligned stroke expansion
//! - [`rake`] - Tine layout and stroke interpolation
//! - [`dirty`] - Dirty rectangle tracking
//! - [`render`] - Shaded RGBA rendering
//! - [`digging`] - Digging mode, geological layers and the hidden message
//! - [`particles`] - Cosmetic sand spray
//! - [`pipeline`] - Complete garden pipeline

pub mod carve;
pub mod constants;
pub mod digging;
pub mod dirty;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod particles;
pub mod pipeline;
pub mod profile;
pub mod rake;
pub mod render;
pub mod symmetry;
pub mod types;

pub use carve::*;
pub use constants::*;
pub use digging::*;
pub use dirty::*;
pub use error::*;
pub use grid::*;
pub use kernel::*;
pub use particles::*;
pub use pipeline::*;
pub use profile::*;
pub use rake::*;
pub use render::*;
pub use symmetry::*;
pub use types::*;

pub use garden_config::{
    GardenSettings, HistorySettings, LightingSettings, RakeSettings, SymmetrySettings,
};
