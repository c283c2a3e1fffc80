//! Depth to color mapping for excavated sand

use serde::{Deserialize, Serialize};

use crate::constants::{DIGGING_MAX_HEIGHT, MIN_HEIGHT, SAND_COLOR};

/// Normalized dig depth: 0 at the digging surface, 1 at the floor
#[inline]
pub fn dig_depth(height: f32) -> f32 {
    ((DIGGING_MAX_HEIGHT - height) / (DIGGING_MAX_HEIGHT - MIN_HEIGHT)).clamp(0.0, 1.0)
}

/// Which keyframe set to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerPalette {
    /// sand, clay, loam, limestone, slate, obsidian
    #[default]
    Detailed,
    /// sand, clay, stone, bedrock
    Simple,
}

const DETAILED: [(f32, [f32; 3]); 6] = [
    (0.0, SAND_COLOR),
    (0.2, [196.0, 130.0, 88.0]),
    (0.4, [120.0, 88.0, 60.0]),
    (0.6, [200.0, 196.0, 178.0]),
    (0.8, [92.0, 100.0, 112.0]),
    (1.0, [28.0, 24.0, 34.0]),
];

const SIMPLE: [(f32, [f32; 3]); 4] = [
    (0.0, SAND_COLOR),
    (0.35, [190.0, 132.0, 92.0]),
    (0.7, [128.0, 124.0, 120.0]),
    (1.0, [48.0, 44.0, 50.0]),
];

impl LayerPalette {
    fn stops(self) -> &'static [(f32, [f32; 3])] {
        match self {
            LayerPalette::Detailed => &DETAILED,
            LayerPalette::Simple => &SIMPLE,
        }
    }

    /// Interpolated color at normalized depth `depth`
    pub fn color_at_depth(self, depth: f32) -> [f32; 3] {
        let stops = self.stops();
        let depth = depth.clamp(0.0, 1.0);

        for pair in stops.windows(2) {
            let (d0, c0) = pair[0];
            let (d1, c1) = pair[1];
            if depth <= d1 {
                let t = if d1 > d0 { (depth - d0) / (d1 - d0) } else { 0.0 };
                return [
                    c0[0] + (c1[0] - c0[0]) * t,
                    c0[1] + (c1[1] - c0[1]) * t,
                    c0[2] + (c1[2] - c0[2]) * t,
                ];
            }
        }
        stops[stops.len() - 1].1
    }

    /// Color for a cell at `height` in digging mode
    #[inline]
    pub fn color_for_height(self, height: f32) -> [f32; 3] {
        self.color_at_depth(dig_depth(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dig_depth_range() {
        assert_eq!(dig_depth(2.0), 0.0);
        assert!((dig_depth(0.1) - 1.0).abs() < 1e-6);
        assert_eq!(dig_depth(2.5), 0.0);
        assert_eq!(dig_depth(0.0), 1.0);
    }

    #[test]
    fn test_surface_is_sand() {
        assert_eq!(LayerPalette::Detailed.color_for_height(2.0), SAND_COLOR);
        assert_eq!(LayerPalette::Simple.color_for_height(2.0), SAND_COLOR);
    }

    #[test]
    fn test_keyframes_hit_exactly() {
        let clay = LayerPalette::Detailed.color_at_depth(0.2);
        assert!((clay[0] - 196.0).abs() < 1e-3);
        assert_eq!(LayerPalette::Detailed.color_at_depth(1.0), [28.0, 24.0, 34.0]);
    }

    #[test]
    fn test_interpolates_between_stops() {
        let mid = LayerPalette::Simple.color_at_depth(0.85);
        // halfway between stone and bedrock
        assert!((mid[0] - 88.0).abs() < 1e-3);
    }
}
