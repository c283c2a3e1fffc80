use serde::{Deserialize, Serialize};

use crate::constants::{DIGGING_MAX_HEIGHT, MIN_HEIGHT, NORMAL_MAX_HEIGHT};
use crate::error::GardenError;

/// Which carve behaviour is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum CarveMode {
    /// Sand is pushed aside and redeposited
    #[default]
    Normal = 0,
    /// Sand is excavated and removed
    Digging = 1,
}

impl CarveMode {
    /// Upper height bound for this mode
    #[inline]
    pub fn max_height(self) -> f32 {
        match self {
            CarveMode::Normal => NORMAL_MAX_HEIGHT,
            CarveMode::Digging => DIGGING_MAX_HEIGHT,
        }
    }

    /// Legal height range for this mode
    #[inline]
    pub fn height_range(self) -> (f32, f32) {
        (MIN_HEIGHT, self.max_height())
    }
}

/// Plain save/load record of a garden.
///
/// Arrays are stored exactly as the grid holds them, row-major with
/// `index = y * width + x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenRecord {
    pub width: u32,
    pub height: u32,
    pub height_array: Vec<f32>,
    pub color_r_array: Vec<f32>,
    pub color_g_array: Vec<f32>,
    pub color_b_array: Vec<f32>,
}

impl GardenRecord {
    /// Check that every array covers exactly `width * height` cells
    pub fn validate(&self) -> Result<(), GardenError> {
        let expected = (self.width as usize) * (self.height as usize);
        if expected == 0 {
            return Err(GardenError::EmptyRecord {
                width: self.width,
                height: self.height,
            });
        }
        let arrays = [
            ("height", self.height_array.len()),
            ("colorR", self.color_r_array.len()),
            ("colorG", self.color_g_array.len()),
            ("colorB", self.color_b_array.len()),
        ];
        for (name, len) in arrays {
            if len != expected {
                return Err(GardenError::RecordSize {
                    array: name,
                    expected,
                    actual: len,
                });
            }
        }
        Ok(())
    }

    /// Raw bytes of the height array
    pub fn height_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.height_array)
    }

    /// Raw bytes of one color channel (0 = r, 1 = g, 2 = b)
    pub fn color_bytes(&self, channel: usize) -> &[u8] {
        match channel {
            0 => bytemuck::cast_slice(&self.color_r_array),
            1 => bytemuck::cast_slice(&self.color_g_array),
            _ => bytemuck::cast_slice(&self.color_b_array),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(width: u32, height: u32, len: usize) -> GardenRecord {
        GardenRecord {
            width,
            height,
            height_array: vec![1.0; len],
            color_r_array: vec![0.0; len],
            color_g_array: vec![0.0; len],
            color_b_array: vec![0.0; len],
        }
    }

    #[test]
    fn test_mode_bounds() {
        assert_eq!(CarveMode::Normal.max_height(), 1.5);
        assert_eq!(CarveMode::Digging.max_height(), 2.0);
        assert_eq!(CarveMode::Digging.height_range().0, MIN_HEIGHT);
    }

    #[test]
    fn test_record_validation() {
        assert!(record(4, 3, 12).validate().is_ok());
        assert!(matches!(
            record(4, 3, 11).validate(),
            Err(GardenError::RecordSize { array: "height", expected: 12, actual: 11 })
        ));
        assert!(matches!(record(0, 3, 0).validate(), Err(GardenError::EmptyRecord { .. })));

        let mut bad = record(2, 2, 4);
        bad.color_b_array.pop();
        assert!(matches!(bad.validate(), Err(GardenError::RecordSize { array: "colorB", .. })));
    }

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_value(record(1, 1, 1)).unwrap();
        assert!(json.get("heightArray").is_some());
        assert!(json.get("colorRArray").is_some());
        assert!(json.get("colorBArray").is_some());
    }

    #[test]
    fn test_record_bytes() {
        let rec = record(2, 2, 4);
        assert_eq!(rec.height_bytes().len(), 16);
        assert_eq!(&rec.height_bytes()[..4], &1.0f32.to_ne_bytes());
        assert_eq!(rec.color_bytes(2).len(), 16);
    }
}
