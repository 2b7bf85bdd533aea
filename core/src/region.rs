use crate::{Error, Result};

/// Smallest accepted side of a capture region, in pixels.
pub const MIN_REGION_SIDE: u32 = 10;

/// Fixed screen rectangle every fragment is grabbed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Result<Self> {
        if width < MIN_REGION_SIDE || height < MIN_REGION_SIDE {
            return Err(Error::RegionTooSmall { width, height });
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Build a region from the press and release points of a drag, in either order.
    pub fn from_corners(start: (i32, i32), end: (i32, i32)) -> Result<Self> {
        let left = start.0.min(end.0);
        let top = start.1.min(end.1);
        let width = start.0.abs_diff(end.0);
        let height = start.1.abs_diff(end.1);
        Self::new(left, top, width, height)
    }
}
