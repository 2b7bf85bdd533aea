//! Fragment sources and sinks
//!
//! This crate provides the capture side of scroll stitching: a session that
//! grabs fragments from a fixed screen region, and image-sequence backends for
//! reading recorded fragments and writing results.

use cv_core::Fragment;
use image::RgbImage;
use std::fmt::Debug;
use std::path::Path;

pub type Result<T> = std::result::Result<T, VideoError>;

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    Core(#[from] cv_core::Error),
}

/// Generic interface for frame sources
pub trait VideoCapture: Debug {
    fn is_opened(&self) -> bool;
    fn grab(&mut self) -> Result<()>;
    fn retrieve(&mut self) -> Result<RgbImage>;
    fn read(&mut self) -> Result<RgbImage> {
        self.grab()?;
        self.retrieve()
    }
}

/// Generic interface for frame sinks
pub trait VideoWriter: Debug {
    fn write(&mut self, frame: &RgbImage) -> Result<()>;
}

pub mod backends;
pub mod session;

pub use backends::{PngSequenceCapture, PngSequenceWriter};
pub use session::{CaptureSession, RegionGrabber};

/// Load a single image file as a fragment.
pub fn read_fragment<P: AsRef<Path>>(path: P) -> Result<Fragment> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| VideoError::Backend(format!("Failed to decode {}: {}", path.display(), e)))?;
    Ok(img.to_rgb8().into())
}

/// Write the final composite. The format follows the file extension.
pub fn write_composite<P: AsRef<Path>>(path: P, image: &RgbImage) -> Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .map_err(|e| VideoError::Backend(format!("Failed to save {}: {}", path.display(), e)))?;
    tracing::info!("Result written to {}", path.display());
    Ok(())
}
