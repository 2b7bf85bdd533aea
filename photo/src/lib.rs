//! Scroll-capture stitching
//!
//! Rebuilds one tall image from screenshots taken while content is scrolled
//! vertically between captures.
//!
//! # Algorithms
//!
//! - **Alignment**: finds where the bottom strip of one fragment reappears in
//!   the next, using zero-mean normalized cross-correlation
//! - **Stitching**: appends only the rows below each matched strip
//!
//! # Example
//!
//! ```no_run
//! # use cv_photo::Stitcher;
//! # use cv_core::Fragment;
//! # use image::RgbImage;
//! let fragments: Vec<Fragment> = vec![RgbImage::new(640, 480).into()];
//! let composite = Stitcher::new().stitch(&fragments).unwrap();
//! assert_eq!(composite.width(), 640);
//! ```

pub use cv_core::{Error, Result};

/// Vertical alignment of consecutive fragments
pub mod alignment;
/// Fragment compositing
pub mod stitcher;

pub use alignment::*;
pub use stitcher::*;
