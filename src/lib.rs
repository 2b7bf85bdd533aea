pub use cv_core as core;
pub use cv_imgproc as imgproc;
pub use cv_photo as photo;
pub use cv_videoio as videoio;

pub use cv_core::{Error, Fragment, FragmentBuffer, Result};
pub use cv_photo::{align, stitch, AlignConfig, AlignmentResult, StitchConfig, Stitcher};

/// Initialize a single global Rayon thread pool for template matching.
///
/// Call this once at application startup before stitching.
/// Repeated calls are idempotent and return the first initialization result.
///
/// Priority order:
/// 1. explicit `num_threads`
/// 2. `SCROLLSTITCH_CPU_THREADS` env var
/// 3. Rayon default
pub fn init_thread_pool(num_threads: Option<usize>) -> std::result::Result<(), String> {
    cv_core::init_global_thread_pool(num_threads)
}
