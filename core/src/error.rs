pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("nothing captured: fragment sequence is empty")]
    EmptyInput,

    #[error("alignment failed for fragment #{index}: {reason}")]
    AlignmentFailed { index: usize, reason: String },

    #[error("fragment width {actual} does not match buffer width {expected}")]
    WidthMismatch { expected: u32, actual: u32 },

    #[error("capture region {width}x{height} is too small (minimum {min}x{min})", min = crate::region::MIN_REGION_SIDE)]
    RegionTooSmall { width: u32, height: u32 },

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

