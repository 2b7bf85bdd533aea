pub mod error;
pub mod image;
pub mod region;
pub mod runtime;

pub use error::*;
pub use crate::image::*;
pub use region::*;
pub use runtime::*;
