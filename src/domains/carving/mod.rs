pub mod carver;
pub mod clipping;
pub mod cutter;

pub use carver::*;
pub use clipping::{difference, ClipError};
pub use cutter::*;
