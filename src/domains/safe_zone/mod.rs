pub mod region;
pub mod synthesizer;

pub use region::*;
pub use synthesizer::*;
