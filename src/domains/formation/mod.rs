pub mod fitter;
pub mod pool;
pub mod template;

pub use fitter::*;
pub use pool::*;
pub use template::*;
