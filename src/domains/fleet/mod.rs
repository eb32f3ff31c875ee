pub mod context;
pub mod ports;
pub mod snapshot;

pub use context::*;
pub use ports::*;
pub use snapshot::*;
