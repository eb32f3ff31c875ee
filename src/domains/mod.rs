pub mod carving;
pub mod fleet;
pub mod formation;
pub mod logger;
pub mod path_planning;
pub mod safe_zone;

pub use carving::*;
pub use fleet::*;
pub use formation::*;
pub use logger::*;
pub use path_planning::*;
pub use safe_zone::*;
