pub mod geometry;
pub mod protocol;

pub use geometry::{LngLat, Polygon};
pub use protocol::*;
