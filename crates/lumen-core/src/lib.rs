// Wire types live in the protocol crate; re-exported so they are reachable as lumen_core::protocol
pub use lumen_protocol as protocol;

pub mod catalog;
pub mod color;
pub mod config;
pub mod consts;
pub mod constraints;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod orchestrator;
pub mod overlay;
pub mod session;
pub mod summary;
pub mod surface;
pub mod util;

pub use error::{LumenError, LumenResult};
pub use session::Session;
