//! Matrix multiply-accumulate over a warp tile, split across lanes by a SIMT policy.
//! Each lane runs one thread-level kernel on its own sub-tile.

mod base;
mod config;
mod policy;
mod select;
mod simt;
mod transform;

pub use base::*;
pub use config::*;
pub use policy::*;
pub use select::*;
pub use simt::*;
pub use transform::*;
