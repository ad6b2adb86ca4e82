//! Global configuration and the setup logger.

mod base;
mod logger;

pub use base::*;
pub use logger::*;
