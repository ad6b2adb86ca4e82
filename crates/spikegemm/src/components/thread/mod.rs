//! Matrix multiply-accumulate within the registers of a single lane.
//! Shapes are fixed at compile time and the whole product runs sequentially.

pub mod instruction;

mod base;
mod config;
mod dp4a;
mod serpentine;
mod spike;

pub use base::*;
pub use config::*;
pub use dp4a::*;
pub use serpentine::*;
pub use spike::*;
