pub mod thread;
pub mod warp;

mod element;
mod error;
mod fragment;
mod ident;
mod layout;
mod size;

pub use element::*;
pub use error::*;
pub use fragment::*;
pub use ident::*;
pub use layout::*;
pub use size::*;
