#![deny(unsafe_op_in_unsafe_fn)]
//! Bit-packed grid storage, compass directions, and connectivity labelling for `jps-nav`.

mod bitgrid;
mod connectivity;
mod direction;

pub use self::bitgrid::*;
pub use self::connectivity::*;
pub use self::direction::*;
