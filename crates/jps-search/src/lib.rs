//! Jump point search engine, path reconstruction, and line-of-sight smoothing for `jps-nav`.

mod engine;
mod los;
mod path;
mod pqueue;

pub use self::engine::find_path;
pub use self::los::{segment_is_walkable, smooth_path};
pub use self::path::build_path;
pub use self::pqueue::{Entry, PriorityQueue};
