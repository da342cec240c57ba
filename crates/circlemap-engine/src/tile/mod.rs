//! Tile identity and per-tile contributions.
//!
//! Tile loading and tiling math live elsewhere; this module only stores what
//! each tile's bucket produced, keyed by layer + tile address.

mod contribution;
mod key;
mod registry;

pub use contribution::TileContribution;
pub use key::{LayerId, TileAddress, TileKey};
pub use registry::TileRegistry;
