//! Chunked voxel world: seeded terrain, chunk streaming around a player,
//! block picking, and break/place editing behind an engine adapter.

pub mod config;
pub mod interaction;
pub mod raycast;
pub mod voxel;

pub use config::{ConfigError, LaunchConfig, WorldConfig};
pub use interaction::{
    break_block, place_block, BlockSelection, InteractError, PlayerBounds, PlayerSize,
};
pub use raycast::{raycast_block, BlockHit, BlockRay, RaycastMode, RaycastSettings};
pub use voxel::{VoxelPlugin, VoxelWorld};
