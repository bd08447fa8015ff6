use bevy::prelude::*;
use thiserror::Error;

use crate::raycast::{raycast_block, BlockHit, BlockRay, RaycastSettings};
use crate::voxel::{BlockEdit, BlockType, ChunkBackend, VoxelWorld};

/// Why a break or place request was rejected. The world is unchanged in every case.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InteractError {
    #[error("no block within reach")]
    NoTarget,
    #[error("cell {0} is already occupied by {1:?}")]
    Occupied(IVec3, BlockType),
    #[error("cell {0} overlaps the player")]
    OverlapsPlayer(IVec3),
    #[error("{0:?} cannot be placed")]
    NotPlaceable(BlockType),
    #[error("cell {0} is outside the loaded world")]
    Unloaded(IVec3),
}

/// Player collision box dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSize {
    pub half_width: f32,
    pub height: f32,
}

impl Default for PlayerSize {
    fn default() -> Self {
        Self {
            half_width: 0.5,
            height: 1.8,
        }
    }
}

/// Axis-aligned player box standing on `feet`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBounds {
    pub feet: Vec3,
    pub size: PlayerSize,
}

impl PlayerBounds {
    pub fn new(feet: Vec3, size: PlayerSize) -> Self {
        Self { feet, size }
    }

    pub fn min(&self) -> Vec3 {
        self.feet - Vec3::new(self.size.half_width, 0.0, self.size.half_width)
    }

    pub fn max(&self) -> Vec3 {
        self.feet + Vec3::new(self.size.half_width, self.size.height, self.size.half_width)
    }

    /// True when the unit cube at `cell` intersects the box. Touching faces don't count.
    pub fn overlaps_cell(&self, cell: IVec3) -> bool {
        let lo = cell.as_vec3();
        let hi = lo + Vec3::ONE;
        let (min, max) = (self.min(), self.max());
        lo.x < max.x && hi.x > min.x && lo.y < max.y && hi.y > min.y && lo.z < max.z && hi.z > min.z
    }
}

/// Block type the player currently places.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSelection {
    current: BlockType,
}

impl Default for BlockSelection {
    fn default() -> Self {
        Self {
            current: BlockType::Dirt,
        }
    }
}

impl BlockSelection {
    pub fn current(&self) -> BlockType {
        self.current
    }

    pub fn select(&mut self, kind: BlockType) -> Result<(), InteractError> {
        if !kind.is_placeable() {
            return Err(InteractError::NotPlaceable(kind));
        }
        self.current = kind;
        Ok(())
    }

    fn placeable() -> impl Iterator<Item = BlockType> {
        BlockType::ALL.into_iter().filter(|k| k.is_placeable())
    }

    /// Cycle forward through placeable types, wrapping around.
    pub fn next(&mut self) -> BlockType {
        let current = self.current;
        let mut it = Self::placeable().skip_while(|k| *k != current).skip(1);
        self.current = it
            .next()
            .or_else(|| Self::placeable().next())
            .unwrap_or(current);
        self.current
    }
}

fn target<B: ChunkBackend>(
    world: &VoxelWorld<B>,
    ray: BlockRay,
    settings: RaycastSettings,
) -> Result<BlockHit, InteractError> {
    raycast_block(
        |p| world.get_block_type(p.x, p.y, p.z),
        ray,
        settings.reach,
        settings.mode,
    )
    .ok_or(InteractError::NoTarget)
}

/// Turn the first block along the ray into air.
pub fn break_block<B: ChunkBackend>(
    world: &mut VoxelWorld<B>,
    ray: BlockRay,
    settings: RaycastSettings,
) -> Result<BlockEdit, InteractError> {
    let hit = target(world, ray, settings)?;
    let cell = hit.hit_cell;
    world
        .set_block_type(cell.x, cell.y, cell.z, BlockType::Air)
        .ok_or(InteractError::Unloaded(cell))
}

/// Put `kind` into the empty cell in front of the first block along the ray.
/// With no `player` the overlap check is skipped.
pub fn place_block<B: ChunkBackend>(
    world: &mut VoxelWorld<B>,
    ray: BlockRay,
    settings: RaycastSettings,
    kind: BlockType,
    player: Option<&PlayerBounds>,
) -> Result<BlockEdit, InteractError> {
    if !kind.is_placeable() {
        return Err(InteractError::NotPlaceable(kind));
    }

    let hit = target(world, ray, settings)?;
    let cell = hit.place_cell;

    let existing = world.get_block_type(cell.x, cell.y, cell.z);
    if !existing.is_air() {
        return Err(InteractError::Occupied(cell, existing));
    }
    if player.is_some_and(|p| p.overlaps_cell(cell)) {
        return Err(InteractError::OverlapsPlayer(cell));
    }

    world
        .set_block_type(cell.x, cell.y, cell.z, kind)
        .ok_or(InteractError::Unloaded(cell))
}
