use bevy::prelude::*;

use crate::voxel::constants::{DEFAULT_RAYCAST_STEP, DEFAULT_REACH};
use crate::voxel::BlockType;

/// How the ray walks the block grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaycastMode {
    /// Fixed-step marching: sample every `step` units and take the first non-air sample.
    /// Can tunnel through block corners at grazing angles.
    Stepped { step: f32 },
    /// Exact voxel traversal (Amanatides–Woo DDA), visits every cell the ray crosses.
    Grid,
}

impl Default for RaycastMode {
    fn default() -> Self {
        RaycastMode::Grid
    }
}

impl RaycastMode {
    pub fn stepped() -> Self {
        RaycastMode::Stepped {
            step: DEFAULT_RAYCAST_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastSettings {
    pub reach: f32,
    pub mode: RaycastMode,
}

impl Default for RaycastSettings {
    fn default() -> Self {
        Self {
            reach: DEFAULT_REACH,
            mode: RaycastMode::default(),
        }
    }
}

/// A line of sight, usually the camera position and forward vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl BlockRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    /// First non-air cell along the ray.
    pub hit_cell: IVec3,
    /// Last empty cell before the hit, or the hit cell itself if the ray starts inside a block.
    pub place_cell: IVec3,
    pub kind: BlockType,
    pub distance: f32,
}

#[inline]
fn cell_of(p: Vec3) -> IVec3 {
    IVec3::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
}

/// Resolve which block a ray hits first. Returns `None` when nothing but air
/// lies within `max_distance`, or when the direction or distance is unusable.
pub fn raycast_block(
    lookup: impl Fn(IVec3) -> BlockType,
    ray: BlockRay,
    max_distance: f32,
    mode: RaycastMode,
) -> Option<BlockHit> {
    let dir = ray.direction.normalize_or_zero();
    if dir == Vec3::ZERO || !max_distance.is_finite() || max_distance < 0.0 {
        return None;
    }

    match mode {
        RaycastMode::Stepped { step } => {
            let step = if step > 0.0 { step } else { DEFAULT_RAYCAST_STEP };
            stepped_raycast(&lookup, ray.origin, dir, max_distance, step)
        }
        RaycastMode::Grid => grid_raycast(&lookup, ray.origin, dir, max_distance),
    }
}

fn stepped_raycast(
    lookup: &impl Fn(IVec3) -> BlockType,
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
    step: f32,
) -> Option<BlockHit> {
    let mut last_air: Option<IVec3> = None;
    let mut i = 0u32;

    loop {
        // Multiply instead of accumulating so long rays don't drift.
        let distance = i as f32 * step;
        if distance > max_dist {
            return None;
        }

        let cell = cell_of(origin + dir * distance);
        let kind = lookup(cell);
        if !kind.is_air() {
            return Some(BlockHit {
                hit_cell: cell,
                place_cell: last_air.unwrap_or(cell),
                kind,
                distance,
            });
        }

        last_air = Some(cell);
        i += 1;
    }
}

/// Per-axis state of the grid walk: which way the cell index moves, the ray
/// distance at which the next boundary on that axis is crossed, and the
/// distance between consecutive boundaries.
fn axis_walk(origin: f32, cell: i32, dir: f32) -> (i32, f32, f32) {
    if dir > 0.0 {
        (1, (cell as f32 + 1.0 - origin) / dir, 1.0 / dir)
    } else if dir < 0.0 {
        (-1, (origin - cell as f32) / -dir, -1.0 / dir)
    } else {
        // Parallel to this axis: its boundaries are never crossed.
        (0, f32::INFINITY, f32::INFINITY)
    }
}

/// `dir` must be unit length so that ray parameter and distance coincide.
fn grid_raycast(
    lookup: &impl Fn(IVec3) -> BlockType,
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
) -> Option<BlockHit> {
    let mut cell = cell_of(origin);
    let mut step = IVec3::ZERO;
    let mut next_boundary = Vec3::ZERO;
    let mut spacing = Vec3::ZERO;
    for axis in 0..3 {
        let (s, t, d) = axis_walk(origin[axis], cell[axis], dir[axis]);
        step[axis] = s;
        next_boundary[axis] = t;
        spacing[axis] = d;
    }

    let mut distance = 0.0;
    let mut entered_from: Option<IVec3> = None;

    while distance <= max_dist {
        let kind = lookup(cell);
        if !kind.is_air() {
            return Some(BlockHit {
                hit_cell: cell,
                place_cell: entered_from.unwrap_or(cell),
                kind,
                distance,
            });
        }
        entered_from = Some(cell);

        let axis = if next_boundary.x <= next_boundary.y && next_boundary.x <= next_boundary.z {
            0
        } else if next_boundary.y <= next_boundary.z {
            1
        } else {
            2
        };
        distance = next_boundary[axis];
        next_boundary[axis] += spacing[axis];
        cell[axis] += step[axis];
    }

    None
}
