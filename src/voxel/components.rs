//! 体素相关组件

use bevy::prelude::*;

use crate::voxel::chunk::ChunkPos;
use crate::voxel::geometry::BlockInstance;

/// 区块标记组件 - 标识实体属于哪个区块
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMarker {
    pub pos: ChunkPos,
}

/// 区块的渲染表示：每个需要渲染的方块一个带颜色的单位立方体
#[derive(Component, Debug, Clone, Default)]
pub struct ChunkVisual {
    pub blocks: Vec<BlockInstance>,
}

/// 静态碰撞体：实心方块所在的单元格
#[derive(Component, Debug, Clone, Default)]
pub struct StaticBody {
    pub cells: Vec<IVec3>,
}

/// 流式加载的中心点，通常挂在玩家身上（脚底位置）
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StreamAnchor {
    pub position: Vec3,
}
