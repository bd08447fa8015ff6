//! 区块几何数据 - 交给引擎层构建渲染和碰撞体的纯数据

use bevy::prelude::*;

use crate::voxel::block_type::{BlockColor, BlockType};
use crate::voxel::chunk::ChunkPos;

/// 单个需要渲染的方块
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockInstance {
    /// 方块的世界坐标
    pub position: IVec3,
    pub kind: BlockType,
    pub color: BlockColor,
}

/// 一个区块的全部几何数据，每次重建都整体替换
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkGeometry {
    pub chunk: ChunkPos,
    pub blocks: Vec<BlockInstance>,
}

impl ChunkGeometry {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 可碰撞的方块，用于构建静态碰撞体
    pub fn solid_blocks(&self) -> impl Iterator<Item = &BlockInstance> {
        self.blocks.iter().filter(|b| b.kind.is_solid())
    }
}
