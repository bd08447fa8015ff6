//! 方块类型定义

use bitflags::bitflags;

bitflags! {
    /// 方块属性标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        const NONE = 0;
        /// 可碰撞
        const SOLID = 1 << 0;
        /// 需要渲染
        const RENDERED = 1 << 1;
        /// 液体
        const LIQUID = 1 << 2;
    }
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self::NONE
    }
}

/// 方块颜色（线性 RGBA）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl BlockColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 方块种类 - 每个格子恰好存放一种方块，缺省即为空气
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Air,
    Grass,
    Dirt,
    Stone,
    Water,
}

impl BlockType {
    /// 所有方块种类
    pub const ALL: [BlockType; 5] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Water,
    ];

    pub fn flags(self) -> BlockFlags {
        match self {
            BlockType::Air => BlockFlags::NONE,
            BlockType::Grass | BlockType::Dirt | BlockType::Stone => {
                BlockFlags::SOLID | BlockFlags::RENDERED
            }
            BlockType::Water => BlockFlags::RENDERED | BlockFlags::LIQUID,
        }
    }

    /// 方块颜色，空气没有颜色
    pub fn color(self) -> Option<BlockColor> {
        match self {
            BlockType::Air => None,
            BlockType::Grass => Some(BlockColor::rgb(0.3, 0.8, 0.3)),
            BlockType::Dirt => Some(BlockColor::rgb(0.59, 0.29, 0.0)),
            BlockType::Stone => Some(BlockColor::rgb(0.5, 0.5, 0.5)),
            BlockType::Water => Some(BlockColor::rgba(0.2, 0.4, 0.9, 0.6)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::Water => "water",
        }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    /// 是否可碰撞，空气永远不可碰撞
    #[inline]
    pub fn is_solid(self) -> bool {
        self.flags().contains(BlockFlags::SOLID)
    }

    /// 是否需要生成几何体：实心方块，以及不可碰撞但要渲染的水
    #[inline]
    pub fn is_rendered(self) -> bool {
        self.flags().contains(BlockFlags::RENDERED)
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        self.flags().contains(BlockFlags::LIQUID)
    }

    /// 玩家可以放置的方块
    pub fn is_placeable(self) -> bool {
        self.is_solid()
    }
}
