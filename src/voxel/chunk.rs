//! 区块数据结构

use bevy::prelude::*;
use noise::NoiseFn;

use crate::voxel::block_type::BlockType;
use crate::voxel::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};
use crate::voxel::geometry::{BlockInstance, ChunkGeometry};
use crate::voxel::terrain::{clamp_ground_height, layer_block, TerrainGenerator, TerrainSettings};

/// 区块坐标 - 用于标识水平区块网格上的位置
/// 注意：这是区块坐标，不是体素（方块）坐标；Y轴不分块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// 从世界方块坐标转换为区块坐标
    /// 使用欧几里德除法确保负坐标也能正确转换
    pub fn from_world_pos(world_x: i32, world_z: i32) -> Self {
        Self {
            x: world_x.div_euclid(CHUNK_SIZE_X),
            z: world_z.div_euclid(CHUNK_SIZE_Z),
        }
    }

    /// 从玩家的浮点位置计算所在区块（先除再向下取整）
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: (x / CHUNK_SIZE_X as f32).floor() as i32,
            z: (z / CHUNK_SIZE_Z as f32).floor() as i32,
        }
    }

    /// 区块在世界坐标系中的起始位置
    pub fn world_origin(&self) -> IVec3 {
        IVec3::new(self.x * CHUNK_SIZE_X, 0, self.z * CHUNK_SIZE_Z)
    }

    /// 切比雪夫距离（各轴距离的最大值），用于视距判断
    pub fn chebyshev_distance_to(&self, other: &ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// 世界坐标转区块内局部坐标，结果总在 [0, SIZE) 内
#[inline]
pub fn local_coords(world_x: i32, world_z: i32) -> (i32, i32) {
    (world_x.rem_euclid(CHUNK_SIZE_X), world_z.rem_euclid(CHUNK_SIZE_Z))
}

/// 区块 - 16×16×16 的方块网格，初始全部为空气
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    /// 使用一维数组存储三维数据，通过 index() 计算索引
    blocks: Vec<BlockType>,
}

impl Chunk {
    /// 区块方块总数
    pub const VOLUME: usize = (CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z) as usize;

    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            blocks: vec![BlockType::Air; Self::VOLUME],
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Y-Z-X 顺序线性化
    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        debug_assert!((0..CHUNK_SIZE_X).contains(&x), "local x out of range: {x}");
        debug_assert!((0..CHUNK_SIZE_Y).contains(&y), "local y out of range: {y}");
        debug_assert!((0..CHUNK_SIZE_Z).contains(&z), "local z out of range: {z}");
        ((y * CHUNK_SIZE_Z * CHUNK_SIZE_X) + (z * CHUNK_SIZE_X) + x) as usize
    }

    /// 读取局部坐标处的方块，调用方负责保证坐标合法
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks[Self::index(x, y, z)]
    }

    /// 写入局部坐标处的方块，调用方负责保证坐标合法
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, kind: BlockType) {
        self.blocks[Self::index(x, y, z)] = kind;
    }

    /// 平坦地形，地面高度被限制在 [1, CHUNK_SIZE_Y]
    pub fn generate_flat(&mut self, ground_height: i32) {
        let height = clamp_ground_height(ground_height);
        for x in 0..CHUNK_SIZE_X {
            for z in 0..CHUNK_SIZE_Z {
                for y in 0..height {
                    self.set_block(x, y, z, layer_block(y, height));
                }
            }
        }
    }

    /// 基于噪声生成地形，低洼处填水形成湖泊
    pub fn generate_terrain_with_noise<N: NoiseFn<f64, 2>>(
        &mut self,
        noise: &N,
        settings: TerrainSettings,
    ) {
        let generator = TerrainGenerator::new(noise, settings);
        let origin = self.pos.world_origin();

        for x in 0..CHUNK_SIZE_X {
            for z in 0..CHUNK_SIZE_Z {
                let wx = origin.x + x;
                let wz = origin.z + z;
                let height = generator.height_at(wx as f64, wz as f64);
                generator.fill_column(height, |y, kind| self.set_block(x, y, z, kind));
            }
        }
    }

    /// 根据当前方块内容生成几何数据
    /// 只有需要渲染的方块（实心方块和水）会产生条目，位置为世界坐标
    pub fn build_geometry(&self) -> ChunkGeometry {
        let origin = self.pos.world_origin();
        let mut blocks = Vec::new();

        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let kind = self.get_block(x, y, z);
                    if !kind.is_rendered() {
                        continue;
                    }
                    // 没有颜色的方块无法映射材质，跳过
                    let Some(color) = kind.color() else {
                        continue;
                    };
                    blocks.push(BlockInstance {
                        position: origin + IVec3::new(x, y, z),
                        kind,
                        color,
                    });
                }
            }
        }

        ChunkGeometry {
            chunk: self.pos,
            blocks,
        }
    }

    /// 检查区块是否完全为空气
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|kind| kind.is_air())
    }

    /// 统计某种方块的数量
    pub fn count(&self, kind: BlockType) -> usize {
        self.blocks.iter().filter(|&&k| k == kind).count()
    }
}
