//! 地形生成器

use noise::NoiseFn;

use crate::voxel::block_type::BlockType;
use crate::voxel::constants::{
    CHUNK_SIZE_Y, DEFAULT_AMPLITUDE, DEFAULT_BASE_HEIGHT, DEFAULT_NOISE_SCALE,
    DEFAULT_WATER_LEVEL,
};

/// 地形参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSettings {
    /// 基准高度
    pub base_height: i32,
    /// 起伏幅度
    pub amplitude: i32,
    /// 噪声采样缩放
    pub scale: f64,
    /// 水面高度（地表顶层不高于此值时，上方填水直到此高度）
    pub water_level: i32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            base_height: DEFAULT_BASE_HEIGHT,
            amplitude: DEFAULT_AMPLITUDE,
            scale: DEFAULT_NOISE_SCALE,
            water_level: DEFAULT_WATER_LEVEL,
        }
    }
}

/// 地面高度限制在 [1, CHUNK_SIZE_Y]
#[inline]
pub fn clamp_ground_height(height: i32) -> i32 {
    height.clamp(1, CHUNK_SIZE_Y)
}

/// 分层规则：顶层草，下面两层泥土，其余石头
///
/// `y` 必须小于 `height`
#[inline]
pub fn layer_block(y: i32, height: i32) -> BlockType {
    if y == height - 1 {
        BlockType::Grass
    } else if y >= height - 3 {
        BlockType::Dirt
    } else {
        BlockType::Stone
    }
}

/// 地形生成器 - 基于柏林噪声计算每一列的地表高度
///
/// 区块生成和出生点计算都通过这里取高度，保证两者一致
pub struct TerrainGenerator<'a, N> {
    noise: &'a N,
    settings: TerrainSettings,
}

impl<'a, N: NoiseFn<f64, 2>> TerrainGenerator<'a, N> {
    pub fn new(noise: &'a N, settings: TerrainSettings) -> Self {
        Self { noise, settings }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// 计算世界坐标 (x, z) 处的地表高度，结果在 [1, CHUNK_SIZE_Y]
    pub fn height_at(&self, world_x: f64, world_z: f64) -> i32 {
        let scale = self.settings.scale;
        let n = self.noise.get([world_x * scale, world_z * scale]);
        let height = (self.settings.base_height as f64 + n * self.settings.amplitude as f64).round();
        // f64 -> i32 的转换会饱和，超大幅度也不会溢出
        clamp_ground_height(height as i32)
    }

    /// 填充一列：先按分层规则填地面，再把地表之上到水面的空格填成水
    pub fn fill_column(&self, height: i32, mut set: impl FnMut(i32, BlockType)) {
        let height = clamp_ground_height(height);
        for y in 0..height {
            set(y, layer_block(y, height));
        }

        let water_level = self.settings.water_level;
        let top_ground_y = height - 1;
        if top_ground_y <= water_level {
            let max_water_y = water_level.min(CHUNK_SIZE_Y - 1);
            for y in height..=max_water_y {
                set(y, BlockType::Water);
            }
        }
    }
}
