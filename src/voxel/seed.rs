//! 世界种子与噪声生成器

use std::sync::Arc;

use crate::voxel::constants::DEFAULT_SEED;
use crate::voxel::perlin::PerlinNoise;

/// 世界种子 - 存储世界生成的随机种子和高度噪声生成器
/// 使用相同的种子可以生成相同的世界
///
/// 噪声生成器在创建世界时构造一次，之后所有区块共享同一个只读实例，
/// 保证跨区块边界的地形无缝衔接
#[derive(Debug, Clone)]
pub struct WorldSeed {
    /// 主种子值
    pub seed: u64,
    /// 地形高度噪声生成器
    pub terrain_noise: Arc<PerlinNoise>,
}

impl WorldSeed {
    /// 从数字种子创建世界种子
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            terrain_noise: Arc::new(PerlinNoise::new(seed)),
        }
    }

    /// 从字符串创建世界种子
    /// 通过简单的哈希算法将字符串转换为数字种子
    pub fn from_string(s: &str) -> Self {
        let seed = s
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        Self::new(seed)
    }

    /// 解析种子：能解析为整数就直接使用，否则按字符串哈希
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u64>() {
            Ok(num) => Self::new(num),
            Err(_) => Self::from_string(s.trim()),
        }
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
