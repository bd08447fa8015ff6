//! 体素世界模块
//!
//! 这个模块包含了体素世界的核心系统，包括：
//!
//! - **constants**: 常量定义（区块尺寸、默认视距、地形参数）
//! - **block_type**: 方块类型定义（种类、属性、颜色）
//! - **perlin**: 带种子的二维柏林噪声
//! - **seed**: 世界种子
//! - **terrain**: 地形生成器（高度图、分层、湖泊）
//! - **chunk**: 区块数据结构（区块坐标、方块存储、几何生成）
//! - **geometry**: 区块几何数据
//! - **backend**: 渲染/物理适配接口
//! - **change**: 方块变更记录
//! - **world**: 世界管理（流式加载、方块读写、区块重建）
//! - **loading**: ECS 适配层的队列和句柄
//! - **components**: 体素相关组件
//! - **systems**: ECS系统函数（流式加载、方块操作、实体同步）
//! - **plugin**: Bevy插件

pub mod backend;
pub mod block_type;
pub mod change;
pub mod chunk;
pub mod components;
pub mod constants;
pub mod geometry;
pub mod loading;
pub mod perlin;
pub mod plugin;
pub mod seed;
pub mod systems;
pub mod terrain;
pub mod world;

// 重新导出常用类型，方便外部使用
pub use backend::{ChunkBackend, HeadlessBackend};
pub use block_type::{BlockColor, BlockFlags, BlockType};
pub use change::BlockEdit;
pub use chunk::{Chunk, ChunkPos};
pub use components::{ChunkMarker, ChunkVisual, StaticBody, StreamAnchor};
pub use geometry::{BlockInstance, ChunkGeometry};
pub use loading::{BlockAction, BlockActionQueue, EcsBackend, EditLog, SceneOp};
pub use perlin::PerlinNoise;
pub use plugin::{ChunkWorld, VoxelPlugin};
pub use seed::WorldSeed;
pub use terrain::{TerrainGenerator, TerrainSettings};
pub use world::{StreamReport, VoxelWorld};
