//! 体素世界常量定义

/// 区块X方向大小（单位：体素）
pub const CHUNK_SIZE_X: i32 = 16;
/// 区块Y方向大小 - 区块纵向覆盖整个世界高度，Y轴不分块
pub const CHUNK_SIZE_Y: i32 = 16;
/// 区块Z方向大小（单位：体素）
pub const CHUNK_SIZE_Z: i32 = 16;

/// 默认视距（单位：区块数，按切比雪夫距离计算）
pub const DEFAULT_VIEW_RADIUS: i32 = 2;

/// 默认世界种子
pub const DEFAULT_SEED: u64 = 12345;

/// 地形基准高度
pub const DEFAULT_BASE_HEIGHT: i32 = 8;
/// 地形起伏幅度
pub const DEFAULT_AMPLITUDE: i32 = 6;
/// 噪声采样缩放系数
pub const DEFAULT_NOISE_SCALE: f64 = 0.05;
/// 水面高度，低于此高度的地表会被水覆盖
pub const DEFAULT_WATER_LEVEL: i32 = 6;

/// 玩家交互距离
pub const DEFAULT_REACH: f32 = 6.0;
/// 步进射线的步长
pub const DEFAULT_RAYCAST_STEP: f32 = 0.1;

/// 出生点距地表的高度
pub const DEFAULT_SPAWN_CLEARANCE: f32 = 3.0;
