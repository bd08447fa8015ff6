//! 世界配置
//!
//! 优先级：命令行参数 > 环境变量 > 默认值

use bevy::prelude::*;
use thiserror::Error;

use crate::interaction::PlayerSize;
use crate::raycast::RaycastSettings;
use crate::voxel::constants::{DEFAULT_SPAWN_CLEARANCE, DEFAULT_VIEW_RADIUS};
use crate::voxel::{TerrainSettings, WorldSeed};

pub const SEED_ENV: &str = "VOXCRAFT_SEED";
pub const RADIUS_ENV: &str = "VOXCRAFT_RADIUS";

/// 默认模拟帧数
pub const DEFAULT_TICKS: u32 = 120;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value after {0}")]
    MissingValue(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("view radius must be non-negative, got {0}")]
    NegativeRadius(i32),
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),
}

/// 世界生成与交互的全部参数
#[derive(Resource, Debug, Clone)]
pub struct WorldConfig {
    pub seed: WorldSeed,
    /// 以玩家所在区块为中心的切比雪夫半径
    pub view_radius: i32,
    pub terrain: TerrainSettings,
    pub raycast: RaycastSettings,
    pub player: PlayerSize,
    /// 出生点高出地表的距离
    pub spawn_clearance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            view_radius: DEFAULT_VIEW_RADIUS,
            terrain: TerrainSettings::default(),
            raycast: RaycastSettings::default(),
            player: PlayerSize::default(),
            spawn_clearance: DEFAULT_SPAWN_CLEARANCE,
        }
    }
}

/// 启动参数：世界配置加上运行帧数
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub world: WorldConfig,
    pub ticks: u32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            ticks: DEFAULT_TICKS,
        }
    }
}

fn parse_radius(key: &str, value: &str) -> Result<i32, ConfigError> {
    let radius = value
        .trim()
        .parse::<i32>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
    if radius < 0 {
        return Err(ConfigError::NegativeRadius(radius));
    }
    Ok(radius)
}

impl LaunchConfig {
    /// 从进程参数和环境变量读取
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse(&args, |key| std::env::var(key).ok())
    }

    /// `args` 不含程序名；`env` 用于查询环境变量，便于测试注入
    pub fn parse(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(seed) = env(SEED_ENV) {
            config.world.seed = WorldSeed::parse(&seed);
        }
        if let Some(radius) = env(RADIUS_ENV) {
            config.world.view_radius = parse_radius(RADIUS_ENV, &radius)?;
        }

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .ok_or_else(|| ConfigError::MissingValue(arg.clone()))
            };
            match arg.as_str() {
                "--seed" | "-s" => config.world.seed = WorldSeed::parse(value()?),
                "--radius" | "-r" => config.world.view_radius = parse_radius(arg, value()?)?,
                "--ticks" | "-t" => {
                    let raw = value()?;
                    config.ticks = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                        key: arg.clone(),
                        value: raw.clone(),
                    })?;
                }
                _ => return Err(ConfigError::UnknownArgument(arg.clone())),
            }
        }

        Ok(config)
    }
}
