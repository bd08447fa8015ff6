/// 方块变更记录
///
/// 一次成功的编辑返回一条记录，供调用方做日志
use bevy::prelude::*;

use super::block_type::BlockType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    /// 方块的世界坐标
    pub pos: IVec3,
    pub old: BlockType,
    pub new: BlockType,
}
