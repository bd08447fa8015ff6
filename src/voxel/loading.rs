//! ECS 适配层的数据类型：场景操作队列、实体映射、方块操作队列

use bevy::prelude::*;
use std::collections::HashMap;

use crate::interaction::InteractError;
use crate::raycast::BlockRay;
use crate::voxel::backend::ChunkBackend;
use crate::voxel::change::BlockEdit;
use crate::voxel::chunk::ChunkPos;
use crate::voxel::geometry::{BlockInstance, ChunkGeometry};

// ============================================================================
// 场景句柄
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

/// 世界核心发出的场景变更，由同步系统转成实体的生成和销毁
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOp {
    Attach {
        id: VisualId,
        pos: ChunkPos,
        blocks: Vec<BlockInstance>,
    },
    Detach(VisualId),
    AddBody {
        id: BodyId,
        pos: ChunkPos,
        cells: Vec<IVec3>,
    },
    RemoveBody(BodyId),
}

/// 把适配器调用记录为待执行操作
/// 世界核心不能直接访问 Commands，所以先排队，帧末统一应用
#[derive(Debug, Default)]
pub struct EcsBackend {
    next_id: u64,
    pending: Vec<SceneOp>,
}

impl EcsBackend {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn pending(&self) -> &[SceneOp] {
        &self.pending
    }

    pub fn drain_ops(&mut self) -> std::vec::Drain<'_, SceneOp> {
        self.pending.drain(..)
    }
}

impl ChunkBackend for EcsBackend {
    type Visual = VisualId;
    type Body = BodyId;

    fn attach(&mut self, pos: ChunkPos, geometry: &ChunkGeometry) -> VisualId {
        let id = VisualId(self.next_id());
        self.pending.push(SceneOp::Attach {
            id,
            pos,
            blocks: geometry.blocks.clone(),
        });
        id
    }

    fn detach(&mut self, visual: VisualId) {
        self.pending.push(SceneOp::Detach(visual));
    }

    fn register_static_body(&mut self, pos: ChunkPos, geometry: &ChunkGeometry) -> BodyId {
        let id = BodyId(self.next_id());
        self.pending.push(SceneOp::AddBody {
            id,
            pos,
            cells: geometry.solid_blocks().map(|b| b.position).collect(),
        });
        id
    }

    fn unregister_static_body(&mut self, body: BodyId) {
        self.pending.push(SceneOp::RemoveBody(body));
    }
}

// ============================================================================
// 实体映射
// ============================================================================

/// 句柄到实体的映射
#[derive(Resource, Default)]
pub struct SceneEntities {
    pub visuals: HashMap<VisualId, Entity>,
    pub bodies: HashMap<BodyId, Entity>,
}

// ============================================================================
// 方块操作
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockAction {
    Break(BlockRay),
    /// 放置当前选中的方块
    Place(BlockRay),
}

/// 输入层写入，交互系统每帧清空
#[derive(Resource, Default)]
pub struct BlockActionQueue {
    pub actions: Vec<BlockAction>,
}

impl BlockActionQueue {
    pub fn push(&mut self, action: BlockAction) {
        self.actions.push(action);
    }
}

/// 最近一帧的操作结果
#[derive(Resource, Default)]
pub struct EditLog {
    pub applied: Vec<BlockEdit>,
    pub rejected: Vec<InteractError>,
}

impl EditLog {
    pub fn clear(&mut self) {
        self.applied.clear();
        self.rejected.clear();
    }
}
