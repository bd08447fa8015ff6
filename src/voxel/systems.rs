//! 体素世界的系统函数

use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::interaction::{break_block, place_block, BlockSelection, PlayerBounds};
use crate::voxel::components::{ChunkMarker, ChunkVisual, StaticBody, StreamAnchor};
use crate::voxel::loading::{BlockAction, BlockActionQueue, EditLog, SceneEntities, SceneOp};
use crate::voxel::plugin::ChunkWorld;

/// 在出生点生成流式加载锚点（已存在则跳过）
pub fn spawn_stream_anchor(
    mut commands: Commands,
    config: Res<WorldConfig>,
    world: Res<ChunkWorld>,
    anchors: Query<(), With<StreamAnchor>>,
) {
    if !anchors.is_empty() {
        return;
    }
    let position = world.spawn_position(0.0, 0.0, config.spawn_clearance);
    info!("Spawning stream anchor at {:?}", position);
    commands.spawn(StreamAnchor { position });
}

/// 根据锚点位置加载/卸载区块
pub fn stream_chunks(
    config: Res<WorldConfig>,
    anchors: Query<&StreamAnchor>,
    mut world: ResMut<ChunkWorld>,
) {
    let Ok(anchor) = anchors.single() else {
        return;
    };
    world.update_visible_chunks(anchor.position.x, anchor.position.z, config.view_radius);
}

/// 执行本帧排队的破坏/放置操作
pub fn apply_block_actions(
    config: Res<WorldConfig>,
    selection: Res<BlockSelection>,
    anchors: Query<&StreamAnchor>,
    mut queue: ResMut<BlockActionQueue>,
    mut world: ResMut<ChunkWorld>,
    mut log: ResMut<EditLog>,
) {
    log.clear();
    if queue.actions.is_empty() {
        return;
    }

    // 没有锚点时跳过玩家重叠检测
    let player = anchors
        .single()
        .ok()
        .map(|anchor| PlayerBounds::new(anchor.position, config.player));

    for action in queue.actions.drain(..) {
        let result = match action {
            BlockAction::Break(ray) => break_block(&mut world.0, ray, config.raycast),
            BlockAction::Place(ray) => place_block(
                &mut world.0,
                ray,
                config.raycast,
                selection.current(),
                player.as_ref(),
            ),
        };

        match result {
            Ok(edit) => {
                debug!("{} at {} -> {}", edit.old.name(), edit.pos, edit.new.name());
                log.applied.push(edit);
            }
            Err(err) => {
                debug!("Block action rejected: {}", err);
                log.rejected.push(err);
            }
        }
    }
}

/// 把世界核心排队的场景操作应用为实体
pub fn sync_chunk_entities(
    mut commands: Commands,
    mut world: ResMut<ChunkWorld>,
    mut entities: ResMut<SceneEntities>,
) {
    let ops: Vec<SceneOp> = world.backend_mut().drain_ops().collect();
    if ops.is_empty() {
        return;
    }

    for op in ops {
        match op {
            SceneOp::Attach { id, pos, blocks } => {
                let entity = commands
                    .spawn((ChunkMarker { pos }, ChunkVisual { blocks }))
                    .id();
                entities.visuals.insert(id, entity);
            }
            SceneOp::Detach(id) => {
                if let Some(entity) = entities.visuals.remove(&id) {
                    commands.entity(entity).despawn();
                } else {
                    warn!("Detach for unknown visual {:?}", id);
                }
            }
            SceneOp::AddBody { id, pos, cells } => {
                let entity = commands.spawn((ChunkMarker { pos }, StaticBody { cells })).id();
                entities.bodies.insert(id, entity);
            }
            SceneOp::RemoveBody(id) => {
                if let Some(entity) = entities.bodies.remove(&id) {
                    commands.entity(entity).despawn();
                } else {
                    warn!("Remove for unknown body {:?}", id);
                }
            }
        }
    }
}
