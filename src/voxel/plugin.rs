//! 体素系统插件

use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::interaction::BlockSelection;
use crate::voxel::loading::{BlockActionQueue, EcsBackend, EditLog, SceneEntities};
use crate::voxel::systems::{
    apply_block_actions, spawn_stream_anchor, stream_chunks, sync_chunk_entities,
};
use crate::voxel::world::VoxelWorld;

/// 作为 ECS 资源的世界核心
#[derive(Resource, Deref, DerefMut)]
pub struct ChunkWorld(pub VoxelWorld<EcsBackend>);

impl ChunkWorld {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self(VoxelWorld::new(
            config.seed.clone(),
            config.terrain,
            EcsBackend::default(),
        ))
    }
}

/// 体素系统插件 - 负责注册体素相关的资源和系统
/// 若 App 中已有 WorldConfig 则沿用，否则使用默认配置
pub struct VoxelPlugin;

impl Plugin for VoxelPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<WorldConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(ChunkWorld::from_config(&config))
            .insert_resource(config)
            .init_resource::<SceneEntities>()
            .init_resource::<BlockActionQueue>()
            .init_resource::<BlockSelection>()
            .init_resource::<EditLog>()
            .add_systems(Startup, spawn_stream_anchor)
            .add_systems(
                Update,
                (stream_chunks, apply_block_actions, sync_chunk_entities).chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::BlockRay;
    use crate::voxel::components::{ChunkVisual, StaticBody, StreamAnchor};
    use crate::voxel::loading::BlockAction;
    use crate::voxel::BlockType;

    fn app_with_radius(radius: i32) -> App {
        let mut app = App::new();
        app.insert_resource(WorldConfig {
            view_radius: radius,
            ..default()
        });
        app.add_plugins(VoxelPlugin);
        app
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let world = app.world_mut();
        let mut query = world.query::<&C>();
        query.iter(world).count()
    }

    fn anchor_position(app: &mut App) -> Vec3 {
        let world = app.world_mut();
        let mut query = world.query::<&StreamAnchor>();
        query.single(world).map(|a| a.position).unwrap()
    }

    fn move_anchor(app: &mut App, position: Vec3) {
        let world = app.world_mut();
        let mut query = world.query::<&mut StreamAnchor>();
        for mut anchor in query.iter_mut(world) {
            anchor.position = position;
        }
    }

    #[test]
    fn test_first_update_spawns_chunk_entities() {
        let mut app = app_with_radius(2);
        app.update();

        assert_eq!(app.world().resource::<ChunkWorld>().loaded_count(), 25);
        assert_eq!(count::<ChunkVisual>(&mut app), 25);
        assert_eq!(count::<StaticBody>(&mut app), 25);
        assert_eq!(count::<StreamAnchor>(&mut app), 1);

        let entities = app.world().resource::<SceneEntities>();
        assert_eq!(entities.visuals.len(), 25);
        assert_eq!(entities.bodies.len(), 25);
    }

    #[test]
    fn test_anchor_starts_above_terrain() {
        let mut app = app_with_radius(0);
        app.update();
        let position = anchor_position(&mut app);
        let height = app.world().resource::<ChunkWorld>().terrain_height_at(0.0, 0.0);
        assert_eq!(position.y, height as f32 + 3.0);
    }

    #[test]
    fn test_moving_anchor_streams_window() {
        let mut app = app_with_radius(1);
        app.update();
        assert_eq!(count::<ChunkVisual>(&mut app), 9);

        move_anchor(&mut app, Vec3::new(100.0, 20.0, 0.0));
        app.update();

        let world = app.world().resource::<ChunkWorld>();
        assert_eq!(world.loaded_count(), 9);
        assert!(world.loaded_chunk_positions().iter().all(|p| (5..=7).contains(&p.x)));
        assert_eq!(count::<ChunkVisual>(&mut app), 9);
        assert_eq!(count::<StaticBody>(&mut app), 9);
    }

    #[test]
    fn test_break_action_rebuilds_one_chunk() {
        let mut app = app_with_radius(1);
        app.update();

        let origin = anchor_position(&mut app);
        app.world_mut()
            .resource_mut::<BlockActionQueue>()
            .push(BlockAction::Break(BlockRay::new(origin, Vec3::NEG_Y)));
        app.update();

        let log = app.world().resource::<EditLog>();
        assert_eq!(log.applied.len(), 1, "rejected: {:?}", log.rejected);
        let edit = log.applied[0];
        assert_ne!(edit.old, BlockType::Air);
        assert_eq!(edit.new, BlockType::Air);

        let world = app.world().resource::<ChunkWorld>();
        assert_eq!(
            world.get_block_type(edit.pos.x, edit.pos.y, edit.pos.z),
            BlockType::Air
        );
        assert!(app.world().resource::<BlockActionQueue>().actions.is_empty());
        assert_eq!(count::<ChunkVisual>(&mut app), 9);
        assert_eq!(count::<StaticBody>(&mut app), 9);
    }

    #[test]
    fn test_place_action_uses_selection() {
        let mut app = app_with_radius(1);
        app.update();

        // 站在出生点旁边一格，向下看放置
        let origin = anchor_position(&mut app) + Vec3::new(3.0, 0.0, 0.0);
        app.world_mut()
            .resource_mut::<BlockSelection>()
            .select(BlockType::Stone)
            .unwrap();
        app.world_mut()
            .resource_mut::<BlockActionQueue>()
            .push(BlockAction::Place(BlockRay::new(origin, Vec3::NEG_Y)));
        app.update();

        let log = app.world().resource::<EditLog>();
        assert_eq!(log.applied.len(), 1, "rejected: {:?}", log.rejected);
        assert_eq!(log.applied[0].new, BlockType::Stone);
        assert_eq!(log.applied[0].old, BlockType::Air);
    }
}
