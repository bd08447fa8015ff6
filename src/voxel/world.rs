//! 体素世界 - 管理已加载区块、坐标映射、区块流式加载和方块编辑

use bevy::prelude::*;
use std::collections::HashMap;

use crate::voxel::backend::ChunkBackend;
use crate::voxel::block_type::BlockType;
use crate::voxel::change::BlockEdit;
use crate::voxel::chunk::{local_coords, Chunk, ChunkPos};
use crate::voxel::constants::CHUNK_SIZE_Y;
use crate::voxel::seed::WorldSeed;
use crate::voxel::terrain::{TerrainGenerator, TerrainSettings};

/// 已加载的区块及其在引擎侧的句柄
struct LoadedChunk<B: ChunkBackend> {
    chunk: Chunk,
    visual: Option<B::Visual>,
    body: Option<B::Body>,
}

/// 一次流式更新的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    /// 玩家所在区块
    pub center: ChunkPos,
    /// 本次新加载的区块
    pub loaded: Vec<ChunkPos>,
    /// 本次卸载的区块
    pub unloaded: Vec<ChunkPos>,
}

impl StreamReport {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty()
    }
}

/// 体素世界
///
/// 已加载区块集合始终恰好等于以玩家所在区块为中心、切比雪夫距离不超过视距的区块。
/// 噪声生成器在创建时构造一次，所有区块生成共用
pub struct VoxelWorld<B: ChunkBackend> {
    seed: WorldSeed,
    terrain: TerrainSettings,
    chunks: HashMap<ChunkPos, LoadedChunk<B>>,
    backend: B,
}

impl<B: ChunkBackend> VoxelWorld<B> {
    pub fn new(seed: WorldSeed, terrain: TerrainSettings, backend: B) -> Self {
        info!(
            "Creating voxel world: seed={}, base_height={}, amplitude={}, water_level={}",
            seed.seed, terrain.base_height, terrain.amplitude, terrain.water_level
        );
        Self {
            seed,
            terrain,
            chunks: HashMap::new(),
            backend,
        }
    }

    pub fn seed(&self) -> &WorldSeed {
        &self.seed
    }

    pub fn terrain_settings(&self) -> &TerrainSettings {
        &self.terrain
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ------------------------------------------------------------------
    // 地形高度
    // ------------------------------------------------------------------

    /// 某一列的目标地表高度，结果在 [1, CHUNK_SIZE_Y]
    /// 与区块生成使用完全相同的噪声、缩放、基准高度和幅度
    pub fn terrain_height_at(&self, world_x: f32, world_z: f32) -> i32 {
        TerrainGenerator::new(&*self.seed.terrain_noise, self.terrain)
            .height_at(world_x as f64, world_z as f64)
    }

    /// 出生点：地表之上 `clearance` 高度
    pub fn spawn_position(&self, world_x: f32, world_z: f32, clearance: f32) -> Vec3 {
        let height = self.terrain_height_at(world_x, world_z);
        Vec3::new(world_x, height as f32 + clearance, world_z)
    }

    // ------------------------------------------------------------------
    // 区块流式加载
    // ------------------------------------------------------------------

    /// 根据玩家位置加载/卸载区块，每个更新周期调用一次
    /// 先加载后卸载，仍在范围内的区块不会被销毁重建
    pub fn update_visible_chunks(
        &mut self,
        player_x: f32,
        player_z: f32,
        radius_chunks: i32,
    ) -> StreamReport {
        let center = ChunkPos::containing(player_x, player_z);
        let loaded = self.ensure_chunks_around(center, radius_chunks);
        let unloaded = self.unload_far_chunks(center, radius_chunks);

        if !loaded.is_empty() || !unloaded.is_empty() {
            debug!(
                "Chunk streaming around {:?}: +{} -{} (total {})",
                center,
                loaded.len(),
                unloaded.len(),
                self.chunks.len()
            );
        }

        StreamReport {
            center,
            loaded,
            unloaded,
        }
    }

    fn ensure_chunks_around(&mut self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        let mut loaded = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let pos = ChunkPos::new(center.x + dx, center.z + dz);
                if self.chunks.contains_key(&pos) {
                    continue;
                }
                self.load_chunk(pos);
                loaded.push(pos);
            }
        }
        loaded
    }

    fn unload_far_chunks(&mut self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        let mut far: Vec<ChunkPos> = self
            .chunks
            .keys()
            .filter(|pos| pos.chebyshev_distance_to(&center) > radius)
            .copied()
            .collect();
        far.sort();

        for pos in &far {
            if let Some(loaded) = self.chunks.remove(pos) {
                self.release(loaded);
            }
        }
        far
    }

    /// 创建区块、生成地形、构建几何体并注册碰撞体
    fn load_chunk(&mut self, pos: ChunkPos) {
        let mut chunk = Chunk::new(pos);
        chunk.generate_terrain_with_noise(&*self.seed.terrain_noise, self.terrain);

        let geometry = chunk.build_geometry();
        let visual = self.backend.attach(pos, &geometry);
        let body = self.backend.register_static_body(pos, &geometry);

        self.chunks.insert(
            pos,
            LoadedChunk {
                chunk,
                visual: Some(visual),
                body: Some(body),
            },
        );
    }

    fn release(&mut self, loaded: LoadedChunk<B>) {
        if let Some(body) = loaded.body {
            self.backend.unregister_static_body(body);
        }
        if let Some(visual) = loaded.visual {
            self.backend.detach(visual);
        }
    }

    /// 卸载全部区块
    pub fn unload_all(&mut self) -> usize {
        let count = self.chunks.len();
        let drained: Vec<_> = self.chunks.drain().map(|(_, loaded)| loaded).collect();
        for loaded in drained {
            self.release(loaded);
        }
        count
    }

    // ------------------------------------------------------------------
    // 方块读写
    // ------------------------------------------------------------------

    /// 读取世界坐标处的方块
    /// Y超出范围或区块未加载时返回空气
    pub fn get_block_type(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_SIZE_Y).contains(&y) {
            return BlockType::Air;
        }
        let Some(loaded) = self.chunks.get(&ChunkPos::from_world_pos(x, z)) else {
            return BlockType::Air;
        };
        let (lx, lz) = local_coords(x, z);
        loaded.chunk.get_block(lx, y, lz)
    }

    /// 写入世界坐标处的方块并重建所在区块
    /// Y超出范围或区块未加载时不执行操作，返回 None
    pub fn set_block_type(&mut self, x: i32, y: i32, z: i32, kind: BlockType) -> Option<BlockEdit> {
        if !(0..CHUNK_SIZE_Y).contains(&y) {
            return None;
        }
        let pos = ChunkPos::from_world_pos(x, z);
        let loaded = self.chunks.get_mut(&pos)?;
        let (lx, lz) = local_coords(x, z);
        let old = loaded.chunk.get_block(lx, y, lz);
        loaded.chunk.set_block(lx, y, lz, kind);

        self.rebuild_chunk(pos);

        Some(BlockEdit {
            pos: IVec3::new(x, y, z),
            old,
            new: kind,
        })
    }

    /// 重建包含该世界坐标的区块，区块未加载时返回 false
    pub fn update_chunk_at(&mut self, x: i32, _y: i32, z: i32) -> bool {
        self.rebuild_chunk(ChunkPos::from_world_pos(x, z))
    }

    /// 移除旧碰撞体、丢弃旧几何体、重新生成并重新注册
    /// 编辑只有在重建完成后才可见、可碰撞
    pub fn rebuild_chunk(&mut self, pos: ChunkPos) -> bool {
        let Some(loaded) = self.chunks.get_mut(&pos) else {
            return false;
        };

        if let Some(body) = loaded.body.take() {
            self.backend.unregister_static_body(body);
        }
        if let Some(visual) = loaded.visual.take() {
            self.backend.detach(visual);
        }

        let geometry = loaded.chunk.build_geometry();
        loaded.visual = Some(self.backend.attach(pos, &geometry));
        loaded.body = Some(self.backend.register_static_body(pos, &geometry));
        true
    }

    // ------------------------------------------------------------------
    // 查询
    // ------------------------------------------------------------------

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos).map(|loaded| &loaded.chunk)
    }

    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// 已加载区块坐标（排序后返回，便于比较）
    pub fn loaded_chunk_positions(&self) -> Vec<ChunkPos> {
        let mut positions: Vec<ChunkPos> = self.chunks.keys().copied().collect();
        positions.sort();
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Z};
    use crate::voxel::geometry::ChunkGeometry;
    use std::collections::{BTreeSet, HashMap, HashSet};

    /// 记录所有适配器调用的测试后端
    #[derive(Default)]
    struct RecordingBackend {
        next_id: u64,
        visuals: HashSet<u64>,
        bodies: HashSet<u64>,
        attach_calls: HashMap<ChunkPos, usize>,
        body_blocks: HashMap<u64, usize>,
    }

    impl ChunkBackend for RecordingBackend {
        type Visual = u64;
        type Body = u64;

        fn attach(&mut self, pos: ChunkPos, _geometry: &ChunkGeometry) -> u64 {
            self.next_id += 1;
            self.visuals.insert(self.next_id);
            *self.attach_calls.entry(pos).or_default() += 1;
            self.next_id
        }

        fn detach(&mut self, visual: u64) {
            assert!(self.visuals.remove(&visual), "detached unknown visual {visual}");
        }

        fn register_static_body(&mut self, _pos: ChunkPos, geometry: &ChunkGeometry) -> u64 {
            self.next_id += 1;
            self.bodies.insert(self.next_id);
            self.body_blocks.insert(self.next_id, geometry.solid_blocks().count());
            self.next_id
        }

        fn unregister_static_body(&mut self, body: u64) {
            assert!(self.bodies.remove(&body), "unregistered unknown body {body}");
            self.body_blocks.remove(&body);
        }
    }

    fn world(seed: u64) -> VoxelWorld<RecordingBackend> {
        VoxelWorld::new(
            WorldSeed::new(seed),
            TerrainSettings::default(),
            RecordingBackend::default(),
        )
    }

    fn expected_set(px: f32, pz: f32, r: i32) -> BTreeSet<ChunkPos> {
        let cx = (px / CHUNK_SIZE_X as f32).floor() as i32;
        let cz = (pz / CHUNK_SIZE_Z as f32).floor() as i32;
        let mut set = BTreeSet::new();
        for x in (cx - r)..=(cx + r) {
            for z in (cz - r)..=(cz + r) {
                set.insert(ChunkPos::new(x, z));
            }
        }
        set
    }

    fn loaded_set<B: ChunkBackend>(world: &VoxelWorld<B>) -> BTreeSet<ChunkPos> {
        world.loaded_chunk_positions().into_iter().collect()
    }

    #[test]
    fn test_terrain_height_in_range() {
        let world = world(12345);
        for i in -200..200 {
            let h = world.terrain_height_at(i as f32 * 3.7, i as f32 * -1.3);
            assert!((1..=CHUNK_SIZE_Y).contains(&h));
        }
    }

    #[test]
    fn test_stream_loads_exact_square() {
        let mut world = world(1);
        for (px, pz, r) in [(0.0, 0.0, 2), (-0.5, 31.0, 1), (100.0, -70.0, 3), (5.0, 5.0, 0)] {
            world.update_visible_chunks(px, pz, r);
            assert_eq!(loaded_set(&world), expected_set(px, pz, r));
        }
    }

    #[test]
    fn test_stream_is_idempotent() {
        let mut world = world(2);
        let first = world.update_visible_chunks(8.0, 8.0, 2);
        assert_eq!(first.loaded.len(), 25);
        assert!(first.unloaded.is_empty());

        let attach_before = world.backend().attach_calls.clone();
        let second = world.update_visible_chunks(8.0, 8.0, 2);
        assert!(second.is_empty());
        assert_eq!(world.backend().attach_calls, attach_before);
    }

    #[test]
    fn test_stream_moves_window_without_regenerating_overlap() {
        let mut world = world(3);
        world.update_visible_chunks(0.0, 0.0, 1);
        let report = world.update_visible_chunks(16.0, 0.0, 1);

        assert_eq!(report.center, ChunkPos::new(1, 0));
        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.unloaded, vec![
            ChunkPos::new(-1, -1),
            ChunkPos::new(-1, 0),
            ChunkPos::new(-1, 1),
        ]);
        // 重叠区块只生成过一次
        for pos in [ChunkPos::new(0, 0), ChunkPos::new(1, 1)] {
            assert_eq!(world.backend().attach_calls[&pos], 1);
        }
        assert_eq!(world.backend().visuals.len(), world.loaded_count());
        assert_eq!(world.backend().bodies.len(), world.loaded_count());
    }

    #[test]
    fn test_shrinking_radius_unloads() {
        let mut world = world(4);
        world.update_visible_chunks(0.0, 0.0, 3);
        assert_eq!(world.loaded_count(), 49);
        let report = world.update_visible_chunks(0.0, 0.0, 1);
        assert_eq!(report.unloaded.len(), 40);
        assert_eq!(world.loaded_count(), 9);
        assert_eq!(world.backend().visuals.len(), 9);
    }

    #[test]
    fn test_get_block_out_of_range_is_air() {
        let mut world = world(5);
        world.update_visible_chunks(0.0, 0.0, 1);
        assert_eq!(world.get_block_type(0, -1, 0), BlockType::Air);
        assert_eq!(world.get_block_type(0, CHUNK_SIZE_Y, 0), BlockType::Air);
        // 未加载区块
        assert_eq!(world.get_block_type(1000, 0, 1000), BlockType::Air);
        // 已加载区块底部一定是实心的
        assert_ne!(world.get_block_type(-5, 0, -5), BlockType::Air);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut world = world(6);
        world.update_visible_chunks(0.0, 0.0, 1);
        let cells = [(0, 0), (-1, -1), (-16, 15), (31, -16), (-16, -16), (31, 31)];
        for (x, z) in cells {
            assert!(world.is_loaded(ChunkPos::from_world_pos(x, z)), "({x}, {z})");
        }
        for (x, z) in cells {
            for y in [0, 7, CHUNK_SIZE_Y - 1] {
                for kind in [BlockType::Stone, BlockType::Air, BlockType::Water] {
                    let edit = world.set_block_type(x, y, z, kind).expect("chunk is loaded");
                    assert_eq!(edit.new, kind);
                    assert_eq!(world.get_block_type(x, y, z), kind);
                }
            }
        }
    }

    #[test]
    fn test_set_block_noop_outside() {
        let mut world = world(7);
        world.update_visible_chunks(0.0, 0.0, 0);
        assert!(world.set_block_type(0, -1, 0, BlockType::Stone).is_none());
        assert!(world.set_block_type(0, CHUNK_SIZE_Y, 0, BlockType::Stone).is_none());
        assert!(world.set_block_type(500, 3, 500, BlockType::Stone).is_none());
        assert!(!world.is_loaded(ChunkPos::from_world_pos(500, 500)));
    }

    #[test]
    fn test_set_block_rebuilds_only_that_chunk() {
        let mut world = world(8);
        world.update_visible_chunks(0.0, 0.0, 1);
        let before = world.backend().attach_calls.clone();

        world.set_block_type(-3, CHUNK_SIZE_Y - 1, 4, BlockType::Stone);

        let after = &world.backend().attach_calls;
        for (pos, count) in after {
            let expected = before[pos] + usize::from(*pos == ChunkPos::new(-1, 0));
            assert_eq!(*count, expected, "{pos:?}");
        }
        assert_eq!(world.backend().visuals.len(), 9);
        assert_eq!(world.backend().bodies.len(), 9);
    }

    #[test]
    fn test_rebuilt_body_reflects_edit() {
        let mut world = world(9);
        world.update_visible_chunks(0.0, 0.0, 0);
        let solid_before: usize = world.backend().body_blocks.values().sum();
        world.set_block_type(2, CHUNK_SIZE_Y - 1, 2, BlockType::Dirt);
        let solid_after: usize = world.backend().body_blocks.values().sum();
        assert_eq!(solid_after, solid_before + 1);
    }

    #[test]
    fn test_update_chunk_at_unloaded() {
        let mut world = world(10);
        assert!(!world.update_chunk_at(0, 0, 0));
        world.update_visible_chunks(0.0, 0.0, 0);
        assert!(world.update_chunk_at(3, 0, 3));
    }

    #[test]
    fn test_same_seed_same_world() {
        let path = [(0.0, 0.0, 2), (20.0, -5.0, 2), (40.0, -40.0, 1), (-90.0, 12.0, 2)];
        let mut a = world(424242);
        let mut b = world(424242);
        for (px, pz, r) in path {
            a.update_visible_chunks(px, pz, r);
            b.update_visible_chunks(px, pz, r);
            assert_eq!(a.loaded_chunk_positions(), b.loaded_chunk_positions());
        }
        for pos in a.loaded_chunk_positions() {
            let origin = pos.world_origin();
            for (x, z) in [(0, 0), (5, 11), (15, 15)] {
                for y in 0..CHUNK_SIZE_Y {
                    assert_eq!(
                        a.get_block_type(origin.x + x, y, origin.z + z),
                        b.get_block_type(origin.x + x, y, origin.z + z)
                    );
                }
            }
        }
    }

    #[test]
    fn test_spawn_matches_generated_surface() {
        let mut world = world(11);
        world.update_visible_chunks(0.0, 0.0, 1);
        for (x, z) in [(0, 0), (-7, 3), (12, -12)] {
            let h = world.terrain_height_at(x as f32, z as f32);
            assert_eq!(world.get_block_type(x, h - 1, z), BlockType::Grass);
            let spawn = world.spawn_position(x as f32, z as f32, 3.0);
            assert_eq!(spawn.y, h as f32 + 3.0);
        }
    }

    #[test]
    fn test_unload_all_releases_handles() {
        let mut world = world(12);
        world.update_visible_chunks(0.0, 0.0, 2);
        assert_eq!(world.unload_all(), 25);
        assert_eq!(world.loaded_count(), 0);
        assert!(world.backend().visuals.is_empty());
        assert!(world.backend().bodies.is_empty());
    }
}
