//! 引擎适配接口
//!
//! 核心只持有不透明的句柄，渲染节点和物理刚体由实现方管理

use crate::voxel::chunk::ChunkPos;
use crate::voxel::geometry::ChunkGeometry;

/// 渲染/物理适配器
pub trait ChunkBackend {
    /// 区块渲染表示的句柄
    type Visual;
    /// 静态碰撞体的句柄
    type Body;

    /// 挂载区块的渲染表示
    fn attach(&mut self, pos: ChunkPos, geometry: &ChunkGeometry) -> Self::Visual;

    /// 卸下并销毁渲染表示
    fn detach(&mut self, visual: Self::Visual);

    /// 以几何数据为形状来源注册静态碰撞体
    fn register_static_body(&mut self, pos: ChunkPos, geometry: &ChunkGeometry) -> Self::Body;

    fn unregister_static_body(&mut self, body: Self::Body);
}

/// 不做任何事的适配器，用于纯数据场景（离线生成、测试）
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBackend;

impl ChunkBackend for HeadlessBackend {
    type Visual = ();
    type Body = ();

    fn attach(&mut self, _pos: ChunkPos, _geometry: &ChunkGeometry) {}

    fn detach(&mut self, _visual: ()) {}

    fn register_static_body(&mut self, _pos: ChunkPos, _geometry: &ChunkGeometry) {}

    fn unregister_static_body(&mut self, _body: ()) {}
}
