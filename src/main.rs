use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use voxcraft::voxel::systems::stream_chunks;
use voxcraft::voxel::{BlockAction, BlockActionQueue, ChunkWorld, EditLog, StreamAnchor};
use voxcraft::{BlockRay, BlockSelection, LaunchConfig, VoxelPlugin, WorldConfig};

/// Scripted walk standing in for keyboard input.
#[derive(Resource)]
struct WalkPlan {
    /// Horizontal distance covered per tick.
    velocity: Vec2,
    /// Queue a dig/build pair every this many ticks.
    edit_every: u32,
    tick: u32,
}

#[derive(Resource, Default)]
struct Totals {
    applied: usize,
    rejected: usize,
    max_loaded: usize,
}

fn main() -> ExitCode {
    let launch = match LaunchConfig::from_env() {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("voxcraft: {err}");
            eprintln!("usage: voxcraft [--seed|-s <seed>] [--radius|-r <chunks>] [--ticks|-t <n>]");
            return ExitCode::from(2);
        }
    };

    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .insert_resource(launch.world.clone())
        .add_plugins(VoxelPlugin)
        .insert_resource(WalkPlan {
            velocity: Vec2::new(0.8, 0.3),
            edit_every: 20,
            tick: 0,
        })
        .init_resource::<Totals>()
        .add_systems(Update, (walk, queue_edits).chain().before(stream_chunks))
        .add_systems(PostUpdate, tally);

    print_summary(&launch.world, launch.ticks);
    for _ in 0..launch.ticks {
        app.update();
    }

    let world = app.world().resource::<ChunkWorld>();
    let totals = app.world().resource::<Totals>();
    info!(
        "Finished {} ticks: {} chunks loaded (peak {}), {} edits applied, {} rejected",
        launch.ticks,
        world.loaded_count(),
        totals.max_loaded,
        totals.applied,
        totals.rejected
    );
    ExitCode::SUCCESS
}

fn print_summary(config: &WorldConfig, ticks: u32) {
    info!("=== Voxcraft ===");
    info!("  Seed         {}", config.seed.seed);
    info!("  View radius  {} chunks", config.view_radius);
    info!("  Reach        {}", config.raycast.reach);
    info!("  Ticks        {}", ticks);
}

/// Move the anchor along the plan, staying a fixed height above the surface.
fn walk(
    mut plan: ResMut<WalkPlan>,
    config: Res<WorldConfig>,
    world: Res<ChunkWorld>,
    mut anchors: Query<&mut StreamAnchor>,
) {
    plan.tick += 1;
    let Ok(mut anchor) = anchors.single_mut() else {
        return;
    };
    let x = anchor.position.x + plan.velocity.x;
    let z = anchor.position.z + plan.velocity.y;
    anchor.position = world.spawn_position(x, z, config.spawn_clearance);
}

/// Periodically dig the block below the player and put one back beside it,
/// switching to the next placeable block type each round.
fn queue_edits(
    plan: Res<WalkPlan>,
    anchors: Query<&StreamAnchor>,
    mut queue: ResMut<BlockActionQueue>,
    mut selection: ResMut<BlockSelection>,
) {
    if plan.edit_every == 0 || plan.tick % plan.edit_every != 0 {
        return;
    }
    let Ok(anchor) = anchors.single() else {
        return;
    };
    let kind = selection.next();
    debug!("Round {} places {}", plan.tick / plan.edit_every, kind.name());
    let eye = anchor.position + Vec3::Y * 1.6;
    queue.push(BlockAction::Break(BlockRay::new(eye, Vec3::NEG_Y)));
    queue.push(BlockAction::Place(BlockRay::new(
        eye,
        Vec3::new(1.0, -1.0, 0.0),
    )));
}

fn tally(log: Res<EditLog>, world: Res<ChunkWorld>, mut totals: ResMut<Totals>) {
    totals.applied += log.applied.len();
    totals.rejected += log.rejected.len();
    totals.max_loaded = totals.max_loaded.max(world.loaded_count());
    for edit in &log.applied {
        info!("{} -> {} at {}", edit.old.name(), edit.new.name(), edit.pos);
    }
}
