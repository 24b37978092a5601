//! Scene round trip: builds a handful of entities, integrates their
//! velocities through a view, saves the world to disk and loads it into a
//! fresh world.
//!
//! Run with `RUST_LOG=debug` to see type registration and scene I/O logs.

use anyhow::{Context, Result, bail};
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{Health, Label, SceneTag, Transform, Velocity, register_all};
use engine_component::Component;
use engine_ecs::{World, WorldConfig};

const STEP: f32 = 0.5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scene_roundtrip=info".parse()?))
        .init();

    let config = WorldConfig::new()
        .with_capacity(16)
        .with_required_tag(SceneTag::NAME);
    let mut world = World::with_config(config.clone());
    register_all(&mut world)?;

    for i in 0..4u8 {
        let e = world.create();
        let name = format!("mover-{i}");
        world.add::<Label>(e).context("entity vanished")?.set(&name);
        world.add::<Transform>(e).context("entity vanished")?.position = Vec3::new(f32::from(i), 0.0, 0.0);
        if i % 2 == 0 {
            *world.add::<Velocity>(e).context("entity vanished")? = Velocity::new(0.0, 1.0, 0.0);
        }
        if i == 3 {
            world.add::<Health>(e).context("entity vanished")?.damage(30.0);
        }
    }

    integrate(&mut world)?;

    let path = std::env::temp_dir().join("scene_roundtrip.bin");
    world.save_to_file(&path)?;
    info!(path = %path.display(), entities = world.entity_count(), "scene saved");

    let mut restored = World::with_config(config);
    register_all(&mut restored)?;
    restored.load_from_file(&path)?;

    for e in restored.entities() {
        let label = restored.get::<Label>(e).map_or("?", Label::as_str);
        let position = restored.get::<Transform>(e).map(|t| t.position).unwrap_or_default();
        let health = restored.get::<Health>(e).map(|h| h.current);
        info!(entity = %e, label, ?position, ?health, "restored");
    }

    if restored.entity_count() != world.entity_count() {
        bail!(
            "expected {} entities after reload, found {}",
            world.entity_count(),
            restored.entity_count()
        );
    }
    std::fs::remove_file(&path)?;
    Ok(())
}

/// Advance every moving transform by one step.
fn integrate(world: &mut World) -> Result<()> {
    let (Some(transform), Some(velocity)) = (world.id_of::<Transform>(), world.id_of::<Velocity>()) else {
        bail!("demo components are not registered");
    };

    let moves: Vec<_> = world
        .view(&[transform, velocity])
        .context("view over Transform and Velocity")?
        .filter_map(|item| Some((item.entity(), item.get::<Velocity>(1)?.linear)))
        .collect();

    for (entity, linear) in moves {
        if let Some(t) = world.get_mut::<Transform>(entity) {
            t.position += linear * STEP;
        }
    }
    info!(moved = world.count(velocity), "integrated velocities");
    Ok(())
}
