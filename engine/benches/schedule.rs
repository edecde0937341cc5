//! Schedule and physics frame benchmarks using Criterion.
//!
//! - Schedule construction from a registry of chained and slotted tasks
//! - Executing a physics frame over worlds full of falling bodies

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use helium_engine::{
    components::TransformComponent,
    core::{Engine, EngineContext},
    ecs::schedule::{Contract, Label, TaskDefinition, TaskRegistry, dependencies::ProcessPhysics},
    physics::{self, BodyDefinition, PhysicsWorldComponent, Shape, ShapeDefinition, WorldDefinition},
};

// =============================================================================
// Schedule Benchmarks
// =============================================================================

/// Defines the benchmark task labels with one registration function per label.
macro_rules! bench_labels {
    ($($name:ident),*) => {
        helium_engine::define_task!($($name),*);

        fn labels() -> Vec<fn(&mut TaskRegistry, usize)> {
            vec![$(|tasks: &mut TaskRegistry, i: usize| register(tasks, $name, i)),*]
        }
    };
}

bench_labels!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15);

fn register<L: Label>(tasks: &mut TaskRegistry, label: L, i: usize) {
    let contract = move |contract: &mut Contract| match i % 3 {
        0 => {
            contract.execute_before(ProcessPhysics);
        }
        1 => {
            contract.executes_within(ProcessPhysics);
        }
        _ => {
            contract.execute_after(ProcessPhysics);
        }
    };
    tasks
        .register(TaskDefinition::new(label, contract, |_frame| {}))
        .unwrap();
}

fn bench_build_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_schedule");

    for count in [4, 8, 16] {
        let mut tasks = TaskRegistry::new();
        for (i, register) in labels().into_iter().take(count).enumerate() {
            register(&mut tasks, i);
        }
        physics::register_tasks(&mut tasks).unwrap();

        group.throughput(Throughput::Elements(tasks.len() as u64));
        group.bench_with_input(BenchmarkId::new("slotted", count), &tasks, |b, tasks| {
            b.iter(|| black_box(tasks.build_schedule().unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Physics Frame Benchmarks
// =============================================================================

fn physics_engine(bodies: usize) -> Engine {
    let mut context = EngineContext::default();
    physics::register_tasks(&mut context.tasks).unwrap();
    let config = context.config.physics;

    let mut engine = Engine::new(context).unwrap();
    let id = engine.worlds_mut().create_world();
    let world = engine.worlds_mut().world_mut(id).unwrap();
    world.add_unique(PhysicsWorldComponent::initialize(&WorldDefinition::default(), &config));

    let ball = Arc::new(BodyDefinition {
        shapes: vec![ShapeDefinition::new(Shape::Sphere { radius: 0.5 }, 1.0)],
        ..Default::default()
    });
    for i in 0..bodies {
        let position = Vec3::new((i % 32) as f32 * 1.5, 2.0 + (i / 32) as f32 * 1.5, 0.0);
        physics::spawn_body(world, ball.clone(), TransformComponent::from_position(position));
    }
    engine
}

fn bench_physics_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_tick");

    for count in [64, 256, 1_024] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::new("falling_spheres", count), |b| {
            let mut engine = physics_engine(count);
            b.iter(|| engine.tick(black_box(1.0 / 60.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_schedule, bench_physics_tick);
criterion_main!(benches);
