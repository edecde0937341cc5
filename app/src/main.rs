use std::{process::ExitCode, sync::Arc};

use crossbeam::channel::Receiver;
use glam::Vec3;
use log::{LevelFilter, error, info};

use helium_engine::{
    components::TransformComponent,
    core::{
        Engine, EngineConfig, EngineContext, Frame,
        log::{ChannelLogger, LogMessage},
    },
    define_task,
    ecs::{
        Entity, WorldId,
        schedule::{Contract, Task, dependencies::ProcessPhysics, for_each_world},
    },
    physics::{
        self, BodyDefinition, CONTACT_FLAG_SET, HasPhysicalContacts, PhysicsBodyComponent,
        PhysicsWorldComponent, Shape, ShapeDefinition, WorldDefinition,
    },
};

const FRAME_SECONDS: f32 = 1.0 / 60.0;
const FRAMES: u32 = 240;

const CONFIG: &str = r#"{ "physics": { "fixed_time_step": 0.008333334, "max_sub_steps": 4 } }"#;

/// Marks the platform the demo slides back and forth.
#[derive(helium_engine::Component)]
struct Slider {
    speed: f32,
}

define_task!(SlidePlatforms);

impl Task for SlidePlatforms {
    fn define_contract(contract: &mut Contract) {
        contract.execute_before(ProcessPhysics);
    }

    fn execute(frame: &mut Frame<'_>) {
        let elapsed = frame.worlds().time().elapsed_seconds() as f32;
        for_each_world::<(&Slider, &mut TransformComponent), _>(
            frame.worlds(),
            |_, (slider, transform)| {
                let x = (elapsed * slider.speed).sin() * 3.0;
                let position = transform.position();
                transform.set_position(Vec3::new(x, position.y, position.z));
            },
        );
    }
}

fn sphere(radius: f32, mass: f32) -> BodyDefinition {
    BodyDefinition {
        shapes: vec![ShapeDefinition::new(Shape::Sphere { radius }, mass)],
        restitution: 0.3,
        contact_groups: vec!["Ball".into()],
        contact_mask: vec!["Ground".into(), "Platform".into()],
        ..Default::default()
    }
}

fn slab(half_extents: Vec3, group: &str) -> BodyDefinition {
    BodyDefinition {
        shapes: vec![ShapeDefinition::new(Shape::Box { half_extents }, 0.0)],
        contact_groups: vec![group.into()],
        ..Default::default()
    }
}

fn build_scene(engine: &mut Engine) -> (WorldId, Vec<Entity>) {
    let config = engine.context().config.physics;
    let id = engine.worlds_mut().create_world();
    let mut balls = Vec::new();
    let Some(world) = engine.worlds_mut().world_mut(id) else {
        return (id, balls);
    };
    world.add_unique(PhysicsWorldComponent::initialize(&WorldDefinition::default(), &config));

    physics::spawn_body(
        world,
        Arc::new(slab(Vec3::new(20.0, 0.5, 20.0), "Ground")),
        TransformComponent::default(),
    );

    let platform = BodyDefinition {
        kinematic: true,
        ..slab(Vec3::new(1.5, 0.25, 1.5), "Platform")
    };
    if let Some(entity) = physics::spawn_body(
        world,
        Arc::new(platform),
        TransformComponent::from_position(Vec3::new(0.0, 3.0, 0.0)),
    ) {
        world.add_component(entity, Slider { speed: 1.5 });
    }

    let ball = Arc::new(sphere(0.5, 1.0));
    for i in 0..4 {
        let position = Vec3::new(i as f32 - 1.5, 6.0 + i as f32, 0.0);
        let transform = TransformComponent::from_position(position);
        if let Some(entity) = physics::spawn_body(world, ball.clone(), transform) {
            balls.push(entity);
        }
    }

    (id, balls)
}

fn report(engine: &Engine, id: WorldId, balls: &[Entity]) {
    let Some(world) = engine.worlds().world(id) else {
        return;
    };
    for &ball in balls {
        let Some(transform) = world.get::<TransformComponent>(ball) else {
            continue;
        };
        let touching = world
            .get::<HasPhysicalContacts>(ball)
            .map_or(0, |contacts| contacts.contacts.len());
        let sleeping = world
            .get::<PhysicsBodyComponent>(ball)
            .is_some_and(|body| body.body().is_sleeping());
        let position = transform.position();
        println!(
            "  {ball:?} at ({:6.2}, {:6.2}, {:6.2}) touching {touching}{}",
            position.x,
            position.y,
            position.z,
            if sleeping { " (asleep)" } else { "" }
        );
    }
}

fn drain(logs: &Receiver<LogMessage>) {
    for message in logs.try_iter() {
        println!("[{:<5} {}] {}", message.level, message.target, message.message);
    }
}

fn main() -> ExitCode {
    let (logger, logs) = ChannelLogger::with_receiver(LevelFilter::Debug);
    let level = logger.level();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }

    let config = match EngineConfig::from_json(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid engine config: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut context = EngineContext::new(config);
    context.flags.define(CONTACT_FLAG_SET, ["Ground", "Platform", "Ball"]);
    let registered = physics::register_tasks(&mut context.tasks)
        .and_then(|()| context.tasks.register_task::<SlidePlatforms>());
    if let Err(err) = registered {
        error!("task registration failed: {err}");
        drain(&logs);
        return ExitCode::FAILURE;
    }

    let mut engine = match Engine::new(context) {
        Ok(engine) => engine,
        Err(err) => {
            error!("schedule failed to build: {err}");
            drain(&logs);
            return ExitCode::FAILURE;
        }
    };
    info!("frame order: {}", engine.schedule().order().join(" -> "));

    let (id, balls) = build_scene(&mut engine);

    for frame in 0..FRAMES {
        engine.tick(FRAME_SECONDS);
        if frame % 60 == 0 {
            println!("frame {frame}");
            report(&engine, id, &balls);
        }
        drain(&logs);
    }

    println!("frame {FRAMES}");
    report(&engine, id, &balls);
    drain(&logs);
    ExitCode::SUCCESS
}
