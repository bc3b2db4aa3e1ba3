//! Simulation results must not depend on how wall-clock time is sliced
//! into render frames.
use glam::Vec2;
use rstest::{fixture, rstest};
use test_utils::{bolt, grid_from_ascii, walker, world_with};
use tilebound::{ActorKind, Body, Intent, ProjectileKind, ProjectileStats, ShapeLayout, World};

const TICK: f32 = 1.0 / 64.0;
const TICKS: u32 = 96;

const LEVEL: &str = "
    ..........
    ..........
    ......B...
    ...==.B...
    ......B...
    ####^^####
    ##########
";

#[fixture]
fn world() -> World {
    let mut world = world_with(grid_from_ascii(LEVEL, 32.0), |params| {
        params.tick_seconds = TICK;
        params.max_frame_seconds = 1.0;
    });
    let player = world.spawn_actor(
        ActorKind::Player,
        walker(Vec2::new(8.0, 100.0)),
        ShapeLayout::uniform(Vec2::splat(16.0)),
        8,
    );
    world.set_intent(
        player,
        Intent {
            force: Vec2::new(0.3, 0.0),
            horizontal: 1.0,
            ..Intent::default()
        },
    );
    for height in [72.0, 104.0, 136.0] {
        world
            .fire(
                player,
                ProjectileKind::Bullet,
                ProjectileStats::default(),
                bolt(Vec2::new(24.0, height)),
                ShapeLayout::uniform(Vec2::splat(4.0)),
                Vec2::new(6.0, 0.0),
            )
            .expect("player is alive");
    }
    world
}

fn bodies(world: &World) -> Vec<Body> {
    world.actors().map(|(_, actor)| actor.body.clone()).collect()
}

#[rstest]
#[case::one_tick_per_frame(TICK, TICKS)]
#[case::two_ticks_per_frame(TICK * 2.0, TICKS / 2)]
#[case::half_tick_frames(TICK / 2.0, TICKS * 2)]
#[case::uneven_frames(TICK * 1.5, TICKS * 2 / 3)]
fn frame_slicing_does_not_change_the_outcome(
    world: World,
    #[case] frame: f32,
    #[case] frames: u32,
) {
    let mut stepped = world.clone();
    for _ in 0..TICKS {
        stepped.step();
    }

    let mut framed = world;
    let mut ran = 0;
    for _ in 0..frames {
        ran += framed.advance(frame);
    }

    assert_eq!(ran, TICKS);
    assert_eq!(framed.tick(), stepped.tick());
    assert_eq!(bodies(&framed), bodies(&stepped));
    assert_eq!(framed.grid(), stepped.grid());
    assert_eq!(framed.drain_events(), stepped.drain_events());
    assert_eq!(framed.emitters(), stepped.emitters());
}

#[rstest]
fn replays_are_identical(world: World) {
    let mut first = world.clone();
    let mut second = world;
    for _ in 0..TICKS {
        first.step();
        second.step();
    }
    assert_eq!(bodies(&first), bodies(&second));
    assert_eq!(first.emitters(), second.emitters());
}
