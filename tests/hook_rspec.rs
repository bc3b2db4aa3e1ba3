//! Behavioural tests for the grapple hook inside a running world.
//!
//! A player stands under a hookable ceiling, fires a hook straight up and
//! hangs from it. Each scenario checks one way the hook can end, and that
//! the owner never strays further than the safety distance from the bob
//! while anchored.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use glam::Vec2;
use rspec_runner::run_serial;
use test_utils::{bolt, grid_from_ascii, walker, world_with};
use tilebound::hook::HookState;
use tilebound::{
    ActorId, ActorKind, BreakReason, Intent, PhysicsEvent, ProjectileKind, ProjectileStats,
    ShapeLayout, World,
};

const LEVEL: &str = "
    ..HHHH..
    ........
    ........
    ........
    ........
    ########
";

#[derive(Clone, Debug)]
struct Env {
    world: World,
    player: ActorId,
}

impl Default for Env {
    fn default() -> Self {
        let mut world = world_with(grid_from_ascii(LEVEL, 32.0), |params| {
            params.hook.min_length = 64.0;
        });
        let player = world.spawn_actor(
            ActorKind::Player,
            walker(Vec2::new(112.0, 144.0)),
            ShapeLayout::uniform(Vec2::splat(16.0)),
            4,
        );
        Self { world, player }
    }
}

impl Env {
    fn hold(&mut self, held: bool) {
        self.world.set_intent(
            self.player,
            Intent {
                hook_held: held,
                ..Intent::default()
            },
        );
    }

    fn fire_upwards(&mut self) {
        self.world
            .fire(
                self.player,
                ProjectileKind::Hook,
                ProjectileStats::default(),
                bolt(Vec2::new(118.0, 130.0)),
                ShapeLayout::uniform(Vec2::splat(4.0)),
                Vec2::new(0.0, -16.0),
            )
            .expect("an idle player can fire a hook");
    }

    /// Steps the world, checking the safety bound after every tick.
    fn run(&mut self, ticks: u32) {
        let safety = self.world.params().hook.safety_distance;
        for _ in 0..ticks {
            self.world.step();
            let actor = self.world.actor(self.player).expect("player is alive");
            if let Some(spring) = actor.hook.spring() {
                if actor.hook.state() == HookState::Anchored {
                    let distance = actor.shape.center().distance(spring.bob);
                    assert!(distance <= safety, "owner strayed {distance} from the bob");
                }
            }
        }
    }

    fn state(&self) -> HookState {
        self.world
            .actor(self.player)
            .expect("player is alive")
            .hook
            .state()
    }

    fn broke_for(&self, reason: BreakReason) -> bool {
        self.world
            .events()
            .as_slice()
            .contains(&PhysicsEvent::HookBroken {
                actor: self.player,
                reason,
            })
    }
}

#[test]
fn grapple_hook_lifecycle() {
    run_serial(&rspec::given(
        "a player under a hookable ceiling",
        Env::default(),
        |ctx| {
            ctx.before_each(|env| {
                env.hold(true);
                env.fire_upwards();
                env.run(10);
            });

            ctx.then("the hook anchors at the centre of the ceiling tile", |env| {
                assert_eq!(env.state(), HookState::Anchored);
                assert!(env.world.events().as_slice().contains(&PhysicsEvent::HookAnchored {
                    actor: env.player,
                    anchor: Vec2::new(112.0, 16.0),
                }));
                assert_eq!(env.world.projectiles().count(), 0);
            });

            ctx.when("the player keeps holding", |ctx| {
                ctx.before_each(|env| env.run(120));

                ctx.then("the player is reeled towards the anchor", |env| {
                    assert_eq!(env.state(), HookState::Anchored);
                    let actor = env.world.actor(env.player).expect("player is alive");
                    assert!(actor.body.position.y < 144.0);
                    assert!(actor.shape.bounding_box.top() >= 32.0);
                });
            });

            ctx.when("the player lets go of the button", |ctx| {
                ctx.before_each(|env| {
                    env.hold(false);
                    env.run(1);
                });

                ctx.then("the hook breaks for lost hold", |env| {
                    assert_eq!(env.state(), HookState::Snaking);
                    assert!(env.broke_for(BreakReason::HoldLost));
                });
            });

            ctx.when("the player presses release", |ctx| {
                ctx.before_each(|env| {
                    env.world.set_intent(
                        env.player,
                        Intent {
                            hook_held: true,
                            hook_released: true,
                            ..Intent::default()
                        },
                    );
                    env.run(1);
                });

                ctx.then("the hook breaks and settles back to idle", |env| {
                    assert!(env.broke_for(BreakReason::Released));
                    let mut settled = env.clone();
                    settled.run(settled.world.params().hook.snake_ticks);
                    assert_eq!(settled.state(), HookState::Idle);
                });
            });

            ctx.when("the player is knocked far from the bob", |ctx| {
                ctx.before_each(|env| {
                    let actor = env.world.actor_mut(env.player).expect("player is alive");
                    actor.body.set_position(Vec2::new(40.0, 100.0));
                    actor.shape.sync(&actor.body);
                    env.run(1);
                });

                ctx.then("the hook breaks in that same tick", |env| {
                    assert_eq!(env.state(), HookState::Snaking);
                    assert!(env.broke_for(BreakReason::SafetyExceeded));
                });
            });
        },
    ));
}
