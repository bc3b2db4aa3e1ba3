//! The simulation world: every dynamic entity, the level and the clock.
//!
//! Entities live in slot maps and refer to each other by generational key, so a
//! projectile can outlive the actor that fired it without dangling. One call
//! to [`World::step`] runs a single tick in a fixed order:
//!
//! 1. lower contact flags and apply input forces;
//! 2. integrate actors, projectiles and debris, re-syncing their shapes;
//! 3. resolve actors against the grid;
//! 4. bounce debris;
//! 5. resolve projectiles against tiles, then against opposing actors;
//! 6. update grapple hooks;
//! 7. apply hazard damage and report deaths;
//! 8. report grounding changes;
//! 9. clear consumed forces and drop spent entities.
//!
//! Within each phase entities are visited in ascending slot order.
use glam::Vec2;
use log::{debug, info, warn};
use slotmap::SlotMap;

use crate::actor::{Actor, ActorId, ActorKind, Intent};
use crate::body::Body;
use crate::error::ConfigError;
use crate::events::{EventLog, EventSink, PhysicsEvent};
use crate::grid::{Cell, TileGrid, Wear};
use crate::health::{Health, HitOutcome};
use crate::hook::{BreakReason, HookEvent, HookState, Pull};
use crate::params::{PhysicsParams, WorldParams};
use crate::particles::Emitter;
use crate::projectile::{Projectile, ProjectileId, ProjectileKind, ProjectileStats};
use crate::random::SeededRandom;
use crate::resolver::{CollisionContext, Resolution};
use crate::shape::ShapeLayout;
use crate::timestep::FixedTimestep;

/// Everything that moves, plus the level it moves through.
#[derive(Debug, Clone)]
pub struct World {
    grid: TileGrid,
    params: WorldParams,
    actors: SlotMap<ActorId, Actor>,
    projectiles: SlotMap<ProjectileId, Projectile>,
    emitters: Vec<Emitter>,
    events: EventLog,
    clock: FixedTimestep,
    rng: SeededRandom,
    debris_template: Body,
    tick: u64,
}

impl World {
    /// Creates an empty world over `grid`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `params` fails validation.
    pub fn new(grid: TileGrid, params: WorldParams) -> Result<Self, ConfigError> {
        params.validate()?;
        if (grid.cell_size() - params.cell_size).abs() > f32::EPSILON {
            warn!(
                "grid cell size {} differs from tuned cell size {}",
                grid.cell_size(),
                params.cell_size
            );
        }
        let clock = FixedTimestep::from_params(&params)?;
        let debris_template = Body::new(&PhysicsParams {
            gravity: params.debris.gravity,
            ..PhysicsParams::default()
        })?;
        info!(
            "world ready: {}x{} cells, {} active",
            grid.columns(),
            grid.rows(),
            grid.active_indices().len()
        );
        Ok(Self {
            grid,
            rng: SeededRandom::new(params.debris.seed),
            params,
            actors: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            emitters: Vec::new(),
            events: EventLog::default(),
            clock,
            debris_template,
            tick: 0,
        })
    }

    /// The level.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// World tuning.
    #[must_use]
    pub const fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Adds an actor with full health and an idle hook.
    pub fn spawn_actor(
        &mut self,
        kind: ActorKind,
        body: Body,
        layout: ShapeLayout,
        max_hp: u32,
    ) -> ActorId {
        let layout = layout.with_vicinity_margin(self.params.vicinity_margin);
        let health = Health::new(max_hp, self.params.invincibility_ticks);
        let actor = Actor::new(kind, body, layout, health, self.params.hook);
        let id = self.actors.insert(actor);
        debug!("spawned {kind:?} as {id:?}");
        id
    }

    /// Looks up a live actor.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Mutable access to a live actor.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Live actors in slot order.
    #[must_use]
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter()
    }

    /// Removes an actor. Its projectiles keep flying.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(id)
    }

    /// Replaces an actor's input, returning whether the actor exists.
    ///
    /// The force and hold state persist until replaced; a release is
    /// consumed by the next tick.
    pub fn set_intent(&mut self, id: ActorId, intent: Intent) -> bool {
        self.actors
            .get_mut(id)
            .map(|actor| actor.intent = intent)
            .is_some()
    }

    /// Launches a projectile for `owner`.
    ///
    /// Returns `None` when the owner is gone, or when a hook is requested
    /// by an actor that cannot grapple or whose hook is busy.
    pub fn fire(
        &mut self,
        owner: ActorId,
        kind: ProjectileKind,
        stats: ProjectileStats,
        body: Body,
        layout: ShapeLayout,
        velocity: Vec2,
    ) -> Option<ProjectileId> {
        let actor = self.actors.get_mut(owner)?;
        if kind == ProjectileKind::Hook
            && !(actor.kind.can_grapple() && actor.hook.handle(HookEvent::Fired))
        {
            return None;
        }
        let team = actor.team();
        let layout = layout.with_vicinity_margin(self.params.vicinity_margin);
        let projectile = Projectile::new(kind, stats, owner, team, body, layout, velocity);
        Some(self.projectiles.insert(projectile))
    }

    /// Looks up a projectile still in flight.
    #[must_use]
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    /// Projectiles in flight, in slot order.
    #[must_use]
    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter()
    }

    /// Live debris bursts, oldest first.
    #[must_use]
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Events buffered since the last drain.
    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Removes and returns buffered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        self.events.drain().collect()
    }

    /// Adds `frame_seconds` of wall-clock time and runs every whole tick it
    /// completes, returning how many ran.
    pub fn advance(&mut self, frame_seconds: f32) -> u32 {
        self.clock.accumulate(frame_seconds);
        let ticks = self.clock.drain();
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    /// Interpolation fraction between the last two ticks.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// Runs one tick, buffering its events in the world's log.
    pub fn step(&mut self) {
        let mut log = std::mem::take(&mut self.events);
        self.step_into(&mut log);
        self.events = log;
    }

    /// Runs one tick, sending its events to `sink`.
    pub fn step_into(&mut self, sink: &mut dyn EventSink) {
        let dt = self.params.step_scale;

        for actor in self.actors.values_mut() {
            actor.shape.begin_tick();
            actor.body.apply_force(actor.intent.force);
        }

        self.integrate(dt);
        let resolutions = self.resolve_actors(sink);
        self.bounce_debris();
        self.resolve_projectiles(sink);
        self.update_hooks(dt, sink);
        self.apply_hazards(&resolutions, sink);
        self.report_grounding(sink);
        self.finish_tick();
    }

    fn integrate(&mut self, dt: f32) {
        for actor in self.actors.values_mut() {
            let grounded = actor.shape.was_grounded();
            actor.body.integrate(dt, grounded);
            actor.shape.sync(&actor.body);
        }
        for projectile in self.projectiles.values_mut() {
            projectile.integrate(dt);
        }
        for emitter in &mut self.emitters {
            emitter.integrate(dt);
        }
    }

    fn resolve_actors(&mut self, sink: &mut dyn EventSink) -> Vec<(ActorId, Resolution)> {
        let ctx = CollisionContext::new(&self.grid, &self.params);
        let mut resolutions = Vec::with_capacity(self.actors.len());
        for (id, actor) in &mut self.actors {
            let hazards = actor.kind.takes_hazard_damage();
            let resolution = ctx.resolve_body(&mut actor.body, &mut actor.shape, hazards);
            if let Some(side) = resolution.wall {
                sink.emit(PhysicsEvent::HitWall { actor: id, side });
            }
            resolutions.push((id, resolution));
        }
        resolutions
    }

    fn bounce_debris(&mut self) {
        let ctx = CollisionContext::new(&self.grid, &self.params);
        for emitter in &mut self.emitters {
            for particle in emitter.particles_mut() {
                ctx.bounce_particle(particle);
            }
        }
    }

    fn resolve_projectiles(&mut self, sink: &mut dyn EventSink) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().collect();
        for id in ids {
            self.projectile_vs_tiles(id, sink);
            self.projectile_vs_actors(id, sink);
        }
    }

    /// Resolves one projectile against the grid and applies its wear at
    /// once, so a cell cleared here is already empty for later projectiles.
    fn projectile_vs_tiles(&mut self, id: ProjectileId, sink: &mut dyn EventSink) {
        let Some(projectile) = self.projectiles.get(id) else {
            return;
        };
        if projectile.is_destroyed() && projectile.kind == ProjectileKind::Bullet {
            return;
        }
        let owner = projectile.owner;
        let kind = projectile.kind;
        let inherited = projectile.body.acceleration;
        let probing = kind == ProjectileKind::Hook
            && self
                .actors
                .get(owner)
                .is_some_and(|actor| actor.hook.state() == HookState::Probing);
        let impact =
            CollisionContext::new(&self.grid, &self.params).projectile_contact(projectile, probing);
        let expired = projectile.is_destroyed();

        for cell in impact.worn {
            if self.grid.wear(cell) == Some(Wear::Destroyed) {
                let position = self
                    .grid
                    .cells()
                    .get(cell)
                    .map_or(Vec2::ZERO, Cell::center);
                debug!("tile {cell} destroyed at {position}");
                sink.emit(PhysicsEvent::TileDestroyed { cell, position });
                self.emitters.push(Emitter::burst(
                    position,
                    inherited,
                    &self.debris_template,
                    &self.params.debris,
                    &mut self.rng,
                ));
            }
        }

        if probing {
            if let Some(anchor) = impact.anchor {
                self.anchor_hook(owner, anchor, sink);
            } else if impact.stopped || expired {
                if let Some(actor) = self.actors.get_mut(owner) {
                    actor.hook.handle(HookEvent::Missed);
                }
                sink.emit(PhysicsEvent::HookMissed { actor: owner });
            }
        }

        let spent =
            impact.stopped || impact.anchor.is_some() || (kind == ProjectileKind::Hook && !probing);
        if let Some(projectile) = self.projectiles.get_mut(id).filter(|_| spent) {
            projectile.destroy();
        }
    }

    fn anchor_hook(&mut self, owner: ActorId, anchor: Vec2, sink: &mut dyn EventSink) {
        let Some(actor) = self.actors.get_mut(owner) else {
            return;
        };
        let center = actor.shape.center();
        if actor.hook.attach(anchor, &actor.body, center) {
            debug!("{owner:?} anchored at {anchor}");
            sink.emit(PhysicsEvent::HookAnchored {
                actor: owner,
                anchor,
            });
        }
    }

    fn projectile_vs_actors(&mut self, id: ProjectileId, sink: &mut dyn EventSink) {
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return;
        };
        if projectile.kind == ProjectileKind::Hook || projectile.is_destroyed() {
            return;
        }
        for (target, actor) in &mut self.actors {
            if actor.team() == projectile.team
                || !projectile
                    .shape
                    .bounding_box
                    .overlaps(&actor.shape.hurtbox)
            {
                continue;
            }
            let damage = projectile.stats.base_damage;
            if actor.health.inflict(damage) != HitOutcome::Ignored {
                sink.emit(PhysicsEvent::ActorHit {
                    actor: target,
                    projectile: id,
                    damage,
                });
            }
            if !projectile.stats.persistent {
                projectile.destroy();
                break;
            }
        }
    }

    fn update_hooks(&mut self, dt: f32, sink: &mut dyn EventSink) {
        let ctx = CollisionContext::new(&self.grid, &self.params);
        for (id, actor) in &mut self.actors {
            if actor.intent.hook_released && actor.hook.break_free(BreakReason::Released) {
                sink.emit(PhysicsEvent::HookBroken {
                    actor: id,
                    reason: BreakReason::Released,
                });
            }
            let pull = actor.hook.pull(
                &mut actor.body,
                &mut actor.shape,
                actor.intent.hook_held,
                actor.intent.horizontal,
                dt,
                |probe| ctx.check_cell_collision(probe),
            );
            if let Pull::Broke(reason) = pull {
                sink.emit(PhysicsEvent::HookBroken { actor: id, reason });
            }
            actor.hook.settle();
        }
    }

    fn apply_hazards(&mut self, resolutions: &[(ActorId, Resolution)], sink: &mut dyn EventSink) {
        for &(id, resolution) in resolutions {
            let Some(hit) = resolution.hazard else {
                continue;
            };
            let Some(actor) = self.actors.get_mut(id) else {
                continue;
            };
            if actor.health.inflict(hit.damage) != HitOutcome::Ignored {
                sink.emit(PhysicsEvent::HazardContact {
                    actor: id,
                    kind: hit.kind,
                    damage: hit.damage,
                });
            }
        }
        for (id, actor) in &mut self.actors {
            if actor.health.is_dead() && !actor.death_reported {
                actor.death_reported = true;
                info!("{id:?} died");
                sink.emit(PhysicsEvent::Died { actor: id });
            }
        }
    }

    fn report_grounding(&self, sink: &mut dyn EventSink) {
        for (actor_id, actor) in &self.actors {
            match (actor.shape.was_grounded(), actor.grounded()) {
                (false, true) => sink.emit(PhysicsEvent::Grounded { actor: actor_id }),
                (true, false) => sink.emit(PhysicsEvent::LeftGround { actor: actor_id }),
                _ => {}
            }
        }
    }

    fn finish_tick(&mut self) {
        for actor in self.actors.values_mut() {
            actor.health.tick();
            actor.body.clear_forces();
            actor.intent.hook_released = false;
        }
        for projectile in self.projectiles.values_mut() {
            projectile.body.clear_forces();
        }
        self.projectiles.retain(|_, projectile| !projectile.is_destroyed());
        for emitter in &mut self.emitters {
            emitter.retire();
        }
        self.emitters.retain(|emitter| !emitter.is_empty());
        self.tick += 1;
    }
}
