//! Broad- and narrow-phase collision between bodies and the tile grid.
//!
//! A [`CollisionContext`] bundles everything resolution needs for one pass:
//! the grid, world tuning and the candidate cell list. Candidates default to
//! the grid's active indices; passing every occupied cell instead must give
//! identical results for any body that starts outside solid geometry.
//!
//! For each candidate the resolver first applies a cheap per-axis distance
//! check, then the vicinity box, and only then the exact test. A body whose
//! primary box overlaps a cell is pushed out along the shallower axis whose
//! cell face is open; a body whose last step carried it through a cell
//! without ending inside it is put back on the side it entered from. Any
//! push-out is followed by overlap-only passes, since moving out of one cell
//! can move the body into a neighbour that was already visited.
use glam::Vec2;

use crate::body::Body;
use crate::events::WallSide;
use crate::grid::{Cell, Face, TileGrid};
use crate::params::WorldParams;
use crate::particles::Particle;
use crate::projectile::{Projectile, ProjectileKind};
use crate::shape::{Aabb, Contact, Shape};
use crate::tile::TileKind;

/// Damage dealt by the worst hazard touched in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardHit {
    /// Hazard kind.
    pub kind: TileKind,
    /// Damage it deals.
    pub damage: u32,
}

/// Summary of one body's resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Number of cells the body was pushed out of.
    pub corrections: u32,
    /// Side of the last wall that stopped the body.
    pub wall: Option<WallSide>,
    /// Worst hazard the hurt box touched.
    pub hazard: Option<HazardHit>,
}

impl Resolution {
    fn note_hazard(&mut self, hit: HazardHit) {
        if self.hazard.is_none_or(|worst| hit.damage > worst.damage) {
            self.hazard = Some(hit);
        }
    }
}

/// Resolution passes per body per tick, the first being the swept one.
const MAX_PASSES: u32 = 4;

/// What a projectile's swept box touched on the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileImpact {
    /// Breakable cells to wear, in ascending index order.
    pub worn: Vec<usize>,
    /// Centre of the first hookable cell touched by a probing hook.
    pub anchor: Option<Vec2>,
    /// Whether a blocking tile stopped the projectile.
    pub stopped: bool,
}

/// Returns whether `cell` is within `threshold` of `body` on both axes.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use tilebound::{resolver::nearby, Aabb};
/// let cell = Aabb::new(Vec2::new(64.0, 0.0), Vec2::splat(32.0));
/// let body = Aabb::new(Vec2::ZERO, Vec2::splat(16.0));
/// assert!(nearby(&cell, &body, 64.0));
/// assert!(!nearby(&cell, &body, 48.0));
/// ```
#[must_use]
pub fn nearby(cell: &Aabb, body: &Aabb, threshold: f32) -> bool {
    let gap = cell.gap(body);
    gap.x < threshold && gap.y < threshold
}

/// References needed to resolve collisions for one pass.
#[derive(Debug, Clone, Copy)]
pub struct CollisionContext<'a> {
    grid: &'a TileGrid,
    params: &'a WorldParams,
    candidates: &'a [usize],
}

impl<'a> CollisionContext<'a> {
    /// Context testing the grid's active cells.
    #[must_use]
    pub fn new(grid: &'a TileGrid, params: &'a WorldParams) -> Self {
        Self {
            grid,
            params,
            candidates: grid.active_indices(),
        }
    }

    /// Returns the context testing `candidates` instead of the active set.
    #[must_use]
    pub const fn with_candidates(mut self, candidates: &'a [usize]) -> Self {
        self.candidates = candidates;
        self
    }

    fn cells(&self) -> impl Iterator<Item = (usize, &'a Cell)> + '_ {
        let cells = self.grid.cells();
        self.candidates
            .iter()
            .filter_map(move |&index| cells.get(index).map(|cell| (index, cell)))
    }

    /// Resolves `body` against every candidate cell, updating its position,
    /// velocity and contact flags and re-syncing `shape`.
    ///
    /// When `hazards` is set, hazard cells touching the hurt box are
    /// reported in the returned [`Resolution`]; applying their damage is
    /// left to the caller.
    pub fn resolve_body(&self, body: &mut Body, shape: &mut Shape, hazards: bool) -> Resolution {
        let mut resolution = Resolution::default();
        self.sweep_pass(body, shape, hazards, &mut resolution);
        // A push-out can land the body in a cell the sweep already passed
        // over, so leftover overlaps are separated until none remain.
        for _ in 1..MAX_PASSES {
            let before = resolution.corrections;
            if before == 0 {
                break;
            }
            self.overlap_pass(body, shape, &mut resolution);
            if resolution.corrections == before {
                break;
            }
        }
        resolution
    }

    fn sweep_pass(
        &self,
        body: &mut Body,
        shape: &mut Shape,
        hazards: bool,
        resolution: &mut Resolution,
    ) {
        let threshold = self.params.proximity();
        for (_, cell) in self.cells() {
            if !nearby(&cell.bounding_box, &shape.predictive, threshold) {
                continue;
            }
            if hazards && cell.kind.is_hazard() && shape.hurtbox.overlaps(&cell.bounding_box) {
                resolution.note_hazard(HazardHit {
                    kind: cell.kind,
                    damage: self.hazard_damage(cell.kind),
                });
            }
            if !shape.vicinity.overlaps(&cell.bounding_box) {
                continue;
            }
            let face = if cell.kind.blocks() {
                solid_contact(body, shape, cell)
            } else if cell.kind == TileKind::Platform {
                platform_contact(body, shape, cell)
            } else {
                None
            };
            if let Some(hit) = face {
                push_out(body, shape, cell, hit, resolution);
            }
        }
    }

    fn overlap_pass(&self, body: &mut Body, shape: &mut Shape, resolution: &mut Resolution) {
        let threshold = self.params.proximity();
        for (_, cell) in self.cells() {
            if !nearby(&cell.bounding_box, &shape.predictive, threshold)
                || !shape.bounding_box.overlaps(&cell.bounding_box)
            {
                continue;
            }
            let face = if cell.kind.blocks() {
                Some(penetration_face(&shape.bounding_box, cell))
            } else if cell.kind == TileKind::Platform {
                platform_contact(body, shape, cell)
            } else {
                None
            };
            if let Some(hit) = face {
                push_out(body, shape, cell, hit, resolution);
            }
        }
    }

    fn hazard_damage(&self, kind: TileKind) -> u32 {
        match kind {
            TileKind::DeathSpike => self.params.death_spike_damage,
            TileKind::Spike => self.params.spike_damage,
            _ => 0,
        }
    }

    /// Returns whether `probe` overlaps any blocking candidate cell.
    #[must_use]
    pub fn check_cell_collision(&self, probe: &Aabb) -> bool {
        let threshold = self.params.proximity();
        self.cells().any(|(_, cell)| {
            cell.kind.blocks()
                && nearby(&cell.bounding_box, probe, threshold)
                && probe.overlaps(&cell.bounding_box)
        })
    }

    /// Bounces a debris particle off every blocking cell it overlaps.
    pub fn bounce_particle(&self, particle: &mut Particle) {
        let threshold = self.params.proximity();
        for (_, cell) in self.cells() {
            if !cell.kind.blocks() || !nearby(&cell.bounding_box, &particle.shape.bounding_box, threshold) {
                continue;
            }
            if let Some(mtv) = particle.shape.bounding_box.mtv(&cell.bounding_box) {
                particle.bounce(mtv);
            }
        }
    }

    /// Reports what `projectile` touched this tick.
    ///
    /// Platforms, hazards and decorative tiles let projectiles through.
    /// Transcendent projectiles pass everything and wear nothing. A hook
    /// only anchors while `probing`.
    #[must_use]
    pub fn projectile_contact(&self, projectile: &Projectile, probing: bool) -> TileImpact {
        let mut impact = TileImpact::default();
        let threshold = self.params.proximity();
        let swept = &projectile.shape.predictive;
        for (index, cell) in self.cells() {
            if !cell.kind.is_occupied()
                || !nearby(&cell.bounding_box, swept, threshold)
                || !swept.overlaps(&cell.bounding_box)
            {
                continue;
            }
            if !cell.kind.blocks() || projectile.stats.transcendent {
                continue;
            }
            impact.stopped = true;
            if cell.kind == TileKind::Breakable {
                impact.worn.push(index);
            }
            if projectile.kind == ProjectileKind::Hook
                && probing
                && cell.kind == TileKind::Hookable
                && impact.anchor.is_none()
            {
                impact.anchor = Some(cell.center());
            }
        }
        impact
    }
}

/// Face of `cell` a solid contact should push `body` through, if any.
///
/// A body that entered the cell during its last step is put back on the
/// side it came from; one that was already inside is pushed out along the
/// shallower open axis.
fn solid_contact(body: &Body, shape: &Shape, cell: &Cell) -> Option<Face> {
    let previous = shape.bounding_box.at(body.previous_position);
    if !previous.overlaps(&cell.bounding_box) && shape.predictive.overlaps(&cell.bounding_box) {
        if let Some(face) = swept_face(&previous, body.position - body.previous_position, cell) {
            return Some(face);
        }
    }
    shape
        .bounding_box
        .overlaps(&cell.bounding_box)
        .then(|| penetration_face(&shape.bounding_box, cell))
}

/// Face a box moving by `displacement` enters `cell` through.
///
/// Entry through a seam shared with another blocking cell is reported on
/// the other axis instead, provided the motion runs into the cell there.
fn swept_face(previous: &Aabb, displacement: Vec2, cell: &Cell) -> Option<Face> {
    let (_, normal) = previous.sweep(displacement, &cell.bounding_box)?;
    let face = normal_face(normal);
    if cell.is_open(face) {
        return Some(face);
    }
    let alternative = if normal.x.abs() > 0.0 {
        vertical_face(displacement.y)
    } else {
        horizontal_face(displacement.x)
    };
    Some(alternative.filter(|other| cell.is_open(*other)).unwrap_or(face))
}

fn vertical_face(delta: f32) -> Option<Face> {
    if delta > 0.0 {
        Some(Face::Top)
    } else if delta < 0.0 {
        Some(Face::Bottom)
    } else {
        None
    }
}

fn horizontal_face(delta: f32) -> Option<Face> {
    if delta > 0.0 {
        Some(Face::Left)
    } else if delta < 0.0 {
        Some(Face::Right)
    } else {
        None
    }
}

/// One-way platforms only catch bodies that were above them and are not
/// rising.
fn platform_contact(body: &Body, shape: &Shape, cell: &Cell) -> Option<Face> {
    const TOLERANCE: f32 = 1.0e-3;
    let previous_bottom = body.previous_position.y + shape.dimensions().y;
    if body.velocity.y < 0.0 || previous_bottom > cell.bounding_box.top() + TOLERANCE {
        return None;
    }
    let crossed = shape.bounding_box.overlaps(&cell.bounding_box)
        || shape
            .bounding_box
            .at(body.previous_position)
            .sweep(body.position - body.previous_position, &cell.bounding_box)
            .is_some_and(|(_, normal)| normal_face(normal) == Face::Top);
    crossed.then_some(Face::Top)
}

/// Picks the face to push through for an overlapping box.
///
/// The shallower axis wins as long as its face is open; seams between
/// adjacent blocking cells are skipped. Vertical wins exact ties.
fn penetration_face(bounds: &Aabb, cell: &Cell) -> Face {
    let other = &cell.bounding_box;
    let overlap_x = bounds.right().min(other.right()) - bounds.left().max(other.left());
    let overlap_y = bounds.bottom().min(other.bottom()) - bounds.top().max(other.top());
    let away = bounds.center() - other.center();
    let x_face = if away.x < 0.0 { Face::Left } else { Face::Right };
    let y_face = if away.y < 0.0 { Face::Top } else { Face::Bottom };
    let prefer_x = match (cell.is_open(x_face), cell.is_open(y_face)) {
        (true, false) => true,
        (false, true) => false,
        _ => overlap_x < overlap_y,
    };
    if prefer_x {
        x_face
    } else {
        y_face
    }
}

fn normal_face(normal: Vec2) -> Face {
    if normal.y < 0.0 {
        Face::Top
    } else if normal.y > 0.0 {
        Face::Bottom
    } else if normal.x < 0.0 {
        Face::Left
    } else {
        Face::Right
    }
}

/// Snaps the body flush against `face` of `cell` and records the contact.
fn push_out(body: &mut Body, shape: &mut Shape, cell: &Cell, face: Face, resolution: &mut Resolution) {
    let other = &cell.bounding_box;
    let size = shape.dimensions();
    match face {
        Face::Top => {
            body.position.y = other.top() - size.y;
            body.velocity.y = body.velocity.y.min(0.0);
            shape.flags.set(Contact::BottomCollision);
            shape.flags.set(Contact::Grounded);
        }
        Face::Bottom => {
            body.position.y = other.bottom();
            body.velocity.y = body.velocity.y.max(0.0);
            shape.flags.set(Contact::TopCollision);
        }
        Face::Left => {
            body.position.x = other.left() - size.x;
            body.velocity.x = body.velocity.x.min(0.0);
            shape.flags.set(Contact::RightCollision);
            shape.flags.set(Contact::DashCancel);
            resolution.wall = Some(WallSide::Right);
        }
        Face::Right => {
            body.position.x = other.right();
            body.velocity.x = body.velocity.x.max(0.0);
            shape.flags.set(Contact::LeftCollision);
            shape.flags.set(Contact::DashCancel);
            resolution.wall = Some(WallSide::Left);
        }
    }
    resolution.corrections += 1;
    shape.sync(body);
}
