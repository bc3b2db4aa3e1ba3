//! Axis-aligned collision geometry derived from a body's position.
//!
//! A [`Shape`] is never authoritative: every box it carries is recomputed from
//! the owning [`Body`] each tick. The primary box resolves against solid
//! tiles, the hurt box takes damage, the vicinity box is a cheap early-out,
//! and the predictive box spans the motion of the last step so a fast body
//! cannot skip through a thin wall.
use glam::Vec2;

use crate::body::Body;
use crate::constants::VICINITY_MARGIN;

/// Axis-aligned box stored as top-left corner plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Top-left corner.
    pub position: Vec2,
    /// Width and height.
    pub dimensions: Vec2,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(position: Vec2, dimensions: Vec2) -> Self {
        Self {
            position,
            dimensions,
        }
    }

    /// Smallest x coordinate.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.position.x
    }

    /// Largest x coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.position.x + self.dimensions.x
    }

    /// Smallest y coordinate.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.position.y
    }

    /// Largest y coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.dimensions.y
    }

    /// Geometric centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.dimensions * 0.5
    }

    /// Returns a copy moved so its top-left corner sits at `position`.
    #[must_use]
    pub const fn at(&self, position: Vec2) -> Self {
        Self::new(position, self.dimensions)
    }

    /// Returns whether the interiors of both boxes intersect.
    ///
    /// Boxes that merely share an edge do not overlap, so a body resting on a
    /// floor tile is not in collision with it.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns whether `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min = self.position.min(other.position);
        let max = Vec2::new(self.right().max(other.right()), self.bottom().max(other.bottom()));
        Self::new(min, max - min)
    }

    /// Returns the box grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.position - Vec2::splat(margin),
            self.dimensions + Vec2::splat(margin * 2.0),
        )
    }

    /// Per-axis distance between the boxes' edges; zero on an axis where
    /// their projections overlap.
    #[must_use]
    pub fn gap(&self, other: &Self) -> Vec2 {
        let gap_x = self.left().max(other.left()) - self.right().min(other.right());
        let gap_y = self.top().max(other.top()) - self.bottom().min(other.bottom());
        Vec2::new(gap_x.max(0.0), gap_y.max(0.0))
    }

    /// Minimum translation vector moving `self` out of `other`.
    ///
    /// Returns `None` when the boxes do not overlap. The vector lies along the
    /// axis of smaller penetration; on an exact tie the vertical axis wins, so
    /// a body clipping a corner lands on the tile rather than sliding off it.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use tilebound::Aabb;
    /// let body = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    /// let floor = Aabb::new(Vec2::new(-20.0, 8.0), Vec2::new(50.0, 32.0));
    /// assert_eq!(body.mtv(&floor), Some(Vec2::new(0.0, -2.0)));
    /// ```
    #[must_use]
    pub fn mtv(&self, other: &Self) -> Option<Vec2> {
        let overlap_x = self.right().min(other.right()) - self.left().max(other.left());
        let overlap_y = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return None;
        }
        let away = self.center() - other.center();
        let push = |overlap: f32, direction: f32| {
            if direction < 0.0 {
                -overlap
            } else {
                overlap
            }
        };
        if overlap_x < overlap_y {
            Some(Vec2::new(push(overlap_x, away.x), 0.0))
        } else {
            Some(Vec2::new(0.0, push(overlap_y, away.y)))
        }
    }

    /// Earliest time in `[0, 1]` at which `self`, moving by `displacement`,
    /// first touches `other`, with the contact normal pointing back along
    /// the motion.
    ///
    /// Returns `None` when the path misses `other` or the boxes already
    /// overlap at the start. When both axes enter at the same instant the
    /// vertical axis is reported.
    #[must_use]
    pub fn sweep(&self, displacement: Vec2, other: &Self) -> Option<(f32, Vec2)> {
        let (entry_x, exit_x) = slab(
            (self.left(), self.right()),
            (other.left(), other.right()),
            displacement.x,
        )?;
        let (entry_y, exit_y) = slab(
            (self.top(), self.bottom()),
            (other.top(), other.bottom()),
            displacement.y,
        )?;
        let entry = entry_x.max(entry_y);
        if entry >= exit_x.min(exit_y) || !(0.0..=1.0).contains(&entry) {
            return None;
        }
        let normal = if entry_x > entry_y {
            Vec2::new(-displacement.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, -displacement.y.signum())
        };
        Some((entry, normal))
    }
}

/// Entry and exit times of a moving interval against a fixed one.
fn slab(moving: (f32, f32), fixed: (f32, f32), delta: f32) -> Option<(f32, f32)> {
    if delta.abs() <= f32::EPSILON {
        let overlapping = moving.1 > fixed.0 && moving.0 < fixed.1;
        return overlapping.then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let near = (fixed.0 - moving.1) / delta;
    let far = (fixed.1 - moving.0) / delta;
    Some((near.min(far), near.max(far)))
}

crate::flag_set! {
    /// Contact state raised by collision resolution during one tick.
    pub struct ContactFlags;
    /// Individual contact conditions.
    pub enum Contact {
        /// Solid geometry stopped the body on its left side.
        LeftCollision,
        /// Solid geometry stopped the body on its right side.
        RightCollision,
        /// The body hit a ceiling.
        TopCollision,
        /// The body hit a floor.
        BottomCollision,
        /// The body is standing on something.
        Grounded,
        /// A wall stopped horizontal motion; dashes end on this.
        DashCancel,
    }
}

/// Fixed box layout of an entity, relative to its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeLayout {
    /// Size of the primary box.
    pub dimensions: Vec2,
    /// Offset of the hurt box from the primary box's corner.
    pub hurtbox_offset: Vec2,
    /// Size of the hurt box.
    pub hurtbox_dimensions: Vec2,
    /// Margin between the predictive box and the vicinity box.
    pub vicinity_margin: f32,
}

impl ShapeLayout {
    /// Layout whose hurt box matches the primary box.
    #[must_use]
    pub const fn uniform(dimensions: Vec2) -> Self {
        Self {
            dimensions,
            hurtbox_offset: Vec2::ZERO,
            hurtbox_dimensions: dimensions,
            vicinity_margin: VICINITY_MARGIN,
        }
    }

    /// Returns the layout with a different vicinity margin.
    #[must_use]
    pub const fn with_vicinity_margin(mut self, margin: f32) -> Self {
        self.vicinity_margin = margin;
        self
    }

    /// Returns the layout with a hurt box inset by `inset` on every side.
    #[must_use]
    pub fn with_hurtbox_inset(mut self, inset: Vec2) -> Self {
        self.hurtbox_offset = inset;
        self.hurtbox_dimensions = (self.dimensions - inset * 2.0).max(Vec2::ZERO);
        self
    }
}

/// The set of boxes derived from one body.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Box resolved against solid geometry.
    pub bounding_box: Aabb,
    /// Box that receives damage.
    pub hurtbox: Aabb,
    /// Oversized box used to reject distant cells cheaply.
    pub vicinity: Aabb,
    /// Box spanning the last step's motion.
    pub predictive: Aabb,
    /// Contact raised during the current tick.
    pub flags: ContactFlags,
    was_grounded: bool,
    layout: ShapeLayout,
}

impl Shape {
    /// Creates a shape at the origin.
    #[must_use]
    pub fn new(layout: ShapeLayout) -> Self {
        let mut shape = Self {
            bounding_box: Aabb::new(Vec2::ZERO, layout.dimensions),
            hurtbox: Aabb::new(layout.hurtbox_offset, layout.hurtbox_dimensions),
            vicinity: Aabb::default(),
            predictive: Aabb::default(),
            flags: ContactFlags::EMPTY,
            was_grounded: false,
            layout,
        };
        shape.set_position(Vec2::ZERO);
        shape
    }

    /// Box layout this shape was built from.
    #[must_use]
    pub const fn layout(&self) -> &ShapeLayout {
        &self.layout
    }

    /// Size of the primary box.
    #[must_use]
    pub const fn dimensions(&self) -> Vec2 {
        self.layout.dimensions
    }

    /// Centre of the primary box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounding_box.center()
    }

    /// Recentres every derived box on `position` with no motion span.
    pub fn set_position(&mut self, position: Vec2) {
        self.bounding_box = self.bounding_box.at(position);
        self.hurtbox = self.hurtbox.at(position + self.layout.hurtbox_offset);
        self.predictive = self.bounding_box;
        self.vicinity = self.predictive.expanded(self.layout.vicinity_margin);
    }

    /// Rebuilds every box from `body`, spanning its last step of motion.
    pub fn sync(&mut self, body: &Body) {
        self.bounding_box = self.bounding_box.at(body.position);
        self.hurtbox = self.hurtbox.at(body.position + self.layout.hurtbox_offset);
        self.predictive = self
            .bounding_box
            .at(body.previous_position)
            .union(&self.bounding_box);
        self.vicinity = self.predictive.expanded(self.layout.vicinity_margin);
    }

    /// Box spanning the current primary box and the box at `candidate`.
    #[must_use]
    pub fn predict_at(&self, candidate: Vec2) -> Aabb {
        self.bounding_box.union(&self.bounding_box.at(candidate))
    }

    /// Starts a tick: remembers whether the body was grounded and lowers
    /// every contact flag.
    pub fn begin_tick(&mut self) {
        self.was_grounded = self.flags.test(Contact::Grounded);
        self.flags.clear();
    }

    /// Whether the body was grounded at the end of the previous tick.
    #[must_use]
    pub const fn was_grounded(&self) -> bool {
        self.was_grounded
    }

    /// Whether the body is grounded this tick.
    #[must_use]
    pub const fn grounded(&self) -> bool {
        self.flags.test(Contact::Grounded)
    }
}
