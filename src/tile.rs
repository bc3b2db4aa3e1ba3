//! Tile kinds and the table mapping raw level ids onto them.
//!
//! Levels store one unsigned id per cell. What an id *means* is decided by a
//! [`TileLookup`], so the same resolver runs over any tileset once its ranges
//! are described.
use std::ops::RangeInclusive;

use hashbrown::HashMap;

/// Collision behaviour of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Nothing to collide with.
    Empty,
    /// Blocks on every side.
    Solid,
    /// Blocks only bodies falling onto its top edge.
    Platform,
    /// Never blocks; hurts whatever touches it.
    Spike,
    /// Like [`TileKind::Spike`] but lethal.
    DeathSpike,
    /// Blocks like solid ground; projectiles wear it down.
    Breakable,
    /// Blocks like solid ground; grapple hooks anchor to it.
    Hookable,
    /// Occupies the cell but takes no part in physics.
    Decorative,
}

impl TileKind {
    /// Returns whether the cell holds anything at all.
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Returns whether the tile stops bodies from every direction.
    #[must_use]
    pub const fn blocks(self) -> bool {
        matches!(self, Self::Solid | Self::Breakable | Self::Hookable)
    }

    /// Returns whether the tile can seal off a neighbour.
    ///
    /// Breakable tiles are excluded: a cell next to one may become reachable
    /// once the breakable is cleared.
    #[must_use]
    pub const fn encloses(self) -> bool {
        matches!(self, Self::Solid | Self::Hookable)
    }

    /// Returns whether touching the tile deals damage.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Spike | Self::DeathSpike)
    }
}

/// Maps raw tile ids onto [`TileKind`]s.
///
/// # Examples
/// ```
/// use tilebound::{TileKind, TileLookup};
/// let lookup = TileLookup::builder()
///     .range(1..=3, TileKind::Breakable)
///     .range(4..=4, TileKind::Solid)
///     .build();
/// assert_eq!(lookup.kind_of(2), Some(TileKind::Breakable));
/// assert_eq!(lookup.kind_of(0), Some(TileKind::Empty));
/// assert_eq!(lookup.kind_of(9), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLookup {
    kinds: HashMap<u32, TileKind>,
}

impl TileLookup {
    /// Starts an empty table. Id `0` always maps to [`TileKind::Empty`].
    #[must_use]
    pub fn builder() -> TileLookupBuilder {
        TileLookupBuilder::default()
    }

    /// Kind of the tile stored as `value`, or `None` when the id is unknown.
    #[must_use]
    pub fn kind_of(&self, value: u32) -> Option<TileKind> {
        if value == 0 {
            return Some(TileKind::Empty);
        }
        self.kinds.get(&value).copied()
    }

    /// Number of non-empty ids the table knows about.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns whether only the empty id is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for TileLookup {
    /// The stock 256-entry tileset.
    ///
    /// | ids | kind |
    /// |-----|------|
    /// | `1..=191` | solid |
    /// | `192..=207` | hookable |
    /// | `208..=223` | platform |
    /// | `224..=239` | decorative |
    /// | `240..=243` | breakable |
    /// | `244..=247` | spike |
    /// | `248..=251` | death spike |
    /// | `252..=255` | decorative |
    fn default() -> Self {
        Self::builder()
            .range(1..=191, TileKind::Solid)
            .range(192..=207, TileKind::Hookable)
            .range(208..=223, TileKind::Platform)
            .range(224..=239, TileKind::Decorative)
            .range(240..=243, TileKind::Breakable)
            .range(244..=247, TileKind::Spike)
            .range(248..=251, TileKind::DeathSpike)
            .range(252..=255, TileKind::Decorative)
            .build()
    }
}

/// Incrementally describes a [`TileLookup`].
#[derive(Debug, Default, Clone)]
pub struct TileLookupBuilder {
    kinds: HashMap<u32, TileKind>,
}

impl TileLookupBuilder {
    /// Maps every id in `ids` to `kind`. Later ranges override earlier ones;
    /// id `0` is ignored.
    #[must_use]
    pub fn range(mut self, ids: RangeInclusive<u32>, kind: TileKind) -> Self {
        self.kinds.extend(ids.filter(|id| *id != 0).map(|id| (id, kind)));
        self
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> TileLookup {
        TileLookup { kinds: self.kinds }
    }
}
