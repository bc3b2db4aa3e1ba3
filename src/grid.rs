//! The static tile grid a level is built from.
//!
//! Loading classifies every cell once: cells whose four neighbours are all
//! enclosing solids can never be reached and are left out of the active index
//! list the resolver walks. Each cell also records which of its sides face
//! open space, so sliding along a run of floor tiles never snags on the seams
//! between them.
use glam::Vec2;
use log::info;

use crate::error::GridError;
use crate::numeric::{floor_to_index, index_to_f32};
use crate::shape::Aabb;
use crate::tile::{TileKind, TileLookup};

crate::flag_set! {
    /// Sides of a cell not backed by a blocking neighbour.
    pub struct OpenFaces;
    /// One side of a cell.
    pub enum Face {
        /// The `-x` side.
        Left,
        /// The `+x` side.
        Right,
        /// The `-y` side.
        Top,
        /// The `+y` side.
        Bottom,
    }
}

/// One square of the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Raw tile id. Zero is empty.
    pub value: u32,
    /// Behaviour of the current `value`.
    pub kind: TileKind,
    /// World-space extent of the cell.
    pub bounding_box: Aabb,
    /// Whether all four neighbours are enclosing solids.
    pub surrounded: bool,
    /// Sides through which a body can reach the cell.
    pub open_faces: OpenFaces,
    /// Column index.
    pub column: usize,
    /// Row index.
    pub row: usize,
}

impl Cell {
    /// Centre of the cell in world space.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounding_box.center()
    }

    /// Returns whether `face` is exposed.
    #[must_use]
    pub const fn is_open(&self, face: Face) -> bool {
        self.open_faces.test(face)
    }
}

/// Effect of one projectile hit on a breakable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wear {
    /// The cell lost one point of durability and is still standing.
    Damaged {
        /// Id now stored in the cell.
        remaining: u32,
    },
    /// The cell was cleared.
    Destroyed,
}

/// Rectangular grid of cells, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<Cell>,
    active: Vec<usize>,
    lookup: TileLookup,
}

impl TileGrid {
    /// Builds a grid from rows of tile ids.
    ///
    /// # Errors
    /// Returns [`GridError`] when `rows` is empty or ragged, when an id is
    /// missing from `lookup`, or when `cell_size` is not a positive finite
    /// number.
    ///
    /// # Examples
    /// ```
    /// use tilebound::{TileGrid, TileLookup};
    /// let grid = TileGrid::from_rows(
    ///     &[[1, 1, 1], [1, 1, 1], [1, 1, 1]],
    ///     TileLookup::default(),
    ///     32.0,
    /// )
    /// .unwrap();
    /// assert!(grid.cell(1, 1).surrounded);
    /// assert_eq!(grid.active_indices().len(), 8);
    /// ```
    pub fn from_rows<R: AsRef<[u32]>>(
        rows: &[R],
        lookup: TileLookup,
        cell_size: f32,
    ) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        let columns = rows.first().map_or(0, |row| row.as_ref().len());
        if columns == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(columns * rows.len());
        for (row_index, ids) in rows.iter().map(AsRef::as_ref).enumerate() {
            if ids.len() != columns {
                return Err(GridError::Ragged {
                    row: row_index,
                    expected: columns,
                    found: ids.len(),
                });
            }
            for (column, &value) in ids.iter().enumerate() {
                let kind = lookup.kind_of(value).ok_or(GridError::UnknownTile {
                    value,
                    column,
                    row: row_index,
                })?;
                let origin = Vec2::new(index_to_f32(column), index_to_f32(row_index)) * cell_size;
                cells.push(Cell {
                    value,
                    kind,
                    bounding_box: Aabb::new(origin, Vec2::splat(cell_size)),
                    surrounded: false,
                    open_faces: OpenFaces::EMPTY,
                    column,
                    row: row_index,
                });
            }
        }

        let mut grid = Self {
            columns,
            rows: rows.len(),
            cell_size,
            cells,
            active: Vec::new(),
            lookup,
        };
        grid.check_neighbors();
        info!(
            "loaded {}x{} grid, {} of {} cells active",
            grid.columns,
            grid.rows,
            grid.active.len(),
            grid.cells.len()
        );
        Ok(grid)
    }

    /// Builds a grid from comma-separated rows, see [`parse_csv`].
    ///
    /// # Errors
    /// Returns [`GridError`] on malformed text or any error from
    /// [`TileGrid::from_rows`].
    pub fn from_csv(text: &str, lookup: TileLookup, cell_size: f32) -> Result<Self, GridError> {
        Self::from_rows(&parse_csv(text)?, lookup, cell_size)
    }

    /// Classifies every cell and rebuilds the active index list.
    fn check_neighbors(&mut self) {
        let classified: Vec<(bool, OpenFaces)> = self
            .cells
            .iter()
            .map(|cell| {
                let surrounded = self
                    .neighbours(cell.column, cell.row)
                    .iter()
                    .all(|(_, neighbour)| self.kind_at(*neighbour).is_some_and(TileKind::encloses));
                (surrounded, self.faces_of(cell.column, cell.row))
            })
            .collect();
        for (cell, (surrounded, faces)) in self.cells.iter_mut().zip(classified) {
            cell.surrounded = surrounded;
            cell.open_faces = faces;
        }
        self.active = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.kind.is_occupied() && !cell.surrounded)
            .map(|(index, _)| index)
            .collect();
    }

    fn kind_at(&self, index: Option<usize>) -> Option<TileKind> {
        index
            .and_then(|i| self.cells.get(i))
            .map(|cell| cell.kind)
    }

    fn faces_of(&self, column: usize, row: usize) -> OpenFaces {
        let mut faces = OpenFaces::EMPTY;
        for (face, neighbour) in self.neighbours(column, row) {
            if !self.kind_at(neighbour).is_some_and(TileKind::blocks) {
                faces.set(face);
            }
        }
        faces
    }

    /// Indices of the four edge neighbours; `None` outside the grid.
    fn neighbours(&self, column: usize, row: usize) -> [(Face, Option<usize>); 4] {
        let at = |x: Option<usize>, y: Option<usize>| match (x, y) {
            (Some(x_at), Some(y_at)) if x_at < self.columns && y_at < self.rows => {
                Some(y_at * self.columns + x_at)
            }
            _ => None,
        };
        [
            (Face::Left, at(column.checked_sub(1), Some(row))),
            (Face::Right, at(column.checked_add(1), Some(row))),
            (Face::Top, at(Some(column), row.checked_sub(1))),
            (Face::Bottom, at(Some(column), row.checked_add(1))),
        ]
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Side length of one cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space size of the whole grid.
    #[must_use]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(index_to_f32(self.columns), index_to_f32(self.rows)) * self.cell_size
    }

    /// Table used to classify ids.
    #[must_use]
    pub const fn lookup(&self) -> &TileLookup {
        &self.lookup
    }

    /// Every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Occupied, non-surrounded cells in ascending index order.
    #[must_use]
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    /// Every occupied cell, surrounded or not, in ascending index order.
    #[must_use]
    pub fn occupied_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.kind.is_occupied())
            .map(|(index, _)| index)
            .collect()
    }

    /// Row-major index of `(column, row)`.
    ///
    /// # Panics
    /// Panics when the coordinates fall outside the grid.
    #[must_use]
    pub fn index_of(&self, column: usize, row: usize) -> usize {
        assert!(
            column < self.columns && row < self.rows,
            "cell ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        row * self.columns + column
    }

    /// Cell at `(column, row)`.
    ///
    /// # Panics
    /// Panics when the coordinates fall outside the grid.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> &Cell {
        self.cell_at(self.index_of(column, row))
    }

    /// Cell at a row-major `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of range.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or_else(|| {
            panic!("cell index {index} outside grid of {} cells", self.cells.len())
        })
    }

    /// Cell covering a world-space point, if the point lies on the grid.
    #[must_use]
    pub fn cell_containing(&self, point: Vec2) -> Option<&Cell> {
        let column = floor_to_index(point.x / self.cell_size)?;
        let row = floor_to_index(point.y / self.cell_size)?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Takes one point of durability from a breakable cell.
    ///
    /// Returns `None` when the cell is not breakable. A cell whose next id
    /// no longer maps to a breakable tile is cleared, and its neighbours'
    /// open sides are recomputed.
    pub(crate) fn wear(&mut self, index: usize) -> Option<Wear> {
        let (column, row, next) = {
            let cell = self.cells.get(index)?;
            if cell.kind != TileKind::Breakable {
                return None;
            }
            (cell.column, cell.row, cell.value.saturating_sub(1))
        };
        let still_breakable = self.lookup.kind_of(next) == Some(TileKind::Breakable);
        let cell = self.cells.get_mut(index)?;
        if still_breakable {
            cell.value = next;
            return Some(Wear::Damaged { remaining: next });
        }
        cell.value = 0;
        cell.kind = TileKind::Empty;
        for adjacent in self
            .neighbours(column, row)
            .into_iter()
            .filter_map(|(_, neighbour)| neighbour)
        {
            let faces = self.faces_of_index(adjacent);
            if let Some(target) = self.cells.get_mut(adjacent) {
                target.open_faces = faces;
            }
        }
        Some(Wear::Destroyed)
    }

    fn faces_of_index(&self, index: usize) -> OpenFaces {
        self.cells
            .get(index)
            .map_or(OpenFaces::EMPTY, |cell| self.faces_of(cell.column, cell.row))
    }
}

/// Parses comma-separated tile ids, one grid row per non-blank line.
///
/// # Errors
/// Returns [`GridError::Malformed`] for any token that is not an unsigned
/// integer.
///
/// # Examples
/// ```
/// let rows = tilebound::grid::parse_csv("0,1\n1, 1\n").unwrap();
/// assert_eq!(rows, vec![vec![0, 1], vec![1, 1]]);
/// ```
pub fn parse_csv(text: &str) -> Result<Vec<Vec<u32>>, GridError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            line.split(',')
                .map(|token| {
                    token.trim().parse::<u32>().map_err(|_| GridError::Malformed {
                        line: number + 1,
                        token: token.trim().to_owned(),
                    })
                })
                .collect::<Result<Vec<u32>, _>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn room() -> TileGrid {
        TileGrid::from_rows(
            &[
                [1, 1, 1, 1],
                [1, 0, 0, 1],
                [1, 1, 1, 1],
                [1, 1, 1, 1],
            ],
            TileLookup::default(),
            32.0,
        )
        .expect("valid grid")
    }

    #[rstest]
    fn boundary_cells_are_never_surrounded(room: TileGrid) {
        for cell in room.cells() {
            if cell.column == 0 || cell.row == 0 || cell.column == 3 || cell.row == 3 {
                assert!(!cell.surrounded, "({}, {})", cell.column, cell.row);
            }
        }
    }

    #[rstest]
    fn cells_beside_open_space_stay_active(room: TileGrid) {
        assert!(!room.cell(1, 2).surrounded);
        let index = room.index_of(1, 2);
        assert!(room.active_indices().contains(&index));
    }

    #[rstest]
    fn empty_cells_are_inactive(room: TileGrid) {
        let index = room.index_of(1, 1);
        assert!(!room.active_indices().contains(&index));
    }

    #[rstest]
    fn fully_enclosed_cell_is_pruned() {
        let grid = TileGrid::from_rows(&[[1, 1, 1], [1, 1, 1], [1, 1, 1]], TileLookup::default(), 8.0)
            .expect("valid grid");
        assert!(grid.cell(1, 1).surrounded);
        assert!(!grid.active_indices().contains(&grid.index_of(1, 1)));
        assert_eq!(grid.occupied_indices().len(), 9);
    }

    #[rstest]
    fn breakable_neighbours_do_not_enclose() {
        let grid = TileGrid::from_rows(&[[1, 240, 1], [1, 1, 1], [1, 1, 1]], TileLookup::default(), 8.0)
            .expect("valid grid");
        assert!(!grid.cell(1, 1).surrounded);
    }

    #[rstest]
    fn floor_seams_are_closed(room: TileGrid) {
        let floor = room.cell(1, 2);
        assert!(floor.is_open(Face::Top));
        assert!(!floor.is_open(Face::Left));
        assert!(!floor.is_open(Face::Right));
    }

    #[rstest]
    fn cell_boxes_follow_grid_coordinates(room: TileGrid) {
        let cell = room.cell(2, 1);
        assert_eq!(cell.bounding_box, Aabb::new(Vec2::new(64.0, 32.0), Vec2::splat(32.0)));
        assert_eq!(room.world_size(), Vec2::splat(128.0));
    }

    #[rstest]
    #[case(Vec2::new(40.0, 40.0), Some((1, 1)))]
    #[case(Vec2::new(-1.0, 40.0), None)]
    #[case(Vec2::new(40.0, 200.0), None)]
    fn point_lookup(room: TileGrid, #[case] point: Vec2, #[case] expected: Option<(usize, usize)>) {
        let found = room.cell_containing(point).map(|cell| (cell.column, cell.row));
        assert_eq!(found, expected);
    }

    #[rstest]
    #[should_panic(expected = "outside")]
    fn indexing_outside_the_grid_panics(room: TileGrid) {
        let _ = room.cell(4, 0);
    }

    #[rstest]
    fn wear_counts_down_then_clears() {
        let mut grid = TileGrid::from_rows(&[[1, 242, 1]], TileLookup::default(), 8.0).expect("valid grid");
        assert_eq!(grid.wear(1), Some(Wear::Damaged { remaining: 241 }));
        assert_eq!(grid.wear(1), Some(Wear::Damaged { remaining: 240 }));
        assert_eq!(grid.wear(1), Some(Wear::Destroyed));
        assert_eq!(grid.cell_at(1).kind, TileKind::Empty);
        assert_eq!(grid.wear(1), None);
        assert!(grid.cell_at(0).is_open(Face::Right));
    }

    #[rstest]
    fn solid_cells_do_not_wear(mut room: TileGrid) {
        assert_eq!(room.wear(0), None);
    }

    #[rstest]
    fn rejects_empty_input() {
        let no_rows: [[u32; 1]; 0] = [];
        assert_eq!(
            TileGrid::from_rows(&no_rows, TileLookup::default(), 32.0),
            Err(GridError::Empty)
        );
        assert_eq!(
            TileGrid::from_rows(&[[0_u32; 0]], TileLookup::default(), 32.0),
            Err(GridError::Empty)
        );
    }

    #[rstest]
    fn rejects_ragged_rows() {
        let rows: Vec<Vec<u32>> = vec![vec![1, 1], vec![1]];
        assert_eq!(
            TileGrid::from_rows(&rows, TileLookup::default(), 32.0),
            Err(GridError::Ragged { row: 1, expected: 2, found: 1 })
        );
    }

    #[rstest]
    fn rejects_unknown_ids() {
        let lookup = TileLookup::builder().range(1..=1, TileKind::Solid).build();
        assert_eq!(
            TileGrid::from_rows(&[[0, 7]], lookup, 32.0),
            Err(GridError::UnknownTile { value: 7, column: 1, row: 0 })
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(f32::NAN)]
    fn rejects_bad_cell_sizes(#[case] size: f32) {
        assert!(matches!(
            TileGrid::from_rows(&[[1]], TileLookup::default(), size),
            Err(GridError::InvalidCellSize(_))
        ));
    }

    #[rstest]
    fn csv_reports_the_offending_token() {
        assert_eq!(
            parse_csv("1,1\n1,x\n"),
            Err(GridError::Malformed { line: 2, token: "x".to_owned() })
        );
    }

    #[rstest]
    fn csv_grid_matches_row_grid() {
        let from_csv = TileGrid::from_csv("1,0\n\n1,1\n", TileLookup::default(), 16.0).expect("valid csv");
        let from_rows = TileGrid::from_rows(&[[1, 0], [1, 1]], TileLookup::default(), 16.0).expect("valid rows");
        assert_eq!(from_csv, from_rows);
    }
}
