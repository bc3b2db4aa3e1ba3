//! ASCII level builders.
use tilebound::{GridError, TileGrid, TileLookup};

/// Tile id stored for each level glyph.
///
/// | glyph | tile |
/// |-------|------|
/// | `.`   | empty |
/// | `#`   | solid |
/// | `=`   | platform |
/// | `^`   | spike |
/// | `X`   | death spike |
/// | `B`   | breakable, full durability |
/// | `b`   | breakable, one hit left |
/// | `H`   | hookable |
/// | `~`   | decorative |
///
/// Returns `None` for any other character.
pub const fn glyph_value(glyph: char) -> Option<u32> {
    match glyph {
        '.' => Some(0),
        '#' => Some(1),
        '=' => Some(208),
        '^' => Some(244),
        'X' => Some(248),
        'B' => Some(243),
        'b' => Some(240),
        'H' => Some(192),
        '~' => Some(224),
        _ => None,
    }
}

/// Builds a grid from ASCII art using the default lookup table.
///
/// Blank lines and surrounding whitespace are ignored.
///
/// # Panics
/// Panics on an unknown glyph or a grid that fails validation.
///
/// # Examples
/// ```
/// use test_utils::grid_from_ascii;
/// let grid = grid_from_ascii(
///     "
///     ....
///     ####
///     ",
///     32.0,
/// );
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.columns(), 4);
/// ```
pub fn grid_from_ascii(art: &str, cell_size: f32) -> TileGrid {
    try_grid_from_ascii(art, TileLookup::default(), cell_size).expect("valid ASCII level")
}

/// Fallible form of [`grid_from_ascii`] with a custom lookup table.
///
/// # Errors
/// Returns any [`GridError`] raised by [`TileGrid::from_rows`].
///
/// # Panics
/// Panics on an unknown glyph.
pub fn try_grid_from_ascii(
    art: &str,
    lookup: TileLookup,
    cell_size: f32,
) -> Result<TileGrid, GridError> {
    let rows: Vec<Vec<u32>> = art
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.chars()
                .map(|glyph| {
                    glyph_value(glyph).unwrap_or_else(|| panic!("unknown level glyph {glyph:?}"))
                })
                .collect()
        })
        .collect();
    TileGrid::from_rows(&rows, lookup, cell_size)
}
