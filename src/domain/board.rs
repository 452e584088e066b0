/// The board: an immutable-after-load grid of tiles.
///
/// Rows are stored top-down, indexed [y][x]; y grows downward. Out of
/// range coordinates are not tiles at all — `tile_at` returns None and
/// the movement engine treats that as impassable.

use super::tile::Tile;

#[derive(Debug)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Tile>>,
}

impl Board {
    /// Build from row-major tile rows. The loader guarantees the rows
    /// are rectangular and non-empty; width falls out of row 0.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Board {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        Board { width, height, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw rows, for full-grid iteration (serializer, renderer).
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Is (x, y) a cell of this grid? Signed so movement candidates
    /// can be checked before any usize conversion.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile lookup; None when (x, y) is off the grid.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<Tile> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.rows[y as usize][x as usize])
    }

    /// False for off-grid or wall cells; pits and belts are enterable.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        match self.tile_at(x, y) {
            Some(tile) => tile.is_passable(),
            None => false,
        }
    }

    /// Spawn pads in row-major discovery order (y outer, x inner).
    /// Robots are created in exactly this order at game start.
    pub fn spawn_points(&self) -> Vec<(usize, usize)> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.rows[y][x].is_spawn() {
                    points.push((x, y));
                }
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::direction::Direction;

    /// Helper: build a Board from a string diagram.
    /// Legend:  '.'=Floor  '#'=Wall  'O'=Pit  'S'=Spawn
    ///          '^' '>' 'v' '<' = Belt north/east/south/west
    fn board_from(rows: &[&str]) -> Board {
        let tiles = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '#' => Tile::Wall,
                        'O' => Tile::Pit,
                        'S' => Tile::Spawn,
                        '^' => Tile::Belt(Direction::North),
                        '>' => Tile::Belt(Direction::East),
                        'v' => Tile::Belt(Direction::South),
                        '<' => Tile::Belt(Direction::West),
                        _ => Tile::Floor,
                    })
                    .collect()
            })
            .collect();
        Board::from_rows(tiles)
    }

    #[test]
    fn dimensions_from_rows() {
        let b = board_from(&["....", "....", "...."]);
        assert_eq!(b.width(), 4);
        assert_eq!(b.height(), 3);
    }

    #[test]
    fn tile_lookup_in_bounds() {
        let b = board_from(&[".#.", "O.S"]);
        assert_eq!(b.tile_at(1, 0), Some(Tile::Wall));
        assert_eq!(b.tile_at(0, 1), Some(Tile::Pit));
        assert_eq!(b.tile_at(2, 1), Some(Tile::Spawn));
        assert_eq!(b.tile_at(0, 0), Some(Tile::Floor));
    }

    #[test]
    fn tile_lookup_out_of_bounds_is_none() {
        let b = board_from(&["..", ".."]);
        assert_eq!(b.tile_at(-1, 0), None);
        assert_eq!(b.tile_at(0, -1), None);
        assert_eq!(b.tile_at(2, 0), None);
        assert_eq!(b.tile_at(0, 2), None);
    }

    #[test]
    fn passability_covers_edges_and_walls() {
        let b = board_from(&[".#", "O."]);
        assert!(b.is_passable(0, 0));
        assert!(!b.is_passable(1, 0)); // wall
        assert!(b.is_passable(0, 1)); // pit is enterable
        assert!(!b.is_passable(-1, 0)); // off grid
        assert!(!b.is_passable(0, 2));
    }

    #[test]
    fn spawn_discovery_is_row_major() {
        let b = board_from(&[
            "..S.",
            "S...",
            "..S.",
        ]);
        // y outer, x inner: top row first, left to right within a row
        assert_eq!(b.spawn_points(), vec![(2, 0), (0, 1), (2, 2)]);
    }

    #[test]
    fn no_spawns_yields_empty() {
        let b = board_from(&["..", ".."]);
        assert!(b.spawn_points().is_empty());
    }
}
