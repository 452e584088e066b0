/// Cardinal directions and the arithmetic over them.
///
/// Successive values are 90° clockwise steps, so rotation is index
/// arithmetic modulo 4. The grid's y axis grows downward (row order),
/// which makes NORTH (0,-1) and SOUTH (0,+1).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Clockwise index: North=0, East=1, South=2, West=3.
    pub fn index(self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Inverse of `index`, normalized into [0,3] (any i32 accepted).
    pub fn from_index(idx: i32) -> Direction {
        match ((idx % 4) + 4) % 4 {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            _ => Direction::West,
        }
    }

    /// Rotate by `steps` quarter turns, clockwise when positive.
    /// Total over all of i32; `steps % 4` is taken before the add so
    /// the sum cannot overflow.
    pub fn rotate(self, steps: i32) -> Direction {
        Direction::from_index(self.index() + steps % 4)
    }

    pub fn opposite(self) -> Direction {
        self.rotate(2)
    }

    /// Unit offset of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Arrow glyph used by the renderer for robots.
    pub fn glyph(self) -> char {
        match self {
            Direction::North => '▲',
            Direction::East => '▶',
            Direction::South => '▼',
            Direction::West => '◀',
        }
    }
}

/// Candidate cell one step from (x, y). May land outside the grid,
/// including at negative coordinates; callers bounds-check against
/// the board.
pub fn next_coordinate(x: i32, y: i32, dir: Direction) -> (i32, i32) {
    let (dx, dy) = dir.offset();
    (x + dx, y + dy)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rotation arithmetic ──

    #[test]
    fn rotate_clockwise_cycle() {
        assert_eq!(Direction::North.rotate(1), Direction::East);
        assert_eq!(Direction::East.rotate(1), Direction::South);
        assert_eq!(Direction::South.rotate(1), Direction::West);
        assert_eq!(Direction::West.rotate(1), Direction::North);
    }

    #[test]
    fn rotate_counter_clockwise() {
        assert_eq!(Direction::North.rotate(-1), Direction::West);
        assert_eq!(Direction::West.rotate(-1), Direction::South);
        assert_eq!(Direction::South.rotate(-1), Direction::East);
        assert_eq!(Direction::East.rotate(-1), Direction::North);
    }

    #[test]
    fn rotate_full_cycle_is_identity() {
        for d in Direction::ALL {
            assert_eq!(d.rotate(4), d);
            assert_eq!(d.rotate(-4), d);
            assert_eq!(d.rotate(0), d);
        }
    }

    #[test]
    fn rotate_then_unrotate_restores() {
        for d in Direction::ALL {
            for r in -9..=9 {
                assert_eq!(d.rotate(r).rotate(-r), d, "{:?} by {}", d, r);
            }
        }
    }

    #[test]
    fn rotate_large_steps() {
        assert_eq!(Direction::North.rotate(5), Direction::East);
        assert_eq!(Direction::North.rotate(-7), Direction::East);
        assert_eq!(Direction::East.rotate(i32::MAX), Direction::East.rotate(i32::MAX % 4));
        assert_eq!(Direction::East.rotate(i32::MIN), Direction::East.rotate(i32::MIN % 4));
    }

    #[test]
    fn from_index_normalizes() {
        assert_eq!(Direction::from_index(0), Direction::North);
        assert_eq!(Direction::from_index(4), Direction::North);
        assert_eq!(Direction::from_index(-1), Direction::West);
        assert_eq!(Direction::from_index(-5), Direction::West);
        for d in Direction::ALL {
            assert_eq!(Direction::from_index(d.index()), d);
        }
    }

    #[test]
    fn opposite_is_two_turns() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    // ── Offsets ──

    #[test]
    fn offsets_match_row_order_grid() {
        assert_eq!(Direction::North.offset(), (0, -1));
        assert_eq!(Direction::East.offset(), (1, 0));
        assert_eq!(Direction::South.offset(), (0, 1));
        assert_eq!(Direction::West.offset(), (-1, 0));
    }

    #[test]
    fn next_coordinate_steps_one_cell() {
        assert_eq!(next_coordinate(2, 2, Direction::North), (2, 1));
        assert_eq!(next_coordinate(2, 2, Direction::East), (3, 2));
        assert_eq!(next_coordinate(2, 2, Direction::South), (2, 3));
        assert_eq!(next_coordinate(2, 2, Direction::West), (1, 2));
    }

    #[test]
    fn next_coordinate_may_leave_grid() {
        // Bounds checking is the caller's job
        assert_eq!(next_coordinate(0, 0, Direction::North), (0, -1));
        assert_eq!(next_coordinate(0, 0, Direction::West), (-1, 0));
    }
}
