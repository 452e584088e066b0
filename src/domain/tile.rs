/// Tile kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Each kind has exactly one numeric id — the classification table of
/// the board source format (see `sim::loader`):
///   0 floor, 1 wall, 2 pit, 3 spawn, 4..=7 belt north/east/south/west.

use super::direction::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Floor,
    Wall,            // Blocks movement entirely
    Pit,             // Enterable, destroys the robot that enters
    Spawn,           // Robot starting pad
    Belt(Direction), // Carries a standing robot one cell per phase
}

impl Tile {
    /// Decode a source-format id. Unknown ids are a load error,
    /// reported by the loader with position context.
    pub fn from_id(id: u32) -> Option<Tile> {
        match id {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Pit),
            3 => Some(Tile::Spawn),
            4 => Some(Tile::Belt(Direction::North)),
            5 => Some(Tile::Belt(Direction::East)),
            6 => Some(Tile::Belt(Direction::South)),
            7 => Some(Tile::Belt(Direction::West)),
            _ => None,
        }
    }

    /// Canonical source-format id. Inverse of `from_id`.
    pub fn id(self) -> u32 {
        match self {
            Tile::Floor => 0,
            Tile::Wall => 1,
            Tile::Pit => 2,
            Tile::Spawn => 3,
            Tile::Belt(Direction::North) => 4,
            Tile::Belt(Direction::East) => 5,
            Tile::Belt(Direction::South) => 6,
            Tile::Belt(Direction::West) => 7,
        }
    }

    /// Does this tile block a robot from entering the cell?
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Can a robot enter this cell? Pits count: they are entered,
    /// then destroy.
    pub fn is_passable(self) -> bool {
        !self.is_wall()
    }

    /// Does entering this cell destroy the robot?
    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Pit)
    }

    /// Is this a robot starting pad?
    pub fn is_spawn(self) -> bool {
        matches!(self, Tile::Spawn)
    }

    /// Does the floor backdrop show through under this tile's glyph?
    /// Walls, pits, and belts paint their own full-cell background.
    pub fn draws_over_floor(self) -> bool {
        matches!(self, Tile::Floor | Tile::Spawn)
    }

    /// Carry direction, for belt tiles only.
    pub fn belt_direction(self) -> Option<Direction> {
        match self {
            Tile::Belt(dir) => Some(dir),
            _ => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table_round_trips() {
        for id in 0..=7 {
            let tile = Tile::from_id(id).unwrap();
            assert_eq!(tile.id(), id);
        }
    }

    #[test]
    fn unknown_ids_rejected() {
        assert_eq!(Tile::from_id(8), None);
        assert_eq!(Tile::from_id(99), None);
        assert_eq!(Tile::from_id(u32::MAX), None);
    }

    #[test]
    fn walls_block_everything_else_enterable() {
        assert!(!Tile::Wall.is_passable());
        assert!(Tile::Floor.is_passable());
        assert!(Tile::Pit.is_passable());
        assert!(Tile::Spawn.is_passable());
        assert!(Tile::Belt(Direction::East).is_passable());
    }

    #[test]
    fn only_pits_destroy() {
        assert!(Tile::Pit.is_hazard());
        assert!(!Tile::Floor.is_hazard());
        assert!(!Tile::Wall.is_hazard());
        assert!(!Tile::Spawn.is_hazard());
        assert!(!Tile::Belt(Direction::North).is_hazard());
    }

    #[test]
    fn belt_direction_accessor() {
        assert_eq!(Tile::Belt(Direction::West).belt_direction(), Some(Direction::West));
        assert_eq!(Tile::Floor.belt_direction(), None);
        assert_eq!(Tile::Pit.belt_direction(), None);
    }

    #[test]
    fn floor_shows_through_pads_only() {
        assert!(Tile::Floor.draws_over_floor());
        assert!(Tile::Spawn.draws_over_floor());
        assert!(!Tile::Wall.draws_over_floor());
        assert!(!Tile::Pit.draws_over_floor());
        assert!(!Tile::Belt(Direction::South).draws_over_floor());
    }
}
