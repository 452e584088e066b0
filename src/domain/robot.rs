/// Entities: Robot (the piece on the board) and Player (who programs it).
/// Player i owns robot i; the pairing is fixed at spawn and never changes.

use super::cards::Card;
use super::direction::Direction;

#[derive(Clone, Debug)]
pub struct Robot {
    pub id: usize,
    pub x: usize,
    pub y: usize,
    pub facing: Direction,
    pub destroyed: bool,
}

impl Robot {
    pub fn new(id: usize, x: usize, y: usize) -> Self {
        Robot {
            id,
            x,
            y,
            facing: Direction::North,
            destroyed: false,
        }
    }
}

/// Who occupies (x, y)? Linear scan over all robots; fine for a
/// handful of players. Destroyed robots no longer occupy their cell
/// (they are down the pit they froze on).
pub fn robot_at(robots: &[Robot], x: usize, y: usize) -> Option<usize> {
    robots
        .iter()
        .position(|r| !r.destroyed && r.x == x && r.y == y)
}

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub robot: usize, // index into the session's robot list
    pub hand: Vec<Card>,
    pub program: Vec<Card>, // picked registers, in play order
    pub locked: bool,
}

impl Player {
    pub fn new(id: usize) -> Self {
        Player {
            name: format!("P{}", id + 1),
            robot: id,
            hand: Vec::new(),
            program: Vec::new(),
            locked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_robot_faces_north_on_its_pad() {
        let r = Robot::new(2, 4, 7);
        assert_eq!(r.facing, Direction::North);
        assert!(!r.destroyed);
        assert_eq!((r.x, r.y), (4, 7));
    }

    #[test]
    fn occupancy_scan_finds_first_match() {
        let robots = vec![Robot::new(0, 1, 1), Robot::new(1, 2, 1)];
        assert_eq!(robot_at(&robots, 1, 1), Some(0));
        assert_eq!(robot_at(&robots, 2, 1), Some(1));
        assert_eq!(robot_at(&robots, 3, 1), None);
    }

    #[test]
    fn occupancy_scan_skips_destroyed() {
        let mut robots = vec![Robot::new(0, 1, 1), Robot::new(1, 2, 1)];
        robots[0].destroyed = true;
        assert_eq!(robot_at(&robots, 1, 1), None);
        assert_eq!(robot_at(&robots, 2, 1), Some(1));
    }

    #[test]
    fn players_pair_with_robots_by_index() {
        let p = Player::new(3);
        assert_eq!(p.name, "P4");
        assert_eq!(p.robot, 3);
        assert!(p.hand.is_empty());
        assert!(!p.locked);
    }
}
