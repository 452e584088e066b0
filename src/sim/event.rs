/// Events emitted during movement/turn resolution.
/// The presentation layer consumes these for the HUD line and sound.

use crate::domain::cards::Card;
use crate::domain::direction::Direction;

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    RobotMoved { robot: usize, from: (usize, usize), to: (usize, usize) },
    RobotPushed { robot: usize, to: (usize, usize) },
    RobotBlocked { robot: usize },
    RobotRotated { robot: usize, facing: Direction },
    RobotCarried { robot: usize, to: (usize, usize) },
    RobotDestroyed { robot: usize, x: usize, y: usize },
    CardPlayed { player: usize, card: Card },
    RoundStarted { round: u32 },
    AllRobotsDown,
}
