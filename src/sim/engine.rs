/// The movement engine: resolves moves, rotations, and the conveyor
/// pass against the board and the full robot roster. All robot
/// mutation in the game happens here.
///
/// Push chains use a plan → apply model:
///   Phase 1: walk cells in the travel direction from the candidate
///            cell, collecting occupants of consecutive cells.
///   Phase 2: verdict — the first unoccupied cell decides: off-grid
///            or wall blocks the whole chain, anything enterable
///            lets it advance.
///   Phase 3: apply from the far end inward, so no two robots ever
///            share a cell mid-resolution.
/// A blocked chain mutates nothing, which keeps each move call a
/// single atomic unit of mutation.

use crate::domain::board::Board;
use crate::domain::direction::{self, Direction};
use crate::domain::robot::{robot_at, Robot};

use super::event::GameEvent;

/// Outcome of one unit step of a move.
enum StepOutcome {
    Advanced,
    Blocked,
    FellInPit,
}

/// Rotate a robot in place. No movement, no collision checks.
/// Destroyed robots ignore commands.
pub fn rotate_robot(steps: i32, idx: usize, robots: &mut [Robot]) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let robot = &mut robots[idx];
    if robot.destroyed {
        return events;
    }
    robot.facing = robot.facing.rotate(steps);
    events.push(GameEvent::RobotRotated {
        robot: idx,
        facing: robot.facing,
    });
    events
}

/// Move a robot `steps` cells: forward along its facing when positive,
/// backward when negative. Facing never changes. Each unit step may
/// push a chain of robots; a blocked step ends the whole move.
/// Destroyed robots ignore commands.
pub fn move_robot(steps: i32, idx: usize, board: &Board, robots: &mut [Robot]) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if robots[idx].destroyed {
        return events;
    }
    let travel = if steps >= 0 {
        robots[idx].facing
    } else {
        robots[idx].facing.opposite()
    };
    for _ in 0..steps.unsigned_abs() {
        match advance_one(idx, travel, board, robots, &mut events) {
            StepOutcome::Advanced => {}
            StepOutcome::Blocked => {
                events.push(GameEvent::RobotBlocked { robot: idx });
                break;
            }
            StepOutcome::FellInPit => break,
        }
    }
    events
}

/// One unit step for robot `idx` along `travel`.
fn advance_one(
    idx: usize,
    travel: Direction,
    board: &Board,
    robots: &mut [Robot],
    events: &mut Vec<GameEvent>,
) -> StepOutcome {
    let (cx, cy) =
        direction::next_coordinate(robots[idx].x as i32, robots[idx].y as i32, travel);

    let chain = match plan_chain(board, robots, cx, cy, travel) {
        Some(chain) => chain,
        None => return StepOutcome::Blocked,
    };

    // Far end first, mover last: cells free up ahead of each shift
    for &ri in chain.iter().rev() {
        displace(board, robots, ri, travel, true, events);
    }
    displace(board, robots, idx, travel, false, events);

    if robots[idx].destroyed {
        StepOutcome::FellInPit
    } else {
        StepOutcome::Advanced
    }
}

/// Walk cells along `travel` starting at the candidate cell,
/// collecting occupants (nearest first) until the first unoccupied
/// cell. Returns None when that cell is off the grid or a wall —
/// the chain is blocked and nobody moves.
fn plan_chain(
    board: &Board,
    robots: &[Robot],
    mut cx: i32,
    mut cy: i32,
    travel: Direction,
) -> Option<Vec<usize>> {
    let mut chain = Vec::new();
    loop {
        let tile = board.tile_at(cx, cy)?;
        if tile.is_wall() {
            return None;
        }
        match robot_at(robots, cx as usize, cy as usize) {
            Some(ri) => {
                chain.push(ri);
                let (nx, ny) = direction::next_coordinate(cx, cy, travel);
                cx = nx;
                cy = ny;
            }
            None => return Some(chain),
        }
    }
}

/// Shift one robot a single, already-validated cell along `travel`
/// and resolve the landing tile. Pits destroy on entry; the robot
/// freezes on the pit cell.
fn displace(
    board: &Board,
    robots: &mut [Robot],
    ri: usize,
    travel: Direction,
    pushed: bool,
    events: &mut Vec<GameEvent>,
) {
    let from = (robots[ri].x, robots[ri].y);
    let (nx, ny) = direction::next_coordinate(from.0 as i32, from.1 as i32, travel);
    let (nx, ny) = (nx as usize, ny as usize);
    robots[ri].x = nx;
    robots[ri].y = ny;
    if pushed {
        events.push(GameEvent::RobotPushed { robot: ri, to: (nx, ny) });
    } else {
        events.push(GameEvent::RobotMoved { robot: ri, from, to: (nx, ny) });
    }
    let landed = board.tile_at(nx as i32, ny as i32);
    if landed.map_or(false, |t| t.is_hazard()) {
        robots[ri].destroyed = true;
        events.push(GameEvent::RobotDestroyed { robot: ri, x: nx, y: ny });
    }
}

/// The conveyor pass: carry every robot standing on a belt one cell
/// in the belt's direction. Belts never push — an occupied, walled,
/// or off-grid destination skips the carry. Robots are processed in
/// index order, one carry per pass; facing is untouched.
pub fn convey(board: &Board, robots: &mut [Robot]) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for i in 0..robots.len() {
        if robots[i].destroyed {
            continue;
        }
        let here = board.tile_at(robots[i].x as i32, robots[i].y as i32);
        let dir = match here.and_then(|t| t.belt_direction()) {
            Some(d) => d,
            None => continue,
        };
        let (nx, ny) =
            direction::next_coordinate(robots[i].x as i32, robots[i].y as i32, dir);
        let target = match board.tile_at(nx, ny) {
            Some(t) => t,
            None => continue,
        };
        if target.is_wall() {
            continue;
        }
        if robot_at(robots, nx as usize, ny as usize).is_some() {
            continue;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        robots[i].x = nx;
        robots[i].y = ny;
        events.push(GameEvent::RobotCarried { robot: i, to: (nx, ny) });
        if target.is_hazard() {
            robots[i].destroyed = true;
            events.push(GameEvent::RobotDestroyed { robot: i, x: nx, y: ny });
        }
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
