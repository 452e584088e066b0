pub mod board;
pub mod cards;
pub mod direction;
pub mod robot;
pub mod tile;
