//! Core value types: cell states, positions and compass headings.

mod cell;
mod direction;
mod position;

pub use cell::CellState;
pub use direction::Direction;
pub use position::Position;
