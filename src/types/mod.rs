//! Type definitions for eurogames

mod error;
mod game;
mod row;
mod stats;

pub use error::*;
pub use game::*;
pub use row::{FromRow, Row};
pub use stats::*;
