pub mod cell;
pub mod color;
pub mod common;
pub mod token;

pub use cell::Cell;
pub use color::{MovementClass, TokenColor};
pub use common::{Position, Timestamp, TokenId};
pub use token::Token;
