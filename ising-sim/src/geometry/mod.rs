pub mod offsets;
pub mod torus;

pub use offsets::Direction;
pub use torus::{Torus, MAX_SIDE};
