pub mod cell;
pub mod model;
pub mod names;
pub mod types;

pub use cell::*;
pub use model::*;
pub use names::*;
pub use types::*;
