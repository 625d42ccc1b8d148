pub mod error;
pub mod grid;
pub mod memory;
pub mod traits;

pub use error::*;
pub use grid::*;
pub use memory::*;
pub use traits::*;
