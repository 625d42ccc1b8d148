pub mod aggregate;
pub mod input;
pub mod rule;
pub mod rules;
pub mod semantic;

pub use aggregate::*;
pub use input::*;
pub use rule::*;
pub use semantic::*;
