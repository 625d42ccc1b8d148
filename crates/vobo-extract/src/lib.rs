pub mod attributes;
pub mod config;
pub mod descriptions;
pub mod facts;
pub mod locator;
pub mod sql;
pub mod status;

pub use attributes::*;
pub use config::*;
pub use descriptions::*;
pub use facts::*;
pub use locator::*;
pub use sql::*;
pub use status::*;
