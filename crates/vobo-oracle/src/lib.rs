pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod prompts;
pub mod scripted;
pub mod types;

pub use client::*;
pub use config::*;
pub use error::*;
pub use filter::*;
pub use scripted::*;
pub use types::*;
