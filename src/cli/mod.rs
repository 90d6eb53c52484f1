pub mod commands;
pub mod serve;
pub mod consent;

pub use commands::{Cli, Commands};
