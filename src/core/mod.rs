pub mod commands;
pub mod derive;
pub mod services;
pub mod time;
pub mod utils;

pub use commands::Command;
