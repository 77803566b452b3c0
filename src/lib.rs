pub mod cli;
pub mod config;
pub mod engine;
pub mod hostlist;
pub mod ssh;
pub mod utils;

pub use cli::Cli;
pub use config::Settings;
pub use engine::Engine;
