//! CLI module containing argument parsing and configuration loading

pub mod args;
pub mod config;

pub use args::{Args, ItemSource, RunConfig};
pub use config::load_config_file;
