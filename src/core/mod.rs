//! Core application functionality
//!
//! This module contains the ambient application logic, including:
//! - Error handling
//! - Settings and the user config file
//! - CLI parsing and the command runner

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod runner;
pub mod settings;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::{BezyContext, BezyResult};
pub use runner::run_app;
pub use settings::EditorSettings;
