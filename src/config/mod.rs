#[cfg(feature = "cli")]
pub mod cli;
pub mod objective;
pub mod secrets;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use objective::{ObjectiveConfig, TravelTimeParams};
pub use toml_config::FinderConfig;
