//! Shared domain types for redtally.
//!
//! Holds the game registry, channel and URL normalization, the collection
//! period used by windowed listings, and environment-driven configuration.

pub mod app_config;
pub mod channels;
pub mod config;
pub mod error;
pub mod games;
pub mod period;

pub use app_config::AppConfig;
pub use channels::{join_channels, normalize_channel};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use games::{load_games, normalize_url, try_normalize_url, Game, GameConfig, GamesFile};
pub use period::CollectionPeriod;
