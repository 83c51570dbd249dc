pub mod adapters;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::BunnyStorage;
pub use config::{Settings, StorageConfig, StorageOptions};
pub use domain::model::{DirEntry, Timestamp};
pub use domain::ports::{ObjectReader, Storage};
pub use utils::error::{Result, StorageError};
