use crate::config::{Settings, StorageConfig, StorageOptions};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bunny-storage")]
#[command(about = "Manage files in a Bunny.net storage zone")]
pub struct CliConfig {
    #[arg(long, help = "TOML settings file; the environment is used when omitted")]
    pub settings: Option<PathBuf>,

    #[arg(long, help = "Storage region, overrides BUNNY_REGION")]
    pub region: Option<String>,

    #[arg(long, help = "Base directory, overrides BUNNY_BASE_DIR")]
    pub base_dir: Option<String>,

    #[arg(long, help = "Storage API root, overrides BUNNY_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload a local file
    Put { name: String, file: PathBuf },
    /// Download an object to a file, or stdout when no file is given
    Get { name: String, out: Option<PathBuf> },
    /// Delete an object
    Rm { name: String },
    /// Check whether an object exists
    Exists { name: String },
    /// Print the public URL of an object
    Url { name: String },
    /// Print the size of an object in bytes
    Size { name: String },
    /// List a directory
    Ls { path: Option<String> },
    /// Print the creation time of an object
    Ctime { name: String },
    /// Print the last modification time of an object
    Mtime { name: String },
}

impl CliConfig {
    /// Flags win over the settings file or environment.
    pub fn options(&self) -> StorageOptions {
        StorageOptions {
            region: self.region.clone(),
            base_dir: self.base_dir.clone(),
            endpoint: self.endpoint.clone(),
            ..Default::default()
        }
    }

    pub fn load_settings(&self) -> Result<Settings> {
        match &self.settings {
            Some(path) => Settings::from_file(path),
            None => Ok(Settings::from_env()),
        }
    }

    pub fn storage_config(&self) -> Result<StorageConfig> {
        StorageConfig::resolve(self.options(), self.load_settings()?)
    }
}
