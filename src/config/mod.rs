#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

use crate::utils::error::{Result, StorageError};
use crate::utils::path::{
    directory_key, join_key, normalize_prefix, object_key, with_trailing_slash,
};
use crate::utils::validation::{validate_non_empty_string, validate_region, validate_url, Validate};

pub use settings::{BunnySettings, Settings};

pub const DEFAULT_REGION: &str = "ny";

/// Explicit constructor arguments. Anything set here wins over [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub hostname: Option<String>,
    pub base_dir: Option<String>,
    pub use_tz: Option<bool>,
    pub endpoint: Option<String>,
}

impl StorageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, val: &str) -> Self {
        self.username = Some(val.to_string());
        self
    }

    pub fn password(mut self, val: &str) -> Self {
        self.password = Some(val.to_string());
        self
    }

    pub fn region(mut self, val: &str) -> Self {
        self.region = Some(val.to_string());
        self
    }

    pub fn hostname(mut self, val: &str) -> Self {
        self.hostname = Some(val.to_string());
        self
    }

    pub fn base_dir(mut self, val: &str) -> Self {
        self.base_dir = Some(val.to_string());
        self
    }

    pub fn use_tz(mut self, val: bool) -> Self {
        self.use_tz = Some(val);
        self
    }

    pub fn endpoint(mut self, val: &str) -> Self {
        self.endpoint = Some(val.to_string());
        self
    }
}

/// Resolved, validated adapter configuration.
#[derive(Clone, PartialEq)]
pub struct StorageConfig {
    /// Storage zone name.
    pub username: String,
    /// Storage zone API key, sent as the `AccessKey` header.
    pub password: String,
    pub region: String,
    /// Public base URL used by `url()`.
    pub hostname: String,
    pub base_dir: String,
    pub use_tz: bool,
    /// Replaces the region-derived storage API root when set.
    pub endpoint: Option<String>,
}

impl StorageConfig {
    /// Resolves every field as explicit option, then settings, then default.
    pub fn resolve(options: StorageOptions, settings: Settings) -> Result<Self> {
        let use_tz = match options.use_tz {
            Some(flag) => flag,
            None => settings.use_tz()?.unwrap_or(true),
        };
        let Settings {
            bunny, media_url, ..
        } = settings;

        let username = options
            .username
            .or(bunny.username)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorageError::missing("BUNNY_USERNAME", "username"))?;

        let password = options
            .password
            .or(bunny.password)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorageError::missing("BUNNY_PASSWORD", "password"))?;

        let region = options
            .region
            .or(bunny.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let hostname = options
            .hostname
            .or(bunny.hostname)
            .or(media_url)
            .ok_or_else(|| StorageError::ConfigError {
                message: "Neither BUNNY_HOSTNAME nor MEDIA_URL is configured, one of them is required"
                    .to_string(),
            })?;

        let base_dir = options.base_dir.or(bunny.base_dir).unwrap_or_default();
        let endpoint = options.endpoint.or(bunny.endpoint);

        let config = Self {
            username,
            password,
            region,
            hostname: if hostname.is_empty() {
                hostname
            } else {
                with_trailing_slash(&hostname)
            },
            base_dir: normalize_prefix(&base_dir),
            use_tz,
            endpoint: endpoint.map(|e| with_trailing_slash(&e)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Resolves against the process environment.
    pub fn from_env(options: StorageOptions) -> Result<Self> {
        Self::resolve(options, Settings::from_env())
    }

    /// Storage API root. Region `de` is served from the unprefixed host.
    pub fn storage_root(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None if self.region == "de" => "https://storage.bunnycdn.com/".to_string(),
            None => format!("https://{}.storage.bunnycdn.com/", self.region),
        }
    }

    /// `root/username/base_dir`, the prefix of every object request.
    pub fn base_url(&self) -> String {
        format!("{}{}/{}", self.storage_root(), self.username, self.base_dir)
    }

    /// Request URL of an object, every path segment percent-encoded.
    pub fn object_url(&self, name: &str) -> Result<String> {
        self.storage_url(&object_key(name))
    }

    pub fn directory_url(&self, path: &str) -> Result<String> {
        self.storage_url(&directory_key(path))
    }

    fn storage_url(&self, key: &str) -> Result<String> {
        join_key(
            &self.storage_root(),
            &format!("{}/{}{}", self.username, self.base_dir, key),
        )
    }

    /// `hostname + base_dir + name`, backslashes normalized and a leading `/`
    /// dropped. The name is not percent-encoded.
    pub fn public_url(&self, name: &str) -> String {
        format!("{}{}{}", self.hostname, self.base_dir, object_key(name))
    }

    /// Encoded form of [`public_url`](Self::public_url) for requests against the CDN.
    /// Requires an absolute hostname.
    pub fn public_request_url(&self, name: &str) -> Result<String> {
        join_key(
            &self.hostname,
            &format!("{}{}", self.base_dir, object_key(name)),
        )
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("region", &self.region)
            .field("hostname", &self.hostname)
            .field("base_dir", &self.base_dir)
            .field("use_tz", &self.use_tz)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("username", &self.username)?;
        validate_non_empty_string("password", &self.password)?;
        validate_region("region", &self.region)?;

        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }

        tracing::debug!("storage configuration validated for zone {}", self.username);
        Ok(())
    }
}
