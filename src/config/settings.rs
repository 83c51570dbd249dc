use crate::utils::error::{Result, StorageError};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Settings source consulted when an explicit option is absent.
///
/// Read either from the process environment (`BUNNY_USERNAME`, `BUNNY_PASSWORD`,
/// `BUNNY_REGION`, `BUNNY_HOSTNAME`, `BUNNY_BASE_DIR`, `BUNNY_ENDPOINT`,
/// `MEDIA_URL`, `USE_TZ`) or from a TOML file:
///
/// ```toml
/// media_url = "https://cdn.example.com/"
/// use_tz = true
///
/// [bunny]
/// username = "my-zone"
/// password = "${BUNNY_API_KEY}"
/// region = "ny"
/// base_dir = "media/"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub bunny: BunnySettings,
    pub media_url: Option<String>,
    /// Raw flag, parsed only when no explicit `use_tz` option is given.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub use_tz: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BunnySettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub hostname: Option<String>,
    pub base_dir: Option<String>,
    pub endpoint: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings through any key lookup (process environment, a test map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bunny: BunnySettings {
                username: lookup("BUNNY_USERNAME"),
                password: lookup("BUNNY_PASSWORD"),
                region: lookup("BUNNY_REGION"),
                hostname: lookup("BUNNY_HOSTNAME"),
                base_dir: lookup("BUNNY_BASE_DIR"),
                endpoint: lookup("BUNNY_ENDPOINT"),
            },
            media_url: lookup("MEDIA_URL"),
            use_tz: lookup("USE_TZ"),
        }
    }

    /// `use_tz` as a boolean, if set.
    pub fn use_tz(&self) -> Result<Option<bool>> {
        self.use_tz
            .as_deref()
            .map(|raw| parse_bool("USE_TZ", raw))
            .transpose()
    }

    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StorageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML settings after replacing `${VAR}` placeholders from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StorageError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Unset variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StorageError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FlagValue>::deserialize(deserializer)?.map(|value| match value {
        FlagValue::Bool(flag) => flag.to_string(),
        FlagValue::Text(text) => text,
    }))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StorageError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean (true/false, 1/0, yes/no)".to_string(),
        }),
    }
}
