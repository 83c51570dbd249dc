//! Object key helpers shared by the adapter and configuration.

use crate::utils::error::{Result, StorageError};
use url::Url;

/// Object key as sent to the storage API: forward slashes only, no leading `/`.
/// The key `/` addresses the base directory itself.
pub fn object_key(name: &str) -> String {
    let normalized = name.replace('\\', "/");
    normalized.trim_start_matches('/').to_string()
}

/// Directory key for listing requests. The API only lists a path that ends with `/`.
pub fn directory_key(path: &str) -> String {
    let key = object_key(path);
    if key.is_empty() || key.ends_with('/') {
        key
    } else {
        format!("{}/", key)
    }
}

/// Splits a key into (parent directory, final segment). Keys without `/` live
/// in the base directory, whose parent is the empty key.
pub fn split_parent(key: &str) -> (&str, &str) {
    match key.trim_end_matches('/').rsplit_once('/') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", key.trim_end_matches('/')),
    }
}

/// Base directory prefix: forward slashes, no leading `/`, trailing `/` when non-empty.
pub fn normalize_prefix(prefix: &str) -> String {
    let key = object_key(prefix);
    if key.is_empty() {
        key
    } else {
        with_trailing_slash(&key)
    }
}

pub fn with_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

/// Appends `key` to `base`, percent-encoding each segment so `#`, `?`, `%` and
/// spaces stay part of the object path. A trailing `/` on `key` is kept.
pub fn join_key(base: &str, key: &str) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| StorageError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: base.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| StorageError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?;
        segments.pop_if_empty().extend(key.split('/'));
    }

    Ok(url.into())
}
