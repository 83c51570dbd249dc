use anyhow::Result;
use bunny_storage::{
    BunnyStorage, Settings, Storage, StorageConfig, StorageError, StorageOptions,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn lookup_from(vars: &[(&str, &str)]) -> Result<Settings> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Ok(Settings::from_lookup(|k| map.get(k).cloned()))
}

#[test]
fn test_construction_without_credentials_fails() -> Result<()> {
    let settings = lookup_from(&[("MEDIA_URL", "/media/")])?;
    let err = StorageConfig::resolve(StorageOptions::new(), settings).unwrap_err();

    assert!(err.is_config_error());
    assert_eq!(
        err.to_string(),
        "Setting BUNNY_USERNAME or `username` option is required."
    );
    Ok(())
}

#[test]
fn test_environment_style_settings() -> Result<()> {
    let settings = lookup_from(&[
        ("BUNNY_USERNAME", "zone"),
        ("BUNNY_PASSWORD", "secret"),
        ("BUNNY_REGION", "de"),
        ("BUNNY_HOSTNAME", "https://zone.b-cdn.net"),
        ("BUNNY_BASE_DIR", "\\uploads\\"),
        ("MEDIA_URL", "/ignored/"),
        ("USE_TZ", "0"),
    ])?;

    let storage = BunnyStorage::new(StorageConfig::resolve(StorageOptions::new(), settings)?);
    let config = storage.config();

    assert_eq!(config.hostname, "https://zone.b-cdn.net/");
    assert_eq!(config.base_dir, "uploads/");
    assert!(!config.use_tz);
    assert_eq!(
        config.object_url("a.txt")?,
        "https://storage.bunnycdn.com/zone/uploads/a.txt"
    );
    Ok(())
}

#[test]
fn test_settings_file_with_placeholders() -> Result<()> {
    std::env::set_var("BUNNY_STORAGE_IT_KEY", "file-secret");

    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(
        br#"
media_url = "https://cdn.example.com/media/"

[bunny]
username = "zone"
password = "${BUNNY_STORAGE_IT_KEY}"
region = "uk"
"#,
    )?;

    let settings = Settings::from_file(temp_file.path())?;
    let config = StorageConfig::resolve(StorageOptions::new().base_dir("img"), settings)?;

    assert_eq!(config.password, "file-secret");
    assert_eq!(config.base_url(), "https://uk.storage.bunnycdn.com/zone/img/");
    assert_eq!(
        config.public_url("cat.png"),
        "https://cdn.example.com/media/img/cat.png"
    );

    std::env::remove_var("BUNNY_STORAGE_IT_KEY");
    Ok(())
}

#[test]
fn test_invalid_endpoint_is_rejected() -> Result<()> {
    let options = StorageOptions::new()
        .username("zone")
        .password("secret")
        .hostname("https://cdn.example.com/")
        .endpoint("ftp://storage.example.com");

    let err = StorageConfig::resolve(options, Settings::default()).unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfigValueError { ref field, .. } if field == "endpoint"));
    Ok(())
}

#[test]
fn test_constructors_read_process_environment() -> Result<()> {
    std::env::set_var("BUNNY_USERNAME", "env-zone");
    std::env::set_var("BUNNY_PASSWORD", "env-secret");
    std::env::set_var("BUNNY_HOSTNAME", "https://env.b-cdn.net/");
    std::env::set_var("USE_TZ", "not-a-flag");

    let storage = BunnyStorage::from_options(StorageOptions::new().use_tz(false))?;
    assert_eq!(storage.config().username, "env-zone");
    assert!(!storage.config().use_tz);
    assert_eq!(storage.url("a.txt"), "https://env.b-cdn.net/a.txt");

    let err = StorageConfig::from_env(StorageOptions::new()).unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfigValueError { ref field, .. } if field == "USE_TZ"));

    std::env::set_var("USE_TZ", "true");
    assert!(StorageConfig::from_env(StorageOptions::new())?.use_tz);

    for key in ["BUNNY_USERNAME", "BUNNY_PASSWORD", "BUNNY_HOSTNAME", "USE_TZ"] {
        std::env::remove_var(key);
    }
    Ok(())
}
