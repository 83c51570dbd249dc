use crate::config::{StorageConfig, StorageOptions};
use crate::domain::model::{DirEntry, ListedObject, TimeField, Timestamp};
use crate::domain::ports::{ObjectReader, Storage};
use crate::utils::error::{Result, StorageError};
use crate::utils::path::{object_key, split_parent};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_LENGTH};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tokio_util::io::StreamReader;

const ACCESS_KEY_HEADER: &str = "AccessKey";

/// Storage backend over the Bunny.net Edge Storage HTTP API.
///
/// Every operation is one request against
/// `https://{region}.storage.bunnycdn.com/{zone}/{base_dir}{name}`,
/// authenticated with the zone's API key.
#[derive(Debug, Clone)]
pub struct BunnyStorage {
    config: StorageConfig,
    client: Client,
}

impl BunnyStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Resolves `options` against the process environment and builds the adapter.
    pub fn from_options(options: StorageOptions) -> Result<Self> {
        Ok(Self::new(StorageConfig::from_env(options)?))
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCESS_KEY_HEADER, &self.config.password)
            .header(ACCEPT, "*/*")
    }

    async fn send(&self, builder: RequestBuilder, method: &Method, url: &str) -> Result<Response> {
        tracing::debug!("{} {}", method, url);
        let response = builder.send().await?;
        tracing::debug!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }

    /// Lists the parent of `name` and reads one timestamp field of the matching entry.
    async fn find_timestamp(&self, name: &str, field: TimeField) -> Result<Timestamp> {
        let key = object_key(name);
        let (parent, leaf) = split_parent(&key);
        let url = self.config.directory_url(parent)?;

        let response = self
            .send(self.request(Method::GET, &url), &Method::GET, &url)
            .await?;
        let response = check_status(response, &url)?;
        let items: Vec<serde_json::Value> = response.json().await?;

        for item in items {
            let entry: DirEntry = serde_json::from_value(item).map_err(|e| {
                tracing::warn!(
                    "unreadable listing entry under {} while looking up {}: {}",
                    url,
                    field.json_key(),
                    e
                );
                StorageError::NotImplemented {
                    operation: field.operation().to_string(),
                }
            })?;

            if entry.object_name == leaf {
                return Timestamp::parse(field.read(&entry), self.config.use_tz);
            }
        }

        Err(StorageError::NotFound {
            name: name.to_string(),
        })
    }
}

fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!("storage API returned {} for {}", status, url);
        Err(StorageError::HttpStatusError {
            status,
            url: url.to_string(),
        })
    }
}

/// `Content-Length` as bytes, 0 when missing or unparsable.
fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[async_trait]
impl Storage for BunnyStorage {
    async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
        let url = self.config.object_url(name)?;
        let builder = self.request(Method::PUT, &url).body(content.to_vec());

        let response = self.send(builder, &Method::PUT, &url).await?;
        check_status(response, &url)?;

        tracing::debug!("stored {} bytes as {}", content.len(), name);
        Ok(name.to_string())
    }

    async fn open(&self, name: &str) -> Result<ObjectReader> {
        let url = self.config.object_url(name)?;
        let response = self
            .send(self.request(Method::GET, &url), &Method::GET, &url)
            .await?;
        let response = check_status(response, &url)?;

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let url = self.config.object_url(name)?;
        let response = self
            .send(self.request(Method::DELETE, &url), &Method::DELETE, &url)
            .await?;
        check_status(response, &url)?;
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let url = self.config.object_url(name)?;
        // The body is never read; dropping the response closes the stream.
        let response = self
            .send(self.request(Method::GET, &url), &Method::GET, &url)
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        check_status(response, &url)?;
        Ok(true)
    }

    fn url(&self, name: &str) -> String {
        self.config.public_url(name)
    }

    async fn size(&self, name: &str) -> Result<u64> {
        let url = self.config.public_request_url(name)?;
        let response = self
            .send(self.client.get(&url), &Method::GET, &url)
            .await?;
        let response = check_status(response, &url)?;

        Ok(content_length(response.headers()))
    }

    async fn listdir(&self, path: &str) -> Result<(Vec<String>, Vec<String>)> {
        let url = self.config.directory_url(path)?;
        let response = self
            .send(self.request(Method::GET, &url), &Method::GET, &url)
            .await?;
        let response = check_status(response, &url)?;

        let entries: Vec<ListedObject> = response.json().await?;
        let (directories, files): (Vec<ListedObject>, Vec<ListedObject>) =
            entries.into_iter().partition(|e| e.is_directory);

        Ok((
            directories.into_iter().map(|e| e.object_name).collect(),
            files.into_iter().map(|e| e.object_name).collect(),
        ))
    }

    async fn get_created_time(&self, name: &str) -> Result<Timestamp> {
        self.find_timestamp(name, TimeField::Created).await
    }

    async fn get_modified_time(&self, name: &str) -> Result<Timestamp> {
        self.find_timestamp(name, TimeField::Modified).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BunnySettings, Settings};
    use reqwest::header::HeaderValue;

    fn storage(hostname: &str, base_dir: &str) -> BunnyStorage {
        let settings = Settings {
            bunny: BunnySettings {
                username: Some("zone".to_string()),
                password: Some("secret".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let options = StorageOptions::new().hostname(hostname).base_dir(base_dir);
        BunnyStorage::new(StorageConfig::resolve(options, settings).unwrap())
    }

    #[test]
    fn test_url_is_hostname_base_dir_and_name() {
        let storage = storage("https://cdn.example.com/", "media/");

        for name in ["a.txt", "images/cat.png", "images\\2024\\dog.png", ""] {
            let expected = format!(
                "https://cdn.example.com/media/{}",
                name.replace('\\', "/")
            );
            assert_eq!(storage.url(name), expected);
        }
    }

    #[test]
    fn test_url_without_base_dir() {
        let storage = storage("https://cdn.example.com", "");
        assert_eq!(storage.url("a\\b.txt"), "https://cdn.example.com/a/b.txt");
    }

    #[test]
    fn test_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), 0);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1024"));
        assert_eq!(content_length(&headers), 1024);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("n/a"));
        assert_eq!(content_length(&headers), 0);
    }
}
