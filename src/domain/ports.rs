use crate::domain::model::Timestamp;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Readable body of a stored object.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// File storage capability contract.
///
/// A backend is interchangeable with any other implementation of this trait;
/// every method addresses objects by a key relative to the backend's base
/// directory.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes `content` under `name` and returns the name it was stored as.
    async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

    /// Opens the stored object for reading.
    async fn open(&self, name: &str) -> Result<ObjectReader>;

    async fn delete(&self, name: &str) -> Result<()>;

    async fn exists(&self, name: &str) -> Result<bool>;

    /// Public URL of the object. Never touches the network.
    fn url(&self, name: &str) -> String;

    /// Size in bytes, 0 when the backend does not report one.
    async fn size(&self, name: &str) -> Result<u64>;

    /// Lists `path` as `(directories, files)`.
    async fn listdir(&self, path: &str) -> Result<(Vec<String>, Vec<String>)>;

    async fn get_created_time(&self, name: &str) -> Result<Timestamp>;

    async fn get_modified_time(&self, name: &str) -> Result<Timestamp>;
}
