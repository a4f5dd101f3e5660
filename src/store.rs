use async_trait::async_trait;

use crate::error::GscpError;

/// One object as reported by a listing call
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub bucket: String,
    pub key: String,
    pub size: Option<u64>,
}

/// A single page of listing results plus the token for the next page
#[derive(Debug, Default)]
pub struct ObjectPage {
    pub objects: Vec<ObjectDescriptor>,
    pub next_token: Option<String>,
}

/// The narrow slice of the provider SDK that gscp actually needs. Keeping
/// the core behind this seam lets the lister and the worker pool run
/// against an in-memory store in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of keys under `prefix`. A delimiter of `"/"` limits
    /// the results to immediate children.
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        token: Option<String>,
    ) -> Result<ObjectPage, GscpError>;

    /// Fetch the full contents of one object
    async fn read_object(&self, key: &str) -> Result<Vec<u8>, GscpError>;
}
