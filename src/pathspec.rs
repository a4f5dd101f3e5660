use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::GscpError;

/// Schemes we accept for the source url. The endpoint override makes the
/// same client work against any S3-compatible store, so both are wired to
/// the one agent.
const SCHEMES: &[&str] = &["gs", "s3"];

/// A parsed `scheme://bucket[/prefix]` source argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    pub bucket: String,
    pub prefix: String,
}

impl SourcePath {
    pub fn parse(src_url: &str) -> Result<Self, GscpError> {
        let url = Url::parse(src_url)
            .map_err(|e| GscpError::InvalidSourceUrl(format!("{}: {}", src_url, e)))?;

        if !SCHEMES.contains(&url.scheme()) {
            return Err(GscpError::InvalidSourceUrl(format!(
                "{}: unsupported scheme '{}'",
                src_url,
                url.scheme()
            )));
        }

        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_owned(),
            _ => {
                return Err(GscpError::InvalidSourceUrl(format!(
                    "{}: missing bucket name",
                    src_url
                )))
            }
        };

        // No path component means an empty prefix
        let prefix = url.path().trim_start_matches('/').to_owned();

        Ok(Self { bucket, prefix })
    }
}

/// Validate the destination argument and make sure the root directory
/// exists before any worker writes under it.
pub fn resolve_destination(dst: &str) -> Result<PathBuf, GscpError> {
    let path = Path::new(dst);
    if path.exists() && !path.is_dir() {
        return Err(GscpError::InvalidDestination(format!(
            "{}: exists and is not a directory",
            dst
        )));
    }
    fs::create_dir_all(path)
        .map_err(|e| GscpError::InvalidDestination(format!("{}: {}", dst, e)))?;
    fs::canonicalize(path).map_err(|e| GscpError::InvalidDestination(format!("{}: {}", dst, e)))
}

/// Map an object key to its local destination path. The key hierarchy is
/// mirrored under `dst_root` after stripping the source prefix; a key that
/// is itself the prefix (a single literal object) lands at its basename.
pub fn local_path_for(dst_root: &Path, key: &str, prefix: &str) -> PathBuf {
    if prefix.is_empty() {
        return dst_root.join(key.trim_start_matches('/'));
    }
    if key == prefix {
        return dst_root.join(basename(key));
    }
    match key.strip_prefix(prefix) {
        Some(rest) => dst_root.join(rest.trim_start_matches('/')),
        // The provider only returns keys under the requested prefix, but
        // fall back to the basename rather than escaping dst_root.
        None => dst_root.join(basename(key)),
    }
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
