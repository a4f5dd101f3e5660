use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::ProvideCredentials;
use aws_sdk_s3::Client;

use crate::error::GscpError;
use crate::store::{ObjectDescriptor, ObjectPage, ObjectStore};

// see:
// https://docs.aws.amazon.com/sdk-for-rust/latest/dg/rust_s3_code_examples.html

/// Storage client for one bucket, backed by the provider SDK. Credentials
/// come from the SDK's default chain (environment, shared credentials
/// file, profile) and are resolved once at construction.
#[derive(Clone, Debug)]
pub struct S3Agent {
    bucket: String,
    client: Client,
}

impl S3Agent {
    pub async fn new(
        bucket: &str,
        region: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<Self, GscpError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_owned()));
        }
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        // Fail on missing credentials now, before any listing or download
        match config.credentials_provider() {
            Some(provider) => {
                provider
                    .provide_credentials()
                    .await
                    .map_err(|e| GscpError::Auth(e.to_string()))?;
            }
            None => {
                return Err(GscpError::Auth(
                    "no credentials provider configured".to_owned(),
                ))
            }
        }

        // Path-style addressing for S3-compatible stores behind a custom
        // endpoint
        let builder = aws_sdk_s3::config::Builder::from(&config);
        let s3_config = if endpoint.is_some() {
            builder.force_path_style(true).build()
        } else {
            builder.build()
        };

        Ok(Self {
            bucket: bucket.to_owned(),
            client: Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Agent {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        token: Option<String>,
    ) -> Result<ObjectPage, GscpError> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix);
        if let Some(delimiter) = delimiter {
            req = req.delimiter(delimiter);
        }
        if let Some(token) = token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| GscpError::Listing(format!("bucket '{}': {}", self.bucket, e)))?;

        let objects = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| {
                obj.key.map(|key| ObjectDescriptor {
                    bucket: self.bucket.clone(),
                    key,
                    size: obj.size.map(|s| s as u64),
                })
            })
            .collect();

        let next_token = if resp.is_truncated == Some(true) {
            resp.next_continuation_token
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn read_object(&self, key: &str) -> Result<Vec<u8>, GscpError> {
        debug!("downloading {} from {}", key, self.bucket);

        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| GscpError::Download {
                key: key.to_owned(),
                message: e.to_string(),
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| GscpError::Download {
                key: key.to_owned(),
                message: e.to_string(),
            })?;

        Ok(data.into_bytes().to_vec())
    }
}
