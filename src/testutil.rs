//! In-memory object store for exercising the lister and the worker pool
//! without a network.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};

use crate::error::GscpError;
use crate::store::{ObjectDescriptor, ObjectPage, ObjectStore};

pub struct MemStore {
    pub objects: BTreeMap<String, Vec<u8>>,
    pub fail_keys: HashSet<String>,
    pub fail_listing: bool,
    pub page_size: usize,
}

impl Default for MemStore {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            fail_keys: HashSet::new(),
            fail_listing: false,
            page_size: 1000,
        }
    }
}

impl MemStore {
    pub fn insert(&mut self, key: &str, bytes: &[u8]) {
        self.objects.insert(key.to_owned(), bytes.to_vec());
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        token: Option<String>,
    ) -> Result<ObjectPage, GscpError> {
        if self.fail_listing {
            return Err(GscpError::Listing("injected listing failure".to_owned()));
        }

        // Delimiter semantics follow ListObjectsV2: keys containing the
        // delimiter past the prefix are rolled up and not returned.
        let matching: Vec<&str> = self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| match delimiter {
                Some(delim) => !key[prefix.len()..].contains(delim),
                None => true,
            })
            .map(|key| key.as_str())
            .collect();

        let start = token
            .as_deref()
            .and_then(|t| t.parse::<usize>().ok())
            .unwrap_or(0);
        let objects: Vec<ObjectDescriptor> = matching
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|key| ObjectDescriptor {
                bucket: "mem".to_owned(),
                key: (*key).to_owned(),
                size: self.objects.get(*key).map(|b| b.len() as u64),
            })
            .collect();

        let next_token = if start + self.page_size < matching.len() {
            Some((start + self.page_size).to_string())
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn read_object(&self, key: &str) -> Result<Vec<u8>, GscpError> {
        if self.fail_keys.contains(key) {
            return Err(GscpError::Download {
                key: key.to_owned(),
                message: "injected download failure".to_owned(),
            });
        }
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| GscpError::Download {
                key: key.to_owned(),
                message: "no such key".to_owned(),
            })
    }
}
