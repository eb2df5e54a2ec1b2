//! S3-backed [`ObjectStore`].
//!
//! Credentials come from the default AWS provider chain (environment,
//! profile, instance metadata). An explicit endpoint switches to path-style
//! addressing for S3-compatible services such as R2 or `MinIO`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3 as s3;
use aws_sdk_s3::error::DisplayErrorContext;
use chrono::{DateTime, Utc};

use super::{FetchedObject, ObjectStore, StoreError};
use crate::types::CandidateKey;

/// Connection settings for [`S3Store`].
#[derive(Debug, Clone)]
pub struct S3Config {
    /// AWS region, e.g. `us-east-1`.
    pub region: String,
    /// Bucket to query.
    pub bucket: String,
    /// Custom S3-compatible endpoint.
    pub endpoint: Option<String>,
}

/// Client for a single bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: s3::Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the default credential chain.
    pub async fn new(config: S3Config) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(s3::config::Region::new(config.region))
            .load()
            .await;

        let mut builder = s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: s3::Client::from_conf(builder.build()),
            bucket: config.bucket,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<CandidateKey>, StoreError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| StoreError::List {
                bucket: self.bucket.clone(),
                prefix: prefix.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let last_modified = object
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_default();
                keys.push(CandidateKey::new(key, last_modified));
            }
        }

        tracing::debug!(bucket = %self.bucket, prefix, count = keys.len(), "listed keys");
        Ok(keys)
    }

    async fn fetch(&self, key: &str) -> Result<FetchedObject, StoreError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Fetch {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let content_length = resp.content_length().and_then(|len| u64::try_from(len).ok());

        Ok(FetchedObject {
            body: Box::pin(resp.body.into_async_read()),
            content_length,
        })
    }
}
