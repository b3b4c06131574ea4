//! The publish module stores assembled pages, either in an S3 bucket or in a
//! local directory for dry runs.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use log::debug;
use std::fs;
use std::future::Future;
use std::path::{Component, Path, PathBuf};

use crate::constants::HTML_CONTENT_TYPE;
use crate::settings::Settings;

/// Destination for generated pages. Publishing to an existing key overwrites it.
pub trait Publisher {
    /// Stores `html` under `key` as `text/html`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page can't be stored.
    fn publish(&self, key: &str, html: &str) -> impl Future<Output = Result<()>>;
}

/// Publishes pages to an S3 bucket.
pub struct S3Publisher {
    client: Client,
    bucket: String,
}

impl S3Publisher {
    /// Creates a publisher for the bucket and region in `settings`, using the
    /// default AWS credential chain.
    pub async fn new(settings: &Settings) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
            bucket: settings.bucket.clone(),
        }
    }
}

impl Publisher for S3Publisher {
    async fn publish(&self, key: &str, html: &str) -> Result<()> {
        debug!("Uploading s3://{}/{key}", self.bucket);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(html.as_bytes().to_vec()))
            .content_type(HTML_CONTENT_TYPE)
            .send()
            .await
            .with_context(|| format!("Failed to upload s3://{}/{key}", self.bucket))?;

        Ok(())
    }
}

/// Writes pages below a local directory, keeping the key as relative path.
pub struct DirectoryPublisher {
    root: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of `key` below the root. Only plain path segments are
    /// accepted, so a key can't point outside the root.
    fn page_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = relative.components().next().is_some()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        anyhow::ensure!(is_plain, "Refusing to write page outside output directory: {key}");

        Ok(self.root.join(relative))
    }
}

impl Publisher for DirectoryPublisher {
    async fn publish(&self, key: &str, html: &str) -> Result<()> {
        let path = self.page_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        debug!("Writing {}", path.display());
        fs::write(&path, html).with_context(|| format!("Failed to write page: {}", path.display()))
    }
}
