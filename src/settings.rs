//! The settings module resolves the process-wide deployment settings once at startup.

use anyhow::{Context, Result};

use crate::constants::{BUCKET_ENV_PREFIX, REGION_ENV_NAME};

/// Deployment settings for a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Environment label selecting the destination bucket, e.g. `beta`
    pub environment: String,
    /// Region of the storage bucket
    pub region: String,
    /// Destination bucket name
    pub bucket: String,
}

impl Settings {
    /// Resolves settings for `environment` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `AWS_REGION` or `S3_BUCKET_<ENVIRONMENT>` is not set.
    pub fn from_env(environment: &str) -> Result<Self> {
        Self::from_lookup(environment, |name| std::env::var(name).ok())
    }

    /// Resolves settings for `environment` through `lookup`, which maps a
    /// variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the region or the environment's bucket variable is absent.
    pub fn from_lookup<F>(environment: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = lookup(REGION_ENV_NAME)
            .with_context(|| format!("{REGION_ENV_NAME} is not set"))?;

        let bucket_var = bucket_env_name(environment);
        let bucket = lookup(&bucket_var)
            .with_context(|| format!("{bucket_var} is not set for environment {environment}"))?;

        Ok(Self {
            environment: environment.to_owned(),
            region,
            bucket,
        })
    }

    /// Public static website address of the bucket.
    pub fn hosting_url(&self) -> String {
        hosting_url(&self.bucket, &self.region)
    }
}

/// Name of the variable holding the bucket for `environment`.
pub fn bucket_env_name(environment: &str) -> String {
    format!("{BUCKET_ENV_PREFIX}{}", environment.to_uppercase())
}

/// Static website hosting address for a bucket in a region.
pub fn hosting_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3-website-{region}.amazonaws.com/")
}
