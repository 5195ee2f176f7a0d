//! Object lifecycle driver
//!
//! Uploads one local file, fetches it back to confirm it exists, then
//! deletes it. The first failure aborts the run; nothing is rolled back, so
//! an object whose verification failed stays in the bucket.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::{Error, config, sniff, storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Uploading,
    Verifying,
    Deleting,
    Done,
    Failed,
}

/// The single object a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub bucket: String,
    pub key: String,
    pub acl: String,
    pub path: PathBuf,
}

impl From<&config::Config> for Target {
    fn from(config: &config::Config) -> Self {
        Self {
            bucket: config.storage.s3.bucket.clone(),
            key: config.storage.files.clone(),
            acl: config.storage.s3.acl.clone(),
            path: PathBuf::from(&config.storage.files),
        }
    }
}

pub struct Lifecycle<C> {
    client: C,
    stage: Stage,
}

impl<C: storage::Client> Lifecycle<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    /// Runs upload, verify and delete in order. Ends in [`Stage::Done`] or
    /// [`Stage::Failed`].
    pub async fn run(&mut self, target: &Target) -> Result<(), Error> {
        let result = self.drive(target).await;
        match &result {
            Ok(()) => self.enter(Stage::Done),
            Err(_) => self.enter(Stage::Failed),
        }
        result
    }

    async fn drive(&mut self, target: &Target) -> Result<(), Error> {
        self.enter(Stage::Uploading);
        self.upload(target).await?;
        self.enter(Stage::Verifying);
        self.verify(target).await?;
        self.enter(Stage::Deleting);
        self.delete(target).await
    }

    async fn upload(&self, target: &Target) -> Result<(), Error> {
        let body = tokio::fs::read(&target.path)
            .await
            .map_err(|error| Error::ReadPayload {
                error,
                path: target.path.clone(),
            })?;
        let content_type = sniff::detect_content_type(&body);
        info!(
            bucket = %target.bucket,
            key = %target.key,
            content_type,
            size = body.len(),
            "Upload file"
        );
        self.client
            .put(storage::PutObject {
                bucket: target.bucket.clone(),
                key: target.key.clone(),
                acl: target.acl.clone(),
                body: body.into(),
                content_type: content_type.to_owned(),
                content_disposition: storage::CONTENT_DISPOSITION.to_owned(),
                server_side_encryption: storage::SERVER_SIDE_ENCRYPTION.to_owned(),
            })
            .await
            .map_err(|error| Error::Put {
                error: Box::new(error),
                bucket: target.bucket.clone(),
                key: target.key.clone(),
            })?;
        info!("OK");
        Ok(())
    }

    async fn verify(&self, target: &Target) -> Result<(), Error> {
        info!(bucket = %target.bucket, key = %target.key, "Check file in bucket");
        let object = self
            .client
            .get(target.bucket.clone(), target.key.clone())
            .await
            .map_err(|error| Error::Get {
                error: Box::new(error),
                bucket: target.bucket.clone(),
                key: target.key.clone(),
            })?;
        debug!(?object, "object found");
        info!("OK");
        Ok(())
    }

    async fn delete(&self, target: &Target) -> Result<(), Error> {
        info!(bucket = %target.bucket, key = %target.key, "Remove file");
        self.client
            .delete(target.bucket.clone(), target.key.clone())
            .await
            .map_err(|error| Error::Delete {
                error: Box::new(error),
                bucket: target.bucket.clone(),
                key: target.key.clone(),
            })?;
        info!("OK");
        Ok(())
    }
}
