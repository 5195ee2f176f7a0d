use std::collections::HashMap;

use crate::storage;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no such key: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("injected {0:?} failure")]
    Injected(Operation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    Get,
    Delete,
}

/// One request as seen by the client, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: bytes::Bytes,
    pub content_type: String,
    pub acl: String,
    pub content_disposition: String,
    pub server_side_encryption: String,
}

/// In-process object store. Requests are recorded even when they fail.
#[derive(Default)]
pub struct Client {
    objects: tokio::sync::Mutex<HashMap<(String, String), StoredObject>>,
    calls: tokio::sync::Mutex<Vec<Call>>,
    failing: Option<Operation>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every request of the given kind fail.
    pub fn failing_on(operation: Operation) -> Self {
        Self {
            failing: Some(operation),
            ..Self::default()
        }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .await
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Drops objects without recording a call, as if removed out of band.
    pub async fn evict(&self, bucket: &str, key: &str) {
        self.objects
            .lock()
            .await
            .remove(&(bucket.to_owned(), key.to_owned()));
    }

    async fn record(&self, operation: Operation, bucket: &str, key: &str) -> Result<(), Error> {
        self.calls.lock().await.push(Call {
            operation,
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        });
        match self.failing {
            Some(failing) if failing == operation => Err(Error::Injected(operation)),
            _ => Ok(()),
        }
    }
}

impl storage::Client for Client {
    type Error = Error;

    async fn put(&self, request: storage::PutObject) -> Result<(), Self::Error> {
        self.record(Operation::Put, &request.bucket, &request.key)
            .await?;
        self.objects.lock().await.insert(
            (request.bucket, request.key),
            StoredObject {
                body: request.body,
                content_type: request.content_type,
                acl: request.acl,
                content_disposition: request.content_disposition,
                server_side_encryption: request.server_side_encryption,
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: String, key: String) -> Result<storage::GetObject, Self::Error> {
        self.record(Operation::Get, &bucket, &key).await?;
        let objects = self.objects.lock().await;
        let object = objects
            .get(&(bucket.clone(), key.clone()))
            .ok_or(Error::NotFound { bucket, key })?;
        Ok(storage::GetObject {
            content_length: Some(object.body.len() as i64),
            content_type: Some(object.content_type.clone()),
        })
    }

    async fn delete(&self, bucket: String, key: String) -> Result<(), Self::Error> {
        self.record(Operation::Delete, &bucket, &key).await?;
        // S3 reports success for missing keys as well
        self.objects.lock().await.remove(&(bucket, key));
        Ok(())
    }
}
