use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::{ObjectCannedAcl, ServerSideEncryption},
};
use tracing::debug;

use crate::{config, storage};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid region: {0:?}")]
    InvalidRegion(String),
    #[error("{0}")]
    Service(String),
}

fn service_error(error: impl std::error::Error) -> Error {
    Error::Service(DisplayErrorContext(error).to_string())
}

fn validate_region(region: &str) -> Result<(), Error> {
    let valid = !region.is_empty()
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidRegion(region.to_owned()))
    }
}

pub struct Client {
    client: aws_sdk_s3::Client,
}

impl Client {
    /// Builds a client from static credentials. Ambient credentials
    /// (environment, profiles, instance metadata) are never consulted.
    pub async fn new(s3: &config::S3) -> Result<Self, Error> {
        validate_region(&s3.region)?;
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(Credentials::new(
                &s3.key_id,
                &s3.access_key,
                None, // static keys only, no session token
                None,
                "s3-smoke",
            ))
            .region(Region::new(s3.region.clone()));
        if let Some(endpoint) = &s3.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;
        debug!(region = %s3.region, endpoint = ?s3.endpoint, "s3 client ready");
        Ok(Self {
            client: aws_sdk_s3::Client::new(&config),
        })
    }
}

impl storage::Client for Client {
    type Error = Error;

    async fn put(&self, request: storage::PutObject) -> Result<(), Self::Error> {
        self.client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .acl(ObjectCannedAcl::from(request.acl.as_str()))
            .body(ByteStream::from(request.body))
            .content_type(request.content_type)
            .content_disposition(request.content_disposition)
            .server_side_encryption(ServerSideEncryption::from(
                request.server_side_encryption.as_str(),
            ))
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn get(&self, bucket: String, key: String) -> Result<storage::GetObject, Self::Error> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(service_error)?;
        Ok(storage::GetObject {
            content_length: output.content_length(),
            content_type: output.content_type().map(str::to_owned),
        })
    }

    async fn delete(&self, bucket: String, key: String) -> Result<(), Self::Error> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }
}
