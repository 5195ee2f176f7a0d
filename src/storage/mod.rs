//! Object storage access
//!
//! The lifecycle driver talks to storage only through [`Client`]. The S3
//! implementation is used by the binary; the in-memory one backs the
//! crate's tests.

#[cfg(test)]
pub mod memory;
pub mod s3;

/// Content disposition sent with every upload.
pub const CONTENT_DISPOSITION: &str = "attachment";
/// Server-side encryption requested for every upload.
pub const SERVER_SIDE_ENCRYPTION: &str = "AES256";

/// Put object request.
#[derive(derive_debug::Dbg, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub acl: String,
    #[dbg(skip)]
    pub body: bytes::Bytes,
    pub content_type: String,
    pub content_disposition: String,
    pub server_side_encryption: String,
}

/// What the service reported for a fetched object. The body itself is
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetObject {
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
}

pub trait Client {
    type Error: std::error::Error + Send + Sync + 'static;

    fn put(&self, request: PutObject) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn get(
        &self,
        bucket: String,
        key: String,
    ) -> impl Future<Output = Result<GetObject, Self::Error>> + Send;

    fn delete(
        &self,
        bucket: String,
        key: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
