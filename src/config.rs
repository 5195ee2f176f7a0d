use std::path::{Path, PathBuf};

use derive_debug::Dbg;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config ({path:?}): {error}")]
    Read {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config ({path:?}): {error}")]
    Parse {
        error: serde_yaml::Error,
        path: PathBuf,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: Storage,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    pub s3: S3,
    /// Local file to upload. The same string is used as the object key.
    pub files: String,
}

#[derive(Deserialize, Dbg, Clone, PartialEq, Eq)]
pub struct S3 {
    pub bucket: String,
    pub region: String,
    pub key_id: String,
    #[dbg(skip)]
    pub access_key: String,
    pub acl: String,
    /// Overrides the regional AWS endpoint, e.g. for MinIO or R2.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn from_yaml(src: &str, path: &Path) -> Result<Self, Error> {
        serde_yaml::from_str(src).map_err(|error| Error::Parse {
            error,
            path: path.to_owned(),
        })
    }
}

pub async fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
    let path = path.as_ref();
    let src = tokio::fs::read_to_string(path)
        .await
        .map_err(|error| Error::Read {
            error,
            path: path.to_owned(),
        })?;
    Config::from_yaml(&src, path)
}
