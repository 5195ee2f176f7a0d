//! Loader, client factory and lifecycle driver chained into one run.

use std::path::Path;

use tracing::info;

use crate::{
    Error, config,
    lifecycle::{Lifecycle, Target},
    storage,
};

/// Client factory for the real service.
pub async fn connect_s3(s3: config::S3) -> Result<storage::s3::Client, Error> {
    Ok(storage::s3::Client::new(&s3).await?)
}

/// Loads the config at `path`, builds a client with `connect` and runs the
/// lifecycle against it. `connect` is only called once the config has
/// parsed.
pub async fn run<C, F, Fut>(path: &Path, connect: F) -> Result<Lifecycle<C>, Error>
where
    C: storage::Client,
    F: FnOnce(config::S3) -> Fut,
    Fut: Future<Output = Result<C, Error>>,
{
    let config = config::load(path).await?;
    info!("Bucket: {}", config.storage.s3.bucket);
    let client = connect(config.storage.s3.clone()).await?;
    let target = Target::from(&config);
    let mut lifecycle = Lifecycle::new(client);
    lifecycle.run(&target).await?;
    Ok(lifecycle)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::{
        lifecycle::Stage,
        storage::memory::{self, Call, Operation},
    };

    use super::*;

    fn connect_memory(
        called: &Cell<bool>,
    ) -> impl FnOnce(config::S3) -> std::future::Ready<Result<memory::Client, Error>> + '_ {
        move |_| {
            called.set(true);
            std::future::ready(Ok(memory::Client::new()))
        }
    }

    #[tokio::test]
    async fn missing_config_never_connects() {
        let dir = tempfile::tempdir().unwrap();
        let called = Cell::new(false);

        let error = run(&dir.path().join("config.yaml"), connect_memory(&called))
            .await
            .err()
            .unwrap();

        assert!(matches!(error, Error::Config(config::Error::Read { .. })));
        assert!(!called.get());
    }

    #[tokio::test]
    async fn malformed_config_never_connects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "storage:\n  s3: [bucket\n").unwrap();
        let called = Cell::new(false);

        let error = run(&path, connect_memory(&called)).await.err().unwrap();

        assert!(matches!(error, Error::Config(config::Error::Parse { .. })));
        assert!(!called.get());
    }

    #[tokio::test]
    async fn factory_failure_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("x.txt");
        std::fs::write(&payload, "hello").unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                "storage:\n  s3:\n    bucket: b\n    region: not a region\n    key_id: AKID\n    access_key: SECRET\n    acl: private\n  files: {}\n",
                payload.display()
            ),
        )
        .unwrap();

        let error = run(&path, connect_s3).await.err().unwrap();

        assert!(matches!(error, Error::Session(_)));
    }

    #[tokio::test]
    async fn configured_file_goes_through_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("x.txt");
        std::fs::write(&payload, "hello").unwrap();
        let key = payload.to_str().unwrap().to_owned();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                "storage:\n  s3:\n    bucket: b\n    region: r\n    key_id: AKID\n    access_key: SECRET\n    acl: private\n  files: {key}\n"
            ),
        )
        .unwrap();
        let called = Cell::new(false);

        let lifecycle = run(&path, connect_memory(&called)).await.unwrap();

        assert!(called.get());
        assert_eq!(lifecycle.stage(), Stage::Done);
        let calls = lifecycle.client().calls().await;
        let expected: Vec<_> = [Operation::Put, Operation::Get, Operation::Delete]
            .into_iter()
            .map(|operation| Call {
                operation,
                bucket: "b".into(),
                key: key.clone(),
            })
            .collect();
        assert_eq!(calls, expected);
    }
}
