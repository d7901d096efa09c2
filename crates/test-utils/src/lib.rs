pub mod builders;
pub mod sources;
pub mod surfaces;

use std::sync::Once;
use std::time::Duration;

use foldernotify::logging::{env_filter, LOG_ENV};

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness, filtered like the binary
/// (`FOLDERNOTIFY_LOG=foldernotify=debug cargo test -- --nocapture`).
///
/// Output of passing tests stays hidden unless `--nocapture` is given.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = env_filter(std::env::var(LOG_ENV).ok().as_deref());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `f` takes longer than 5 seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test timed out after 5 seconds")
}
