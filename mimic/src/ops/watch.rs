//! Watch operation - run the watch loop until Ctrl-C.

use std::time::Duration;

use eyre::{Context, Result};
use mimic_codegen::Pipeline;
use mimic_watch::{WatchTarget, Watcher};
use tokio::sync::watch;

/// Execute the watch operation.
///
/// Returns after Ctrl-C once the running tick has finished.
pub fn watch(pipeline: Pipeline, targets: Vec<WatchTarget>, period: Duration) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to start the watch runtime")?;

    runtime.block_on(async move {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("interrupted, finishing the current scan");
                    let _ = cancel_tx.send(true);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            }
        });

        let mut watcher = Watcher::new(pipeline, targets);
        watcher.run(period, cancel_rx).await;
    });

    Ok(())
}
