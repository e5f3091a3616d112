// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tgd: the Tollgate job admission daemon

use std::sync::Arc;

use tg_daemon::{env, logging, startup, Config, Housekeeping, LifecycleError, ListenCtx, Listener};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("tgd: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LifecycleError> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config.log_dir)?;
    info!(state_dir = %config.state_dir.display(), version = env::PROTOCOL_VERSION, "starting tgd");

    let result = startup(&config).await?;
    let mut daemon = result.daemon;

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(ListenCtx {
        scheduler: daemon.scheduler.clone(),
        shutdown: shutdown.clone(),
        ipc_timeout: config.ipc_timeout,
    });
    let listener = tokio::spawn(Listener::new(result.listener, ctx).run(shutdown.clone()));
    let housekeeping = Housekeeping::new(
        daemon.scheduler.clone(),
        config.evict_interval,
        config.retention,
    )
    .spawn(shutdown.clone());

    println!("READY");

    tokio::select! {
        _ = shutdown.cancelled() => info!("shutdown requested"),
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("failed to listen for ctrl-c: {}", e);
            }
            info!("interrupted");
            shutdown.cancel();
        }
    }

    if let Err(e) = listener.await {
        error!("listener task failed: {}", e);
    }
    if let Err(e) = housekeeping.await {
        error!("housekeeping task failed: {}", e);
    }
    daemon.shutdown()
}
