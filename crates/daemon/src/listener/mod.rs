// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each accepted connection carries one request and one response. Requests
//! go straight to the scheduler, whose operations never block on job
//! execution, so handlers run inline in the connection task.

use std::sync::Arc;
use std::time::Duration;

use tg_core::{Clock, SystemClock};
use tg_engine::{JobFilter, Scheduler, SchedulerError};
use tg_wire::{self as protocol, JobDetail, KindStatsDetail, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::env::PROTOCOL_VERSION;

/// Shared daemon context for all request handlers.
pub struct ListenCtx<C: Clock = SystemClock> {
    pub scheduler: Scheduler<C>,
    /// Cancelled by a `Shutdown` request.
    pub shutdown: CancellationToken,
    pub ipc_timeout: Duration,
}

/// Listener task for accepting socket connections.
pub struct Listener<C: Clock = SystemClock> {
    unix: UnixListener,
    ctx: Arc<ListenCtx<C>>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl<C: Clock> Listener<C> {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx<C>>) -> Self {
        Self { unix, ctx }
    }

    /// Accept connections until `cancel` fires, spawning a task for each.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("listener stopped");
                    return;
                }
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("Unix accept error: {}", e),
                },
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// Generic over reader/writer types so tests can drive it over an in-memory
/// pipe.
pub(crate) async fn handle_connection<R, W, C>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx<C>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
    C: Clock,
{
    let request = protocol::read_request(&mut reader, ctx.ipc_timeout).await?;

    // Log polling at debug level, other requests at info
    if matches!(request, Request::Status { .. } | Request::List { .. } | Request::Stats | Request::Ping) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx);
    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, ctx.ipc_timeout).await?;
    Ok(())
}

/// Handle a single request and return a response.
fn handle_request<C: Clock>(request: Request, ctx: &ListenCtx<C>) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello { version: PROTOCOL_VERSION.to_string() },

        Request::Submit { owner, kind, payload } => {
            if owner.trim().is_empty() {
                return Response::Error { message: "owner must not be empty".to_string() };
            }
            match ctx.scheduler.submit(owner, kind, payload) {
                Ok(id) => Response::Submitted { job_id: id.to_string() },
                Err(SchedulerError::RateLimited { retry_after, .. }) => {
                    Response::RateLimited { retry_after_secs: retry_after.as_secs() }
                }
                Err(e) => Response::Error { message: e.to_string() },
            }
        }

        Request::Status { id } => match ctx.scheduler.status(&id) {
            Ok(record) => Response::Job { job: Box::new(JobDetail::from(&record)) },
            Err(_) => Response::NotFound { id },
        },

        Request::List { state, kind } => {
            let jobs = ctx.scheduler.list(&JobFilter { state, kind });
            Response::Jobs { jobs: jobs.iter().map(JobDetail::from).collect() }
        }

        Request::Stats => {
            let kinds = ctx
                .scheduler
                .stats()
                .into_iter()
                .map(|s| KindStatsDetail {
                    kind: s.kind,
                    pending: s.pending,
                    running: s.running,
                    max_concurrent: s.max_concurrent,
                })
                .collect();
            Response::Stats { kinds }
        }

        Request::Shutdown => {
            ctx.shutdown.cancel();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
