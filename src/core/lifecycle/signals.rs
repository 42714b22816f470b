//! OS signal handling.
//!
//! A background task listens for SIGHUP, SIGINT, SIGTERM and SIGQUIT (Ctrl+C
//! only on non-Unix targets) and records them on the coordinator's signal
//! channel instead of letting them kill the process. The task stops once the
//! coordinator's context is cancelled.

use super::context::CancelContext;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Termination signals routed into the lifecycle coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Hangup,
    Interrupt,
    Terminate,
    Quit,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationSignal::Hangup => "SIGHUP",
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Quit => "SIGQUIT",
        };
        f.write_str(s)
    }
}

pub(crate) type SignalSender = Arc<watch::Sender<Option<TerminationSignal>>>;

/// Stores `signal` unless an earlier one was already recorded
///
/// Returns true when this call recorded the signal.
pub(crate) fn record_signal(tx: &SignalSender, signal: TerminationSignal) -> bool {
    tx.send_if_modified(|current| {
        if current.is_none() {
            *current = Some(signal);
            true
        } else {
            false
        }
    })
}

/// Spawns the listener task; it must run inside a tokio runtime
pub(crate) fn spawn_listener(tx: SignalSender, ctx: CancelContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut streams = match SignalStreams::register() {
            Ok(streams) => streams,
            Err(e) => {
                tracing::error!(error = %e, "Failed to register signal handlers");
                return;
            }
        };

        loop {
            tokio::select! {
                signal = streams.next() => {
                    if record_signal(&tx, signal) {
                        tracing::info!(signal = %signal, "Received termination signal, initiating graceful shutdown");
                    } else {
                        tracing::warn!(signal = %signal, "Termination signal received while already shutting down");
                    }
                }
                _ = ctx.cancelled() => {
                    tracing::debug!("Signal listener stopped");
                    return;
                }
            }
        }
    })
}

#[cfg(unix)]
struct SignalStreams {
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalStreams {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    async fn next(&mut self) -> TerminationSignal {
        tokio::select! {
            _ = self.hangup.recv() => TerminationSignal::Hangup,
            _ = self.interrupt.recv() => TerminationSignal::Interrupt,
            _ = self.terminate.recv() => TerminationSignal::Terminate,
            _ = self.quit.recv() => TerminationSignal::Quit,
        }
    }
}

#[cfg(not(unix))]
struct SignalStreams;

#[cfg(not(unix))]
impl SignalStreams {
    fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> TerminationSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        TerminationSignal::Interrupt
    }
}
