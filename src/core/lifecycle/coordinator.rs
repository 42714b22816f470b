//! Shutdown coordination for the process.

use super::context::CancelContext;
use super::signals::{record_signal, spawn_listener, SignalSender, TerminationSignal};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{watch, OnceCell};
use tokio::task::JoinHandle;

/// Coordinator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Normal operation
    Running,
    /// Shutdown triggered; hooks may be running
    ShuttingDown,
    /// Every hook has run
    Terminated,
}

/// Why the process is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// An OS termination signal arrived
    Signal(TerminationSignal),
    /// The context was cancelled from code
    Cancelled,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(signal) => write!(f, "signal {signal}"),
            ShutdownReason::Cancelled => f.write_str("context cancelled"),
        }
    }
}

enum HookFn {
    Sync(Box<dyn FnOnce() + Send>),
    Async(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>),
}

struct ShutdownHook {
    name: String,
    run: HookFn,
}

/// Owns the process context, the signal channel and the shutdown hooks
///
/// `shutdown()` cancels the context exactly once no matter how often or from
/// how many tasks it is called. `wait()` drains hooks exactly once; every
/// concurrent caller unblocks when that single drain completes.
///
/// # Examples
///
/// ```
/// use rkboot::core::lifecycle::{LifecycleCoordinator, ShutdownReason};
///
/// # #[tokio::main]
/// # async fn main() {
/// let coordinator = LifecycleCoordinator::new();
/// coordinator.add_shutdown_hook("flush", || println!("flushing"));
///
/// coordinator.shutdown();
/// assert_eq!(coordinator.wait().await, ShutdownReason::Cancelled);
/// # }
/// ```
pub struct LifecycleCoordinator {
    cancel_tx: watch::Sender<bool>,
    signal_tx: SignalSender,
    hooks: Mutex<Vec<ShutdownHook>>,
    state: Mutex<LifecycleState>,
    reason: Mutex<Option<ShutdownReason>>,
    shutdown_once: AtomicBool,
    drained: OnceCell<ShutdownReason>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

/// Poison-tolerant lock; hook and state updates are single assignments
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl LifecycleCoordinator {
    /// Creates a running coordinator with a fresh context
    ///
    /// Signals are not intercepted until [`listen_for_signals`](Self::listen_for_signals)
    /// is called.
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        let (signal_tx, _) = watch::channel(None);
        Self {
            cancel_tx,
            signal_tx: Arc::new(signal_tx),
            hooks: Mutex::new(Vec::new()),
            state: Mutex::new(LifecycleState::Running),
            reason: Mutex::new(None),
            shutdown_once: AtomicBool::new(false),
            drained: OnceCell::new(),
            listener: Mutex::new(None),
        }
    }

    /// Starts the background signal listener; calling it again is a no-op
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen_for_signals(&self) {
        let mut listener = lock(&self.listener);
        if listener.is_some() {
            return;
        }
        *listener = Some(spawn_listener(self.signal_tx.clone(), self.context()));
        tracing::debug!("Signal listener started");
    }

    /// A context that is cancelled when shutdown begins
    pub fn context(&self) -> CancelContext {
        CancelContext::new(self.cancel_tx.subscribe())
    }

    pub fn state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    /// The recorded shutdown reason, once shutdown has been observed by `wait`
    pub fn reason(&self) -> Option<ShutdownReason> {
        *lock(&self.reason)
    }

    /// True once `shutdown()` has fired or the drain has finished
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Cancels the context; only the first call has any effect
    ///
    /// Returns true for the call that performed the cancellation.
    pub fn shutdown(&self) -> bool {
        if self
            .shutdown_once
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.enter_shutting_down();
        self.cancel_tx.send_replace(true);
        tracing::info!("Shutdown requested");
        true
    }

    /// Records a termination signal as if the listener had received it
    ///
    /// The first signal wins; later ones are ignored.
    pub fn notify_signal(&self, signal: TerminationSignal) -> bool {
        let recorded = record_signal(&self.signal_tx, signal);
        if recorded {
            self.enter_shutting_down();
        }
        recorded
    }

    /// Registers a hook that runs during the drain, in registration order
    ///
    /// Hooks added after the drain has started are not run.
    pub fn add_shutdown_hook<F>(&self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push_hook(name.into(), HookFn::Sync(Box::new(hook)));
    }

    /// Registers an async hook; it is awaited before the next hook starts
    pub fn add_async_shutdown_hook<F, Fut>(&self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.push_hook(
            name.into(),
            HookFn::Async(Box::new(move || Box::pin(hook()) as BoxFuture<'static, ()>)),
        );
    }

    fn push_hook(&self, name: String, run: HookFn) {
        if self.drained.initialized() || self.state() == LifecycleState::Terminated {
            tracing::warn!(hook = %name, "Shutdown hook registered after drain; it will not run");
            return;
        }
        lock(&self.hooks).push(ShutdownHook { name, run });
    }

    /// Blocks until shutdown is triggered, then runs every hook once
    ///
    /// Returns the reason shutdown was triggered. Hooks run sequentially with
    /// no timeout; a hook that never returns blocks the drain.
    pub async fn wait(&self) -> ShutdownReason {
        *self.drained.get_or_init(|| self.drain()).await
    }

    async fn drain(&self) -> ShutdownReason {
        let mut cancel_rx = self.cancel_tx.subscribe();
        let mut signal_rx = self.signal_tx.subscribe();

        let signal_wait = async {
            match signal_rx.wait_for(Option::is_some).await {
                Ok(signal) => *signal,
                Err(_) => None,
            }
        };
        let cancel_wait = async {
            let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
        };

        let reason = tokio::select! {
            biased;
            signal = signal_wait => signal.map_or(ShutdownReason::Cancelled, ShutdownReason::Signal),
            _ = cancel_wait => ShutdownReason::Cancelled,
        };

        self.enter_shutting_down();
        *lock(&self.reason) = Some(reason);
        tracing::info!(reason = %reason, "Shutting down");

        let hooks = std::mem::take(&mut *lock(&self.hooks));
        for hook in hooks {
            tracing::debug!(hook = %hook.name, "Running shutdown hook");
            match hook.run {
                HookFn::Sync(f) => f(),
                HookFn::Async(f) => f().await,
            }
        }

        // Entries watching the context stop even when a signal, not
        // shutdown(), triggered the drain.
        self.shutdown();
        *lock(&self.state) = LifecycleState::Terminated;
        tracing::info!(reason = %reason, "Shutdown complete");
        reason
    }

    fn enter_shutting_down(&self) {
        let mut state = lock(&self.state);
        if *state == LifecycleState::Running {
            *state = LifecycleState::ShuttingDown;
        }
    }
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LifecycleCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.listener).take() {
            handle.abort();
        }
    }
}

impl fmt::Debug for LifecycleCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCoordinator")
            .field("state", &self.state())
            .field("reason", &self.reason())
            .field("hooks", &lock(&self.hooks).len())
            .finish()
    }
}
