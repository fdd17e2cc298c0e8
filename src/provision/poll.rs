//! Poll policy for provisioning operations
//!
//! The wait between status checks is a fixed interval raced against an
//! optional cancellation signal, and the number of checks is bounded.

use std::time::Duration;

use tokio::sync::watch;

/// Delay between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Status checks before giving up (about ten minutes at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 300;

/// Progress reported before the first status check
pub const PROGRESS_START: u32 = 5;

/// Progress added per pending status check
pub const PROGRESS_STEP: u32 = 5;

/// Progress total; only reached once the operation is terminal
pub const PROGRESS_MAX: u32 = 100;

/// How to wait for a provisioning operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` waits for as long as the operation stays pending
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl PollPolicy {
    /// Whether `attempts` status checks exhaust the policy
    pub fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Monotonic progress estimate, capped below [`PROGRESS_MAX`]
#[derive(Debug, Clone, Copy)]
pub struct ProgressEstimate {
    step: u32,
}

impl ProgressEstimate {
    pub fn new() -> Self {
        Self {
            step: PROGRESS_START,
        }
    }

    pub fn current(&self) -> u32 {
        self.step
    }

    /// Advance one step unless that would reach the maximum
    pub fn advance(&mut self) -> u32 {
        if self.step + PROGRESS_STEP < PROGRESS_MAX {
            self.step += PROGRESS_STEP;
        }
        self.step
    }
}

impl Default for ProgressEstimate {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a linked cancel handle and token.
///
/// Calling [`CancelHandle::cancel`] interrupts a waiting poll loop; dropping
/// the handle without cancelling leaves the token pending forever.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // Receivers may already be gone; nothing to interrupt then
        let _ = self.tx.send(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Sleep for `interval`; returns `false` if cancelled first
pub async fn wait(interval: Duration, cancel: Option<&CancelToken>) -> bool {
    match cancel {
        Some(token) => {
            let mut token = token.clone();
            tokio::select! {
                _ = tokio::time::sleep(interval) => true,
                _ = token.cancelled() => false,
            }
        }
        None => {
            tokio::time::sleep(interval).await;
            true
        }
    }
}
