use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use log::debug;
use tokio::sync::Notify;

/// Cooperative, one-way cancellation signal shared by a run and whoever may stop it.
///
/// Clones share state. Cancelling is idempotent and may happen from any task or
/// thread, including while a capture is in flight.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            debug!("cancellation requested.");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Completes once the token is cancelled, immediately if it already is.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // register before checking the flag so a concurrent request_cancel cannot slip between
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, timeout};

    use super::*;

    #[test]
    fn starts_active_and_stays_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.request_cancel();
        assert!(token.is_cancelled());
        token.request_cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let a = CancelToken::new();
        let b = a.clone();
        b.request_cancel();
        assert!(a.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_returns_at_once_when_already_cancelled() {
        let token = CancelToken::new();
        token.request_cancel();
        assert!(timeout(Duration::from_millis(1), token.cancelled()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wakes_every_waiter() {
        let token = CancelToken::new();
        let waiters: Vec<_> = (0..3).map(|_| {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        }).collect();

        sleep(Duration::from_millis(10)).await;
        token.request_cancel();

        for w in waiters {
            assert!(timeout(Duration::from_millis(1), w).await.is_ok());
        }
    }

    #[test]
    fn cancel_from_another_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.request_cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}
