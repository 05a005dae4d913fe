use log::warn;
use tokio::sync::oneshot;

use crate::capture::CaptureError;

/// Terminal result of a run.
#[derive(Debug)]
pub enum Outcome {
    Succeeded,
    Failed(CaptureError),
    Cancelled,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// What the caller gets back once a run has terminated.
#[derive(Debug)]
pub struct Report {
    pub outcome: Outcome,
    pub total: u32,
    pub taken: u32,
}

/// Write half of a run's result.
///
/// Every resolve method consumes the resolver, so a run resolves at most once.
/// A resolver dropped without resolving (aborted or panicked task) closes the
/// channel instead, leaving the caller to find out why from the task itself.
pub struct Resolver {
    tx: Option<oneshot::Sender<Outcome>>,
}

pub(crate) fn channel() -> (Resolver, oneshot::Receiver<Outcome>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx: Some(tx) }, rx)
}

impl Resolver {
    pub fn succeeded(self) {
        self.resolve(Outcome::Succeeded);
    }

    pub fn failed(self, e: CaptureError) {
        self.resolve(Outcome::Failed(e));
    }

    pub fn cancelled(self) {
        self.resolve(Outcome::Cancelled);
    }

    fn resolve(mut self, outcome: Outcome) {
        if let Some(tx) = self.tx.take() {
            // receiver gone means nobody is waiting for the result anymore
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if self.tx.take().is_some() {
            warn!("run ended without a result.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_resolution_is_observed() {
        let (resolver, mut rx) = channel();
        resolver.succeeded();
        assert!(matches!(rx.try_recv(), Ok(Outcome::Succeeded)));
    }

    #[test]
    fn failure_carries_the_error() {
        let (resolver, mut rx) = channel();
        resolver.failed(CaptureError::Module("shutter jammed".into()));
        match rx.try_recv() {
            Ok(Outcome::Failed(CaptureError::Module(e))) => assert_eq!(e.to_string(), "shutter jammed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dropped_resolver_closes_without_an_outcome() {
        let (resolver, mut rx) = channel();
        drop(resolver);
        assert!(matches!(rx.try_recv(), Err(oneshot::error::TryRecvError::Closed)));
    }

    #[test]
    fn resolving_without_a_receiver_is_silent() {
        let (resolver, rx) = channel();
        drop(rx);
        resolver.cancelled();
    }
}
