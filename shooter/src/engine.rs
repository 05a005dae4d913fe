use std::time::Duration;

use chrono::Local;
use log::{debug, error, info, warn};
use tokio::{sync::{mpsc::{self, error::TrySendError}, oneshot, watch}, task::JoinHandle, time::sleep};

use crate::cancel::CancelToken;
use crate::capture::{Capture, CaptureCommand, CaptureError, CaptureResult};
use crate::job::Job;
use crate::outcome::{self, Outcome, Report, Resolver};

/// Pause between shots when no interval is configured. gphoto2 cameras report
/// busy if the next capture follows immediately.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Capturing,
    Waiting,
    Succeeded,
    Failed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed | Phase::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    pub remaining: u32,
}

/// Runs batches of captures: one shot at a time, paced, cancellable between and during pauses.
#[derive(Clone)]
pub struct Shooter {
    settle: Duration,
    sink: Option<mpsc::Sender<CaptureResult>>,
}

impl Default for Shooter {
    fn default() -> Self {
        Shooter::new(DEFAULT_SETTLE)
    }
}

impl Shooter {
    pub fn new(settle: Duration) -> Self {
        Shooter { settle, sink: None }
    }

    /// Hands every successful capture to `sink`. A full queue drops the result, never stalls the run.
    pub fn with_sink(mut self, sink: mpsc::Sender<CaptureResult>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Spawns the run onto the current tokio runtime.
    pub fn start(&self, job: Job, mut camera: Box<dyn Capture>, token: CancelToken) -> RunResult {
        let (resolver, outcome) = outcome::channel();
        let (progress_tx, progress) = watch::channel(Progress { phase: Phase::Idle, remaining: job.remaining() });
        let total = job.total();

        let shooter = self.clone();
        let handle = tokio::spawn(async move {
            shooter.drive(job, camera.as_mut(), &token, &progress_tx, resolver).await;
        });

        RunResult { outcome, progress, total, handle: Some(handle) }
    }

    /// Drives the run to its end on the calling task.
    pub async fn run(&self, job: Job, camera: &mut dyn Capture, token: &CancelToken) -> Report {
        let (resolver, outcome) = outcome::channel();
        let (progress_tx, progress) = watch::channel(Progress { phase: Phase::Idle, remaining: job.remaining() });
        let total = job.total();

        self.drive(job, camera, token, &progress_tx, resolver).await;

        RunResult { outcome, progress, total, handle: None }.wait().await
    }

    fn pause_after(&self, interval: Duration) -> Duration {
        if interval.is_zero() { self.settle } else { interval }
    }

    async fn drive(&self, mut job: Job, camera: &mut dyn Capture, token: &CancelToken, progress: &watch::Sender<Progress>, resolver: Resolver) {
        info!("starting {} shot(s) with an interval of {:?}", job.total(), job.interval());

        loop {
            if token.is_cancelled() {
                return cancel(&job, progress, resolver);
            }

            let shot = job.taken() + 1;
            publish(progress, &job, Phase::Capturing);
            debug!("capturing shot {shot}/{}", job.total());

            let cmd = CaptureCommand { cancel_token: token.clone(), time: Local::now(), shot };
            match camera.capture(cmd).await {
                Ok(c) => {
                    job.shoot();
                    self.forward(c);
                },
                Err(CaptureError::Cancelled) if token.is_cancelled() => {
                    return cancel(&job, progress, resolver);
                },
                Err(e) => {
                    error!("shot {shot}/{} failed. {e}", job.total());
                    publish(progress, &job, Phase::Failed);
                    return resolver.failed(e);
                },
            }

            if job.is_finished() {
                info!("all {} shot(s) taken.", job.total());
                publish(progress, &job, Phase::Succeeded);
                return resolver.succeeded();
            }

            if token.is_cancelled() {
                return cancel(&job, progress, resolver);
            }

            let pause = self.pause_after(job.interval());
            publish(progress, &job, Phase::Waiting);
            debug!("waiting {pause:?} before shot {}", shot + 1);

            // the pending sleep is dropped as soon as cancellation wins
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    return cancel(&job, progress, resolver);
                },
                () = sleep(pause) => { },
            }
        }
    }

    fn forward(&self, c: CaptureResult) {
        let Some(sink) = &self.sink else { return };
        match sink.try_send(c) {
            Ok(()) => { },
            Err(TrySendError::Full(c)) => error!("result queue full. shot {} dropped.", c.shot),
            Err(TrySendError::Closed(c)) => warn!("result queue closed. shot {} dropped.", c.shot),
        }
    }
}

fn publish(progress: &watch::Sender<Progress>, job: &Job, phase: Phase) {
    progress.send_replace(Progress { phase, remaining: job.remaining() });
}

fn cancel(job: &Job, progress: &watch::Sender<Progress>, resolver: Resolver) {
    info!("cancelled after {} of {} shot(s).", job.taken(), job.total());
    publish(progress, job, Phase::Cancelled);
    resolver.cancelled();
}

/// Caller's handle on a run. Observe progress while it runs, then `wait` for the report.
pub struct RunResult {
    outcome: oneshot::Receiver<Outcome>,
    progress: watch::Receiver<Progress>,
    total: u32,
    handle: Option<JoinHandle<()>>,
}

impl RunResult {
    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.clone()
    }

    /// Waits for the run to terminate. A panic inside the run is re-raised here.
    pub async fn wait(self) -> Report {
        let RunResult { outcome, progress, total, handle } = self;
        let outcome = match outcome.await {
            Ok(o) => o,
            // resolver went away unresolved: the task either panicked or was aborted
            Err(_) => match handle {
                Some(h) => match h.await {
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    _ => Outcome::Cancelled,
                },
                None => Outcome::Cancelled,
            },
        };
        let remaining = progress.borrow().remaining;
        Report { outcome, total, taken: total - remaining }
    }
}
