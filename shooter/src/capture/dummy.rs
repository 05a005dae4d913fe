use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use common::capture::FileType;
use log::{info, debug};
use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

use super::{ Capture, CaptureCommand, CaptureResult, CaptureError };

/// Camera stand-in: waits out the exposure and fails with the configured probability.
pub struct Dummy {
    session_path: PathBuf,
    exposure: Duration,
    failure_rate: f64,
}

#[derive(Error, Debug)]
enum DummyError {
    #[error("dummy rolled a dice and decided to throw an error.")]
    Error
}

impl Dummy {
    pub fn new(session_path: PathBuf, exposure: Duration, failure_rate: f64) -> Self {
        info!("new dummy created. exposure={exposure:?} failure_rate={failure_rate}");
        Dummy { session_path, exposure, failure_rate }
    }
}

#[async_trait]
impl Capture for Dummy {
    async fn capture(&mut self, cmd: CaptureCommand) -> Result<CaptureResult, CaptureError> {
        debug!("dummy received a capture command {cmd:?}");
        tokio::select! {
            biased;
            res = async {
                if rand::random::<f64>() < self.failure_rate {
                    Err(CaptureError::Module(Box::new(DummyError::Error)))
                } else {
                    debug!("Click");
                    if !self.exposure.is_zero() {
                        sleep(self.exposure).await;
                    }
                    debug!("Clack");

                    let uuid = Uuid::new_v4();
                    let file_type = FileType::Dummy;
                    let path = self.session_path.join(format!("shot-{:04}-{uuid}{}", cmd.shot, file_type.dotext()));

                    Ok(CaptureResult { uuid, time: cmd.time, shot: cmd.shot, file_type, path, size: 0 })
                }
            } => { res },
            () = cmd.cancel_token.cancelled() => { Err(CaptureError::Cancelled) },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use crate::cancel::CancelToken;

    use super::*;

    fn command(token: &CancelToken, shot: u32) -> CaptureCommand {
        CaptureCommand { cancel_token: token.clone(), time: Local::now(), shot }
    }

    #[tokio::test(start_paused = true)]
    async fn reliable_dummy_names_files_by_shot() {
        let mut dummy = Dummy::new(PathBuf::from("session"), Duration::from_millis(100), 0.0);
        let token = CancelToken::new();
        let c = dummy.capture(command(&token, 3)).await.unwrap();
        assert_eq!(c.shot, 3);
        assert_eq!(c.file_type, FileType::Dummy);
        assert!(c.path.starts_with("session"));
        assert!(c.path.to_string_lossy().contains("shot-0003-"));
    }

    #[tokio::test(start_paused = true)]
    async fn broken_dummy_always_fails() {
        let mut dummy = Dummy::new(PathBuf::from("session"), Duration::ZERO, 1.0);
        let token = CancelToken::new();
        assert!(matches!(dummy.capture(command(&token, 1)).await, Err(CaptureError::Module(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn finished_shot_beats_simultaneous_cancel() {
        let mut dummy = Dummy::new(PathBuf::from("session"), Duration::ZERO, 0.0);
        let token = CancelToken::new();
        token.request_cancel();
        for _ in 0..16 {
            assert!(dummy.capture(command(&token, 1)).await.is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn long_exposure_honours_cancel_hint() {
        let mut dummy = Dummy::new(PathBuf::from("session"), Duration::from_secs(30), 0.0);
        let token = CancelToken::new();
        let remote = token.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            remote.request_cancel();
        });
        assert!(matches!(dummy.capture(command(&token, 1)).await, Err(CaptureError::Cancelled)));
    }
}
