pub mod dummy;
pub mod gphoto2;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::config::camera::{Camera, CaptureModule};

use dummy::Dummy;
use self::gphoto2::GPhoto2;

#[derive(Debug)]
pub struct CaptureCommand {
    /// Hint only. Modules that cannot abort mid-capture may ignore it.
    pub cancel_token: CancelToken,
    pub time: DateTime<Local>,
    pub shot: u32,
}

pub use common::capture::CaptureResult;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture was cancelled.")]
    Cancelled,

    #[error("module encountered an error. {0}")]
    Module(Box<dyn std::error::Error + Send + Sync>)
}

pub fn build(cnf: &Camera) -> Box<dyn Capture> {
    match cnf.module {
        CaptureModule::Dummy => Box::new(Dummy::new(cnf.session_path.clone(), cnf.dummy_exposure, cnf.dummy_failure_rate)),
        CaptureModule::GPhoto2 => Box::new(GPhoto2::new(cnf.session_path.clone(), cnf.port.clone())),
    }
}

#[async_trait]
pub trait Capture: Send {
    async fn capture(&mut self, cmd: CaptureCommand) -> Result<CaptureResult, CaptureError>;
}
