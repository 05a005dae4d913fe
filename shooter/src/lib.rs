pub mod cancel;
pub mod capture;
pub mod config;
pub mod engine;
pub mod job;
pub mod logging;
pub mod outcome;

pub use cancel::CancelToken;
pub use capture::{Capture, CaptureCommand, CaptureError, CaptureResult};
pub use engine::{Phase, Progress, RunResult, Shooter, DEFAULT_SETTLE};
pub use job::{Job, JobError};
pub use outcome::{Outcome, Report};
