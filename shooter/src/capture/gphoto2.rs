use std::{path::{Path, PathBuf}, process::Stdio};

use async_trait::async_trait;
use chrono::{Local, DateTime};
use common::capture::FileType;
use lazy_static::lazy_static;
use log::{info, debug, error};
use regex::Regex;
use thiserror::Error;
use tokio::{io::AsyncReadExt, time::Instant, fs, process::Command};
use uuid::Uuid;

use crate::cancel::CancelToken;

use super::{ Capture, CaptureCommand, CaptureResult, CaptureError };

lazy_static! {
    static ref SAVED_FILE: Regex = Regex::new(r"(?m)^Saving file as (.+?)\s*$").unwrap();
}

/// Tethered camera driven through the `gphoto2` command line tool.
pub struct GPhoto2 {
    session_path: PathBuf,
    port: Option<String>,
}

#[derive(Error, Debug)]
enum GPhoto2Error {
    #[error("IO Error. {0}")]
    IO(std::io::Error),

    #[error("Process IO Error. {0}")]
    Process(std::io::Error),

    #[error("GPhoto2 exit with exit code {0:?}")]
    GPhoto2(Option<i32>),

    #[error("GPhoto2 did not report a saved file")]
    NoFile,
}

impl From<GPhoto2Error> for CaptureError {
    fn from(e: GPhoto2Error) -> Self {
        CaptureError::Module(Box::new(e))
    }
}

impl GPhoto2 {
    pub fn new(session_path: PathBuf, port: Option<String>) -> Self {
        info!("using gphoto2 with session at {} on port {}", session_path.display(), port.as_deref().unwrap_or("auto"));
        GPhoto2 { session_path, port }
    }
}

#[async_trait]
impl Capture for GPhoto2 {
    async fn capture(&mut self, cmd: CaptureCommand) -> Result<CaptureResult, CaptureError> {
        let CaptureCommand { cancel_token, time, shot } = cmd;
        do_capture(&self.session_path, self.port.as_deref(), cancel_token, time, shot).await
    }
}

async fn do_capture(session_path: &Path, port: Option<&str>, cancel_token: CancelToken, time: DateTime<Local>, shot: u32) -> Result<CaptureResult, CaptureError> {
    debug!("capturing...");
    let start = Instant::now();

    let uuid = Uuid::new_v4();
    let pattern = format!("shot-{shot:04}-{uuid}.%C");

    fs::create_dir_all(session_path).await
        .map_err(GPhoto2Error::IO)?;

    let args = generate_args(&pattern, port);
    debug!("running command: \"gphoto2 {}\"", args.join(" "));

    let mut child = Command::new("gphoto2")
        .current_dir(session_path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(GPhoto2Error::Process)?;

    let mut stdout = piped(child.stdout.take())?;
    let reader = tokio::spawn(async move {
        let mut out = String::new();
        stdout.read_to_string(&mut out).await.map(|_| out)
    });

    // a finished capture wins over a cancel arriving in the same poll
    tokio::select! {
        biased;
        exit = child.wait() => {
            let code = exit.map_err(GPhoto2Error::Process)?.code();
            if code != Some(0) {
                error!("gphoto2 did exit with exit code: {code:?}");
                return Err(GPhoto2Error::GPhoto2(code).into());
            }
        },
        () = cancel_token.cancelled() => {
            if let Some(id) = child.id() {
                debug!("sending SIGTERM to gphoto2 {id}");
                Command::new("kill")
                    .arg(format!("-SIGTERM"))
                    .arg(format!("{id}"))
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .output()
                    .await
                    .map_err(GPhoto2Error::Process)?;
                child.wait().await
                    .map_err(GPhoto2Error::Process)?;
            }
            return Err(CaptureError::Cancelled);
        }
    }

    let out = reader.await
        .map_err(|e| GPhoto2Error::Process(std::io::Error::new(std::io::ErrorKind::Other, e)))?
        .map_err(GPhoto2Error::Process)?;
    let filename = saved_file(&out).ok_or(GPhoto2Error::NoFile)?;
    let path = session_path.join(filename);

    let size = fs::metadata(&path).await
        .map_err(GPhoto2Error::IO)?
        .len();

    info!("capture complete after {:.1} seconds. saved {}", start.elapsed().as_secs_f64(), path.display());

    Ok(CaptureResult { uuid, time, shot, file_type: FileType::from_path(&path), path, size })
}

fn piped<T>(pipe: Option<T>) -> Result<T, GPhoto2Error> {
    pipe.ok_or_else(|| GPhoto2Error::Process(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gphoto2 stdout was not captured")))
}

fn generate_args(pattern: &str, port: Option<&str>) -> Vec<String> {
    let mut args = vec![];

    if let Some(port) = port {
        args.push(format!("--port")); args.push(port.to_string());
    }
    args.push(format!("--filename")); args.push(pattern.to_string());
    args.push(format!("--capture-image-and-download"));

    args
}

/// Last file gphoto2 reported saving; raw+jpeg cameras save two and the raw comes last.
fn saved_file(stdout: &str) -> Option<&str> {
    SAVED_FILE.captures_iter(stdout)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_without_port() {
        assert_eq!(
            generate_args("shot-0001.%C", None),
            vec!["--filename", "shot-0001.%C", "--capture-image-and-download"],
        );
    }

    #[test]
    fn args_with_port() {
        let args = generate_args("x.%C", Some("usb:001,004"));
        assert_eq!(&args[..2], &["--port", "usb:001,004"]);
        assert_eq!(args.last().map(String::as_str), Some("--capture-image-and-download"));
    }

    #[test]
    fn parses_saved_file() {
        let out = "New file is in location /capt0000.cr2 on the camera\n\
                   Saving file as shot-0002-abc.cr2\n\
                   Deleting file /capt0000.cr2 on the camera\n";
        assert_eq!(saved_file(out), Some("shot-0002-abc.cr2"));
    }

    #[test]
    fn raw_plus_jpeg_keeps_last() {
        let out = "Saving file as shot-0001-a.jpg\r\nSaving file as shot-0001-a.cr2\r\n";
        assert_eq!(saved_file(out), Some("shot-0001-a.cr2"));
    }

    #[test]
    fn missing_stdout_is_a_process_error() {
        assert!(matches!(piped::<()>(None), Err(GPhoto2Error::Process(_))));
        assert!(matches!(piped(Some(7)), Ok(7)));
    }

    #[test]
    fn nothing_saved() {
        assert_eq!(saved_file("*** Error: No camera found. ***\n"), None);
    }
}
