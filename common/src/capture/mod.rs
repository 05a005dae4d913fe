mod filetype;

use std::path::PathBuf;

use size_format::SizeFormatterBinary;
use uuid::Uuid;
use chrono::{ DateTime, Local };

use serde::{ Serialize, Deserialize };

pub use filetype::FileType;

/// One photo taken by a camera module.
#[derive(Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    pub uuid: Uuid,

    pub time: DateTime<Local>,
    /// 1-based position of this photo within its run.
    pub shot: u32,

    pub file_type: FileType,
    pub path: PathBuf,
    pub size: u64,
}

impl std::fmt::Debug for CaptureResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureResult")
            .field("uuid", &self.uuid)
            .field("time", &self.time)
            .field("shot", &self.shot)
            .field("file_type", &self.file_type)
            .field("path", &self.path)
            .field("size", &format!("{}B", SizeFormatterBinary::new(self.size)))
            .finish()
    }
}
