use std::path::Path;

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileType {
    Dummy,
    Cr2,
    Nef,
    Arw,
    Jpeg,
    Other(String),
}

impl FileType {
    pub fn from_path(path: &Path) -> FileType {
        let ext = path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "dummy" => FileType::Dummy,
            "cr2" => FileType::Cr2,
            "nef" => FileType::Nef,
            "arw" => FileType::Arw,
            "jpg" | "jpeg" => FileType::Jpeg,
            _ => FileType::Other(ext),
        }
    }

    pub fn ext(&self) -> String {
        match self {
            FileType::Dummy => format!("dummy"),
            FileType::Cr2 => format!("cr2"),
            FileType::Nef => format!("nef"),
            FileType::Arw => format!("arw"),
            FileType::Jpeg => format!("jpg"),
            FileType::Other(e) => e.clone(),
        }
    }

    pub fn dotext(&self) -> String {
        format!(".{ext}", ext = self.ext())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(FileType::from_path(Path::new("shot-0001.CR2")), FileType::Cr2);
        assert_eq!(FileType::from_path(Path::new("a/b/shot.jpeg")), FileType::Jpeg);
        assert_eq!(FileType::from_path(Path::new("shot.rw2")), FileType::Other(format!("rw2")));
        assert_eq!(FileType::Jpeg.dotext(), ".jpg");
    }
}
