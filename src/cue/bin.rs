use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A physical data file referenced by a `FILE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTrackFile {
    pub path: PathBuf,
    /// `None` when the file did not exist when it was looked up.
    pub file_size_bytes: Option<u64>,
    /// Assigned by the track that owns this file.
    pub frame_size: Option<u32>,
}

impl BinaryTrackFile {
    pub async fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_size_bytes = match fs::metadata(&path).await {
            Ok(metadata) => Some(metadata.len()),
            Err(err) => {
                debug!("Could not read size of {:?}: {}", path, err);
                None
            }
        };

        Self {
            path,
            file_size_bytes,
            frame_size: None,
        }
    }

    pub fn with_size(path: PathBuf, file_size_bytes: u64, frame_size: u32) -> Self {
        Self {
            path,
            file_size_bytes: Some(file_size_bytes),
            frame_size: Some(frame_size),
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
