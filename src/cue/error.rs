use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Invalid MM:SS:FF timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Malformed CUE line: {0}")]
    InvalidLine(String),

    #[error("Invalid INDEX line: {0}")]
    InvalidIndexLine(String),

    #[error("Unknown track type: {0}")]
    InvalidTrackType(String),

    #[error("TRACK declared before any FILE: {0}")]
    TrackWithoutFile(String),

    #[error("INDEX declared before any TRACK: {0}")]
    IndexWithoutTrack(String),

    #[error("Cannot subtract {subtrahend} from {minuend}, the result would be negative")]
    TimestampUnderflow { minuend: String, subtrahend: String },

    #[error("Refusing to copy {0:?} onto itself")]
    CopyOntoItself(PathBuf),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),
}

pub type CueResult<T> = Result<T, CueError>;
