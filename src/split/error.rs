use crate::cue::error::CueError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error("CUE {0:?} has no track with a known frame size")]
    MissingFrameSize(PathBuf),

    #[error("Size of {0:?} is unknown, the file was missing when the CUE was parsed")]
    MissingFileSize(PathBuf),

    #[error("Track {0} has no INDEX 01")]
    MissingIndex01(String),

    #[error("First track {track} starts at {start} instead of 00:00:00, refusing to split")]
    FirstTrackNotAtOrigin { track: String, start: String },

    #[error(
        "Track {track} starts at frame {start_frame}, past the end of its data at frame {end_frame}"
    )]
    TrackOutOfBounds {
        track: String,
        start_frame: u64,
        end_frame: u64,
    },

    #[error("Cannot derive a per-track file name from {0:?}")]
    InvalidFileName(PathBuf),
}

pub type SplitResult<T> = Result<T, SplitError>;
