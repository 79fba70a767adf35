use crate::cue::error::CueError;
use crate::split::error::SplitError;
use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CueSplitterError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error(transparent)]
    SplitError(#[from] SplitError),

    #[error("The CUE sheet cannot be processed, see the errors above: {0}")]
    NotProcessable(PathBuf),

    #[error("Output directory is not empty, use --force to write into it anyway: {0}")]
    OutputDirectoryNotEmpty(PathBuf),

    #[error("Output directory already holds the source files: {0}")]
    OutputIsSourceDirectory(PathBuf),

    #[error("Could not find any CUE file in the specified path: {0}")]
    NoCueFilesFound(PathBuf),
}

pub type CueSplitterResult<T> = result::Result<T, CueSplitterError>;
