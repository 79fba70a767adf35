use clap::Parser;
use std::path::PathBuf;

/// Prints the bins, tracks and indexes of a CUE sheet and whether it can be processed.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct InfoCommand {
    /// Path to the .cue file
    #[arg(value_name = "INPUT_CUE")]
    pub input_cue: PathBuf,
}

/// Stages a .cue and its .bin files into a directory, splitting a single
/// multi-track .bin into one .bin per track.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct SplitCommand {
    /// Path to the .cue file
    #[arg(value_name = "INPUT_CUE")]
    pub input_cue: PathBuf,

    /// Output directory, defaults to a new working directory next to the .cue
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Write into the output directory even if it is not empty
    #[arg(long, short = 'f', value_name = "FORCE", default_value_t = false)]
    pub force: bool,
}

/// Splits every .cue found in a directory, skipping the ones that cannot be processed.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct BatchCommand {
    /// Directory containing .cue and .bin files
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    #[arg(
        value_name = "RECURSIVE",
        long,
        short = 'R',
        help = "recursively searches all directories in INPUT_DIR for .cue files",
        default_value = "false"
    )]
    pub recursive: bool,

    /// Directory that receives one sub directory per .cue, defaults to a new
    /// working directory next to each .cue
    #[arg(long, short = 'o', value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}
