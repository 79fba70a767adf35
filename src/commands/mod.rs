use crate::commands::cue::{BatchCommand, InfoCommand, SplitCommand};
use clap::{Parser, Subcommand};

pub mod cue;

/// CLI for inspecting BIN/CUE images and splitting single-file multi-track images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Eq, PartialEq)]
pub enum Commands {
    Info(InfoCommand),
    Split(SplitCommand),
    Batch(BatchCommand),
}
