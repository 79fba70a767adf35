use crate::commands::{Cli, Commands};
use crate::process::{print_cue_info, split_cue, split_directory};
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::debug;

mod cd;
mod commands;
mod cue;
mod error;
mod process;
mod split;
mod util;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    debug!(
        "{} v{} ({})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::TARGET
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(cmd) => print_cue_info(&cmd.input_cue).await?,
        Commands::Split(cmd) => {
            split_cue(&cmd.input_cue, cmd.output.as_deref(), cmd.force).await?;
        }
        Commands::Batch(cmd) => {
            split_directory(
                pb.clone(),
                &cmd.input_dir,
                cmd.recursive,
                cmd.output_dir.as_deref(),
            )
            .await?
        }
    }

    Ok(())
}
