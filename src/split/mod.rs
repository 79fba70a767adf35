use crate::cue::bin::BinaryTrackFile;
use crate::cue::index::START_INDEX_ID;
use crate::cue::sheet::CueSheet;
use crate::cue::track::Track;
use crate::split::error::{SplitError, SplitResult};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};

pub mod error;

const SPLIT_CHUNK_SIZE: usize = 1024 * 1024;

impl CueSheet {
    /// Splits a monofile multi-track sheet into one bin per track, written
    /// next to the source bin, and writes the new sheet over this sheet's
    /// path. Any other sheet is returned as is.
    ///
    /// Each track's data runs from its own `INDEX 01` to the next track's
    /// `INDEX 01`, so a pregap ends up at the tail of the preceding file.
    pub async fn split_tracks(&mut self) -> SplitResult<CueSheet> {
        if !(self.is_monofile_multitrack() && self.is_processable()) {
            return Ok(self.derive());
        }

        let frame_size = self
            .frame_size
            .ok_or_else(|| SplitError::MissingFrameSize(self.path.clone()))?;
        let source = self.bins[0].clone();
        let file_size = source
            .file_size_bytes
            .ok_or_else(|| SplitError::MissingFileSize(source.path.clone()))?;

        let total_frames = file_size / frame_size as u64;
        debug!(
            "{:?} holds {} frames, mapping tracks from the end",
            source.path, total_frames
        );

        let mut split = self.derive();
        plan_track_sizes(&mut split.tracks, total_frames)?;

        for (position, track) in split.tracks.iter_mut().enumerate() {
            track.path = track_file_path(&source.path, &track.id)?;
            track.bin = position;
            track.cue_path = split.path.clone();
            track.set_indexes_to_zero()?;
            track.rebase_start_to_zero()?;
        }

        let copied = copy_track_data(&source.path, &split.tracks).await?;
        if copied < file_size {
            warn!(
                "{} trailing bytes of {:?} do not form a whole frame and were not copied",
                file_size - copied,
                source.path
            );
        }

        split.bins = split
            .tracks
            .iter()
            .map(|track| {
                BinaryTrackFile::with_size(
                    track.path.clone(),
                    track.track_size_bytes.unwrap_or(0),
                    track.frame_size,
                )
            })
            .collect();

        split.write_cue(None).await?;
        info!(
            "Split {:?} into {} track files",
            source.path,
            split.tracks.len()
        );

        Ok(split)
    }
}

/// Assigns `track_size_bytes` to every track, walking from the last track
/// back to the first with a frame cursor that starts at the end of the bin.
fn plan_track_sizes(tracks: &mut [Track], total_frames: u64) -> SplitResult<()> {
    if let Some(first) = tracks.first() {
        let start = first
            .index(START_INDEX_ID)
            .ok_or_else(|| SplitError::MissingIndex01(first.id.clone()))?;
        if start.length_in_frames() != 0 {
            return Err(SplitError::FirstTrackNotAtOrigin {
                track: first.id.clone(),
                start: start.timestamp().to_string(),
            });
        }
    }

    let mut cursor = total_frames;
    for track in tracks.iter_mut().rev() {
        let start = track
            .index(START_INDEX_ID)
            .ok_or_else(|| SplitError::MissingIndex01(track.id.clone()))?
            .length_in_frames();

        let frames = cursor
            .checked_sub(start)
            .ok_or_else(|| SplitError::TrackOutOfBounds {
                track: track.id.clone(),
                start_frame: start,
                end_frame: cursor,
            })?;

        track.track_size_bytes = Some(frames * track.frame_size as u64);
        cursor = start;
    }

    Ok(())
}

/// `Game.bin` + `02` becomes `Game (Track 02).bin`, in the same directory.
fn track_file_path(source: &Path, track_id: &str) -> SplitResult<PathBuf> {
    let stem = source
        .file_stem()
        .ok_or_else(|| SplitError::InvalidFileName(source.to_path_buf()))?
        .to_string_lossy();

    let file_name = match source.extension() {
        Some(extension) => format!(
            "{stem} (Track {track_id}).{}",
            extension.to_string_lossy()
        ),
        None => format!("{stem} (Track {track_id})"),
    };

    Ok(source.with_file_name(file_name))
}

/// Copies the source sequentially into each track's file, `track_size_bytes`
/// at a time. Returns the number of bytes copied.
async fn copy_track_data(source: &Path, tracks: &[Track]) -> SplitResult<u64> {
    let mut reader = File::open(source).await?;
    let mut buffer = vec![0u8; SPLIT_CHUNK_SIZE];
    let mut copied = 0u64;

    for track in tracks {
        let track_size = track.track_size_bytes.unwrap_or(0);
        debug!(
            "Writing track {} of {:?} to {:?} ({} bytes)",
            track.id, source, track.path, track_size
        );

        let mut writer = BufWriter::new(File::create(&track.path).await?);
        let mut written = 0u64;

        while written < track_size {
            let chunk = (track_size - written).min(SPLIT_CHUNK_SIZE as u64) as usize;
            reader.read_exact(&mut buffer[..chunk]).await?;
            writer.write_all(&buffer[..chunk]).await?;
            written += chunk as u64;
        }

        writer.flush().await?;
        copied += written;
    }

    Ok(copied)
}
