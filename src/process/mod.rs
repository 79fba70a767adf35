use crate::cue::sheet::CueSheet;
use crate::error::{CueSplitterError, CueSplitterResult};
use crate::util::fs::{create_working_dir, find_cue_files, is_dir_empty};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use tokio::fs;

pub async fn print_cue_info(cue_path: &Path) -> CueSplitterResult<()> {
    let mut sheet = CueSheet::parse(cue_path).await?;
    println!("{}", describe(&mut sheet));
    Ok(())
}

/// Stages a sheet into `output` (or a fresh working directory next to it)
/// and splits it there when it keeps several tracks in one bin. Returns the
/// path of the staged CUE.
pub async fn split_cue(
    cue_path: &Path,
    output: Option<&Path>,
    force: bool,
) -> CueSplitterResult<PathBuf> {
    let mut sheet = CueSheet::parse(cue_path).await?;
    if !sheet.is_processable() {
        return Err(CueSplitterError::NotProcessable(cue_path.to_path_buf()));
    }

    let output_dir = match output {
        Some(dir) => {
            fs::create_dir_all(dir).await?;
            if holds_source_files(&sheet, dir).await? {
                return Err(CueSplitterError::OutputIsSourceDirectory(dir.to_path_buf()));
            }
            if !force && !is_dir_empty(dir).await? {
                return Err(CueSplitterError::OutputDirectoryNotEmpty(dir.to_path_buf()));
            }
            dir.to_path_buf()
        }
        None => create_working_dir(cue_path.parent().unwrap_or(Path::new("."))).await?,
    };

    let mut staged = sheet.copy_to_dir(&output_dir).await?;

    if !staged.is_monofile_multitrack() {
        info!("{:?} already has one file per track", staged.path);
        return Ok(staged.path);
    }

    let staged_bin = staged.bins[0].path.clone();
    let split = staged.split_tracks().await?;
    fs::remove_file(&staged_bin).await?;

    info!("Split CUE written to {:?}", split.path);
    Ok(split.path)
}

/// Whether `dir` is the directory the sheet or any of its bins live in.
async fn holds_source_files(sheet: &CueSheet, dir: &Path) -> CueSplitterResult<bool> {
    let dir = fs::canonicalize(dir).await?;
    let sources = std::iter::once(&sheet.path).chain(sheet.bins.iter().map(|bin| &bin.path));

    for source in sources {
        let parent = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if fs::canonicalize(parent).await? == dir {
            return Ok(true);
        }
    }

    Ok(false)
}

pub async fn split_directory(
    pb: MultiProgress,
    input_dir: &Path,
    recursive: bool,
    output_dir: Option<&Path>,
) -> CueSplitterResult<()> {
    let cue_files = find_cue_files(input_dir, recursive).await?;
    if cue_files.is_empty() {
        return Err(CueSplitterError::NoCueFilesFound(input_dir.to_path_buf()));
    }

    let bar = pb.add(ProgressBar::new(cue_files.len() as u64));
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}") {
        bar.set_style(style);
    }

    let mut failed = 0;
    for cue_path in &cue_files {
        bar.set_message(
            cue_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let output = output_dir.map(|dir| dir.join(cue_path.file_stem().unwrap_or_default()));
        if let Err(err) = split_cue(cue_path, output.as_deref(), false).await {
            error!("Skipping {:?}: {}", cue_path, err);
            failed += 1;
        }

        bar.inc(1);
    }

    bar.finish_and_clear();
    pb.remove(&bar);

    info!(
        "Processed {} CUE files, {} succeeded, {} skipped",
        cue_files.len(),
        cue_files.len() - failed,
        failed
    );
    Ok(())
}

fn describe(sheet: &mut CueSheet) -> String {
    let mut out = String::new();
    let layout = if sheet.is_monofile_multitrack() {
        "single file, multiple tracks (needs splitting)"
    } else {
        "one file per track"
    };
    let processable = if sheet.is_processable() { "yes" } else { "NO" };

    out.push_str(&format!("CUE: {}\n", sheet.path.display()));
    out.push_str(&format!("Layout: {layout}\n"));
    out.push_str(&format!("Processable: {processable}\n"));

    out.push_str("Bins:\n");
    for bin in &sheet.bins {
        match bin.file_size_bytes {
            Some(size) => out.push_str(&format!("  {} ({size} bytes)\n", bin.path.display())),
            None => out.push_str(&format!("  {} (missing)\n", bin.path.display())),
        }
    }

    out.push_str("Tracks:\n");
    for track in &sheet.tracks {
        out.push_str(&format!(
            "  {} {} ({} bytes/frame)\n",
            track.id, track.media_type, track.frame_size
        ));
        for index in track.indexes() {
            out.push_str(&format!(
                "    INDEX {} {} (frame {})\n",
                index.id(),
                index.timestamp(),
                index.length_in_frames()
            ));
        }
    }

    let audio: Vec<_> = sheet
        .get_audio_bins()
        .into_iter()
        .map(|track| track.id.as_str())
        .collect();
    out.push_str(&format!("Audio tracks: {}", audio.join(", ")));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cd::SECTOR_SIZE;

    const FRAME: usize = SECTOR_SIZE as usize;

    const MONOFILE: &str = "FILE \"game.bin\" BINARY\n\
        \x20 TRACK 01 MODE2/2352\n\
        \x20   INDEX 01 00:00:00\n\
        \x20 TRACK 02 AUDIO\n\
        \x20   INDEX 01 00:01:00\n";

    async fn fixture(dir: &Path) -> PathBuf {
        fs::write(dir.join("game.bin"), vec![0u8; 150 * FRAME]).await.unwrap();
        let cue_path = dir.join("game.cue");
        fs::write(&cue_path, MONOFILE).await.unwrap();
        cue_path
    }

    #[tokio::test]
    async fn split_stages_into_working_dir_and_leaves_source_alone() {
        let dir = tempfile::tempdir().unwrap();
        let cue = fixture(dir.path()).await;

        let staged = split_cue(&cue, None, false).await.unwrap();

        let work = dir.path().join("temp");
        assert_eq!(staged, work.join("game.cue"));
        assert!(work.join("game (Track 01).bin").exists());
        assert!(work.join("game (Track 02).bin").exists());
        assert!(!work.join("game.bin").exists());
        assert_eq!(fs::read_to_string(&cue).await.unwrap(), MONOFILE);
        assert!(dir.path().join("game.bin").exists());
    }

    #[tokio::test]
    async fn split_refuses_non_empty_output_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let cue = fixture(dir.path()).await;
        let out = dir.path().join("out");
        fs::create_dir(&out).await.unwrap();
        fs::write(out.join("other.txt"), "").await.unwrap();

        let result = split_cue(&cue, Some(&out), false).await;
        assert!(matches!(result, Err(CueSplitterError::OutputDirectoryNotEmpty(_))));

        assert!(split_cue(&cue, Some(&out), true).await.is_ok());
    }

    #[tokio::test]
    async fn split_refuses_the_source_directory_as_output() {
        let dir = tempfile::tempdir().unwrap();
        let cue = fixture(dir.path()).await;

        for output in [dir.path().to_path_buf(), dir.path().join(".")] {
            let result = split_cue(&cue, Some(&output), true).await;
            assert!(matches!(result, Err(CueSplitterError::OutputIsSourceDirectory(_))));
        }

        let bin = fs::metadata(dir.path().join("game.bin")).await.unwrap();
        assert_eq!(bin.len(), 150 * FRAME as u64);
        assert_eq!(fs::read_to_string(&cue).await.unwrap(), MONOFILE);
        assert!(!dir.path().join("game (Track 01).bin").exists());
    }

    #[tokio::test]
    async fn staged_per_track_sheet_points_at_the_staged_bins() {
        let dir = tempfile::tempdir().unwrap();
        let bins = dir.path().join("bins");
        fs::create_dir(&bins).await.unwrap();
        fs::write(bins.join("t1.bin"), vec![0u8; FRAME]).await.unwrap();
        fs::write(bins.join("t2.bin"), vec![0u8; FRAME]).await.unwrap();
        let cue = dir.path().join("game.cue");
        fs::write(
            &cue,
            "FILE \"bins/t1.bin\" BINARY\n  TRACK 01 MODE1/2352\n    INDEX 01 00:00:00\n\
             FILE \"bins/t2.bin\" BINARY\n  TRACK 02 AUDIO\n    INDEX 01 00:00:00\n",
        )
        .await
        .unwrap();

        let staged = split_cue(&cue, None, false).await.unwrap();

        let mut reparsed = CueSheet::parse(&staged).await.unwrap();
        assert!(reparsed.is_processable());
        assert_eq!(reparsed.bins[1].path, dir.path().join("temp").join("t2.bin"));
    }

    #[tokio::test]
    async fn split_rejects_unprocessable_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let cue = dir.path().join("game.cue");
        fs::write(&cue, MONOFILE).await.unwrap();

        let result = split_cue(&cue, None, false).await;
        assert!(matches!(result, Err(CueSplitterError::NotProcessable(_))));
        assert!(!dir.path().join("temp").exists());
    }

    #[tokio::test]
    async fn batch_skips_broken_sheets() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path()).await;
        let broken = "FILE \"nope.bin\" BINARY\n  TRACK 01 AUDIO\n";
        fs::write(dir.path().join("broken.cue"), broken).await.unwrap();
        let out = dir.path().join("out");

        split_directory(MultiProgress::new(), dir.path(), false, Some(&out))
            .await
            .unwrap();

        assert!(out.join("game").join("game (Track 02).bin").exists());
        assert!(!out.join("broken").join("broken.cue").exists());
    }

    #[tokio::test]
    async fn batch_without_cue_files_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = split_directory(MultiProgress::new(), dir.path(), false, None).await;
        assert!(matches!(result, Err(CueSplitterError::NoCueFilesFound(_))));
    }

    #[tokio::test]
    async fn describe_lists_tracks_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let cue = fixture(dir.path()).await;
        let mut sheet = CueSheet::parse(&cue).await.unwrap();

        let text = describe(&mut sheet);

        assert!(text.contains("Layout: single file, multiple tracks"));
        assert!(text.contains("Processable: yes"));
        assert!(text.contains("  02 AUDIO (2352 bytes/frame)"));
        assert!(text.contains("    INDEX 01 00:01:00 (frame 75)"));
        assert!(text.ends_with("Audio tracks: 02"));
    }
}
