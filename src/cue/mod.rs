use crate::cue::bin::BinaryTrackFile;
use crate::cue::error::{CueError, CueResult};
use crate::cue::sheet::CueSheet;
use crate::cue::timestamp::Timestamp;
use crate::cue::track::Track;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

pub mod bin;
pub mod error;
pub mod index;
pub mod sheet;
pub mod timestamp;
pub mod track;

lazy_static! {
    static ref FILE_LINE: Regex =
        Regex::new(r#"^(?i:FILE)\s+(?:"(.*)"|'(.*)'|(\S+))"#).unwrap();
    static ref TRACK_LINE: Regex = Regex::new(r"^(?i:TRACK)\s+(\d+)\s+(\S+)").unwrap();
    static ref INDEX_LINE: Regex = Regex::new(r"^(?i:INDEX)\s+(\d+\s+\d+:\d+:\d+)").unwrap();
    static ref PREGAP_LINE: Regex = Regex::new(r"^(?i:PREGAP)\s+(\S+)").unwrap();
}

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    pub async fn parse(&self) -> CueResult<CueSheet> {
        let data = tokio::fs::read(&self.cue_path).await?;
        // one char per byte, so FILE names can be turned back into raw bytes
        let contents: String = data.iter().map(|&byte| byte as char).collect();

        let cue_dir = self.cue_path.parent().unwrap_or(Path::new("."));
        let mut cue_sheet = CueSheet::new(&self.cue_path);

        let mut last_bin: Option<usize> = None;
        let mut last_track: Option<usize> = None;
        let mut pending_pregap: Option<Timestamp> = None;

        for line in contents.lines() {
            let line = line.trim();

            let Some(keyword) = line.split_whitespace().next() else {
                continue;
            };

            match keyword.to_ascii_uppercase().as_str() {
                "FILE" => {
                    let captures = Self::captures(&FILE_LINE, line)?;
                    let file_name = (1..=3)
                        .find_map(|i| captures.get(i))
                        .map(|m| m.as_str())
                        .unwrap_or_default();

                    let bin = BinaryTrackFile::new(cue_dir.join(raw_file_name(file_name))).await;
                    cue_sheet.bins.push(bin);
                    last_bin = Some(cue_sheet.bins.len() - 1);
                }
                "TRACK" => {
                    let captures = Self::captures(&TRACK_LINE, line)?;
                    let bin =
                        last_bin.ok_or_else(|| CueError::TrackWithoutFile(line.to_string()))?;

                    let track = Track::new(
                        &captures[1],
                        &captures[2],
                        bin,
                        &cue_sheet.bins[bin].path,
                        &self.cue_path,
                    )?;
                    track.check_if_exists();

                    cue_sheet.push_track(track);
                    last_track = Some(cue_sheet.tracks.len() - 1);
                }
                "INDEX" => {
                    let captures = Self::captures(&INDEX_LINE, line)
                        .map_err(|_| CueError::InvalidIndexLine(line.to_string()))?;
                    let track = last_track
                        .ok_or_else(|| CueError::IndexWithoutTrack(line.to_string()))?;

                    cue_sheet.tracks[track].add_index(&captures[1], pending_pregap.take())?;
                }
                "PREGAP" => {
                    let captures = Self::captures(&PREGAP_LINE, line)?;
                    pending_pregap = Some(captures[1].parse()?);
                }
                _ => {}
            }
        }

        cue_sheet.classify();

        Ok(cue_sheet)
    }

    fn captures<'a>(regex: &Regex, line: &'a str) -> CueResult<Captures<'a>> {
        regex
            .captures(line)
            .ok_or_else(|| CueError::InvalidLine(line.to_string()))
    }
}

/// Rebuilds the on-disk name from a byte-per-char decoded FILE name. Names
/// are passed through byte for byte, whatever encoding the sheet used.
#[cfg(unix)]
fn raw_file_name(name: &str) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let bytes: Vec<u8> = name.chars().map(|c| c as u8).collect();
    PathBuf::from(OsStr::from_bytes(&bytes))
}

/// Rebuilds the on-disk name from a byte-per-char decoded FILE name. UTF-8
/// names are decoded as such, anything else is read as Latin-1.
#[cfg(not(unix))]
fn raw_file_name(name: &str) -> PathBuf {
    let bytes: Vec<u8> = name.chars().map(|c| c as u8).collect();
    match String::from_utf8(bytes) {
        Ok(utf8) => PathBuf::from(utf8),
        Err(_) => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(contents: &str) -> CueResult<CueSheet> {
        let dir = tempfile::tempdir().unwrap();
        let cue_path = dir.path().join("disc.cue");
        tokio::fs::write(&cue_path, contents).await.unwrap();
        CueParser::new(&cue_path).parse().await
    }

    #[tokio::test]
    async fn keywords_are_case_insensitive() {
        let sheet = parse("file \"disc.bin\" binary\n  Track 01 audio\n    index 01 00:00:00\n")
            .await
            .unwrap();
        assert_eq!(sheet.bins.len(), 1);
        assert_eq!(sheet.tracks.len(), 1);
        assert!(sheet.tracks[0].is_audio);
        assert!(sheet.tracks[0].index("01").is_some());
    }

    #[tokio::test]
    async fn resolves_files_relative_to_the_cue() {
        let dir = tempfile::tempdir().unwrap();
        let cue_path = dir.path().join("disc.cue");
        tokio::fs::write(&cue_path, "FILE \"disc.bin\" BINARY\n")
            .await
            .unwrap();

        let sheet = CueParser::new(&cue_path).parse().await.unwrap();
        assert_eq!(sheet.bins[0].path, dir.path().join("disc.bin"));
    }

    #[tokio::test]
    async fn accepts_single_quoted_and_bare_file_names() {
        let sheet = parse("FILE 'one two.bin' BINARY\nFILE bare.bin BINARY\n")
            .await
            .unwrap();
        assert!(sheet.bins[0].path.ends_with("one two.bin"));
        assert!(sheet.bins[1].path.ends_with("bare.bin"));
    }

    #[tokio::test]
    async fn file_name_containing_track_is_not_a_track() {
        let sheet = parse("FILE \"TRACK 01 AUDIO.bin\" BINARY\n").await.unwrap();
        assert_eq!(sheet.bins.len(), 1);
        assert!(sheet.tracks.is_empty());
    }

    #[tokio::test]
    async fn pregap_applies_to_the_next_index_only() {
        let sheet = parse(
            "FILE \"disc.bin\" BINARY\n\
             TRACK 01 MODE1/2352\n\
             INDEX 01 00:00:00\n\
             TRACK 02 AUDIO\n\
             PREGAP 00:02:00\n\
             INDEX 01 01:00:00\n\
             TRACK 03 AUDIO\n\
             INDEX 01 02:00:00\n",
        )
        .await
        .unwrap();

        let pregap = sheet.tracks[1].index("00").unwrap();
        assert_eq!(pregap.timestamp().to_string(), "00:58:00");
        assert!(sheet.tracks[2].index("00").is_none());
    }

    #[tokio::test]
    async fn unrecognized_lines_are_ignored() {
        let sheet = parse(
            "REM GENRE Game\n\
             CATALOG 0000000000000\n\
             FILE \"disc.bin\" BINARY\n\
             TRACK 01 AUDIO\n\
             FLAGS DCP\n\
             INDEX 01 00:00:00\n",
        )
        .await
        .unwrap();
        assert_eq!(sheet.tracks.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn latin1_file_names_resolve_to_the_file_on_disk() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let bin_path = dir.path().join(OsStr::from_bytes(b"Pok\xe9mon.bin"));
        tokio::fs::write(&bin_path, vec![0u8; 2352]).await.unwrap();

        let cue_path = dir.path().join("disc.cue");
        let mut contents = b"FILE \"Pok\xe9mon.bin\" BINARY\n".to_vec();
        contents.extend_from_slice(b"  TRACK 01 MODE1/2352\n    INDEX 01 00:00:00\n");
        tokio::fs::write(&cue_path, contents).await.unwrap();

        let mut sheet = CueParser::new(&cue_path).parse().await.unwrap();
        assert_eq!(sheet.bins[0].path, bin_path);
        assert_eq!(sheet.bins[0].file_size_bytes, Some(2352));
        assert!(sheet.is_processable());
    }

    #[tokio::test]
    async fn utf8_file_names_resolve_to_the_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let bin_path = dir.path().join("Pokémon.bin");
        tokio::fs::write(&bin_path, vec![0u8; 2352]).await.unwrap();

        let cue_path = dir.path().join("disc.cue");
        let contents =
            "FILE \"Pokémon.bin\" BINARY\n  TRACK 01 MODE1/2352\n    INDEX 01 00:00:00\n";
        tokio::fs::write(&cue_path, contents).await.unwrap();

        let mut sheet = CueParser::new(&cue_path).parse().await.unwrap();
        assert_eq!(sheet.bins[0].path, bin_path);
        assert!(sheet.is_processable());
    }

    #[tokio::test]
    async fn malformed_timestamp_is_a_format_error() {
        let result =
            parse("FILE \"disc.bin\" BINARY\n  TRACK 01 AUDIO\n    INDEX 01 00:xx:00\n").await;
        assert!(matches!(result, Err(CueError::InvalidIndexLine(_))));

        let result =
            parse("FILE \"disc.bin\" BINARY\n  TRACK 01 AUDIO\n  PREGAP 2 seconds\n").await;
        assert!(matches!(result, Err(CueError::InvalidTimestamp(_))));
    }

    #[tokio::test]
    async fn structural_errors_are_reported() {
        let result = parse("TRACK 01 AUDIO\n").await;
        assert!(matches!(result, Err(CueError::TrackWithoutFile(_))));

        let result = parse("FILE \"disc.bin\" BINARY\nINDEX 01 00:00:00\n").await;
        assert!(matches!(result, Err(CueError::IndexWithoutTrack(_))));

        let result = parse("FILE \"disc.bin\" BINARY\n  TRACK 01 MODE7/1\n").await;
        assert!(matches!(result, Err(CueError::InvalidTrackType(_))));
    }
}
