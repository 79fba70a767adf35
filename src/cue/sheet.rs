use crate::cue::CueParser;
use crate::cue::bin::BinaryTrackFile;
use crate::cue::error::{CueError, CueResult};
use crate::cue::track::Track;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A parsed CUE document: the bins it references and the tracks laid out in
/// them, in on-disc order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub path: PathBuf,
    /// Frame size of the first track, used to count frames in a monofile bin.
    pub frame_size: Option<u32>,
    pub bins: Vec<BinaryTrackFile>,
    pub tracks: Vec<Track>,
    pub has_audio_tracks: bool,
    pub has_data_tracks: bool,
    processable: bool,
}

impl CueSheet {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame_size: None,
            bins: Vec::new(),
            tracks: Vec::new(),
            has_audio_tracks: false,
            has_data_tracks: false,
            processable: true,
        }
    }

    pub async fn parse(path: impl AsRef<Path>) -> CueResult<Self> {
        CueParser::new(path).parse().await
    }

    pub(crate) fn push_track(&mut self, track: Track) {
        if self.frame_size.is_none() {
            self.frame_size = Some(track.frame_size);
        }
        if let Some(bin) = self.bins.get_mut(track.bin) {
            bin.frame_size = Some(track.frame_size);
        }
        self.has_audio_tracks |= track.is_audio;
        self.has_data_tracks |= track.is_data();
        self.tracks.push(track);
    }

    /// Decides, once all lines are consumed, whether the bin/track layout is
    /// one this crate can work with.
    pub(crate) fn classify(&mut self) {
        if self.is_processable() {
            if self.bins.len() == self.tracks.len() {
                info!(
                    "CUE {:?} has one file per track, continuing normally",
                    self.path
                );
            } else if self.bins.len() == 1 && self.tracks.len() > 1 {
                info!(
                    "CUE {:?} has several tracks in a single file, it should be split first",
                    self.path
                );
            } else {
                self.processable = false;
                error!(
                    "CUE {:?} references {} files for {} tracks, this layout is not supported",
                    self.path,
                    self.bins.len(),
                    self.tracks.len()
                );
            }
        }

        info!("Parsed CUE {:?}", self.path);
        debug!("Bins: {}", self.bins.len());
        debug!("Tracks: {}", self.tracks.len());
        info!(
            "Processable: {}",
            if self.is_processable() { "yes" } else { "NO" }
        );
    }

    /// Re-validates the sheet and reports whether it may be split or
    /// compressed. Once a sheet is found unprocessable it stays that way.
    pub fn is_processable(&mut self) -> bool {
        if !self.processable {
            return false;
        }

        if self.bins.is_empty() {
            self.processable = false;
            error!(
                "No BIN files found in CUE {:?}, nothing will be done with it",
                self.path
            );
            return false;
        }

        // every track is checked so each missing file gets reported
        let all_exist = self
            .tracks
            .iter()
            .fold(true, |all, track| track.check_if_exists() && all);

        if !all_exist {
            self.processable = false;
            error!(
                "CUE {:?} cannot be processed without all of its linked BIN files",
                self.path
            );
        }

        self.processable
    }

    pub fn is_monofile_multitrack(&self) -> bool {
        self.bins.len() < self.tracks.len() && self.bins.len() == 1
    }

    pub fn get_audio_bins(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|track| track.is_audio).collect()
    }

    /// Copies every bin and the CUE document into `dir`, returning a sheet
    /// whose paths point at the copies. Nothing is copied if any file would
    /// land on itself.
    ///
    /// All copies sit next to each other, so when a `FILE` line named a bin
    /// in another directory the copied CUE is rewritten with bare names.
    pub async fn copy_to_dir(&self, dir: impl AsRef<Path>) -> CueResult<CueSheet> {
        let dir = dir.as_ref();
        debug!("Copying {:?} to directory {:?}", self.path, dir);

        let copies: Vec<(&Path, PathBuf)> = self
            .bins
            .iter()
            .map(|bin| bin.path.as_path())
            .chain(std::iter::once(self.path.as_path()))
            .map(|source| (source, relocate(source, dir)))
            .collect();

        for (source, target) in &copies {
            if is_same_file(source, target).await {
                return Err(CueError::CopyOntoItself(source.to_path_buf()));
            }
        }
        for (source, target) in &copies {
            fs::copy(source, target).await?;
        }

        let mut copy = self.derive();
        copy.update_path(dir);

        let cue_dir = self.path.parent();
        if self.bins.iter().any(|bin| bin.path.parent() != cue_dir) {
            debug!("{:?} names bins outside its directory, rewriting it", self.path);
            copy.write_cue(None).await?;
        }

        Ok(copy)
    }

    fn update_path(&mut self, dir: &Path) {
        self.path = relocate(&self.path, dir);
        for track in &mut self.tracks {
            track.path = relocate(&track.path, dir);
            track.cue_path = self.path.clone();
        }
        for bin in &mut self.bins {
            bin.path = relocate(&bin.path, dir);
        }
    }

    /// Builds an independent copy of this sheet. Tracks and bins are copied
    /// element by element so the copy can be rewritten freely.
    pub(crate) fn derive(&self) -> CueSheet {
        CueSheet {
            path: self.path.clone(),
            frame_size: self.frame_size,
            bins: self.bins.iter().cloned().collect(),
            tracks: self.tracks.iter().cloned().collect(),
            has_audio_tracks: self.has_audio_tracks,
            has_data_tracks: self.has_data_tracks,
            processable: self.processable,
        }
    }

    /// Renders the sheet as CUE text. A `FILE` line is emitted whenever the
    /// next track lives in a different bin than the previous one.
    pub fn to_cue_string(&self) -> String {
        let mut contents = String::new();
        let mut current_bin = None;

        for track in &self.tracks {
            if current_bin != Some(track.bin) {
                let file_name = self
                    .bins
                    .get(track.bin)
                    .map(BinaryTrackFile::file_name)
                    .unwrap_or_else(|| file_name(&track.path));
                contents.push_str(&format!("FILE \"{file_name}\" BINARY\n"));
                current_bin = Some(track.bin);
            }

            contents.push_str(&format!("  TRACK {} {}\n", track.id, track.media_type));
            for index in track.indexes() {
                contents.push_str(&format!(
                    "    INDEX {} {}\n",
                    index.id(),
                    index.timestamp()
                ));
            }
        }

        contents
    }

    /// Writes the rendered sheet to `path`, or over the sheet's own path.
    pub async fn write_cue(&self, path: Option<&Path>) -> CueResult<()> {
        let path = path.unwrap_or(&self.path);
        debug!("Writing CUE {:?}", path);
        fs::write(path, self.to_cue_string()).await?;
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

async fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn relocate(path: &Path, dir: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}
