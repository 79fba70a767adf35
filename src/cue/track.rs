use crate::cd::{frame_size_for, is_audio_media_type};
use crate::cue::error::{CueError, CueResult};
use crate::cue::index::{Index, PREGAP_INDEX_ID, START_INDEX_ID};
use crate::cue::timestamp::Timestamp;
use log::{debug, error, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One logical track of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub media_type: String,
    pub is_audio: bool,
    pub frame_size: u32,
    /// Keyed by two-digit index id, so iteration is in ascending id order.
    indexes: BTreeMap<String, Index>,
    /// Only known once the track has been carved out of a monofile bin.
    pub track_size_bytes: Option<u64>,
    pub path: PathBuf,
    /// Position of the owning file in the sheet's `bins`.
    pub bin: usize,
    /// Path of the owning sheet, used when reporting problems.
    pub cue_path: PathBuf,
}

impl Track {
    pub fn new(
        id: &str,
        media_type: &str,
        bin: usize,
        bin_path: &Path,
        cue_path: &Path,
    ) -> CueResult<Self> {
        let frame_size = frame_size_for(media_type)
            .ok_or_else(|| CueError::InvalidTrackType(media_type.to_string()))?;

        Ok(Self {
            id: id.to_string(),
            media_type: media_type.to_string(),
            is_audio: is_audio_media_type(media_type),
            frame_size,
            indexes: BTreeMap::new(),
            track_size_bytes: None,
            path: bin_path.to_path_buf(),
            bin,
            cue_path: cue_path.to_path_buf(),
        })
    }

    pub fn is_data(&self) -> bool {
        !self.is_audio
    }

    pub fn index(&self, id: &str) -> Option<&Index> {
        self.indexes.get(id)
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    /// Parses an `INDEX` line and stores it. A pending `PREGAP` duration
    /// synthesizes an `INDEX 00` that many frames before the parsed index.
    pub fn add_index(&mut self, line: &str, pregap: Option<Timestamp>) -> CueResult<()> {
        let index = Index::from_line(line)?;
        let start = index.timestamp();
        self.insert_index(index);

        if let Some(pregap) = pregap {
            let mut pregap_start = start;
            match pregap_start.subtract(&pregap).map(|_| ()) {
                Ok(()) => {
                    self.insert_index(Index::new(PREGAP_INDEX_ID, pregap_start)?);
                }
                Err(err) => warn!(
                    "Track {} of {:?} declares PREGAP {} before {}, no INDEX 00 is created: {}",
                    self.id, self.cue_path, pregap, start, err
                ),
            }
        }

        Ok(())
    }

    /// Stores an index, last write wins on duplicate ids.
    pub fn insert_index(&mut self, index: Index) {
        if self.indexes.contains_key(index.id()) {
            error!(
                "Error in CUE {:?}: INDEX {} is defined more than once for track {}. \
                 If the CUE was edited by hand, check it for mistakes.",
                self.cue_path,
                index.id(),
                self.id
            );
        }
        self.indexes.insert(index.id().to_string(), index);
    }

    pub fn check_if_exists(&self) -> bool {
        if self.path.exists() {
            return true;
        }

        error!(
            "Error in CUE {:?}: track {} references a file that does not exist: {:?}. \
             Make sure the file sits next to the CUE and its name matches the FILE line.",
            self.cue_path, self.id, self.path
        );
        false
    }

    /// Rebases `INDEX 00`/`INDEX 01` so the pregap starts at `00:00:00`,
    /// keeping the pregap length. Does nothing unless both are present.
    pub fn set_indexes_to_zero(&mut self) -> CueResult<()> {
        let (Some(pregap), Some(start)) = (
            self.indexes.get(PREGAP_INDEX_ID),
            self.indexes.get(START_INDEX_ID),
        ) else {
            debug!(
                "Track {} has no INDEX 00 and INDEX 01 pair, nothing to rebase",
                self.id
            );
            return Ok(());
        };

        let old_pregap = pregap.timestamp();
        let old_start = start.timestamp();
        let mut new_start = old_start;
        new_start.subtract(&old_pregap)?;

        debug!(
            "Rebasing INDEX 00 of track {} from {} to {}",
            self.id,
            old_pregap,
            Timestamp::zero()
        );
        debug!(
            "Rebasing INDEX 01 of track {} from {} to {}",
            self.id, old_start, new_start
        );

        self.indexes.clear();
        self.insert_index(Index::new(PREGAP_INDEX_ID, Timestamp::zero())?);
        self.insert_index(Index::new(START_INDEX_ID, new_start)?);
        Ok(())
    }

    /// Shifts every index back by the old `INDEX 01`, for a track that now
    /// starts its own file at that position. Tracks with an `INDEX 00` are
    /// left to `set_indexes_to_zero`.
    pub(crate) fn rebase_start_to_zero(&mut self) -> CueResult<()> {
        if self.indexes.contains_key(PREGAP_INDEX_ID) {
            return Ok(());
        }
        let Some(origin) = self.indexes.get(START_INDEX_ID).map(Index::timestamp) else {
            return Ok(());
        };

        let mut rebased = BTreeMap::new();
        for index in self.indexes.values() {
            let mut position = index.timestamp();
            position.subtract(&origin)?;
            debug!(
                "Rebasing INDEX {} of track {} from {} to {}",
                index.id(),
                self.id,
                index.timestamp(),
                position
            );
            rebased.insert(index.id().to_string(), Index::new(index.id(), position)?);
        }

        self.indexes = rebased;
        Ok(())
    }
}
