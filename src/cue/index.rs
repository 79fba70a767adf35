use crate::cue::error::{CueError, CueResult};
use crate::cue::timestamp::Timestamp;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INDEX_REGEX: Regex = Regex::new(r"(\d+)\s+(\d+:\d+:\d+)").unwrap();
}

pub const PREGAP_INDEX_ID: &str = "00";
pub const START_INDEX_ID: &str = "01";

/// A named position inside a track (`INDEX 00` = pregap start, `INDEX 01` =
/// track start). The frame count is derived from the timestamp and kept in
/// sync by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    id: String,
    timestamp: Timestamp,
    length_in_frames: u64,
}

impl Index {
    pub fn new(id: &str, timestamp: Timestamp) -> CueResult<Self> {
        let number = id.trim().parse::<u8>()?;

        Ok(Self {
            id: format!("{number:02}"),
            length_in_frames: timestamp.to_frames(),
            timestamp,
        })
    }

    /// Parses `<digits> <MM:SS:FF>`, i.e. the remainder of an `INDEX` line.
    pub fn from_line(line: &str) -> CueResult<Self> {
        let captures = INDEX_REGEX
            .captures(line)
            .ok_or_else(|| CueError::InvalidIndexLine(line.to_string()))?;

        Self::new(&captures[1], captures[2].parse()?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn length_in_frames(&self) -> u64 {
        self.length_in_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_frames_from_timestamp() {
        let index = Index::new("01", "01:30:00".parse().unwrap()).unwrap();
        assert_eq!(index.length_in_frames(), 6750);
        assert_eq!(index.timestamp().to_string(), "01:30:00");
    }

    #[test]
    fn parses_line_remainder() {
        let index = Index::from_line("INDEX 00 00:01:50").unwrap();
        assert_eq!(index.id(), "00");
        assert_eq!(index.length_in_frames(), 125);
    }

    #[test]
    fn normalises_id_to_two_digits() {
        let index = Index::from_line("1 00:00:00").unwrap();
        assert_eq!(index.id(), "01");
    }

    #[test]
    fn rejects_lines_without_timestamp() {
        assert!(matches!(
            Index::from_line("INDEX 01"),
            Err(CueError::InvalidIndexLine(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_id() {
        assert!(matches!(
            Index::new("300", Timestamp::zero()),
            Err(CueError::ParseIntError(_))
        ));
    }
}
