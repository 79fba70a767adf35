use crate::cd::{FRAMES_PER_SECOND, SECONDS_PER_MINUTE};
use crate::cue::error::{CueError, CueResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

lazy_static! {
    static ref TIMESTAMP_REGEX: Regex = Regex::new(r"^(\d+):(\d+):(\d+)$").unwrap();
}

/// A minute:second:frame (MSF) position or duration on the disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timestamp {
    pub fn new(minutes: u32, seconds: u32, frames: u32) -> Self {
        Self {
            minutes,
            seconds,
            frames,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Absolute number of frames from `00:00:00`.
    pub fn to_frames(&self) -> u64 {
        self.frames as u64
            + self.seconds as u64 * FRAMES_PER_SECOND as u64
            + self.minutes as u64 * SECONDS_PER_MINUTE as u64 * FRAMES_PER_SECOND as u64
    }

    pub fn add(&mut self, other: &Timestamp) -> &mut Self {
        let frames = self.frames + other.frames;
        let seconds = self.seconds + other.seconds + frames / FRAMES_PER_SECOND;
        let minutes = self.minutes + other.minutes + seconds / SECONDS_PER_MINUTE;

        self.frames = frames % FRAMES_PER_SECOND;
        self.seconds = seconds % SECONDS_PER_MINUTE;
        self.minutes = minutes;
        self
    }

    /// Subtracts `other`, borrowing frames from seconds and seconds from
    /// minutes. Fails without touching `self` if the result would be negative.
    pub fn subtract(&mut self, other: &Timestamp) -> CueResult<&mut Self> {
        let fps = FRAMES_PER_SECOND as i64;
        let spm = SECONDS_PER_MINUTE as i64;

        let frames = self.frames as i64 - other.frames as i64;
        let seconds = self.seconds as i64 - other.seconds as i64 + frames.div_euclid(fps);
        let minutes = self.minutes as i64 - other.minutes as i64 + seconds.div_euclid(spm);

        if minutes < 0 {
            return Err(CueError::TimestampUnderflow {
                minuend: self.to_string(),
                subtrahend: other.to_string(),
            });
        }

        self.frames = frames.rem_euclid(fps) as u32;
        self.seconds = seconds.rem_euclid(spm) as u32;
        self.minutes = minutes as u32;
        Ok(self)
    }
}

impl FromStr for Timestamp {
    type Err = CueError;

    fn from_str(s: &str) -> CueResult<Self> {
        let invalid = || CueError::InvalidTimestamp(s.to_string());
        let captures = TIMESTAMP_REGEX.captures(s.trim()).ok_or_else(invalid)?;

        let field = |i: usize| captures[i].parse::<u32>().map_err(|_| invalid());

        Ok(Self {
            minutes: field(1)?,
            seconds: field(2)?,
            frames: field(3)?,
        })
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.frames)
    }
}
