// src/cd/mod.rs
pub const FRAMES_PER_SECOND: u32 = 75;
pub const SECONDS_PER_MINUTE: u32 = 60;

pub const SECTOR_SIZE: u32 = 2352;
pub const SUBCODE_SIZE: u32 = 96;
pub const CDG_FRAME_SIZE: u32 = SECTOR_SIZE + SUBCODE_SIZE;
pub const MODE1_DATA_SIZE: u32 = 2048;
pub const MODE2_DATA_SIZE: u32 = 2336;

/// Media type token of an audio track, as written after `TRACK <id>`.
pub const AUDIO_MEDIA_TYPE: &str = "AUDIO";

const FRAME_SIZES: [(&str, u32); 8] = [
    ("AUDIO", SECTOR_SIZE),
    ("MODE1/2352", SECTOR_SIZE),
    ("MODE2/2352", SECTOR_SIZE),
    ("CDI/2352", SECTOR_SIZE),
    ("CDG", CDG_FRAME_SIZE),
    ("MODE1/2048", MODE1_DATA_SIZE),
    ("MODE2/2336", MODE2_DATA_SIZE),
    ("CDI/2336", MODE2_DATA_SIZE),
];

/// Looks up the number of bytes one frame occupies in a bin for the given
/// track media type. Matching is case-insensitive.
pub fn frame_size_for(media_type: &str) -> Option<u32> {
    FRAME_SIZES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(media_type))
        .map(|(_, size)| *size)
}

pub fn is_audio_media_type(media_type: &str) -> bool {
    media_type.eq_ignore_ascii_case(AUDIO_MEDIA_TYPE)
}
