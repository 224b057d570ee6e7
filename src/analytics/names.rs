//! Display-name cleaning for catalog folders and track files.
//!
//! The music tree encodes presentation hints in its file names: album
//! folders carry an `Album.` / `EP.` / `Demo.` kind prefix and track files a
//! two-digit ordering prefix. Both the catalog scan and the analytics report
//! go through these two functions, so the same raw path always cleans to the
//! same display name.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ALBUM_KIND_PREFIX: Regex =
        Regex::new(r"(?i)^(Album|EP|Demo)\.\s*").expect("Invalid album prefix regex");
    static ref TRACK_NUMBER_PREFIX: Regex =
        Regex::new(r"^\d{1,2}[\s.\-_]*").expect("Invalid track prefix regex");
}

/// Strips one leading case-insensitive `Album.`/`EP.`/`Demo.` kind prefix
/// (and the whitespace after it) from an album folder name.
pub fn normalize_album_name(folder: &str) -> String {
    ALBUM_KIND_PREFIX.replace(folder, "").trim().to_string()
}

/// Turns a track file name into a display title: drops the final extension,
/// then one leading 1-2 digit track number with its space/dot/dash/underscore
/// separators.
pub fn normalize_track_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    TRACK_NUMBER_PREFIX.replace(stem, "").trim().to_string()
}
