//! Test data builders: a throwaway music tree and counter database.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Builds the music tree the constants in `constants.rs` describe.
/// Returns the temp dir guard and the music root inside it.
pub fn create_test_music_tree() -> std::io::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let music = temp_dir.path().join("music");

    write_file(
        &music.join("theband/artist.json"),
        br#"{"name": "The Test Band", "theme": "dark"}"#,
    )?;
    write_file(
        &music.join("theband/Album. First/01 Opening.mp3"),
        b"not really audio",
    )?;
    write_file(
        &music.join("theband/Album. First/02 Closing.mp3"),
        b"not really audio",
    )?;
    write_file(&music.join("theband/Album. First/cover.jpg"), b"not an image")?;
    write_file(
        &music.join("solo/EP. Quiet/01 Hush.ogg"),
        b"not really audio",
    )?;

    Ok((temp_dir, music))
}

/// Returns a temp dir guard and a path for a fresh counter database in it.
pub fn create_test_db_path() -> std::io::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("counters.db");
    Ok((temp_dir, db_path))
}
