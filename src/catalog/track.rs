use serde::Serialize;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

#[derive(Clone, Serialize, Debug)]
pub struct Track {
    /// Cleaned display title, track number and extension stripped.
    pub title: String,
    /// Asset url the players stream from; also the track's analytics key.
    pub url: String,
}

pub fn is_audio_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
