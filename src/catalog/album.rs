use super::Track;
use serde::Serialize;

#[derive(Clone, Serialize, Debug)]
pub struct Album {
    /// Cleaned display name, kind prefix stripped.
    pub name: String,
    /// Raw directory name, as it appears in asset paths.
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub tracks: Vec<Track>,
}
