use super::Album;
use serde::{Deserialize, Serialize};

/// Optional presentation metadata, read from an `artist.json` file inside
/// the artist directory. Everything defaults when the file is absent.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ArtistProfile {
    pub name: Option<String>,
    pub description_line1: Option<String>,
    pub description_line2: Option<String>,
    pub theme: Option<String>,
}

#[derive(Clone, Serialize, Debug)]
pub struct Artist {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub albums: Vec<Album>,
}

/// Listing entry for the artists overview endpoint.
#[derive(Clone, Serialize, Debug)]
pub struct ArtistSummary {
    pub slug: String,
    pub name: String,
    pub albums: usize,
}
