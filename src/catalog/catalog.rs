use super::track::is_audio_file;
use super::{Album, Artist, ArtistProfile, ArtistSummary, Track};
use crate::analytics::{normalize_album_name, normalize_track_name};
use std::collections::HashMap;
use std::path::Path;

const ARTIST_PROFILE_FILE: &str = "artist.json";
const COVER_FILES: &[&str] = &["cover.jpg", "cover.png"];

/// Outcome of a catalog scan. Problems are non-fatal per entry; the catalog
/// is absent only when the music root itself cannot be read.
pub struct CatalogBuild {
    pub catalog: Option<Catalog>,
    pub problems: Vec<String>,
}

#[derive(Debug)]
pub struct Catalog {
    artists: HashMap<String, Artist>,
    ordered_slugs: Vec<String>,
}

fn sorted_dir_names(dir: &Path, problems: &mut Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            problems.push(format!("Cannot read {}: {}", dir.display(), err));
            return (dirs, files);
        }
    };
    for entry in entries {
        match entry {
            Ok(entry) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                if entry.path().is_dir() {
                    dirs.push(name);
                } else {
                    files.push(name);
                }
            }
            Err(err) => problems.push(format!("Cannot read entry in {}: {}", dir.display(), err)),
        }
    }
    dirs.sort();
    files.sort();
    (dirs, files)
}

fn read_artist_profile(artist_dir: &Path, problems: &mut Vec<String>) -> ArtistProfile {
    let profile_path = artist_dir.join(ARTIST_PROFILE_FILE);
    if !profile_path.is_file() {
        return ArtistProfile::default();
    }
    std::fs::read_to_string(&profile_path)
        .map_err(|err| format!("Cannot read {}: {}", profile_path.display(), err))
        .and_then(|text| {
            serde_json::from_str(&text)
                .map_err(|err| format!("Invalid {}: {}", profile_path.display(), err))
        })
        .unwrap_or_else(|problem| {
            problems.push(problem);
            ArtistProfile::default()
        })
}

fn scan_album(music_dir: &Path, slug: &str, folder: &str, problems: &mut Vec<String>) -> Album {
    let album_dir = music_dir.join(slug).join(folder);
    let (_dirs, files) = sorted_dir_names(&album_dir, problems);

    let cover_url = files
        .iter()
        .find(|name| COVER_FILES.contains(&name.as_str()))
        .map(|name| format!("/music/{}/{}/{}", slug, folder, name));

    let tracks = files
        .iter()
        .filter(|name| is_audio_file(name))
        .map(|name| Track {
            title: normalize_track_name(name),
            url: format!("/music/{}/{}/{}", slug, folder, name),
        })
        .collect();

    Album {
        name: normalize_album_name(folder),
        folder: folder.to_string(),
        cover_url,
        tracks,
    }
}

fn scan_artist(music_dir: &Path, slug: &str, problems: &mut Vec<String>) -> Artist {
    let artist_dir = music_dir.join(slug);
    let profile = read_artist_profile(&artist_dir, problems);
    let (album_folders, _files) = sorted_dir_names(&artist_dir, problems);

    let albums: Vec<Album> = album_folders
        .iter()
        .map(|folder| scan_album(music_dir, slug, folder, problems))
        .filter(|album| !album.tracks.is_empty())
        .collect();

    if albums.is_empty() {
        problems.push(format!("Artist '{}' has no albums with tracks", slug));
    }

    Artist {
        slug: slug.to_string(),
        name: profile.name.unwrap_or_else(|| slug.to_string()),
        description_line1: profile.description_line1,
        description_line2: profile.description_line2,
        theme: profile.theme,
        albums,
    }
}

impl Catalog {
    /// Scans a `music/<artist>/<album>/<tracks>` tree. Unreadable or odd
    /// entries become problems, never a failed build, except for an
    /// unreadable root.
    pub fn build(music_dir: &Path) -> CatalogBuild {
        let mut problems = Vec::new();

        if !music_dir.is_dir() {
            problems.push(format!("{} is not a valid directory", music_dir.display()));
            return CatalogBuild {
                catalog: None,
                problems,
            };
        }

        let (artist_slugs, _files) = sorted_dir_names(music_dir, &mut problems);
        let mut artists = HashMap::new();
        for slug in &artist_slugs {
            artists.insert(slug.clone(), scan_artist(music_dir, slug, &mut problems));
        }

        CatalogBuild {
            catalog: Some(Catalog {
                artists,
                ordered_slugs: artist_slugs,
            }),
            problems,
        }
    }

    /// Empty catalog for tests.
    pub fn dummy() -> Catalog {
        Catalog {
            artists: HashMap::new(),
            ordered_slugs: Vec::new(),
        }
    }

    pub fn get_artist(&self, slug: &str) -> Option<&Artist> {
        self.artists.get(slug)
    }

    pub fn artists_overview(&self) -> Vec<ArtistSummary> {
        self.ordered_slugs
            .iter()
            .filter_map(|slug| self.artists.get(slug))
            .map(|artist| ArtistSummary {
                slug: artist.slug.clone(),
                name: artist.name.clone(),
                albums: artist.albums.len(),
            })
            .collect()
    }

    pub fn get_artists_count(&self) -> usize {
        self.artists.len()
    }

    pub fn get_albums_count(&self) -> usize {
        self.artists.values().map(|a| a.albums.len()).sum()
    }

    pub fn get_tracks_count(&self) -> usize {
        self.artists
            .values()
            .flat_map(|a| a.albums.iter())
            .map(|album| album.tracks.len())
            .sum()
    }
}
