//! The analytics report assembler.
//!
//! Rebuilds the artist -> album -> track hierarchy from the flat counter
//! namespace: every `listen_counts` key is an asset path, so the hierarchy
//! is recovered by parsing paths at read time. The report is always computed
//! fresh from the store; there is no caching layer.

use super::{
    events_table, normalize_album_name, normalize_track_name, DiagnosticRecord,
    DIAGNOSTIC_LOGS_TABLE, EVENTS_TABLE_PREFIX, LISTEN_COUNTS_TABLE, STATS_BROWSERS_TABLE,
    STATS_COUNTRIES_TABLE, STATS_DEVICES_TABLE, STATS_OS_TABLE,
};
use crate::counter_store::{CounterStore, StoreError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct TrackStats {
    pub title: String,
    pub plays: u64,
    pub events: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct AlbumStats {
    pub total_plays: u64,
    pub tracks: Vec<TrackStats>,
}

#[derive(Debug, Serialize, Default)]
pub struct ArtistStats {
    pub total_plays: u64,
    pub albums: BTreeMap<String, AlbumStats>,
}

#[derive(Debug, Serialize)]
pub struct AudienceStats {
    pub browsers: BTreeMap<String, u64>,
    pub os: BTreeMap<String, u64>,
    pub devices: BTreeMap<String, u64>,
    pub countries: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub track_stats: BTreeMap<String, ArtistStats>,
    pub audience_stats: AudienceStats,
    pub diagnostic_logs: Vec<DiagnosticRecord>,
}

/// Takes the path portion of a counter key: scheme and authority of a full
/// URL are dropped, as are any query or fragment. Keys are raw strings, not
/// valid URIs (asset paths routinely contain spaces), so this is plain
/// string surgery.
fn key_path(raw_key: &str) -> &str {
    let mut path = raw_key;
    for scheme in ["http://", "https://"] {
        if let Some(rest) = raw_key.strip_prefix(scheme) {
            path = match rest.find('/') {
                Some(idx) => &rest[idx..],
                None => "",
            };
            break;
        }
    }
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Splits a counter key into (artist, album folder, track file). The key is
/// either a bare asset path or a full URL whose path carries the same shape;
/// leading and trailing slashes are tolerated. Returns `None` for anything
/// that does not decompose into exactly `music/<artist>/<album>/<file>`.
fn track_path_components(raw_key: &str) -> Option<(String, String, String)> {
    let path = key_path(raw_key);

    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    match parts.as_slice() {
        ["music", artist, album, file] if !artist.is_empty() && !album.is_empty() => {
            Some((artist.to_string(), album.to_string(), file.to_string()))
        }
        _ => None,
    }
}

fn group_track_stats(
    listen_counts: &HashMap<String, u64>,
    all_events: &HashMap<String, HashMap<String, u64>>,
) -> BTreeMap<String, ArtistStats> {
    let mut grouped: BTreeMap<String, ArtistStats> = BTreeMap::new();

    for (raw_key, plays) in listen_counts {
        let Some((artist_name, album_raw, track_file)) = track_path_components(raw_key) else {
            warn!("Skipping malformed track key: '{}'", raw_key);
            continue;
        };

        let album_name = normalize_album_name(&album_raw);
        let track_name = normalize_track_name(&track_file);

        // The event breakdown lives under the raw key, not the cleaned names.
        let events = all_events
            .get(&events_table(raw_key))
            .map(|counts| counts.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();

        let artist_stats = grouped.entry(artist_name).or_default();
        let album_stats = artist_stats.albums.entry(album_name).or_default();

        artist_stats.total_plays += plays;
        album_stats.total_plays += plays;
        album_stats.tracks.push(TrackStats {
            title: track_name,
            plays: *plays,
            events,
        });
    }

    for artist_stats in grouped.values_mut() {
        for album_stats in artist_stats.albums.values_mut() {
            album_stats.tracks.sort_by(|a, b| a.title.cmp(&b.title));
        }
    }

    grouped
}

fn parse_diagnostic_logs(raw_logs: HashMap<String, String>) -> Vec<DiagnosticRecord> {
    let mut logs: Vec<DiagnosticRecord> = raw_logs
        .values()
        .filter_map(|value| serde_json::from_str(value).ok())
        .collect();
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}

fn sorted(counters: HashMap<String, u64>) -> BTreeMap<String, u64> {
    counters.into_iter().collect()
}

/// Reads the whole counter namespace and assembles the report. The per-track
/// event tables are dynamically named, so they take a two-phase read:
/// discover the table names by prefix, then fetch each one.
pub fn assemble_report(store: &dyn CounterStore) -> Result<AnalyticsReport, StoreError> {
    let listen_counts = store.read_counters(LISTEN_COUNTS_TABLE)?;
    let browsers = store.read_counters(STATS_BROWSERS_TABLE)?;
    let os = store.read_counters(STATS_OS_TABLE)?;
    let devices = store.read_counters(STATS_DEVICES_TABLE)?;
    let countries = store.read_counters(STATS_COUNTRIES_TABLE)?;
    let raw_logs = store.read_entries(DIAGNOSTIC_LOGS_TABLE)?;

    let mut all_events: HashMap<String, HashMap<String, u64>> = HashMap::new();
    for table in store.list_tables(EVENTS_TABLE_PREFIX)? {
        let counters = store.read_counters(&table)?;
        all_events.insert(table, counters);
    }

    Ok(AnalyticsReport {
        track_stats: group_track_stats(&listen_counts, &all_events),
        audience_stats: AudienceStats {
            browsers: sorted(browsers),
            os: sorted(os),
            devices: sorted(devices),
            countries: sorted(countries),
        },
        diagnostic_logs: parse_diagnostic_logs(raw_logs),
    })
}
