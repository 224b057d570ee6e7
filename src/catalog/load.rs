use super::Catalog;
use anyhow::{bail, Result};
use tracing::{info, warn};

pub fn load_catalog<P: AsRef<std::path::Path>>(music_dir: P) -> Result<Catalog> {
    let build = Catalog::build(music_dir.as_ref());
    let problems = build.problems;
    let catalog = build.catalog;

    if !problems.is_empty() {
        warn!("Found {} problems scanning the music tree:", problems.len());
        for problem in problems.iter() {
            warn!("- {}", problem);
        }
    }

    match (&catalog, problems.is_empty()) {
        (Some(_), true) => info!("Catalog scanned, no issues found."),
        (Some(_), false) => info!(
            "Catalog was built, but check the {} non-fatal issues above.",
            problems.len()
        ),
        (None, _) => info!("The catalog could not be initialized, check the problems above."),
    }

    if let Some(catalog) = catalog {
        info!(
            "Catalog has:\n{} artists\n{} albums\n{} tracks",
            catalog.get_artists_count(),
            catalog.get_albums_count(),
            catalog.get_tracks_count()
        );
        return Ok(catalog);
    }

    bail!("Could not load catalog");
}
