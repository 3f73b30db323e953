//! Startup data: sample catalog entries and the default manager template.

use crate::catalog_store::CatalogStore;
use crate::profiles::ProfileStore;
use crate::radio::{
    ManagerProfile, NewScheduleSlot, NewSongReport, NewTrack, Show, DEFAULT_MANAGER_SESSION,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::info;

const SAMPLE_TRACKS: &[(&str, &str, u32, u32)] = &[
    ("Campus Sunrise", "DJ Nova", 122, 215),
    ("Library Lo-Fi", "Study Group", 90, 260),
    ("Stadium Anthem", "The Ravens", 128, 198),
    ("Late Lab Night", "Night Coder", 110, 245),
];

const DEFAULT_SHOWS: &[(&str, &str, &str, &str, i64)] = &[
    (
        "morning",
        "Morning Show",
        "Wake-up mixes, campus announcements, and news.",
        "Variety",
        1,
    ),
    (
        "drive",
        "Drive Time",
        "Commuter anthems and student takeovers.",
        "Pop/Rock",
        2,
    ),
    (
        "night",
        "Night Mix",
        "Chill, electronic, and requests into the night.",
        "Electronic",
        3,
    ),
];

const SAMPLE_GENRES: &[&str] = &["EDM", "House", "Lo-Fi", "Synthwave"];

const TEMPLATE_SCHEDULE: &[(&str, &str, &str, &str)] = &[
    ("2025-09-01", "08:00", "DJ Nova", "House"),
    ("2025-09-01", "12:00", "Study Group", "Lo-Fi"),
    ("2025-09-01", "17:00", "The Ravens", "EDM"),
    ("2025-09-01", "22:00", "Night Coder", "Synthwave"),
];

pub fn seed_catalog(catalog: &dyn CatalogStore) -> Result<()> {
    if catalog.count_tracks()? == 0 {
        for (title, artist, bpm, duration) in SAMPLE_TRACKS {
            let track = NewTrack::new(title, artist, *bpm, *duration)
                .with_context(|| format!("Invalid sample track {}", title))?;
            catalog.create_track(&track)?;
        }
        info!("Seeded {} tracks", SAMPLE_TRACKS.len());
    }

    if catalog.list_shows()?.is_empty() {
        for (slug, title, description, genre, order) in DEFAULT_SHOWS {
            catalog.save_show(&Show::new(slug, title, description, genre, *order))?;
        }
        info!("Seeded {} shows", DEFAULT_SHOWS.len());
    }

    if catalog.list_genres()?.is_empty() {
        for name in SAMPLE_GENRES {
            catalog.add_genre(name)?;
        }
        info!("Seeded {} genres", SAMPLE_GENRES.len());
    }
    Ok(())
}

/// Writes the read-only manager template unless it already exists.
pub fn seed_manager_template(profiles: &dyn ProfileStore) -> Result<()> {
    if profiles.get_manager_profile(DEFAULT_MANAGER_SESSION)?.is_some() {
        return Ok(());
    }

    let now = Utc::now();
    // Template slots are historical, so validate against a fixed earlier date.
    let reference = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("Invalid template reference date")?;

    let mut template = ManagerProfile::new(DEFAULT_MANAGER_SESSION, now);
    for (date, time, dj_name, genre) in TEMPLATE_SCHEDULE {
        template
            .add_to_schedule(
                NewScheduleSlot {
                    date: date.to_string(),
                    time: time.to_string(),
                    dj_name: dj_name.to_string(),
                    genre: genre.to_string(),
                },
                reference,
                now,
            )
            .with_context(|| format!("Invalid template slot for {}", dj_name))?;
    }
    template
        .add_song_report(
            NewSongReport {
                assigned_song: "Campus Sunrise".to_string(),
                dj_name: "DJ Nova".to_string(),
                status: "Played".to_string(),
                icon: "check".to_string(),
            },
            now,
        )
        .context("Invalid template song report")?;

    profiles.save_manager_profile(&template)?;
    info!("Seeded default manager template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::SqliteCatalogStore;
    use crate::profiles::SqliteProfileStore;
    use tempfile::TempDir;

    #[test]
    fn seeding_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SqliteCatalogStore::new(temp_dir.path().join("catalog.db")).unwrap();
        let profiles = SqliteProfileStore::new(temp_dir.path().join("profiles.db")).unwrap();

        for _ in 0..2 {
            seed_catalog(&catalog).unwrap();
            seed_manager_template(&profiles).unwrap();
        }

        assert_eq!(catalog.count_tracks().unwrap(), 4);
        let slugs: Vec<String> = catalog
            .list_shows()
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        assert_eq!(slugs, vec!["morning", "drive", "night"]);
        let genres: Vec<String> = catalog
            .list_genres()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(genres, SAMPLE_GENRES);

        let template = profiles
            .get_manager_profile(DEFAULT_MANAGER_SESSION)
            .unwrap()
            .unwrap();
        assert_eq!(template.schedule().len(), TEMPLATE_SCHEDULE.len());
        assert_eq!(template.song_reports().len(), 1);
    }
}
