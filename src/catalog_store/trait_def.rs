use crate::radio::{Genre, NewTrack, Show, Track, TrackId};
use anyhow::Result;

pub trait CatalogStore: Send + Sync {
    /// Inserts a new track and returns it with its assigned id.
    fn create_track(&self, track: &NewTrack) -> Result<Track>;

    /// Returns Ok(None) if no track has the given id.
    fn get_track(&self, id: TrackId) -> Result<Option<Track>>;

    /// All tracks sorted by title.
    fn list_tracks(&self) -> Result<Vec<Track>>;

    fn count_tracks(&self) -> Result<usize>;

    /// Returns false if no track had the given id.
    fn delete_track(&self, id: TrackId) -> Result<bool>;

    /// Inserts the show, or replaces the one with the same slug.
    fn save_show(&self, show: &Show) -> Result<()>;

    /// Returns Ok(None) if no show has the given slug.
    fn get_show(&self, slug: &str) -> Result<Option<Show>>;

    /// All shows sorted by display order.
    fn list_shows(&self) -> Result<Vec<Show>>;

    fn add_genre(&self, name: &str) -> Result<Genre>;

    /// All genres sorted by name.
    fn list_genres(&self) -> Result<Vec<Genre>>;
}
