/// Identifiers already present in the database, in the order the loader
/// returned them. Order matters: popularity weighting favours the first
/// songs fetched, and the fan split is positional.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub user_ids: Vec<i64>,
    pub song_ids: Vec<i64>,
    pub device_ids: Vec<i64>,
    pub song_artists: Vec<(i64, i64)>, // (song_id, artist_id)
}
