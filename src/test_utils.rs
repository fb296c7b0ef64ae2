// Test utilities for building reference databases and fixture data
use crate::config::SeedConfig;
use crate::models::ReferenceData;
use rusqlite::{params, Connection};
use tempfile::NamedTempFile;

pub const ROCK_ARTIST: i64 = 1;
pub const POP_ARTIST: i64 = 2;
pub const OTHER_ARTIST: i64 = 4;

/// Create the tables the seeder reads from and writes to
pub fn create_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE users (user_id INTEGER PRIMARY KEY);
         CREATE TABLE artists (artist_id INTEGER PRIMARY KEY);
         CREATE TABLE albums (
             album_id INTEGER PRIMARY KEY,
             artist_id INTEGER NOT NULL REFERENCES artists(artist_id)
         );
         CREATE TABLE songs (
             song_id INTEGER PRIMARY KEY,
             album_id INTEGER NOT NULL REFERENCES albums(album_id)
         );
         CREATE TABLE devices (device_id INTEGER PRIMARY KEY);
         CREATE TABLE playback_history (
             playback_id INTEGER PRIMARY KEY AUTOINCREMENT,
             user_id INTEGER NOT NULL,
             song_id INTEGER NOT NULL,
             device_id INTEGER NOT NULL,
             playback_date INTEGER NOT NULL,
             completed INTEGER NOT NULL,
             rating INTEGER,
             UNIQUE(user_id, song_id, playback_date)
         );",
    )
    .unwrap();
}

/// Create a database file with the given users, songs and devices.
///
/// Each artist gets one album whose id equals the artist id.
pub fn create_reference_db(
    user_ids: &[i64],
    songs: &[(i64, i64)], // (song_id, artist_id)
    device_ids: &[i64],
) -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    let conn = Connection::open(temp_file.path()).unwrap();
    create_schema(&conn);

    for user_id in user_ids {
        conn.execute("INSERT INTO users (user_id) VALUES (?1)", params![user_id])
            .unwrap();
    }
    for (song_id, artist_id) in songs {
        conn.execute(
            "INSERT OR IGNORE INTO artists (artist_id) VALUES (?1)",
            params![artist_id],
        )
        .unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO albums (album_id, artist_id) VALUES (?1, ?1)",
            params![artist_id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO songs (song_id, album_id) VALUES (?1, ?2)",
            params![song_id, artist_id],
        )
        .unwrap();
    }
    for device_id in device_ids {
        conn.execute(
            "INSERT INTO devices (device_id) VALUES (?1)",
            params![device_id],
        )
        .unwrap();
    }

    temp_file
}

/// Songs 1..=10 by a rock artist followed by songs 11..=20 by a pop artist
pub fn two_genre_songs() -> Vec<(i64, i64)> {
    (1..=20)
        .map(|song_id| {
            let artist = if song_id <= 10 { ROCK_ARTIST } else { POP_ARTIST };
            (song_id, artist)
        })
        .collect()
}

/// Ten users, twenty two-genre songs, three devices
pub fn fan_reference_data() -> ReferenceData {
    let songs = two_genre_songs();
    ReferenceData {
        user_ids: (1..=10).collect(),
        song_ids: songs.iter().map(|(song_id, _)| *song_id).collect(),
        device_ids: vec![101, 102, 103],
        song_artists: songs,
    }
}

pub fn test_config(temp_file: &NamedTempFile, record_count: usize) -> SeedConfig {
    SeedConfig::default()
        .with_dbname(temp_file.path().to_str().unwrap())
        .with_record_count(record_count)
        .with_seed(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_genre_songs_split() {
        let songs = two_genre_songs();

        assert_eq!(songs.len(), 20);
        assert_eq!(songs.iter().filter(|(_, a)| *a == ROCK_ARTIST).count(), 10);
        assert_eq!(songs[0], (1, ROCK_ARTIST));
        assert_eq!(songs[19], (20, POP_ARTIST));
    }

    #[test]
    fn test_create_reference_db_rows() {
        let temp_file = create_reference_db(&[1, 2], &two_genre_songs(), &[7, 8, 9]);
        let conn = Connection::open(temp_file.path()).unwrap();

        let users: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        let albums: i64 = conn
            .query_row("SELECT COUNT(*) FROM albums", [], |row| row.get(0))
            .unwrap();
        let devices: i64 = conn
            .query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))
            .unwrap();

        assert_eq!(users, 2);
        assert_eq!(albums, 2);
        assert_eq!(devices, 3);
    }
}
