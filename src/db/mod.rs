use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};

use crate::config::{is_sql_identifier, SeedConfig};
use crate::models::{PlaybackRecord, ReferenceData};

/// The single connection a seeding run holds from start to finish.
///
/// The configured database file is attached under the schema namespace so
/// every statement addresses tables as `<schema>.<table>`.
pub struct PlaybackDb {
    conn: Connection,
    schema: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl InsertSummary {
    pub fn attempted(&self) -> usize {
        self.inserted + self.skipped
    }
}

pub fn connect(config: &SeedConfig) -> Result<PlaybackDb> {
    if !is_sql_identifier(&config.schema) {
        bail!("Invalid schema name {:?}", config.schema);
    }

    // ATTACH would silently create a missing file
    if !Path::new(&config.dbname).is_file() {
        bail!("Database file {} does not exist", config.dbname);
    }

    let conn = Connection::open_in_memory().context("Failed to open SQLite connection")?;
    conn.execute(
        &format!("ATTACH DATABASE ?1 AS {}", config.schema),
        params![config.dbname],
    )
    .with_context(|| format!("Failed to attach {} as {}", config.dbname, config.schema))?;

    Ok(PlaybackDb {
        conn,
        schema: config.schema.clone(),
    })
}

impl PlaybackDb {
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database connection")
    }
}

/// Every value of `column` in `table`, in the order the engine returns them.
pub fn fetch_existing_ids(db: &PlaybackDb, table: &str, column: &str) -> Result<Vec<i64>> {
    if !is_sql_identifier(table) || !is_sql_identifier(column) {
        bail!("Invalid identifier in lookup {}.{}", table, column);
    }

    let mut stmt = db
        .conn
        .prepare(&format!("SELECT {} FROM {}.{}", column, db.schema, table))
        .with_context(|| format!("Failed to query {}.{}", table, column))?;

    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;

    Ok(ids)
}

/// `(song_id, artist_id)` pairs resolved through each song's album.
pub fn fetch_song_artists(db: &PlaybackDb) -> Result<Vec<(i64, i64)>> {
    let schema = &db.schema;
    let mut stmt = db
        .conn
        .prepare(&format!(
            "SELECT s.song_id, a.artist_id
             FROM {schema}.songs s
             JOIN {schema}.albums al ON s.album_id = al.album_id
             JOIN {schema}.artists a ON al.artist_id = a.artist_id"
        ))
        .context("Failed to query song artists")?;

    let pairs = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pairs)
}

pub fn fetch_reference_data(db: &PlaybackDb) -> Result<ReferenceData> {
    tracing::info!("Fetching existing IDs from the database");
    let user_ids = fetch_existing_ids(db, "users", "user_id")?;
    let song_ids = fetch_existing_ids(db, "songs", "song_id")?;
    let device_ids = fetch_existing_ids(db, "devices", "device_id")?;

    tracing::info!("Mapping songs to their artists");
    let song_artists = fetch_song_artists(db)?;

    tracing::debug!(
        users = user_ids.len(),
        songs = song_ids.len(),
        devices = device_ids.len(),
        mapped_songs = song_artists.len(),
        "Reference data loaded"
    );

    Ok(ReferenceData {
        user_ids,
        song_ids,
        device_ids,
        song_artists,
    })
}

/// Insert all records in one transaction, skipping rows that collide on
/// `(user_id, song_id, playback_date)`.
///
/// Any other failure returns early; the dropped transaction rolls back
/// everything written so far.
pub fn insert_playbacks_batch(
    db: &mut PlaybackDb,
    records: &[PlaybackRecord],
) -> Result<InsertSummary> {
    if records.is_empty() {
        return Ok(InsertSummary::default());
    }

    let sql = format!(
        "INSERT INTO {}.playback_history
         (user_id, song_id, device_id, playback_date, completed, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (user_id, song_id, playback_date) DO NOTHING",
        db.schema
    );

    let tx = db.conn.transaction()?;
    let mut summary = InsertSummary::default();
    {
        let mut stmt = tx
            .prepare(&sql)
            .context("Failed to prepare playback insert")?;

        for record in records {
            let changes = stmt.execute(params![
                record.user_id,
                record.song_id,
                record.device_id,
                record.playback_date.timestamp(),
                record.completed,
                record.rating,
            ])?;
            if changes == 0 {
                summary.skipped += 1;
            } else {
                summary.inserted += changes;
            }
        }
    }
    tx.commit().context("Failed to commit playback batch")?;

    Ok(summary)
}

pub fn get_playback_count(db: &PlaybackDb) -> Result<i64> {
    let count: i64 = db.conn.query_row(
        &format!("SELECT COUNT(*) FROM {}.playback_history", db.schema),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
