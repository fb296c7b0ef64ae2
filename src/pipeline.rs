use std::fmt;

use anyhow::Result;
use chrono::Utc;
use indicatif::ProgressBar;
use rand::Rng;

use crate::config::SeedConfig;
use crate::db::{self, PlaybackDb};
use crate::generator::{GenerationParams, PlaybackGenerator};
use crate::models::PlaybackRecord;

/// How a seeding run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    ConnectionFailed { reason: String },
    GenerationFailed { reason: String },
    InsertFailed { reason: String },
    InsertPartial { inserted: usize, skipped: usize },
    Success { inserted: usize },
}

impl SeedOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SeedOutcome::ConnectionFailed { .. }
                | SeedOutcome::GenerationFailed { .. }
                | SeedOutcome::InsertFailed { .. }
        )
    }
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedOutcome::ConnectionFailed { reason } => {
                write!(f, "failed to connect to the database: {}", reason)
            }
            SeedOutcome::GenerationFailed { reason } => {
                write!(f, "an error occurred during generation: {}", reason)
            }
            SeedOutcome::InsertFailed { reason } => {
                write!(f, "failed to insert records: {}", reason)
            }
            SeedOutcome::InsertPartial { inserted, skipped } => write!(
                f,
                "{} records inserted, {} skipped as duplicates",
                inserted, skipped
            ),
            SeedOutcome::Success { inserted } => {
                write!(f, "{} records successfully inserted", inserted)
            }
        }
    }
}

/// Connect, generate, insert, close.
///
/// Failures are reported through the returned outcome rather than as an
/// error. Once connected, the connection is closed exactly once whatever
/// the later stages do.
pub fn run<R: Rng + ?Sized>(
    config: &SeedConfig,
    params: GenerationParams,
    rng: &mut R,
    progress: &ProgressBar,
) -> SeedOutcome {
    tracing::info!("Connecting to {}", config.display_target());
    let mut db = match db::connect(config) {
        Ok(db) => {
            tracing::info!("Database connection established");
            db
        }
        Err(e) => {
            tracing::error!("Failed to connect to the database: {:#}", e);
            return SeedOutcome::ConnectionFailed {
                reason: format!("{:#}", e),
            };
        }
    };

    let outcome = seed(&mut db, config, params, rng, progress);

    match db.close() {
        Ok(()) => tracing::info!("Database connection closed"),
        Err(e) => tracing::warn!("{:#}", e),
    }

    outcome
}

fn seed<R: Rng + ?Sized>(
    db: &mut PlaybackDb,
    config: &SeedConfig,
    params: GenerationParams,
    rng: &mut R,
    progress: &ProgressBar,
) -> SeedOutcome {
    let records = match generate(db, config, params, rng, progress) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("An error occurred during generation: {:#}", e);
            return SeedOutcome::GenerationFailed {
                reason: format!("{:#}", e),
            };
        }
    };

    tracing::info!("Inserting {} records into the database", records.len());
    match db::insert_playbacks_batch(db, &records) {
        Ok(summary) if summary.skipped == 0 => {
            tracing::info!("{} records successfully inserted", summary.inserted);
            SeedOutcome::Success {
                inserted: summary.inserted,
            }
        }
        Ok(summary) => {
            tracing::info!(
                "{} records inserted, {} skipped as duplicates",
                summary.inserted,
                summary.skipped
            );
            SeedOutcome::InsertPartial {
                inserted: summary.inserted,
                skipped: summary.skipped,
            }
        }
        Err(e) => {
            tracing::error!("Failed to insert records: {:#}", e);
            SeedOutcome::InsertFailed {
                reason: format!("{:#}", e),
            }
        }
    }
}

fn generate<R: Rng + ?Sized>(
    db: &PlaybackDb,
    config: &SeedConfig,
    params: GenerationParams,
    rng: &mut R,
    progress: &ProgressBar,
) -> Result<Vec<PlaybackRecord>> {
    let reference = db::fetch_reference_data(db)?;
    let generator = PlaybackGenerator::new(&reference, params)?;

    tracing::info!(
        "Generating {} playback records with crossover logic",
        config.record_count
    );
    progress.set_length(config.record_count as u64);
    let records = generator.generate(rng, config.record_count, Utc::now(), progress);
    progress.finish_and_clear();

    Ok(records)
}
