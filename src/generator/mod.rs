mod cohorts;
mod popularity;

pub use cohorts::{FanCohort, FanCohorts, SongCohorts};
pub use popularity::PopularityWeights;

use chrono::{DateTime, Duration, Utc};
use indicatif::ProgressBar;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::{PlaybackRecord, ReferenceData};

pub const ROCK_ARTISTS: &[i64] = &[1, 6, 8, 11];
pub const POP_ARTISTS: &[i64] = &[2, 3, 5, 7];

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no {0} available to sample from")]
    EmptyReference(&'static str),
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("invalid popularity weights: {0}")]
    InvalidWeights(#[from] rand::distributions::WeightedError),
}

/// Tunables for the listening model.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub rock_artists: Vec<i64>,
    pub pop_artists: Vec<i64>,
    /// Chance a fan picks from the other genre.
    pub crossover_chance: f64,
    /// Chance a cohort pick is thrown away for a global popularity pick.
    pub fallback_chance: f64,
    pub popular_song_count: usize,
    pub popular_weight: f64,
    pub base_weight: f64,
    pub completion_rate: f64,
    pub rating_chance: f64,
    pub high_rating_chance: f64,
    pub history_window: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            rock_artists: ROCK_ARTISTS.to_vec(),
            pop_artists: POP_ARTISTS.to_vec(),
            crossover_chance: 0.15,
            fallback_chance: 0.1,
            popular_song_count: 10,
            popular_weight: 0.8,
            base_weight: 0.2,
            completion_rate: 0.85,
            rating_chance: 0.7,
            high_rating_chance: 0.75,
            history_window: Duration::days(730),
        }
    }
}

impl GenerationParams {
    fn validate(&self) -> Result<(), GenerationError> {
        let probabilities = [
            ("crossover_chance", self.crossover_chance),
            ("fallback_chance", self.fallback_chance),
            ("completion_rate", self.completion_rate),
            ("rating_chance", self.rating_chance),
            ("high_rating_chance", self.high_rating_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenerationError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

/// Turns reference identifiers into synthetic playback events.
///
/// All randomness comes from the `Rng` handed to each call, so a seeded
/// generator with the same reference data and `now` yields identical output.
pub struct PlaybackGenerator<'a> {
    reference: &'a ReferenceData,
    params: GenerationParams,
    fans: FanCohorts,
    songs: SongCohorts,
    popularity: PopularityWeights,
}

impl<'a> PlaybackGenerator<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        params: GenerationParams,
    ) -> Result<Self, GenerationError> {
        params.validate()?;

        if reference.user_ids.is_empty() {
            return Err(GenerationError::EmptyReference("users"));
        }
        if reference.song_ids.is_empty() {
            return Err(GenerationError::EmptyReference("songs"));
        }
        if reference.device_ids.is_empty() {
            return Err(GenerationError::EmptyReference("devices"));
        }

        let fans = FanCohorts::partition(&reference.user_ids);
        let songs = SongCohorts::from_artist_map(
            &reference.song_artists,
            &params.rock_artists,
            &params.pop_artists,
        );
        let popularity = PopularityWeights::new(
            &reference.song_ids,
            params.popular_song_count,
            params.popular_weight,
            params.base_weight,
        )?;

        let (rock_fans, pop_fans) = fans.sizes();
        tracing::debug!(
            rock_fans,
            pop_fans,
            rock_songs = songs.songs_for(FanCohort::Rock).len(),
            pop_songs = songs.songs_for(FanCohort::Pop).len(),
            "Cohorts partitioned"
        );

        Ok(Self {
            reference,
            params,
            fans,
            songs,
            popularity,
        })
    }

    pub fn fans(&self) -> &FanCohorts {
        &self.fans
    }

    pub fn songs(&self) -> &SongCohorts {
        &self.songs
    }

    pub fn popularity(&self) -> &PopularityWeights {
        &self.popularity
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        now: DateTime<Utc>,
        progress: &ProgressBar,
    ) -> Vec<PlaybackRecord> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.generate_one(rng, now));
            progress.inc(1);
        }
        records
    }

    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> PlaybackRecord {
        let user_id = pick(&self.reference.user_ids, rng);
        let song_id = self.pick_song(rng, self.fans.cohort_of(user_id));
        let device_id = pick(&self.reference.device_ids, rng);
        let playback_date = self.pick_date(rng, now);

        let completed = rng.gen_bool(self.params.completion_rate);
        let mut record =
            PlaybackRecord::new(user_id, song_id, device_id, playback_date).with_completed(completed);

        if completed && rng.gen::<f64>() < self.params.rating_chance {
            let rating = if rng.gen::<f64>() < self.params.high_rating_chance {
                rng.gen_range(3..=5)
            } else {
                rng.gen_range(1..=2)
            };
            record = record.with_rating(rating);
        }

        record
    }

    /// Cohort pick first, then the popularity override. The override can
    /// replace a perfectly good cohort pick.
    pub fn pick_song<R: Rng + ?Sized>(&self, rng: &mut R, cohort: FanCohort) -> i64 {
        let own = self.songs.songs_for(cohort);
        let other = self.songs.songs_for(cohort.opposite());

        let cohort_pick = if rng.gen::<f64>() > self.params.crossover_chance && !own.is_empty() {
            own.choose(rng).copied()
        } else {
            other.choose(rng).copied()
        };

        match cohort_pick {
            Some(song_id) if rng.gen::<f64>() >= self.params.fallback_chance => song_id,
            _ => self.popularity.sample(rng),
        }
    }

    fn pick_date<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
        let end = now.timestamp();
        let start = (now - self.params.history_window).timestamp();
        let secs = rng.gen_range(start..=end);
        DateTime::from_timestamp(secs, 0).unwrap_or(now)
    }
}

// Callers guarantee `items` is non-empty.
fn pick<R: Rng + ?Sized>(items: &[i64], rng: &mut R) -> i64 {
    items[rng.gen_range(0..items.len())]
}
