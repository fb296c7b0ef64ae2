use chrono::{DateTime, Utc};

/// One synthetic listening event destined for `playback_history`.
///
/// `(user_id, song_id, playback_date)` is the uniqueness key in the target
/// table; a record colliding on it is skipped at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRecord {
    pub user_id: i64,
    pub song_id: i64,
    pub device_id: i64,
    pub playback_date: DateTime<Utc>,
    pub completed: bool,
    pub rating: Option<u8>, // only ever set on completed plays
}

impl PlaybackRecord {
    pub fn new(user_id: i64, song_id: i64, device_id: i64, playback_date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            song_id,
            device_id,
            playback_date,
            completed: false,
            rating: None,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn unique_key(&self) -> (i64, i64, i64) {
        (self.user_id, self.song_id, self.playback_date.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_new() {
        let date = DateTime::from_timestamp(1640995200, 0).unwrap();
        let record = PlaybackRecord::new(1, 2, 3, date);

        assert_eq!(record.user_id, 1);
        assert_eq!(record.song_id, 2);
        assert_eq!(record.device_id, 3);
        assert_eq!(record.playback_date, date);
        assert!(!record.completed);
        assert!(record.rating.is_none());
    }

    #[test]
    fn test_playback_builder_chain() {
        let date = DateTime::from_timestamp(1640995200, 0).unwrap();
        let record = PlaybackRecord::new(1, 2, 3, date)
            .with_completed(true)
            .with_rating(4);

        assert!(record.completed);
        assert_eq!(record.rating, Some(4));
    }

    #[test]
    fn test_unique_key_ignores_device_and_outcome() {
        let date = DateTime::from_timestamp(1640995200, 0).unwrap();
        let a = PlaybackRecord::new(1, 2, 3, date).with_completed(true);
        let b = PlaybackRecord::new(1, 2, 9, date);

        assert_eq!(a.unique_key(), b.unique_key());
        assert_eq!(a.unique_key(), (1, 2, 1640995200));
    }
}
