use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

/// Global song popularity: the first `popular_count` songs in fetch order
/// carry `popular_weight`, the rest `base_weight`.
#[derive(Debug, Clone)]
pub struct PopularityWeights {
    song_ids: Vec<i64>,
    probabilities: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl PopularityWeights {
    pub fn new(
        song_ids: &[i64],
        popular_count: usize,
        popular_weight: f64,
        base_weight: f64,
    ) -> Result<Self, WeightedError> {
        let weights: Vec<f64> = (0..song_ids.len())
            .map(|i| {
                if i < popular_count {
                    popular_weight
                } else {
                    base_weight
                }
            })
            .collect();
        let index = WeightedIndex::new(&weights)?;

        let total: f64 = weights.iter().sum();
        let probabilities = weights.iter().map(|w| w / total).collect();

        Ok(Self {
            song_ids: song_ids.to_vec(),
            probabilities,
            index,
        })
    }

    /// Normalized selection probability for each song, in fetch order.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        self.song_ids[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_normalized() {
        let songs: Vec<i64> = (1..=20).collect();
        let weights = PopularityWeights::new(&songs, 10, 0.8, 0.2).unwrap();

        let total: f64 = weights.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);

        // 0.8 / (0.8 * 10 + 0.2 * 10)
        assert!((weights.probabilities()[0] - 0.08).abs() < 1e-9);
        assert!((weights.probabilities()[19] - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_songs_than_popular_count() {
        let weights = PopularityWeights::new(&[1, 2, 3], 10, 0.8, 0.2).unwrap();
        for p in weights.probabilities() {
            assert!((p - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_song_list_rejected() {
        assert!(PopularityWeights::new(&[], 10, 0.8, 0.2).is_err());
    }
}
