use std::collections::HashSet;

/// Which fan community a user or song belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanCohort {
    Rock,
    Pop,
}

impl FanCohort {
    pub fn opposite(self) -> Self {
        match self {
            FanCohort::Rock => FanCohort::Pop,
            FanCohort::Pop => FanCohort::Rock,
        }
    }
}

/// Users split positionally: the first half (rounded down) are rock fans,
/// everyone else is a pop fan.
#[derive(Debug, Clone)]
pub struct FanCohorts {
    rock_fans: HashSet<i64>,
    rock_count: usize,
    pop_count: usize,
}

impl FanCohorts {
    pub fn partition(user_ids: &[i64]) -> Self {
        let (rock, pop) = user_ids.split_at(user_ids.len() / 2);
        Self {
            rock_fans: rock.iter().copied().collect(),
            rock_count: rock.len(),
            pop_count: pop.len(),
        }
    }

    pub fn cohort_of(&self, user_id: i64) -> FanCohort {
        if self.rock_fans.contains(&user_id) {
            FanCohort::Rock
        } else {
            FanCohort::Pop
        }
    }

    pub fn sizes(&self) -> (usize, usize) {
        (self.rock_count, self.pop_count)
    }
}

/// Songs grouped by their artist's genre. Songs by any other artist are in
/// neither list.
#[derive(Debug, Clone, Default)]
pub struct SongCohorts {
    rock: Vec<i64>,
    pop: Vec<i64>,
}

impl SongCohorts {
    pub fn from_artist_map(
        song_artists: &[(i64, i64)],
        rock_artists: &[i64],
        pop_artists: &[i64],
    ) -> Self {
        let mut cohorts = Self::default();
        for &(song_id, artist_id) in song_artists {
            if rock_artists.contains(&artist_id) {
                cohorts.rock.push(song_id);
            }
            if pop_artists.contains(&artist_id) {
                cohorts.pop.push(song_id);
            }
        }
        cohorts
    }

    pub fn songs_for(&self, cohort: FanCohort) -> &[i64] {
        match cohort {
            FanCohort::Rock => &self.rock,
            FanCohort::Pop => &self.pop,
        }
    }

    pub fn contains(&self, cohort: FanCohort, song_id: i64) -> bool {
        self.songs_for(cohort).contains(&song_id)
    }
}
