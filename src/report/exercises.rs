use itertools::Itertools;

use crate::models::Workout;

/// Every distinct exercise name referenced anywhere in the collection,
/// sorted and deduplicated. Recomputed from scratch on each call; the
/// collection is small enough that caching would buy nothing.
pub fn distinct_exercises(workouts: &[Workout]) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter().map(|e| e.name.clone()))
        .sorted()
        .dedup()
        .collect()
}
