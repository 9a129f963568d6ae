use crate::{dates::DateRange, models::Workout};

/// Exact, case-sensitive match against the workout's exercise names.
pub fn contains_exercise(workout: &Workout, name: &str) -> bool {
    workout.exercises.iter().any(|e| e.name == name)
}

/// Exactly the workouts whose scheduled day lies in `range` (inclusive at
/// both ends, compared at day granularity) and, when `exercise` is set,
/// which contain at least one entry with that name. Input order is kept.
pub fn filter_workouts(
    workouts: &[Workout],
    range: &DateRange,
    exercise: Option<&str>,
) -> Vec<Workout> {
    workouts
        .iter()
        .filter(|w| range.contains(w.scheduled_date.date_naive()))
        .filter(|w| exercise.is_none_or(|name| contains_exercise(w, name)))
        .cloned()
        .collect()
}

/// Undated variant for the contains report: every workout referencing the
/// exercise, newest first.
pub fn workouts_containing(workouts: &[Workout], name: &str) -> Vec<Workout> {
    let mut matching: Vec<Workout> = workouts
        .iter()
        .filter(|w| contains_exercise(w, name))
        .cloned()
        .collect();

    matching.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date));
    matching
}
