use crate::models::{ExerciseEntry, OneRMFormula};

pub fn calculate_1rm(weight: f64, reps: u32, formula: OneRMFormula) -> f64 {
    match formula {
        OneRMFormula::Epley => weight * (1.0 + reps as f64 / 30.0),
        OneRMFormula::Brzycki => weight / (1.0278 - 0.0278 * reps as f64),
        OneRMFormula::Lombardi => weight * (reps as f64).powf(0.10),
        OneRMFormula::OConner => weight * (1.0 + 0.025 * reps as f64),
    }
}

/// Epley estimate floored to whole pounds, the value reports actually show.
pub fn epley_1rm(weight: f64, reps: u32) -> i64 {
    calculate_1rm(weight, reps, OneRMFormula::Epley).floor() as i64
}

/// `floor(sets × reps × weight)`; an entry without a weight contributes
/// nothing.
pub fn entry_volume(entry: &ExerciseEntry) -> i64 {
    let weight = entry.weight.unwrap_or(0.0);
    ((entry.sets as f64) * (entry.reps as f64) * weight).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sets: u32, reps: u32, weight: Option<f64>) -> ExerciseEntry {
        ExerciseEntry {
            name: "Squat".to_string(),
            sets,
            reps,
            weight,
        }
    }

    #[test]
    fn epley_matches_hand_computation() {
        // floor(200 * (1 + 5/30)) = floor(233.33) = 233
        assert_eq!(epley_1rm(200.0, 5), 233);
    }

    #[test]
    fn epley_with_zero_reps_is_the_weight_itself() {
        assert_eq!(epley_1rm(200.0, 0), 200);
    }

    #[test]
    fn epley_with_zero_weight_is_zero() {
        assert_eq!(epley_1rm(0.0, 12), 0);
    }

    #[test]
    fn volume_is_floored_product() {
        assert_eq!(entry_volume(&entry(3, 5, Some(200.0))), 3000);
        assert_eq!(entry_volume(&entry(3, 5, Some(200.5))), 3007);
    }

    #[test]
    fn missing_weight_counts_as_zero() {
        assert_eq!(entry_volume(&entry(3, 8, None)), 0);
    }

    #[test]
    fn other_formulas_stay_sane() {
        let w = 100.0;
        assert!(calculate_1rm(w, 5, OneRMFormula::Brzycki) > w);
        assert!(calculate_1rm(w, 5, OneRMFormula::Lombardi) > w);
        assert!(calculate_1rm(w, 5, OneRMFormula::OConner) > w);
    }
}
