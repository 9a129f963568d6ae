use std::collections::BTreeMap;

use crate::{
    dates::day_key,
    models::{GraphPoint, VolumeReport, Workout},
    utils::{entry_volume, epley_1rm},
};

fn into_series(days: BTreeMap<String, i64>) -> Vec<GraphPoint> {
    // BTreeMap iterates oldest day first; the series is a display
    // convention of newest-first, so walk it backwards.
    days.into_iter()
        .rev()
        .map(|(name, amount)| GraphPoint { name, amount })
        .collect()
}

/// Total volume plus per-day buckets over the already-filtered workouts.
/// When `exercise` is set only entries with that exact name count.
pub fn volume_report(matching: &[Workout], exercise: Option<&str>) -> VolumeReport {
    let mut days: BTreeMap<String, i64> = BTreeMap::new();
    let mut total = 0i64;

    for workout in matching {
        for entry in &workout.exercises {
            if exercise.is_some_and(|name| entry.name != name) {
                continue;
            }

            let volume = entry_volume(entry);
            total += volume;
            *days.entry(day_key(&workout.scheduled_date)).or_insert(0) += volume;
        }
    }

    VolumeReport {
        total,
        series: into_series(days),
    }
}

/// Per-day best Epley estimate for one exercise. When a day has several
/// matching entries the highest estimate wins, so the series is independent
/// of entry order within a workout.
pub fn one_rm_report(matching: &[Workout], exercise: &str) -> Vec<GraphPoint> {
    let mut days: BTreeMap<String, i64> = BTreeMap::new();

    for workout in matching {
        for entry in &workout.exercises {
            if entry.name != exercise {
                continue;
            }

            let estimate = epley_1rm(entry.weight.unwrap_or(0.0), entry.reps);
            days.entry(day_key(&workout.scheduled_date))
                .and_modify(|best| *best = (*best).max(estimate))
                .or_insert(estimate);
        }
    }

    into_series(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::{day_start, parse_day},
        models::ExerciseEntry,
    };

    fn entry(name: &str, sets: u32, reps: u32, weight: Option<f64>) -> ExerciseEntry {
        ExerciseEntry {
            name: name.to_string(),
            sets,
            reps,
            weight,
        }
    }

    fn workout(day: &str, exercises: Vec<ExerciseEntry>) -> Workout {
        Workout {
            id: day.to_string(),
            idx: 0,
            name: format!("workout {}", day),
            scheduled_date: day_start(parse_day(day).unwrap()).unwrap(),
            exercises,
            comments: None,
        }
    }

    #[test]
    fn squat_scenario_totals_3000() {
        let all = vec![workout("2024-01-01", vec![entry("Squat", 3, 5, Some(200.0))])];
        let report = volume_report(&all, None);

        assert_eq!(report.total, 3000);
        assert_eq!(
            report.series,
            vec![GraphPoint {
                name: "2024-01-01".to_string(),
                amount: 3000
            }]
        );
    }

    #[test]
    fn total_equals_sum_of_day_buckets() {
        let all = vec![
            workout("2024-01-01", vec![entry("Squat", 3, 5, Some(200.0))]),
            workout(
                "2024-01-03",
                vec![
                    entry("Bench Press", 3, 8, Some(155.0)),
                    entry("Row", 4, 10, Some(95.5)),
                ],
            ),
            workout("2024-01-03", vec![entry("Squat", 5, 3, Some(225.0))]),
        ];

        let report = volume_report(&all, None);
        let bucket_sum: i64 = report.series.iter().map(|p| p.amount).sum();
        assert_eq!(report.total, bucket_sum);
    }

    #[test]
    fn exercise_restriction_drops_other_entries() {
        let all = vec![workout(
            "2024-01-01",
            vec![
                entry("Squat", 3, 5, Some(200.0)),
                entry("Bench Press", 3, 5, Some(155.0)),
            ],
        )];

        let report = volume_report(&all, Some("Squat"));
        assert_eq!(report.total, 3000);
    }

    #[test]
    fn undefined_weight_contributes_nothing() {
        let all = vec![workout(
            "2024-01-01",
            vec![entry("Pull Up", 3, 8, None), entry("Squat", 1, 1, Some(100.0))],
        )];

        assert_eq!(volume_report(&all, None).total, 100);
    }

    #[test]
    fn series_runs_newest_day_first() {
        let all = vec![
            workout("2024-01-01", vec![entry("Squat", 1, 1, Some(100.0))]),
            workout("2024-01-05", vec![entry("Squat", 1, 1, Some(100.0))]),
            workout("2024-01-03", vec![entry("Squat", 1, 1, Some(100.0))]),
        ];

        let labels: Vec<String> = volume_report(&all, None)
            .series
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(labels, vec!["2024-01-05", "2024-01-03", "2024-01-01"]);
    }

    #[test]
    fn one_rm_squat_scenario_is_233() {
        let all = vec![workout("2024-01-01", vec![entry("Squat", 3, 5, Some(200.0))])];
        let series = one_rm_report(&all, "Squat");

        assert_eq!(
            series,
            vec![GraphPoint {
                name: "2024-01-01".to_string(),
                amount: 233
            }]
        );
    }

    #[test]
    fn one_rm_same_day_takes_the_best_estimate() {
        // Two Squat entries on one day, in an order where the weaker one
        // comes last. Max wins regardless of order.
        let all = vec![workout(
            "2024-01-01",
            vec![
                entry("Squat", 1, 1, Some(300.0)),
                entry("Squat", 1, 10, Some(200.0)),
            ],
        )];

        let series = one_rm_report(&all, "Squat");
        assert_eq!(series[0].amount, 310); // floor(300 * 31/30)
    }

    #[test]
    fn one_rm_ignores_other_exercises() {
        let all = vec![workout(
            "2024-01-01",
            vec![
                entry("Bench Press", 1, 5, Some(500.0)),
                entry("Squat", 1, 5, Some(200.0)),
            ],
        )];

        let series = one_rm_report(&all, "Squat");
        assert_eq!(series[0].amount, 233);
    }

    #[test]
    fn one_rm_edge_values() {
        let all = vec![workout(
            "2024-01-01",
            vec![entry("Squat", 1, 0, Some(200.0))],
        )];
        assert_eq!(one_rm_report(&all, "Squat")[0].amount, 200);

        let all = vec![workout("2024-01-02", vec![entry("Squat", 1, 12, Some(0.0))])];
        assert_eq!(one_rm_report(&all, "Squat")[0].amount, 0);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(volume_report(&[], None).series.is_empty());
        assert_eq!(volume_report(&[], None).total, 0);
        assert!(one_rm_report(&[], "Squat").is_empty());
    }
}
