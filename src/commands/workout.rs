use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    cli::WorkoutCmd,
    dates,
    models::{ExerciseEntry, Workout},
    notify, store,
    types::{OutputFmt, emit, parse_entry_spec},
    utils::entry_volume,
};

/// Anything past this on one calendar day is almost certainly a data-entry
/// mistake, so `add` refuses it.
pub const MAX_WORKOUTS_PER_DAY: i64 = 3;

fn parse_specs(specs: &[String]) -> Result<Vec<ExerciseEntry>, String> {
    let mut entries = Vec::with_capacity(specs.len());
    for spec in specs {
        match parse_entry_spec(spec) {
            Ok(entry) => entries.push(entry),
            Err(e) => return Err(format!("{:#}", e)),
        }
    }

    Ok(entries)
}

fn print_workout(workout: &Workout) {
    println!(
        "{} {} {}",
        format!("{:>3}", workout.idx).yellow(),
        workout.name.bold(),
        dates::format_display(&workout.scheduled_date).dimmed()
    );

    for (i, entry) in workout.exercises.iter().enumerate() {
        let weight = match entry.weight {
            Some(w) => format!("@ {} lbs", w),
            None => "(no weight)".to_string(),
        };
        println!(
            "  {}. {} — {}×{} {}",
            i + 1,
            entry.name,
            entry.sets,
            entry.reps,
            weight.dimmed()
        );
    }

    if let Some(comments) = &workout.comments {
        println!("  {} {}", "comments:".dimmed(), comments);
    }
}

pub async fn handle(cmd: WorkoutCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        WorkoutCmd::Add {
            name,
            date,
            exercise,
            from_routine,
            comments,
        } => {
            let day = match date {
                Some(raw) => match dates::parse_day(&raw) {
                    Ok(day) => day,
                    Err(e) => {
                        notify::error(&format!("{:#}", e));
                        return Ok(());
                    }
                },
                None => dates::local_today(),
            };

            let logged = store::workouts_on_day(pool, day).await?;
            if logged >= MAX_WORKOUTS_PER_DAY {
                notify::warning(&format!(
                    "{} workouts already logged on {} — maximum of {} per day",
                    logged, day, MAX_WORKOUTS_PER_DAY
                ));
                return Ok(());
            }

            let mut entries = Vec::new();
            if let Some(reference) = &from_routine {
                match store::load_routine(pool, reference).await? {
                    Some(routine) => entries.extend(routine.exercises),
                    None => {
                        notify::error(&format!("no such routine `{}`", reference));
                        return Ok(());
                    }
                }
            }

            match parse_specs(&exercise) {
                Ok(extra) => entries.extend(extra),
                Err(msg) => {
                    notify::error(&msg);
                    return Ok(());
                }
            }

            let scheduled = if day == dates::local_today() {
                Local::now()
            } else {
                dates::day_start(day)?
            };

            let workout = Workout {
                id: Uuid::new_v4().to_string(),
                idx: 0,
                name,
                scheduled_date: scheduled,
                exercises: entries,
                comments,
            };

            store::insert_workout(pool, &workout).await?;
            notify::ok(&format!(
                "logged workout \"{}\" on {} ({} exercises)",
                workout.name,
                day,
                workout.exercises.len()
            ));
        }

        WorkoutCmd::List { start, end } => {
            let start = match start.map(|s| dates::parse_day(&s)).transpose() {
                Ok(d) => d,
                Err(e) => {
                    notify::error(&format!("{:#}", e));
                    return Ok(());
                }
            };
            let end = match end.map(|s| dates::parse_day(&s)).transpose() {
                Ok(d) => d,
                Err(e) => {
                    notify::error(&format!("{:#}", e));
                    return Ok(());
                }
            };

            if let (Some(s), Some(e)) = (start, end)
                && s > e
            {
                notify::error(&format!("start date {} is after end date {}", s, e));
                return Ok(());
            }

            let workouts: Vec<Workout> = store::load_workouts(pool)
                .await?
                .into_iter()
                .filter(|w| {
                    let day = w.scheduled_date.date_naive();
                    start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
                })
                .collect();

            emit(fmt, &workouts, || {
                println!("{}", "Workouts:".cyan().bold());

                for w in &workouts {
                    let volume: i64 = w.exercises.iter().map(entry_volume).sum();
                    println!(
                        " {} • {} {} {}",
                        format!("{:>3}", w.idx).yellow(),
                        w.name.bold(),
                        dates::day_key(&w.scheduled_date).dimmed(),
                        format!("({} exercises, {} lbs volume)", w.exercises.len(), volume)
                            .dimmed()
                    );
                }

                if workouts.is_empty() {
                    println!("{}", "  (no workouts found)".dimmed());
                }
            });
        }

        WorkoutCmd::Show { workout } => match store::load_workout(pool, &workout).await? {
            Some(w) => emit(fmt, &w, || print_workout(&w)),
            None => notify::error(&format!("no such workout `{}`", workout)),
        },

        WorkoutCmd::Edit {
            workout,
            name,
            date,
            exercise,
            comments,
        } => {
            let (id, old_name) = match store::resolve_workout(pool, &workout).await? {
                Some(found) => found,
                None => {
                    notify::error(&format!("no such workout `{}`", workout));
                    return Ok(());
                }
            };

            if name.is_none() && date.is_none() && exercise.is_empty() && comments.is_none() {
                notify::warning("nothing to change — pass --name, --date, --exercise or --comments");
                return Ok(());
            }

            // Every flag is validated before the first write so a bad one
            // cannot leave the workout half-edited.
            let scheduled = match &date {
                Some(raw) => match dates::parse_day(raw) {
                    Ok(day) => Some(store::stored_date(&dates::day_start(day)?)),
                    Err(e) => {
                        notify::error(&format!("{:#}", e));
                        return Ok(());
                    }
                },
                None => None,
            };

            let entries = if exercise.is_empty() {
                None
            } else {
                match parse_specs(&exercise) {
                    Ok(entries) => Some(entries),
                    Err(msg) => {
                        notify::error(&msg);
                        return Ok(());
                    }
                }
            };

            if let Some(new_name) = &name {
                sqlx::query("UPDATE workouts SET name = ? WHERE id = ?")
                    .bind(new_name)
                    .bind(&id)
                    .execute(pool)
                    .await?;
            }

            if let Some(stored) = &scheduled {
                sqlx::query("UPDATE workouts SET scheduled_date = ? WHERE id = ?")
                    .bind(stored)
                    .bind(&id)
                    .execute(pool)
                    .await?;
            }

            if let Some(new_comments) = &comments {
                sqlx::query("UPDATE workouts SET comments = ? WHERE id = ?")
                    .bind(new_comments)
                    .bind(&id)
                    .execute(pool)
                    .await?;
            }

            if let Some(entries) = &entries {
                store::replace_workout_entries(pool, &id, entries).await?;
            }

            notify::ok(&format!("updated workout `{}`", old_name));
        }

        WorkoutCmd::Delete { workout, yes } => {
            let (id, name) = match store::resolve_workout(pool, &workout).await? {
                Some(found) => found,
                None => {
                    notify::error(&format!("no such workout `{}`", workout));
                    return Ok(());
                }
            };

            if !yes && !notify::confirm(&format!("delete workout `{}`?", name))? {
                notify::info("aborted");
                return Ok(());
            }

            if store::delete_workout(pool, &id).await? {
                notify::ok(&format!("deleted workout `{}`", name));
            } else {
                notify::warning(&format!("workout `{}` was already gone", name));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dates::parse_day, db};
    use sqlx::SqlitePool;

    async fn add(pool: &SqlitePool, name: &str, day: &str) {
        let cmd = WorkoutCmd::Add {
            name: name.to_string(),
            date: Some(day.to_string()),
            exercise: vec!["Squat:3x5@200".to_string()],
            from_routine: None,
            comments: None,
        };
        handle(cmd, pool, OutputFmt::Text).await.unwrap();
    }

    #[tokio::test]
    async fn fourth_workout_on_one_day_is_refused() {
        let pool = db::open_memory().await.unwrap();
        for name in ["a", "b", "c", "d"] {
            add(&pool, name, "2024-03-01").await;
        }

        let day = parse_day("2024-03-01").unwrap();
        assert_eq!(store::workouts_on_day(&pool, day).await.unwrap(), MAX_WORKOUTS_PER_DAY);
        assert_eq!(store::load_workouts(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn the_cap_is_per_day_not_global() {
        let pool = db::open_memory().await.unwrap();
        for name in ["a", "b", "c"] {
            add(&pool, name, "2024-03-01").await;
        }
        add(&pool, "next day", "2024-03-02").await;

        assert_eq!(store::load_workouts(&pool).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn bad_date_in_edit_changes_nothing() {
        let pool = db::open_memory().await.unwrap();
        add(&pool, "Leg Day", "2024-03-01").await;

        let cmd = WorkoutCmd::Edit {
            workout: "1".to_string(),
            name: Some("Renamed".to_string()),
            date: Some("not-a-date".to_string()),
            exercise: Vec::new(),
            comments: None,
        };
        handle(cmd, &pool, OutputFmt::Text).await.unwrap();

        let loaded = store::load_workouts(&pool).await.unwrap();
        assert_eq!(loaded[0].name, "Leg Day");
        assert_eq!(dates::day_key(&loaded[0].scheduled_date), "2024-03-01");
    }

    #[tokio::test]
    async fn bad_exercise_spec_in_edit_changes_nothing() {
        let pool = db::open_memory().await.unwrap();
        add(&pool, "Leg Day", "2024-03-01").await;

        let cmd = WorkoutCmd::Edit {
            workout: "1".to_string(),
            name: Some("Renamed".to_string()),
            date: None,
            exercise: vec!["Squat:banana".to_string()],
            comments: None,
        };
        handle(cmd, &pool, OutputFmt::Text).await.unwrap();

        let loaded = store::load_workouts(&pool).await.unwrap();
        assert_eq!(loaded[0].name, "Leg Day");
        assert_eq!(loaded[0].exercises[0].name, "Squat");
    }
}
