use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{ExerciseEntry, Routine, Workout};

/// Dates go into SQLite as RFC 3339 text so the first ten characters are
/// always the `YYYY-MM-DD` day, which day-level queries rely on.
pub fn stored_date(dt: &DateTime<Local>) -> String {
    dt.to_rfc3339()
}

fn parse_stored_date(raw: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .with_context(|| format!("corrupt scheduled_date in db: `{}`", raw))
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> ExerciseEntry {
    ExerciseEntry {
        name: row.get("name"),
        sets: row.get::<i64, _>("sets") as u32,
        reps: row.get::<i64, _>("reps") as u32,
        weight: row.get("weight"),
    }
}

/// The whole workout collection, newest scheduled date first. Reports take
/// this as their input; nothing downstream talks to the database.
pub async fn load_workouts(pool: &SqlitePool) -> Result<Vec<Workout>> {
    let rows = sqlx::query(
        "SELECT idx, id, name, scheduled_date, comments
         FROM workouts
         ORDER BY scheduled_date DESC, idx DESC",
    )
    .fetch_all(pool)
    .await?;

    let entry_rows = sqlx::query(
        "SELECT workout_id, name, sets, reps, weight
         FROM workout_exercises
         ORDER BY workout_id, position",
    )
    .fetch_all(pool)
    .await?;

    let mut entries: HashMap<String, Vec<ExerciseEntry>> = HashMap::new();
    for row in &entry_rows {
        entries
            .entry(row.get("workout_id"))
            .or_default()
            .push(entry_from_row(row));
    }

    let mut workouts = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: String = row.get("id");
        let raw_date: String = row.get("scheduled_date");

        workouts.push(Workout {
            idx: row.get("idx"),
            name: row.get("name"),
            scheduled_date: parse_stored_date(&raw_date)?,
            exercises: entries.remove(&id).unwrap_or_default(),
            comments: row.get("comments"),
            id,
        });
    }

    Ok(workouts)
}

/// Resolve a user-supplied workout reference (list index or exact name) to
/// its uuid and display name.
pub async fn resolve_workout(pool: &SqlitePool, reference: &str) -> Result<Option<(String, String)>> {
    let row = if let Ok(idx) = reference.parse::<i64>() {
        sqlx::query("SELECT id, name FROM workouts WHERE idx = ?")
            .bind(idx)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query("SELECT id, name FROM workouts WHERE name = ? ORDER BY scheduled_date DESC")
            .bind(reference)
            .fetch_optional(pool)
            .await?
    };

    Ok(row.map(|r| (r.get("id"), r.get("name"))))
}

pub async fn load_workout(pool: &SqlitePool, reference: &str) -> Result<Option<Workout>> {
    let id = match resolve_workout(pool, reference).await? {
        Some((id, _)) => id,
        None => return Ok(None),
    };

    Ok(load_workouts(pool).await?.into_iter().find(|w| w.id == id))
}

/// A workout and its entries commit together or not at all.
pub async fn insert_workout(pool: &SqlitePool, workout: &Workout) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO workouts (id, name, scheduled_date, comments) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&workout.id)
    .bind(&workout.name)
    .bind(stored_date(&workout.scheduled_date))
    .bind(&workout.comments)
    .execute(&mut *tx)
    .await?;

    write_entries(&mut tx, &workout.id, &workout.exercises).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn replace_workout_entries(
    pool: &SqlitePool,
    workout_id: &str,
    entries: &[ExerciseEntry],
) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_entries(&mut tx, workout_id, entries).await?;
    tx.commit().await?;
    Ok(())
}

async fn write_entries(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    workout_id: &str,
    entries: &[ExerciseEntry],
) -> Result<()> {
    sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?")
        .bind(workout_id)
        .execute(&mut **tx)
        .await?;

    for (position, entry) in entries.iter().enumerate() {
        sqlx::query(
            "INSERT INTO workout_exercises (id, workout_id, position, name, sets, reps, weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(workout_id)
        .bind(position as i64)
        .bind(&entry.name)
        .bind(entry.sets as i64)
        .bind(entry.reps as i64)
        .bind(entry.weight)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn delete_workout(pool: &SqlitePool, id: &str) -> Result<bool> {
    let res = sqlx::query("DELETE FROM workouts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}

/// How many workouts are already logged on the given calendar day.
pub async fn workouts_on_day(pool: &SqlitePool, day: NaiveDate) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE substr(scheduled_date, 1, 10) = ?")
            .bind(day.format("%Y-%m-%d").to_string())
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn load_routines(pool: &SqlitePool) -> Result<Vec<Routine>> {
    let rows = sqlx::query("SELECT idx, id, name FROM routines ORDER BY idx")
        .fetch_all(pool)
        .await?;

    let entry_rows = sqlx::query(
        "SELECT routine_id, name, sets, reps, weight
         FROM routine_exercises
         ORDER BY routine_id, position",
    )
    .fetch_all(pool)
    .await?;

    let mut entries: HashMap<String, Vec<ExerciseEntry>> = HashMap::new();
    for row in &entry_rows {
        entries
            .entry(row.get("routine_id"))
            .or_default()
            .push(entry_from_row(row));
    }

    let mut routines = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: String = row.get("id");
        routines.push(Routine {
            idx: row.get("idx"),
            name: row.get("name"),
            exercises: entries.remove(&id).unwrap_or_default(),
            id,
        });
    }

    Ok(routines)
}

pub async fn load_routine(pool: &SqlitePool, reference: &str) -> Result<Option<Routine>> {
    let routines = load_routines(pool).await?;

    if let Ok(idx) = reference.parse::<i64>() {
        return Ok(routines.into_iter().find(|r| r.idx == idx));
    }

    Ok(routines.into_iter().find(|r| r.name == reference))
}

/// Returns false when a routine with the same name already exists.
pub async fn insert_routine(pool: &SqlitePool, routine: &Routine) -> Result<bool> {
    let res = sqlx::query("INSERT OR IGNORE INTO routines (id, name) VALUES (?1, ?2)")
        .bind(&routine.id)
        .bind(&routine.name)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Ok(false);
    }

    for (position, entry) in routine.exercises.iter().enumerate() {
        sqlx::query(
            "INSERT INTO routine_exercises (id, routine_id, position, name, sets, reps, weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&routine.id)
        .bind(position as i64)
        .bind(&entry.name)
        .bind(entry.sets as i64)
        .bind(entry.reps as i64)
        .bind(entry.weight)
        .execute(pool)
        .await?;
    }

    Ok(true)
}

pub async fn delete_routine(pool: &SqlitePool, id: &str) -> Result<bool> {
    let res = sqlx::query("DELETE FROM routines WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::{day_start, parse_day},
        db,
    };

    fn entry(name: &str) -> ExerciseEntry {
        ExerciseEntry {
            name: name.to_string(),
            sets: 3,
            reps: 5,
            weight: Some(200.0),
        }
    }

    fn workout(id: &str, day: &str, entries: Vec<ExerciseEntry>) -> Workout {
        Workout {
            id: id.to_string(),
            idx: 0,
            name: format!("workout {}", id),
            scheduled_date: day_start(parse_day(day).unwrap()).unwrap(),
            exercises: entries,
            comments: None,
        }
    }

    // Rejects any entry named "boom", which lets the tests fail an insert
    // midway through a batch.
    async fn install_boom_trigger(pool: &SqlitePool) {
        sqlx::query(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON workout_exercises
             WHEN NEW.name = 'boom'
             BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn failed_insert_leaves_no_orphan_workout() {
        let pool = db::open_memory().await.unwrap();
        install_boom_trigger(&pool).await;

        let w = workout("a", "2024-01-01", vec![entry("Squat"), entry("boom")]);
        assert!(insert_workout(&pool, &w).await.is_err());

        assert!(load_workouts(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_replace_keeps_the_old_entries() {
        let pool = db::open_memory().await.unwrap();
        let w = workout("a", "2024-01-01", vec![entry("Squat"), entry("Bench Press")]);
        insert_workout(&pool, &w).await.unwrap();

        install_boom_trigger(&pool).await;
        assert!(
            replace_workout_entries(&pool, "a", &[entry("Deadlift"), entry("boom")])
                .await
                .is_err()
        );

        let loaded = load_workouts(&pool).await.unwrap();
        assert_eq!(loaded[0].exercises.len(), 2);
        assert_eq!(loaded[0].exercises[0].name, "Squat");
    }

    #[tokio::test]
    async fn workouts_on_day_counts_only_that_day() {
        let pool = db::open_memory().await.unwrap();
        for (id, day) in [("a", "2024-01-01"), ("b", "2024-01-01"), ("c", "2024-01-02")] {
            insert_workout(&pool, &workout(id, day, vec![entry("Squat")]))
                .await
                .unwrap();
        }

        let day = parse_day("2024-01-01").unwrap();
        assert_eq!(workouts_on_day(&pool, day).await.unwrap(), 2);
        assert_eq!(
            workouts_on_day(&pool, parse_day("2024-01-03").unwrap())
                .await
                .unwrap(),
            0
        );
    }
}
