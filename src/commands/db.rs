use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    models::Record,
    notify, store,
    types::read_toml,
};

/// Shape of a dump file: a flat list of tagged records.
#[derive(Serialize, Deserialize)]
struct Dump {
    #[serde(default)]
    record: Vec<Record>,
}

pub async fn handle(cmd: crate::cli::DbCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        crate::cli::DbCmd::Export { file } => export(pool, file).await,
        crate::cli::DbCmd::Import { file } => import(pool, &file).await,
    }
}

async fn export(pool: &SqlitePool, file: Option<String>) -> Result<()> {
    let path = file.unwrap_or_else(|| "dump.toml".to_string());

    let mut records: Vec<Record> = store::load_workouts(pool)
        .await?
        .into_iter()
        .map(Record::Workout)
        .collect();
    records.extend(
        store::load_routines(pool)
            .await?
            .into_iter()
            .map(Record::Routine),
    );

    let count = records.len();
    let dump = Dump { record: records };
    let raw = toml::to_string_pretty(&dump)?;

    tokio::fs::write(&path, raw)
        .await
        .with_context(|| format!("Could not write dump to `{}`", path))?;

    println!(
        "{} exported {} records to `{}`",
        "ok:".green().bold(),
        count,
        path
    );
    Ok(())
}

async fn import(pool: &SqlitePool, file: &str) -> Result<()> {
    let path = Path::new(file);
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read file: `{}`", file))?;

    let dump: Dump = read_toml(&raw, "`[[record]]` entries")?;

    if dump.record.is_empty() {
        notify::warning(&format!("no [[record]] entries found in `{}`", file));
        return Ok(());
    }

    let mut inserted = 0;
    let mut skipped = 0;

    for record in dump.record {
        match record {
            Record::Workout(workout) => {
                // Records already present (same uuid) are left alone.
                let res = sqlx::query(
                    "INSERT OR IGNORE INTO workouts (id, name, scheduled_date, comments)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .bind(&workout.id)
                .bind(&workout.name)
                .bind(store::stored_date(&workout.scheduled_date))
                .bind(&workout.comments)
                .execute(pool)
                .await?;

                if res.rows_affected() == 1 {
                    store::replace_workout_entries(pool, &workout.id, &workout.exercises).await?;
                    inserted += 1;
                } else {
                    skipped += 1;
                }
            }

            Record::Routine(routine) => {
                if store::insert_routine(pool, &routine).await? {
                    inserted += 1;
                } else {
                    skipped += 1;
                }
            }
        }
    }

    println!(
        "{} {} inserted, {} skipped",
        "Summary:".cyan().bold(),
        inserted,
        skipped
    );
    Ok(())
}
