use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    cli::RoutineCmd,
    models::{ExerciseEntry, Routine},
    notify, store,
    types::{OutputFmt, RoutineImport, emit, parse_entry_spec, read_toml},
};

fn print_routine(routine: &Routine) {
    println!(
        "{} {}",
        format!("{:>3}", routine.idx).yellow(),
        routine.name.bold()
    );

    for (i, entry) in routine.exercises.iter().enumerate() {
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

    if routine.exercises.is_empty() {
        println!("{}", "  (empty routine)".dimmed());
    }
}

pub async fn handle(cmd: RoutineCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        RoutineCmd::Add { name, exercise } => {
            let mut entries = Vec::with_capacity(exercise.len());
            for spec in &exercise {
                match parse_entry_spec(spec) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        notify::error(&format!("{:#}", e));
                        return Ok(());
                    }
                }
            }

            let routine = Routine {
                id: Uuid::new_v4().to_string(),
                idx: 0,
                name,
                exercises: entries,
            };

            if store::insert_routine(pool, &routine).await? {
                notify::ok(&format!(
                    "created routine \"{}\" ({} exercises)",
                    routine.name,
                    routine.exercises.len()
                ));
            } else {
                notify::warning(&format!(
                    "routine \"{}\" already exists — use `r list` to view all routines",
                    routine.name
                ));
            }
        }

        RoutineCmd::Import { files } => {
            let mut inserted = 0;
            let mut skipped = 0;

            for file in &files {
                let path = Path::new(file);
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Could not read file: `{}`", file))?;

                let import: RoutineImport = read_toml(&raw, "`[[routine]]` entries")?;

                if import.routine.is_empty() {
                    notify::warning(&format!("no [[routine]] entries found in `{}`", file));
                    continue;
                }

                for def in import.routine {
                    if def.name.trim().is_empty() {
                        notify::warning("skipped a routine with an empty name");
                        skipped += 1;
                        continue;
                    }

                    if def.exercise.iter().any(|e| e.name.trim().is_empty()) {
                        notify::warning(&format!(
                            "`{}` skipped – it has an exercise with an empty name",
                            def.name
                        ));
                        skipped += 1;
                        continue;
                    }

                    let routine = Routine {
                        id: Uuid::new_v4().to_string(),
                        idx: 0,
                        name: def.name,
                        exercises: def
                            .exercise
                            .into_iter()
                            .map(|e| ExerciseEntry {
                                name: e.name,
                                sets: e.sets,
                                reps: e.reps,
                                weight: e.weight,
                            })
                            .collect(),
                    };

                    if store::insert_routine(pool, &routine).await? {
                        inserted += 1;
                        println!("{} `{}`", "ok:".green().bold(), routine.name);
                    } else {
                        skipped += 1;
                        println!(
                            "{} `{}` (already exists)",
                            "info:".blue().bold(),
                            routine.name
                        );
                    }
                }
            }

            println!(
                "\n{} {} inserted, {} skipped",
                "Summary:".cyan().bold(),
                inserted,
                skipped
            );
        }

        RoutineCmd::List => {
            let routines = store::load_routines(pool).await?;

            emit(fmt, &routines, || {
                println!("{}", "Routines:".cyan().bold());

                for r in &routines {
                    println!(
                        " {} • {} {}",
                        format!("{:>3}", r.idx).yellow(),
                        r.name.bold(),
                        format!("({} exercises)", r.exercises.len()).dimmed()
                    );
                }

                if routines.is_empty() {
                    println!("{}", "  (no routines found)".dimmed());
                }
            });
        }

        RoutineCmd::Show { routine } => match store::load_routine(pool, &routine).await? {
            Some(r) => emit(fmt, &r, || print_routine(&r)),
            None => notify::error(&format!("no such routine `{}`", routine)),
        },

        RoutineCmd::Delete { routine, yes } => {
            let found = match store::load_routine(pool, &routine).await? {
                Some(found) => found,
                None => {
                    notify::error(&format!("no such routine `{}`", routine));
                    return Ok(());
                }
            };

            if !yes && !notify::confirm(&format!("delete routine `{}`?", found.name))? {
                notify::info("aborted");
                return Ok(());
            }

            if store::delete_routine(pool, &found.id).await? {
                notify::ok(&format!("deleted routine `{}`", found.name));
            } else {
                notify::warning(&format!("routine `{}` was already gone", found.name));
            }
        }
    }

    Ok(())
}
