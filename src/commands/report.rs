use anyhow::Result;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    cli::ReportCmd,
    dates,
    models::{GraphPoint, Workout},
    notify,
    report::{ReportStatus, ReportView, distinct_exercises},
    store,
    types::{OutputFmt, ReportKind, best_exercise_suggestion, emit},
};

const NO_DATA_MESSAGE: &str = "No exercise data available for reports.";

/// Terminal line chart over a day series. `data` must be in chronological
/// order (oldest first) so the graph reads left to right.
fn create_ascii_graph(data: &[GraphPoint], width: usize, height: usize, title: &str) -> Vec<String> {
    if data.is_empty() {
        return vec!["No data available".to_string()];
    }

    let min_value = data.iter().map(|p| p.amount).min().unwrap_or(0) as f64;
    let max_value = data.iter().map(|p| p.amount).max().unwrap_or(0) as f64;
    let range = max_value - min_value;

    if range == 0.0 {
        return vec![format!("No variation in data (constant {})", min_value)];
    }

    // A degenerate terminal would underflow the width-1/height-1 math below.
    let width = width.max(2);
    let height = height.max(2);

    let mut grid = vec![vec![' '; width]; height];

    let x_of = |i: usize| {
        if data.len() < 2 {
            0
        } else {
            (i as f64 / (data.len() - 1) as f64 * (width - 1) as f64) as usize
        }
    };
    let y_of = |amount: i64| {
        let y = ((amount as f64 - min_value) / range * (height - 1) as f64) as usize;
        height - 1 - y // Flip the y-axis.
    };

    for (i, point) in data.iter().enumerate() {
        let x = x_of(i);
        let y = y_of(point.amount);

        if y < height && x < width {
            grid[y][x] = '●';
        }

        // Draw connecting lines back to the previous point.
        if i > 0 {
            let prev_x = x_of(i - 1);
            let prev_y = y_of(data[i - 1].amount);

            let dx = x as isize - prev_x as isize;
            let dy = y as isize - prev_y as isize;
            let steps = dx.abs().max(dy.abs());

            for step in 1..steps {
                let px = prev_x as isize + (dx * step / steps);
                let py = prev_y as isize + (dy * step / steps);

                if px >= 0 && px < width as isize && py >= 0 && py < height as isize {
                    let (px, py) = (px as usize, py as usize);
                    if grid[py][px] == ' ' {
                        grid[py][px] = '·';
                    }
                }
            }
        }
    }

    let mut result = Vec::new();
    let step = range / (height - 1) as f64;

    result.push(format!("\n{}", title.bold()));
    result.push("─".repeat(width + 7));

    for (i, row) in grid.iter().enumerate() {
        let value = min_value + step * (height - 1 - i) as f64;
        result.push(format!(
            "{:6.0} │{}",
            value,
            row.iter().collect::<String>()
        ));
    }

    result.push(format!("       └{}", "─".repeat(width)));

    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        result.push(format!("       {}  {}", first.name, last.name));
    }

    result
}

fn print_series(series: &[GraphPoint], unit: &str, graph: bool, title: &str) {
    if graph {
        // The series is newest-first; the graph wants oldest-first.
        let chronological: Vec<GraphPoint> = series.iter().rev().cloned().collect();

        let (term_width, term_height) = term_size::dimensions().unwrap_or((80, 24));
        let width = (term_width / 2).min(60);
        let height = (term_height / 2).min(15);

        for line in create_ascii_graph(&chronological, width, height, title) {
            println!("{}", line);
        }
    } else {
        for point in series {
            println!("  {}  {} {}", point.name.dimmed(), point.amount, unit);
        }
    }
}

fn print_contains_result(exercise: &str, workouts: &[Workout]) {
    println!(
        "{} \"{}\"",
        "Workouts containing".cyan().bold(),
        exercise.bold()
    );

    for w in workouts {
        println!();
        println!(
            " {} • {} {}",
            format!("{:>3}", w.idx).yellow(),
            w.name.bold(),
            dates::day_key(&w.scheduled_date).dimmed()
        );

        for entry in &w.exercises {
            let weight = entry
                .weight
                .map_or("—".to_string(), |w| format!("{} lbs", w));
            println!(
                "     {} — {}×{} @ {}",
                entry.name, entry.sets, entry.reps, weight
            );
        }

        if let Some(comments) = &w.comments {
            println!("     {} {}", "comments:".dimmed(), comments);
        }
    }
}

fn warn_not_found(exercise: Option<&str>, names: &[String]) {
    match exercise {
        Some(name) => {
            if let Some(suggestion) = best_exercise_suggestion(name, names) {
                notify::warning(&format!(
                    "no workouts contain `{}` — did you mean: `{}`?",
                    name,
                    suggestion.green()
                ));
            } else {
                notify::warning(&format!("no workouts contain `{}`", name));
            }
        }
        None => notify::warning("Workouts not found"),
    }
}

fn parse_range(start: &str, end: &str) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let start = match dates::parse_day(start) {
        Ok(d) => d,
        Err(e) => {
            notify::error(&format!("{:#}", e));
            return None;
        }
    };
    let end = match dates::parse_day(end) {
        Ok(d) => d,
        Err(e) => {
            notify::error(&format!("{:#}", e));
            return None;
        }
    };

    Some((start, end))
}

pub async fn handle(cmd: ReportCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    let all = store::load_workouts(pool).await?;
    let names = distinct_exercises(&all);

    if names.is_empty() {
        println!("{}", NO_DATA_MESSAGE);
        return Ok(());
    }

    match cmd {
        ReportCmd::Exercises => {
            emit(fmt, &names, || {
                println!("{}", "Exercises logged:".cyan().bold());
                for name in &names {
                    println!("  {}", name);
                }
            });
        }

        ReportCmd::Contains { exercise } => {
            let exercise = exercise.join(" ");
            if exercise.trim().is_empty() {
                notify::error("Exercise name cannot be empty");
                return Ok(());
            }

            let mut view = ReportView::new(ReportKind::Contains);
            view.run_contains(&all, &exercise);

            match view.status() {
                ReportStatus::Success => {
                    emit(fmt, &view.workouts(), || {
                        print_contains_result(&exercise, view.workouts())
                    });
                }
                _ => warn_not_found(Some(&exercise), &names),
            }
        }

        ReportCmd::Volume {
            start,
            end,
            exercise,
            graph,
        } => {
            let Some((start, end)) = parse_range(&start, &end) else {
                return Ok(());
            };

            if let Some(name) = &exercise
                && !names.iter().any(|n| n == name)
            {
                warn_not_found(Some(name), &names);
                return Ok(());
            }

            let mut view = ReportView::new(ReportKind::Volume);
            view.set_range(Some(start), Some(end));
            view.select_exercise(exercise.clone());

            let report = match view.generate_volume(&all) {
                Ok(report) => report,
                Err(e) => {
                    notify::error(&format!("{:#}", e));
                    return Ok(());
                }
            };

            if report.series.is_empty() {
                warn_not_found(None, &names);
                return Ok(());
            }

            emit(fmt, &report, || {
                let scope = exercise.as_deref().unwrap_or("all exercises");
                println!(
                    "{} {} ({} to {}, {})",
                    "Total volume:".cyan().bold(),
                    format!("{} lbs", report.total).bold(),
                    start,
                    end,
                    scope
                );
                print_series(&report.series, "lbs", graph, "Volume per day");
            });
        }

        ReportCmd::OneRm {
            start,
            end,
            exercise,
            graph,
        } => {
            let Some((start, end)) = parse_range(&start, &end) else {
                return Ok(());
            };

            if !names.iter().any(|n| n == &exercise) {
                warn_not_found(Some(&exercise), &names);
                return Ok(());
            }

            let mut view = ReportView::new(ReportKind::OneRm);
            view.set_range(Some(start), Some(end));
            view.select_exercise(Some(exercise.clone()));

            let series = match view.generate_one_rm(&all) {
                Ok(series) => series,
                Err(e) => {
                    notify::error(&format!("{:#}", e));
                    return Ok(());
                }
            };

            if series.is_empty() {
                warn_not_found(None, &names);
                return Ok(());
            }

            emit(fmt, &series, || {
                println!(
                    "{} {} ({} to {}, Epley)",
                    "Estimated 1RM:".cyan().bold(),
                    exercise.bold(),
                    start,
                    end
                );
                print_series(&series, "lbs", graph, "Estimated 1RM per day");
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, amount: i64) -> GraphPoint {
        GraphPoint {
            name: name.to_string(),
            amount,
        }
    }

    #[test]
    fn graph_survives_a_tiny_terminal() {
        let data = vec![point("2024-01-01", 100), point("2024-01-02", 200)];

        // Dimensions below 2 must not underflow the plotting math.
        for dim in [0, 1, 2] {
            assert!(!create_ascii_graph(&data, dim, dim, "volume").is_empty());
        }
    }

    #[test]
    fn constant_series_short_circuits() {
        let data = vec![point("2024-01-01", 100), point("2024-01-02", 100)];
        let lines = create_ascii_graph(&data, 60, 15, "volume");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No variation"));
    }

    #[test]
    fn empty_series_has_no_graph() {
        assert_eq!(create_ascii_graph(&[], 60, 15, "volume").len(), 1);
    }
}
