use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A logged workout scheduled on a calendar day.
/// Owned by the single local user; `idx` is the short number shown in lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    #[serde(default)]
    pub idx: i64,
    pub name: String,
    pub scheduled_date: DateTime<Local>,
    pub exercises: Vec<ExerciseEntry>,
    pub comments: Option<String>,
}

/// Exercise line inside a workout or routine. A value object: it has no
/// identity of its own, only a position within its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Pounds. `None` counts as zero in volume math.
    pub weight: Option<f64>,
}

/// A reusable exercise-list template. Same shape as a workout minus the
/// scheduled date; used to pre-populate new workouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    #[serde(default)]
    pub idx: i64,
    pub name: String,
    pub exercises: Vec<ExerciseEntry>,
}

/// Tagged record kind for db dumps, so a dump entry is never ambiguous
/// between the two shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Record {
    Workout(Workout),
    Routine(Routine),
}

/// One point of a day-keyed report series: `name` is the `YYYY-MM-DD` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub name: String,
    pub amount: i64,
}

/// Placeholder series shown before any report has been generated.
pub static DEFAULT_GRAPH_DATA: Lazy<Vec<GraphPoint>> = Lazy::new(|| {
    vec![GraphPoint {
        name: String::new(),
        amount: 0,
    }]
});

/// Volume report output: grand total plus the per-day series that backs the
/// graph. The total always equals the sum of the series amounts.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub total: i64,
    pub series: Vec<GraphPoint>,
}

/// Estimation formulas for a one-rep max. Reports use Epley.
#[derive(Debug, Clone, Copy)]
pub enum OneRMFormula {
    Epley,
    Brzycki,
    Lombardi,
    OConner,
}
