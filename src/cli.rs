use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "liftlog", version, about = "CLI workout log")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Workout management
    #[command(subcommand, visible_alias = "w")]
    Workout(WorkoutCmd),

    /// Routine (template) management
    #[command(subcommand, visible_alias = "r")]
    Routine(RoutineCmd),

    /// Reports over the workout log
    #[command(subcommand, visible_alias = "rep")]
    Report(ReportCmd),

    /// View or edit liftlog config
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Db operations
    #[command(subcommand)]
    Db(DbCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum WorkoutCmd {
    /// Log a new workout
    #[command(visible_alias = "a")]
    Add {
        /// Workout name
        name: String,

        /// Scheduled day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Exercise spec NAME:SETSxREPS[@WEIGHT], repeatable
        #[arg(short = 'x', long = "exercise", value_name = "SPEC")]
        exercise: Vec<String>,

        /// Pre-populate exercises from a routine (index or name)
        #[arg(short = 'r', long, value_name = "ROUTINE")]
        from_routine: Option<String>,

        /// Free-text comments
        #[arg(short, long)]
        comments: Option<String>,
    },

    /// List workouts, newest first
    #[command(visible_alias = "l")]
    List {
        /// Only show workouts on/after this day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Only show workouts on/before this day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },

    /// Show a single workout in detail
    #[command(visible_alias = "s")]
    Show {
        /// Workout index (from `w list`) or exact name
        workout: String,
    },

    /// Edit a workout's fields
    #[command(visible_alias = "e")]
    Edit {
        /// Workout index or exact name
        workout: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New scheduled day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Replace the exercise list with these specs
        #[arg(short = 'x', long = "exercise", value_name = "SPEC")]
        exercise: Vec<String>,

        /// New comments
        #[arg(long)]
        comments: Option<String>,
    },

    /// Delete a workout (asks for confirmation)
    #[command(visible_alias = "d")]
    Delete {
        /// Workout index or exact name
        workout: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RoutineCmd {
    /// Create a routine from exercise specs
    #[command(visible_alias = "a")]
    Add {
        /// Routine name
        name: String,

        /// Exercise spec NAME:SETSxREPS[@WEIGHT], repeatable
        #[arg(short = 'x', long = "exercise", value_name = "SPEC")]
        exercise: Vec<String>,
    },

    /// Import one or more routines from TOML files
    #[command(visible_alias = "i")]
    Import { files: Vec<String> },

    /// List routines
    #[command(visible_alias = "l")]
    List,

    /// Show a single routine in detail
    #[command(visible_alias = "s")]
    Show {
        /// Routine index (from `r list`) or exact name
        routine: String,
    },

    /// Delete a routine (asks for confirmation)
    #[command(visible_alias = "d")]
    Delete {
        /// Routine index or exact name
        routine: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCmd {
    /// List every exercise ever logged
    #[command(visible_alias = "ex")]
    Exercises,

    /// Show all workouts containing an exercise
    #[command(visible_alias = "c", trailing_var_arg = true)]
    Contains {
        /// Exercise name (exact match)
        exercise: Vec<String>,
    },

    /// Total volume (sets × reps × weight) over a date range
    #[command(visible_alias = "v")]
    Volume {
        /// Range start (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Range end (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Only count this exercise
        #[arg(short = 'x', long)]
        exercise: Option<String>,

        /// Show an ASCII graph of the per-day series
        #[arg(short, long)]
        graph: bool,
    },

    /// Estimated one-rep max per day for one exercise (Epley)
    #[command(name = "one-rm", visible_alias = "1rm")]
    OneRm {
        /// Range start (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Range end (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Exercise to estimate (required for 1RM)
        #[arg(short = 'x', long)]
        exercise: String,

        /// Show an ASCII graph of the per-day series
        #[arg(short, long)]
        graph: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DbCmd {
    /// Export all workouts and routines to a TOML file
    Export {
        /// Output file path (defaults to dump.toml)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Import workouts and routines from a TOML dump
    Import {
        /// Input TOML file path
        file: String,
    },
}
