use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    fs,
    path::Path,
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strsim::jaro_winkler;

use crate::models::ExerciseEntry;

/// The three report flavours the app knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Contains,
    Volume,
    OneRm,
}

impl Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Contains => "contains",
            Self::Volume => "volume",
            Self::OneRm => "1rm",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy)]
pub enum OutputFmt {
    Text,
    Json,
}

/// Print `payload` as JSON in `--json` mode, otherwise run the colorful
/// text printer.
pub fn emit<T: Serialize>(fmt: OutputFmt, payload: &T, text: impl FnOnce()) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(payload) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("json error: {}", e),
        },
        OutputFmt::Text => text(),
    }
}

pub static ALLOWED_CONFIG_KEYS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["bodyweight", "unit"]));

/// Returns the canonical lowercase config key or `None` if not allowed.
pub fn canonical_config_key<S: AsRef<str>>(k: S) -> Option<String> {
    let k = k.as_ref().trim().to_ascii_lowercase();
    if ALLOWED_CONFIG_KEYS.contains(k.as_str()) {
        Some(k)
    } else {
        None
    }
}

// Tune these two constants to taste.
const MIN_SCORE: f64 = 0.80;
const GAP: f64 = 0.02;

fn best_match<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scores: Vec<(&'a str, f64)> = candidates
        .into_iter()
        .map(|c| (c, jaro_winkler(input, c)))
        .collect();

    if scores.is_empty() {
        return None;
    }

    // Highest score first.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (best, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

/// Closest allowed config key for `input`, if the similarity is high enough
/// *and* clearly better than the runner-up. Otherwise no suggestion.
pub fn best_key_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.to_ascii_lowercase();
    best_match(&inp, ALLOWED_CONFIG_KEYS.iter().copied())
}

/// Same "did you mean" logic over the user's own exercise names, used when
/// a report query names an exercise nothing contains.
pub fn best_exercise_suggestion<'a>(input: &str, names: &'a [String]) -> Option<&'a str> {
    best_match(input, names.iter().map(|n| n.as_str()))
}

/// Parse an exercise spec from the command line: `NAME:SETSxREPS@WEIGHT`,
/// weight optional. E.g. `Bench Press:3x5@185` or `Pull Up:3x8`.
pub fn parse_entry_spec(spec: &str) -> Result<ExerciseEntry> {
    let (name, rest) = spec
        .rsplit_once(':')
        .with_context(|| format!("bad exercise spec `{}` (expected NAME:SETSxREPS[@WEIGHT])", spec))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("exercise name in `{}` is empty", spec);
    }

    let (scheme, weight) = match rest.split_once('@') {
        Some((s, w)) => {
            let w: f64 = w
                .trim()
                .parse()
                .with_context(|| format!("bad weight in `{}`", spec))?;
            if w < 0.0 {
                bail!("weight in `{}` is negative", spec);
            }
            (s, Some(w))
        }
        None => (rest, None),
    };

    let (sets, reps) = scheme
        .trim()
        .split_once(['x', 'X'])
        .with_context(|| format!("bad set scheme in `{}` (expected SETSxREPS)", spec))?;

    let sets: u32 = sets
        .trim()
        .parse()
        .with_context(|| format!("bad set count in `{}`", spec))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .with_context(|| format!("bad rep count in `{}`", spec))?;

    Ok(ExerciseEntry {
        name: name.to_string(),
        sets,
        reps,
        weight,
    })
}

/// Flat key=value app config stored as TOML under the user's config dir.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Could not read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create config dir: {}", parent.display()))?;
        }

        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Could not write config: {}", path.display()))
    }
}

/// One `[[routine]]` entry in an import file.
#[derive(Deserialize)]
pub struct RoutineDef {
    pub name: String,
    #[serde(default)]
    pub exercise: Vec<EntryDef>,
}

#[derive(Deserialize)]
pub struct EntryDef {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
}

#[derive(Deserialize)]
pub struct RoutineImport {
    pub routine: Vec<RoutineDef>,
}

pub fn read_toml<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    toml::from_str(raw).with_context(|| format!("Failed to parse TOML: expected {}", what))
}
