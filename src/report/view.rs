use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::{
    dates::DateRange,
    models::{DEFAULT_GRAPH_DATA, GraphPoint, VolumeReport, Workout},
    types::ReportKind,
};

use super::{filter_workouts, one_rm_report, volume_report, workouts_containing};

/// Lifecycle of the contains report. Volume and 1RM are computed locally
/// and synchronously, so they never pass through Loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    None,
    Loading,
    Error,
    Success,
}

/// Transient report screen state: the current report kind, the user's
/// selections, and whatever the last generation produced. Never persisted.
///
/// Lookups of the contains result are guarded by a sequence number: a
/// completion for anything but the most recent request is dropped, so a
/// slow stale result can never overwrite a fresher one.
#[derive(Debug, Clone)]
pub struct ReportView {
    kind: ReportKind,
    status: ReportStatus,
    selected_exercise: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    total_volume: Option<i64>,
    graph_data: Vec<GraphPoint>,
    workouts: Vec<Workout>,
    fetch_seq: u64,
}

impl ReportView {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            status: ReportStatus::None,
            selected_exercise: None,
            start: None,
            end: None,
            total_volume: None,
            graph_data: DEFAULT_GRAPH_DATA.clone(),
            workouts: Vec::new(),
            fetch_seq: 0,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn selected_exercise(&self) -> Option<&str> {
        self.selected_exercise.as_deref()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn total_volume(&self) -> Option<i64> {
        self.total_volume
    }

    pub fn graph_data(&self) -> &[GraphPoint] {
        &self.graph_data
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Switching report type resets every transient selection. Stale
    /// cross-report state (a 1RM exercise leaking into a volume query, old
    /// graph data behind a new report) caused enough confusion that the
    /// policy is a full reset, not a merge.
    pub fn set_kind(&mut self, kind: ReportKind) {
        if kind == self.kind {
            return;
        }

        let seq = self.fetch_seq;
        *self = Self::new(kind);
        self.fetch_seq = seq;
    }

    pub fn set_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
    }

    /// Selecting an exercise starts a contains lookup and returns its
    /// sequence number; deselecting clears the result outright.
    pub fn select_exercise(&mut self, exercise: Option<String>) -> Option<u64> {
        match exercise {
            Some(name) => {
                self.selected_exercise = Some(name);
                self.status = ReportStatus::Loading;
                Some(self.begin_fetch())
            }
            None => {
                self.selected_exercise = None;
                self.workouts.clear();
                self.status = ReportStatus::None;
                None
            }
        }
    }

    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Completes a contains lookup. Returns false when the completion was
    /// stale and therefore ignored.
    pub fn finish_contains(&mut self, seq: u64, result: Result<Vec<Workout>>) -> bool {
        if seq != self.fetch_seq {
            return false;
        }

        match result {
            Ok(workouts) => {
                self.workouts = workouts;
                self.status = ReportStatus::Success;
            }
            Err(_) => {
                self.workouts.clear();
                self.status = ReportStatus::Error;
            }
        }

        true
    }

    fn range(&self) -> Result<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => bail!("no date range selected"),
        }
    }

    /// Runs the contains lookup synchronously against the given collection.
    pub fn run_contains(&mut self, all: &[Workout], exercise: &str) -> bool {
        let seq = match self.select_exercise(Some(exercise.to_string())) {
            Some(seq) => seq,
            None => return false,
        };

        let matching = workouts_containing(all, exercise);
        if matching.is_empty() {
            // An empty result is an error state, not an empty success.
            self.finish_contains(seq, Err(anyhow::anyhow!("Workouts not found")))
        } else {
            self.finish_contains(seq, Ok(matching))
        }
    }

    /// Validates the query and computes the volume report. On any
    /// validation failure the view is left untouched.
    pub fn generate_volume(&mut self, all: &[Workout]) -> Result<VolumeReport> {
        let range = self.range()?;
        let exercise = self.selected_exercise.as_deref();

        let matching = filter_workouts(all, &range, exercise);
        let report = volume_report(&matching, exercise);

        self.total_volume = Some(report.total);
        self.graph_data = if report.series.is_empty() {
            DEFAULT_GRAPH_DATA.clone()
        } else {
            report.series.clone()
        };

        Ok(report)
    }

    /// Same for the 1RM report, which additionally requires an exercise.
    pub fn generate_one_rm(&mut self, all: &[Workout]) -> Result<Vec<GraphPoint>> {
        let exercise = match self.selected_exercise.clone() {
            Some(name) => name,
            None => bail!("a 1RM report requires a selected exercise"),
        };
        let range = self.range()?;

        let matching = filter_workouts(all, &range, Some(&exercise));
        let series = one_rm_report(&matching, &exercise);

        self.graph_data = if series.is_empty() {
            DEFAULT_GRAPH_DATA.clone()
        } else {
            series.clone()
        };

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::{day_start, parse_day},
        models::ExerciseEntry,
    };

    fn workout(day: &str, exercise: &str) -> Workout {
        Workout {
            id: day.to_string(),
            idx: 0,
            name: day.to_string(),
            scheduled_date: day_start(parse_day(day).unwrap()).unwrap(),
            exercises: vec![ExerciseEntry {
                name: exercise.to_string(),
                sets: 3,
                reps: 5,
                weight: Some(200.0),
            }],
            comments: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn starts_blank_with_placeholder_graph() {
        let view = ReportView::new(ReportKind::Contains);
        assert_eq!(view.status(), ReportStatus::None);
        assert_eq!(view.selected_exercise(), None);
        assert_eq!(view.graph_data(), DEFAULT_GRAPH_DATA.as_slice());
    }

    #[test]
    fn selecting_enters_loading_then_success() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Contains);

        let seq = view.select_exercise(Some("Squat".to_string())).unwrap();
        assert_eq!(view.status(), ReportStatus::Loading);

        assert!(view.finish_contains(seq, Ok(workouts_containing(&all, "Squat"))));
        assert_eq!(view.status(), ReportStatus::Success);
        assert_eq!(view.workouts().len(), 1);
    }

    #[test]
    fn empty_result_is_an_error_state() {
        let mut view = ReportView::new(ReportKind::Contains);
        assert!(view.run_contains(&[], "Squat"));
        assert_eq!(view.status(), ReportStatus::Error);
        assert!(view.workouts().is_empty());
    }

    #[test]
    fn deselecting_returns_to_none() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Contains);
        view.run_contains(&all, "Squat");

        assert_eq!(view.select_exercise(None), None);
        assert_eq!(view.status(), ReportStatus::None);
        assert!(view.workouts().is_empty());
        assert_eq!(view.selected_exercise(), None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Contains);

        let stale = view.select_exercise(Some("Squat".to_string())).unwrap();
        let fresh = view.select_exercise(Some("Bench Press".to_string())).unwrap();

        // The slow response for the first request lands after the second
        // one was issued. It must not clobber anything.
        assert!(!view.finish_contains(stale, Ok(workouts_containing(&all, "Squat"))));
        assert_eq!(view.status(), ReportStatus::Loading);

        assert!(view.finish_contains(fresh, Err(anyhow::anyhow!("Workouts not found"))));
        assert_eq!(view.status(), ReportStatus::Error);
    }

    #[test]
    fn switching_kind_resets_everything() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Volume);
        view.set_range(Some(day("2024-01-01")), Some(day("2024-01-31")));
        view.select_exercise(Some("Squat".to_string()));
        view.generate_volume(&all).unwrap();

        view.set_kind(ReportKind::OneRm);

        assert_eq!(view.selected_exercise(), None);
        assert_eq!(view.start(), None);
        assert_eq!(view.end(), None);
        assert_eq!(view.total_volume(), None);
        assert_eq!(view.graph_data(), DEFAULT_GRAPH_DATA.as_slice());
        assert_eq!(view.status(), ReportStatus::None);
    }

    #[test]
    fn setting_the_same_kind_keeps_state() {
        let mut view = ReportView::new(ReportKind::Volume);
        view.set_range(Some(day("2024-01-01")), Some(day("2024-01-31")));
        view.set_kind(ReportKind::Volume);
        assert!(view.start().is_some());
    }

    #[test]
    fn volume_without_range_is_rejected_without_mutation() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Volume);

        assert!(view.generate_volume(&all).is_err());
        assert_eq!(view.total_volume(), None);
        assert_eq!(view.graph_data(), DEFAULT_GRAPH_DATA.as_slice());
    }

    #[test]
    fn inverted_range_is_rejected_without_mutation() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Volume);
        view.set_range(Some(day("2024-02-01")), Some(day("2024-01-01")));

        assert!(view.generate_volume(&all).is_err());
        assert_eq!(view.total_volume(), None);
    }

    #[test]
    fn one_rm_without_exercise_is_rejected() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::OneRm);
        view.set_range(Some(day("2024-01-01")), Some(day("2024-01-31")));

        assert!(view.generate_one_rm(&all).is_err());
        assert_eq!(view.graph_data(), DEFAULT_GRAPH_DATA.as_slice());
    }

    #[test]
    fn successful_volume_run_updates_the_view() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::Volume);
        view.set_range(Some(day("2024-01-01")), Some(day("2024-01-01")));

        let report = view.generate_volume(&all).unwrap();
        assert_eq!(report.total, 3000);
        assert_eq!(view.total_volume(), Some(3000));
        assert_eq!(view.graph_data().len(), 1);
        assert_eq!(view.graph_data()[0].name, "2024-01-01");
    }

    #[test]
    fn successful_one_rm_run_updates_the_graph() {
        let all = vec![workout("2024-01-01", "Squat")];
        let mut view = ReportView::new(ReportKind::OneRm);
        view.set_range(Some(day("2024-01-01")), Some(day("2024-01-01")));
        view.selected_exercise = Some("Squat".to_string());

        let series = view.generate_one_rm(&all).unwrap();
        assert_eq!(series[0].amount, 233);
        assert_eq!(view.graph_data()[0].amount, 233);
    }
}
