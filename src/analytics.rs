//! Routine analytics - read-only projections of a store snapshot

use crate::store::{Weekday, WorkoutState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    /// 0..=100, exactly 0 for an empty routine
    pub percentage: f64,
}

/// Volume over completed entries only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total_sets: u64,
    pub total_reps: u64,
}

/// One bar of a chart, already normalized against the chart maximum
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow<'a> {
    pub label: &'a str,
    pub count: usize,
    pub ratio: f64,
}

/// Routine analytics over one snapshot
pub struct Analytics<'a> {
    state: &'a WorkoutState,
}

impl<'a> Analytics<'a> {
    pub fn new(state: &'a WorkoutState) -> Self {
        Self { state }
    }

    pub fn completion_stats(&self) -> CompletionStats {
        let total = self.state.entries().count();
        let completed = self.state.entries().filter(|e| e.completed).count();
        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        CompletionStats { total, completed, percentage }
    }

    pub fn aggregates(&self) -> Aggregates {
        self.state
            .entries()
            .filter(|e| e.completed)
            .fold(Aggregates::default(), |acc, e| Aggregates {
                total_sets: acc.total_sets + u64::from(e.sets),
                total_reps: acc.total_reps + u64::from(e.reps),
            })
    }

    /// Entry count per focus label, labels in the order days were planned
    pub fn focus_histogram(&self) -> Vec<(&'a str, usize)> {
        let mut histogram: Vec<(&'a str, usize)> = Vec::new();
        for (_, plan) in self.state.days() {
            let count = plan.exercises.len();
            match histogram.iter_mut().find(|(focus, _)| *focus == plan.focus) {
                Some((_, total)) => *total += count,
                None => histogram.push((plan.focus.as_str(), count)),
            }
        }
        histogram
    }

    /// Focus with the most entries; ties go to the earliest planned label
    pub fn most_frequent_focus(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for (focus, count) in self.focus_histogram() {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((focus, count));
            }
        }
        best.map(|(focus, _)| focus)
    }

    /// Entry count for each training day, Monday through Friday
    pub fn daily_distribution(&self) -> Vec<(Weekday, usize)> {
        Weekday::all()
            .iter()
            .map(|day| (*day, self.state.get(*day).map_or(0, |p| p.exercises.len())))
            .collect()
    }

    pub fn daily_chart(&self) -> Vec<ChartRow<'static>> {
        let distribution = self.daily_distribution();
        let max = chart_scale(distribution.iter().map(|(_, c)| *c));
        distribution
            .into_iter()
            .map(|(day, count)| ChartRow {
                label: day.short(),
                count,
                ratio: count as f64 / max as f64,
            })
            .collect()
    }

    pub fn focus_breakdown(&self) -> Vec<ChartRow<'a>> {
        let histogram = self.focus_histogram();
        let max = chart_scale(histogram.iter().map(|(_, c)| *c));
        histogram
            .into_iter()
            .map(|(label, count)| ChartRow {
                label,
                count,
                ratio: count as f64 / max as f64,
            })
            .collect()
    }
}

/// Chart denominator: the largest count, never below 1
pub fn chart_scale(counts: impl IntoIterator<Item = usize>) -> usize {
    counts.into_iter().max().unwrap_or(0).max(1)
}

/// Text bar for a 0..=1 ratio
pub fn bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryPatch, ExerciseEntry, Intensity, WorkoutStore};

    fn entry(store: &mut WorkoutStore, sets: u32, reps: u32) -> ExerciseEntry {
        ExerciseEntry::new(
            store.next_id(),
            EntryPatch {
                name: "Lift".into(),
                sets,
                reps,
                weight: "20kg".into(),
                duration: "5m".into(),
                intensity: Intensity::Low,
            },
        )
    }

    #[test]
    fn test_empty_routine() {
        let state = WorkoutState::default();
        let analytics = Analytics::new(&state);

        let stats = analytics.completion_stats();
        assert_eq!((stats.total, stats.completed), (0, 0));
        assert_eq!(stats.percentage, 0.0);
        assert_eq!(analytics.aggregates(), Aggregates::default());
        assert!(analytics.focus_histogram().is_empty());
        assert_eq!(analytics.most_frequent_focus(), None);
    }

    #[test]
    fn test_daily_distribution_empty_has_five_zero_rows() {
        let state = WorkoutState::default();
        let analytics = Analytics::new(&state);

        let distribution = analytics.daily_distribution();
        assert_eq!(distribution.len(), 5);
        assert!(distribution.iter().all(|(_, c)| *c == 0));
        assert_eq!(distribution[0].0, Weekday::Monday);
        assert_eq!(distribution[4].0, Weekday::Friday);
        assert_eq!(chart_scale(distribution.iter().map(|(_, c)| *c)), 1);
        assert!(analytics.daily_chart().iter().all(|r| r.ratio == 0.0));
    }

    #[test]
    fn test_aggregates_count_completed_only() {
        let mut store = WorkoutStore::new();
        let done = entry(&mut store, 3, 10);
        let done_id = done.id;
        store.add_entry(Weekday::Monday, "Legs", done);
        let pending = entry(&mut store, 5, 5);
        store.add_entry(Weekday::Monday, "Legs", pending);
        store.toggle_completion(Weekday::Monday, done_id);

        let snap = store.snapshot();
        let analytics = Analytics::new(&snap);
        assert_eq!(analytics.aggregates(), Aggregates { total_sets: 3, total_reps: 10 });
        assert_eq!(analytics.completion_stats().percentage, 50.0);
    }

    #[test]
    fn test_focus_histogram_sums_shared_labels() {
        let mut store = WorkoutStore::new();
        for (day, focus, n) in [
            (Weekday::Monday, "Legs", 2),
            (Weekday::Tuesday, "Chest", 3),
            (Weekday::Thursday, "Legs", 2),
        ] {
            for _ in 0..n {
                let e = entry(&mut store, 1, 1);
                store.add_entry(day, focus, e);
            }
        }

        let snap = store.snapshot();
        let analytics = Analytics::new(&snap);
        assert_eq!(analytics.focus_histogram(), vec![("Legs", 4), ("Chest", 3)]);
        assert_eq!(analytics.most_frequent_focus(), Some("Legs"));

        let breakdown = analytics.focus_breakdown();
        assert_eq!(breakdown[0].ratio, 1.0);
        assert_eq!(breakdown[1].ratio, 0.75);
    }

    #[test]
    fn test_most_frequent_focus_tie_goes_leftmost() {
        let mut store = WorkoutStore::new();
        for (day, focus) in [(Weekday::Wednesday, "Back"), (Weekday::Monday, "Arms")] {
            let e = entry(&mut store, 1, 1);
            store.add_entry(day, focus, e);
        }

        let snap = store.snapshot();
        assert_eq!(Analytics::new(&snap).most_frequent_focus(), Some("Back"));
    }

    #[test]
    fn test_daily_chart_normalizes_by_max() {
        let mut store = WorkoutStore::new();
        for day in [Weekday::Monday, Weekday::Monday, Weekday::Friday] {
            let e = entry(&mut store, 1, 1);
            store.add_entry(day, "Full", e);
        }

        let snap = store.snapshot();
        let chart = Analytics::new(&snap).daily_chart();
        assert_eq!(chart[0].label, "Mon");
        assert_eq!(chart[0].ratio, 1.0);
        assert_eq!(chart[4].ratio, 0.5);
        assert_eq!(chart[2].count, 0);
    }

    #[test]
    fn test_bar_rendering() {
        assert_eq!(bar(0.0, 4), "····");
        assert_eq!(bar(0.5, 4), "██··");
        assert_eq!(bar(1.0, 4), "████");
        assert_eq!(bar(3.0, 4), "████");
    }
}
