//! Workout store - in-memory routine state with immutable snapshots
//!
//! Every mutation builds a new [`WorkoutState`] and publishes it through a
//! watch channel, so readers never observe a half-applied change.

mod model;

pub use model::{
    DayPlan, EntryId, EntryPatch, ExerciseEntry, Intensity, ParseIntensityError,
    ParseWeekdayError, Weekday, WorkoutState,
};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

/// Read-only view of the routine at one point in time
pub type Snapshot = Arc<WorkoutState>;

/// Owner of all day plans and entries
pub struct WorkoutStore {
    tx: watch::Sender<Snapshot>,
    last_id: i64,
}

impl Default for WorkoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(WorkoutState::default()));
        Self { tx, last_id: 0 }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Observe every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Next entry id: wall clock in milliseconds, bumped if the clock
    /// has not moved since the previous id
    pub fn next_id(&mut self) -> EntryId {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        EntryId(self.last_id)
    }

    /// Append an entry to `day`, creating the plan with `focus` if the day
    /// has none yet. An existing plan keeps its own focus.
    pub fn add_entry(&mut self, day: Weekday, focus: &str, entry: ExerciseEntry) -> Snapshot {
        let mut next = (*self.snapshot()).clone();
        match next.get_mut(day) {
            Some(plan) => plan.exercises.push(entry),
            None => next.insert(
                day,
                DayPlan {
                    focus: focus.to_string(),
                    exercises: vec![entry],
                },
            ),
        }
        self.publish(next)
    }

    /// Replace the editable fields of an entry; unknown day or id is a no-op
    pub fn update_entry(&mut self, day: Weekday, id: EntryId, patch: EntryPatch) -> Snapshot {
        self.modify_entry(day, id, |entry| entry.apply(patch))
    }

    /// Set the resolved media URL; unknown day or id is a no-op
    pub fn attach_media(&mut self, day: Weekday, id: EntryId, url: String) -> Snapshot {
        self.modify_entry(day, id, |entry| entry.media_url = Some(url))
    }

    /// Flip the completion flag. The bool is true only when the entry went
    /// from pending to completed.
    pub fn toggle_completion(&mut self, day: Weekday, id: EntryId) -> (Snapshot, bool) {
        let mut just_completed = false;
        let snapshot = self.modify_entry(day, id, |entry| {
            just_completed = !entry.completed;
            entry.completed = !entry.completed;
        });
        (snapshot, just_completed)
    }

    /// Drop every day plan
    pub fn clear_all(&mut self) -> Snapshot {
        self.publish(WorkoutState::default())
    }

    fn modify_entry(
        &mut self,
        day: Weekday,
        id: EntryId,
        f: impl FnOnce(&mut ExerciseEntry),
    ) -> Snapshot {
        let current = self.snapshot();
        let mut next = (*current).clone();
        match next.entry_mut(day, id) {
            Some(entry) => f(entry),
            None => {
                debug!(%day, id = id.0, "entry not found, ignoring mutation");
                return current;
            }
        }
        self.publish(next)
    }

    fn publish(&mut self, next: WorkoutState) -> Snapshot {
        let next = Arc::new(next);
        self.tx.send_replace(next.clone());
        next
    }
}
