//! Entry form - append new exercises or edit one in place

use thiserror::Error;

use crate::store::{
    EntryId, EntryPatch, ExerciseEntry, Intensity, Weekday, WorkoutState, WorkoutStore,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill out all fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0} must be a positive whole number")]
    NotPositive(&'static str),
    #[error("Intensity must be Low, Medium or High")]
    UnknownIntensity,
}

/// Input fields in on-screen order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Focus,
    Exercise,
    Sets,
    Reps,
    Weight,
    Duration,
    Intensity,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Focus => "Workout Focus",
            Field::Exercise => "Exercise",
            Field::Sets => "Sets",
            Field::Reps => "Reps",
            Field::Weight => "Weight",
            Field::Duration => "Duration",
            Field::Intensity => "Intensity",
        }
    }

    pub fn all() -> &'static [Field] {
        &[
            Field::Focus,
            Field::Exercise,
            Field::Sets,
            Field::Reps,
            Field::Weight,
            Field::Duration,
            Field::Intensity,
        ]
    }

    pub fn next(&self) -> Field {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Field {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Append,
    Editing { day: Weekday, id: EntryId },
}

/// What a successful submit did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// New entry; its media still has to be resolved
    Added { day: Weekday, id: EntryId, name: String },
    Updated { day: Weekday, id: EntryId },
}

#[derive(Debug, Clone)]
pub struct FormEditor {
    day: Weekday,
    mode: Mode,
    pub focus: String,
    pub exercise: String,
    pub sets: String,
    pub reps: String,
    pub weight: String,
    pub duration: String,
    pub intensity: String,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self {
            day: Weekday::Monday,
            mode: Mode::Append,
            focus: String::new(),
            exercise: String::new(),
            sets: String::new(),
            reps: String::new(),
            weight: String::new(),
            duration: String::new(),
            intensity: String::new(),
        }
    }
}

impl FormEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Focus => &self.focus,
            Field::Exercise => &self.exercise,
            Field::Sets => &self.sets,
            Field::Reps => &self.reps,
            Field::Weight => &self.weight,
            Field::Duration => &self.duration,
            Field::Intensity => &self.intensity,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Focus => &mut self.focus,
            Field::Exercise => &mut self.exercise,
            Field::Sets => &mut self.sets,
            Field::Reps => &mut self.reps,
            Field::Weight => &mut self.weight,
            Field::Duration => &mut self.duration,
            Field::Intensity => &mut self.intensity,
        }
    }

    /// Focus is fixed once the day has a plan, and while editing
    pub fn focus_locked(&self, state: &WorkoutState) -> bool {
        self.is_editing() || state.get(self.day).is_some()
    }

    /// Switch the target day. Ignored while editing, since the day selector
    /// stays on the edited entry's day.
    pub fn select_day(&mut self, state: &WorkoutState, day: Weekday) {
        if self.is_editing() {
            return;
        }
        self.day = day;
        self.sync_focus(state);
    }

    /// Load an entry into the form. Returns false if it no longer exists.
    pub fn start_edit(&mut self, state: &WorkoutState, day: Weekday, id: EntryId) -> bool {
        let (Some(plan), Some(entry)) = (state.get(day), state.entry(day, id)) else {
            return false;
        };
        self.mode = Mode::Editing { day, id };
        self.day = day;
        self.focus = plan.focus.clone();
        self.exercise = entry.name.clone();
        self.sets = entry.sets.to_string();
        self.reps = entry.reps.to_string();
        self.weight = entry.weight.clone();
        self.duration = entry.duration.clone();
        self.intensity = entry.intensity.name().to_string();
        true
    }

    /// Leave edit mode and clear the inputs
    pub fn cancel(&mut self, state: &WorkoutState) {
        self.mode = Mode::Append;
        self.clear_inputs();
        self.sync_focus(state);
    }

    /// Fill the exercise name from an AI suggestion
    pub fn apply_suggestion(&mut self, name: &str) {
        self.exercise = name.to_string();
    }

    /// Validate and apply the form to the store
    pub fn submit(&mut self, store: &mut WorkoutStore) -> Result<Submitted, FormError> {
        let patch = self.validate()?;

        match self.mode {
            Mode::Editing { day, id } => {
                let snapshot = store.update_entry(day, id, patch);
                self.cancel(&snapshot);
                Ok(Submitted::Updated { day, id })
            }
            Mode::Append => {
                let id = store.next_id();
                let name = patch.name.clone();
                let day = self.day;
                let snapshot = store.add_entry(day, self.focus.trim(), ExerciseEntry::new(id, patch));
                self.clear_inputs();
                self.sync_focus(&snapshot);
                Ok(Submitted::Added { day, id, name })
            }
        }
    }

    fn validate(&self) -> Result<EntryPatch, FormError> {
        let missing: Vec<_> = Field::all()
            .iter()
            .filter(|f| self.field(**f).trim().is_empty())
            .map(|f| f.label())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(EntryPatch {
            name: self.exercise.trim().to_string(),
            sets: parse_positive(&self.sets, Field::Sets)?,
            reps: parse_positive(&self.reps, Field::Reps)?,
            weight: self.weight.trim().to_string(),
            duration: self.duration.trim().to_string(),
            intensity: self
                .intensity
                .parse::<Intensity>()
                .map_err(|_| FormError::UnknownIntensity)?,
        })
    }

    fn clear_inputs(&mut self) {
        self.exercise.clear();
        self.sets.clear();
        self.reps.clear();
        self.weight.clear();
        self.duration.clear();
        self.intensity.clear();
    }

    fn sync_focus(&mut self, state: &WorkoutState) {
        self.focus = state
            .get(self.day)
            .map(|plan| plan.focus.clone())
            .unwrap_or_default();
    }
}

fn parse_positive(raw: &str, field: Field) -> Result<u32, FormError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FormError::NotPositive(field.label())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(focus: &str, name: &str) -> FormEditor {
        FormEditor {
            focus: focus.into(),
            exercise: name.into(),
            sets: "3".into(),
            reps: "12".into(),
            weight: "50kg".into(),
            duration: "10m".into(),
            intensity: "Medium".into(),
            ..FormEditor::default()
        }
    }

    #[test]
    fn test_submit_appends_and_clears() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "Squat");

        let submitted = form.submit(&mut store).unwrap();
        let Submitted::Added { day, id, name } = submitted else {
            panic!("expected an added entry");
        };
        assert_eq!(day, Weekday::Monday);
        assert_eq!(name, "Squat");

        let snap = store.snapshot();
        let entry = snap.entry(Weekday::Monday, id).unwrap();
        assert_eq!((entry.sets, entry.reps), (3, 12));
        assert_eq!(entry.intensity, Intensity::Medium);
        assert!(entry.media_url.is_none());

        assert!(form.exercise.is_empty());
        assert!(form.sets.is_empty());
        assert_eq!(form.focus, "Legs");
        assert!(form.focus_locked(&snap));
    }

    #[test]
    fn test_missing_fields_leave_state_unchanged() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "");
        form.weight.clear();

        let err = form.submit(&mut store).unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["Exercise", "Weight"]));
        assert!(store.snapshot().is_empty());
        assert_eq!(form.sets, "3");
    }

    #[test]
    fn test_sets_and_reps_must_be_positive() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "Squat");
        form.sets = "0".into();
        assert_eq!(form.submit(&mut store), Err(FormError::NotPositive("Sets")));

        form.sets = "3".into();
        form.reps = "ten".into();
        assert_eq!(form.submit(&mut store), Err(FormError::NotPositive("Reps")));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_unknown_intensity_is_rejected() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "Squat");
        form.intensity = "Brutal".into();
        assert_eq!(form.submit(&mut store), Err(FormError::UnknownIntensity));
    }

    #[test]
    fn test_edit_round_trip() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "Squat");
        let Ok(Submitted::Added { id, .. }) = form.submit(&mut store) else {
            panic!("add failed");
        };
        store.toggle_completion(Weekday::Monday, id);

        form.select_day(&store.snapshot(), Weekday::Wednesday);
        assert!(form.start_edit(&store.snapshot(), Weekday::Monday, id));
        assert_eq!(form.day(), Weekday::Monday);
        assert_eq!(form.exercise, "Squat");
        assert_eq!(form.focus, "Legs");
        assert_eq!(form.intensity, "Medium");

        // day selector is locked while editing
        form.select_day(&store.snapshot(), Weekday::Friday);
        assert_eq!(form.day(), Weekday::Monday);

        form.exercise = "Goblet Squat".into();
        form.reps = "15".into();
        assert_eq!(
            form.submit(&mut store),
            Ok(Submitted::Updated { day: Weekday::Monday, id })
        );
        assert_eq!(form.mode(), Mode::Append);
        assert!(form.exercise.is_empty());
        assert_eq!(form.focus, "Legs");

        let snap = store.snapshot();
        let entry = snap.entry(Weekday::Monday, id).unwrap();
        assert_eq!(entry.name, "Goblet Squat");
        assert_eq!(entry.reps, 15);
        assert!(entry.completed);
        assert_eq!(snap.entries().count(), 1);
    }

    #[test]
    fn test_cancel_resets_focus_for_day() {
        let mut store = WorkoutStore::new();
        let mut form = filled("Legs", "Squat");
        let Ok(Submitted::Added { id, .. }) = form.submit(&mut store) else {
            panic!("add failed");
        };

        assert!(form.start_edit(&store.snapshot(), Weekday::Monday, id));
        form.cancel(&store.snapshot());
        assert!(!form.is_editing());
        assert!(form.exercise.is_empty());
        assert_eq!(form.focus, "Legs");

        form.select_day(&store.snapshot(), Weekday::Tuesday);
        assert!(form.focus.is_empty());
        assert!(!form.focus_locked(&store.snapshot()));
    }

    #[test]
    fn test_start_edit_on_missing_entry() {
        let store = WorkoutStore::new();
        let mut form = FormEditor::new();
        assert!(!form.start_edit(&store.snapshot(), Weekday::Monday, EntryId(42)));
        assert_eq!(form.mode(), Mode::Append);
    }

    #[test]
    fn test_apply_suggestion_and_field_cycle() {
        let mut form = FormEditor::new();
        form.apply_suggestion("Bulgarian Split Squat");
        assert_eq!(form.field(Field::Exercise), "Bulgarian Split Squat");
        form.field_mut(Field::Sets).push('4');
        assert_eq!(form.sets, "4");
        assert_eq!(Field::Intensity.next(), Field::Focus);
        assert_eq!(Field::Focus.prev(), Field::Intensity);
    }
}
