//! Routine records - weekdays, day plans and exercise entries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Training days of the routine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn short(&self) -> &'static str {
        &self.name()[..3]
    }

    /// All training days in calendar order
    pub fn all() -> &'static [Weekday] {
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ]
    }

    pub fn next(&self) -> Weekday {
        let all = Self::all();
        let idx = all.iter().position(|d| d == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Weekday {
        let all = Self::all();
        let idx = all.iter().position(|d| d == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown weekday '{0}' (expected Monday..Friday)")]
pub struct ParseWeekdayError(String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Weekday::all()
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s) || d.short().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseWeekdayError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Medium => "Medium",
            Intensity::High => "High",
        }
    }

    pub fn all() -> &'static [Intensity] {
        &[Intensity::Low, Intensity::Medium, Intensity::High]
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown intensity '{0}' (expected Low, Medium or High)")]
pub struct ParseIntensityError(String);

impl FromStr for Intensity {
    type Err = ParseIntensityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Intensity::all()
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseIntensityError(s.to_string()))
    }
}

/// Entry identifier: creation time in milliseconds, unique within a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub i64);

/// One logged exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseEntry {
    pub id: EntryId,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: String,
    pub completed: bool,
    pub media_url: Option<String>,
    pub duration: String,
    pub intensity: Intensity,
}

impl ExerciseEntry {
    /// Fresh entry: not completed, media still unresolved
    pub fn new(id: EntryId, patch: EntryPatch) -> Self {
        Self {
            id,
            name: patch.name,
            sets: patch.sets,
            reps: patch.reps,
            weight: patch.weight,
            completed: false,
            media_url: None,
            duration: patch.duration,
            intensity: patch.intensity,
        }
    }

    /// Overwrite the editable fields, keeping completion and media
    pub fn apply(&mut self, patch: EntryPatch) {
        self.name = patch.name;
        self.sets = patch.sets;
        self.reps = patch.reps;
        self.weight = patch.weight;
        self.duration = patch.duration;
        self.intensity = patch.intensity;
    }

    pub fn summary(&self) -> String {
        format!("{} sets x {} reps @ {}", self.sets, self.reps, self.weight)
    }
}

/// Editable fields of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPatch {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: String,
    pub duration: String,
    pub intensity: Intensity,
}

/// A weekday's focus plus its exercises in insertion order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayPlan {
    pub focus: String,
    pub exercises: Vec<ExerciseEntry>,
}

/// Weekday -> plan mapping, iterated in the order days were first planned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutState {
    days: Vec<(Weekday, DayPlan)>,
}

impl WorkoutState {
    pub fn get(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.iter().find(|(d, _)| *d == day).map(|(_, plan)| plan)
    }

    pub(crate) fn get_mut(&mut self, day: Weekday) -> Option<&mut DayPlan> {
        self.days.iter_mut().find(|(d, _)| *d == day).map(|(_, plan)| plan)
    }

    pub(crate) fn insert(&mut self, day: Weekday, plan: DayPlan) {
        self.days.push((day, plan));
    }

    pub(crate) fn entry_mut(&mut self, day: Weekday, id: EntryId) -> Option<&mut ExerciseEntry> {
        self.get_mut(day)?.exercises.iter_mut().find(|e| e.id == id)
    }

    pub fn entry(&self, day: Weekday, id: EntryId) -> Option<&ExerciseEntry> {
        self.get(day)?.exercises.iter().find(|e| e.id == id)
    }

    /// Planned days in insertion order
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(d, plan)| (*d, plan))
    }

    /// Every entry across all days
    pub fn entries(&self) -> impl Iterator<Item = &ExerciseEntry> {
        self.days.iter().flat_map(|(_, plan)| plan.exercises.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse() {
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!("Fri".parse::<Weekday>(), Ok(Weekday::Friday));
        assert!("Saturday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_cycle() {
        assert_eq!(Weekday::Friday.next(), Weekday::Monday);
        assert_eq!(Weekday::Monday.prev(), Weekday::Friday);
        assert_eq!(Weekday::Tuesday.next(), Weekday::Wednesday);
    }

    #[test]
    fn test_intensity_parse() {
        assert_eq!("high".parse::<Intensity>(), Ok(Intensity::High));
        assert!("extreme".parse::<Intensity>().is_err());
    }

    #[test]
    fn test_apply_keeps_completion_and_media() {
        let patch = EntryPatch {
            name: "Squat".into(),
            sets: 3,
            reps: 12,
            weight: "50kg".into(),
            duration: "10m".into(),
            intensity: Intensity::Medium,
        };
        let mut entry = ExerciseEntry::new(EntryId(1), patch.clone());
        entry.completed = true;
        entry.media_url = Some("http://img".into());

        entry.apply(EntryPatch { name: "Front Squat".into(), sets: 5, ..patch });

        assert_eq!(entry.name, "Front Squat");
        assert_eq!(entry.sets, 5);
        assert!(entry.completed);
        assert_eq!(entry.media_url.as_deref(), Some("http://img"));
    }
}
