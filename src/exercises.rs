//! Exercise library - static reference catalog

use serde::{Deserialize, Serialize};

/// Muscle groups used to browse the library
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "💪",
            MuscleGroup::Back => "🏋️",
            MuscleGroup::Legs => "🦵",
            MuscleGroup::Shoulders => "🤸",
            MuscleGroup::Arms => "💪",
            MuscleGroup::Core => "🎯",
        }
    }

    /// Parse a case-insensitive group name
    pub fn parse(s: &str) -> Option<Self> {
        distinct(|e| e.muscle_group)
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        distinct(|e| e.difficulty)
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    Bodyweight,
    Kettlebell,
}

impl Equipment {
    pub fn name(&self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::Machine => "Machine",
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Kettlebell => "Kettlebell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        distinct(|e| e.equipment)
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: u32,
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
    pub equipment: Equipment,
}

const fn ex(
    id: u32,
    name: &'static str,
    muscle_group: MuscleGroup,
    difficulty: Difficulty,
    equipment: Equipment,
) -> Exercise {
    Exercise { id, name, muscle_group, difficulty, equipment }
}

use Difficulty::*;
use Equipment::*;

pub const LIBRARY: &[Exercise] = &[
    ex(1, "Bench Press", MuscleGroup::Chest, Intermediate, Barbell),
    ex(2, "Push-up", MuscleGroup::Chest, Beginner, Bodyweight),
    ex(3, "Dumbbell Flyes", MuscleGroup::Chest, Intermediate, Dumbbell),
    ex(4, "Pull-up", MuscleGroup::Back, Advanced, Bodyweight),
    ex(5, "Deadlift", MuscleGroup::Back, Advanced, Barbell),
    ex(6, "Dumbbell Row", MuscleGroup::Back, Beginner, Dumbbell),
    ex(7, "Lat Pulldown", MuscleGroup::Back, Intermediate, Machine),
    ex(8, "Squat", MuscleGroup::Legs, Intermediate, Barbell),
    ex(9, "Lunge", MuscleGroup::Legs, Beginner, Bodyweight),
    ex(10, "Leg Press", MuscleGroup::Legs, Intermediate, Machine),
    ex(11, "Overhead Press", MuscleGroup::Shoulders, Intermediate, Barbell),
    ex(12, "Lateral Raises", MuscleGroup::Shoulders, Beginner, Dumbbell),
    ex(13, "Bicep Curl", MuscleGroup::Arms, Beginner, Dumbbell),
    ex(14, "Tricep Dips", MuscleGroup::Arms, Intermediate, Bodyweight),
    ex(15, "Plank", MuscleGroup::Core, Beginner, Bodyweight),
    ex(16, "Crunches", MuscleGroup::Core, Beginner, Bodyweight),
    ex(17, "Kettlebell Swing", MuscleGroup::Legs, Intermediate, Kettlebell),
    ex(18, "Skull Crushers", MuscleGroup::Arms, Intermediate, Barbell),
];

/// Library filter; `None` on a field means "All"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    pub muscle_group: Option<MuscleGroup>,
    pub difficulty: Option<Difficulty>,
    pub equipment: Option<Equipment>,
}

impl LibraryFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.muscle_group.is_none_or(|g| g == exercise.muscle_group)
            && self.difficulty.is_none_or(|d| d == exercise.difficulty)
            && self.equipment.is_none_or(|q| q == exercise.equipment)
    }
}

pub fn filter_exercises(filter: &LibraryFilter) -> Vec<&'static Exercise> {
    LIBRARY.iter().filter(|e| filter.matches(e)).collect()
}

/// Distinct values of one catalog column, in first-seen order
pub fn distinct<T: PartialEq + Copy>(column: impl Fn(&Exercise) -> T) -> Vec<T> {
    let mut seen = Vec::new();
    for value in LIBRARY.iter().map(column) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Step to the next filter option, wrapping through "All" (`None`)
pub fn cycle_option<T: PartialEq + Copy>(options: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(value) => {
            let idx = options.iter().position(|o| *o == value)?;
            options.get(idx + 1).copied()
        }
    }
}
