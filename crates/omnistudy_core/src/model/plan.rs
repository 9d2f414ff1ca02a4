//! Study plan domain model.
//!
//! # Responsibility
//! - Define the plan tree: plan -> variants -> schedule -> day -> task.
//! - Provide copy-on-write rebuilds for task toggling and intensity switching.
//! - Validate structural invariants of plans entering the store.
//!
//! # Invariants
//! - Day numbers are unique within one schedule (not necessarily sorted).
//! - Task ids are unique within one day.
//! - Descriptive fields unknown to core are preserved verbatim in `details`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named plan variant key, conventionally `light`, `moderate` or `intense`.
pub type IntensityLevel = String;

/// Opaque descriptive fields carried alongside core fields.
pub type Details = Map<String, Value>;

/// Atomic unit of study work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub details: Details,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            completed: false,
            details: Details::new(),
        }
    }

    fn toggled(&self) -> Self {
        Self {
            id: self.id.clone(),
            completed: !self.completed,
            details: self.details.clone(),
        }
    }
}

/// Tasks assigned to one study day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub details: Details,
}

impl DayPlan {
    pub fn new(day: i64, tasks: Vec<Task>) -> Self {
        Self {
            day,
            tasks,
            details: Details::new(),
        }
    }
}

/// One complete schedule alternative within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanVariant {
    #[serde(default)]
    pub schedule: Vec<DayPlan>,
    #[serde(flatten)]
    pub details: Details,
}

/// Completion counters for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanProgress {
    pub completed: usize,
    pub total: usize,
}

impl PlanProgress {
    /// Rounded completion percentage; `0` for a variant without tasks.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

impl PlanVariant {
    pub fn new(schedule: Vec<DayPlan>) -> Self {
        Self {
            schedule,
            details: Details::new(),
        }
    }

    pub fn day(&self, day: i64) -> Option<&DayPlan> {
        self.schedule.iter().find(|day_plan| day_plan.day == day)
    }

    pub fn progress(&self) -> PlanProgress {
        self.schedule
            .iter()
            .flat_map(|day_plan| day_plan.tasks.iter())
            .fold(PlanProgress::default(), |acc, task| PlanProgress {
                completed: acc.completed + usize::from(task.completed),
                total: acc.total + 1,
            })
    }
}

/// A study plan with one schedule per intensity level.
///
/// Persisted as camelCase JSON (`selectedIntensity`). Deserialization fails
/// when `variants` is missing, which is how legacy single-schedule saves are
/// recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub variants: BTreeMap<IntensityLevel, PlanVariant>,
    pub selected_intensity: IntensityLevel,
    #[serde(flatten)]
    pub details: Details,
}

impl StudyPlan {
    pub fn new(
        variants: BTreeMap<IntensityLevel, PlanVariant>,
        selected_intensity: impl Into<IntensityLevel>,
    ) -> Self {
        Self {
            variants,
            selected_intensity: selected_intensity.into(),
            details: Details::new(),
        }
    }

    /// Returns the variant currently selected, if the key resolves.
    pub fn selected_variant(&self) -> Option<&PlanVariant> {
        self.variants.get(&self.selected_intensity)
    }

    /// Looks up one task inside the selected variant.
    pub fn find_task(&self, day: i64, task_id: &str) -> Option<&Task> {
        self.selected_variant()?
            .day(day)?
            .tasks
            .iter()
            .find(|task| task.id == task_id)
    }

    /// Rebuilds the plan with one task's `completed` flag flipped.
    ///
    /// Only the selected variant is touched. Every level on the path
    /// (variants map, variant, schedule, day, task) is a fresh value; all
    /// other entries are copied unchanged.
    ///
    /// Returns `None` when the selected variant is missing or no task matched.
    pub fn with_task_toggled(&self, day: i64, task_id: &str) -> Option<StudyPlan> {
        let variant = self.selected_variant()?;

        let mut matched = false;
        let mut schedule = Vec::with_capacity(variant.schedule.len());
        for day_plan in &variant.schedule {
            if day_plan.day != day {
                schedule.push(day_plan.clone());
                continue;
            }

            let mut tasks = Vec::with_capacity(day_plan.tasks.len());
            for task in &day_plan.tasks {
                if task.id == task_id {
                    matched = true;
                    tasks.push(task.toggled());
                } else {
                    tasks.push(task.clone());
                }
            }
            schedule.push(DayPlan {
                day: day_plan.day,
                tasks,
                details: day_plan.details.clone(),
            });
        }

        if !matched {
            return None;
        }

        let mut variants = self.variants.clone();
        variants.insert(
            self.selected_intensity.clone(),
            PlanVariant {
                schedule,
                details: variant.details.clone(),
            },
        );

        Some(StudyPlan {
            variants,
            selected_intensity: self.selected_intensity.clone(),
            details: self.details.clone(),
        })
    }

    /// Rebuilds the plan with a different selected variant.
    ///
    /// Returns `None` when `level` is not a key of `variants`.
    pub fn with_selected_intensity(&self, level: &str) -> Option<StudyPlan> {
        if !self.variants.contains_key(level) {
            return None;
        }
        Some(StudyPlan {
            variants: self.variants.clone(),
            selected_intensity: level.to_string(),
            details: self.details.clone(),
        })
    }

    /// Checks structural invariants required by the state store.
    ///
    /// # Errors
    /// - `NoVariants` when the variants map is empty.
    /// - `UnknownSelectedIntensity` when the selection is not a variant key.
    /// - `DuplicateDay` / `DuplicateTaskId` when identities collide.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.variants.is_empty() {
            return Err(PlanValidationError::NoVariants);
        }
        if !self.variants.contains_key(&self.selected_intensity) {
            return Err(PlanValidationError::UnknownSelectedIntensity(
                self.selected_intensity.clone(),
            ));
        }
        check_details("plan", &self.details, PLAN_KEYS)?;

        for (intensity, variant) in &self.variants {
            check_details("variant", &variant.details, VARIANT_KEYS)?;
            let mut days = BTreeSet::new();
            for day_plan in &variant.schedule {
                check_details("day", &day_plan.details, DAY_KEYS)?;
                if !days.insert(day_plan.day) {
                    return Err(PlanValidationError::DuplicateDay {
                        intensity: intensity.clone(),
                        day: day_plan.day,
                    });
                }

                let mut task_ids = BTreeSet::new();
                for task in &day_plan.tasks {
                    check_details("task", &task.details, TASK_KEYS)?;
                    if !task_ids.insert(task.id.as_str()) {
                        return Err(PlanValidationError::DuplicateTaskId {
                            intensity: intensity.clone(),
                            day: day_plan.day,
                            task_id: task.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

const PLAN_KEYS: &[&str] = &["variants", "selectedIntensity"];
const VARIANT_KEYS: &[&str] = &["schedule"];
const DAY_KEYS: &[&str] = &["day", "tasks"];
const TASK_KEYS: &[&str] = &["id", "completed"];

// Flattened details must not shadow a typed field, or serialization emits the key twice.
fn check_details(
    level: &'static str,
    details: &Details,
    reserved: &[&str],
) -> Result<(), PlanValidationError> {
    match reserved.iter().find(|key| details.contains_key(**key)) {
        Some(key) => Err(PlanValidationError::ReservedDetailKey {
            level,
            key: (*key).to_string(),
        }),
        None => Ok(()),
    }
}

/// Structural invariant violation in a study plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    NoVariants,
    UnknownSelectedIntensity(IntensityLevel),
    DuplicateDay {
        intensity: IntensityLevel,
        day: i64,
    },
    DuplicateTaskId {
        intensity: IntensityLevel,
        day: i64,
        task_id: String,
    },
    /// An opaque detail field reuses the name of a typed field at `level`.
    ReservedDetailKey {
        level: &'static str,
        key: String,
    },
}

impl PlanValidationError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoVariants => "no_variants",
            Self::UnknownSelectedIntensity(_) => "unknown_selected_intensity",
            Self::DuplicateDay { .. } => "duplicate_day",
            Self::DuplicateTaskId { .. } => "duplicate_task_id",
            Self::ReservedDetailKey { .. } => "reserved_detail_key",
        }
    }
}

impl Display for PlanValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVariants => write!(f, "plan has no variants"),
            Self::UnknownSelectedIntensity(level) => {
                write!(f, "selected intensity `{level}` is not a plan variant")
            }
            Self::DuplicateDay { intensity, day } => {
                write!(f, "variant `{intensity}` schedules day {day} more than once")
            }
            Self::DuplicateTaskId {
                intensity,
                day,
                task_id,
            } => write!(
                f,
                "variant `{intensity}` day {day} has duplicate task id `{task_id}`"
            ),
            Self::ReservedDetailKey { level, key } => {
                write!(f, "{level} detail field `{key}` shadows a built-in field")
            }
        }
    }
}

impl Error for PlanValidationError {}
