use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use chrono::Weekday;
use serde::Deserialize;
use tracing::info;

use crate::day::{day_name, parse_day};
use crate::error::{Result, ScheduleError};

const BUILTIN_SCHEDULE: &str = include_str!("../data/schedule.json");

/// One class on the weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub name: String,
    /// Spoken start time, e.g. `"6am"`.
    pub start_time: String,
}

impl ScheduleEntry {
    pub fn new(day: Weekday, name: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self {
            day,
            name: name.into(),
            start_time: start_time.into(),
        }
    }

    /// `"{name} at {start_time}"`
    pub fn label(&self) -> String {
        format!("{} at {}", self.name, self.start_time)
    }
}

/// Raw JSON layout: `{ "days": { "Monday": [ { "name": "...", "startTime": "..." } ] } }`
#[derive(Deserialize)]
struct RawSchedule {
    days: BTreeMap<String, Vec<RawClass>>,
}

#[derive(Deserialize)]
struct RawClass {
    name: String,
    #[serde(rename = "startTime", alias = "start_time")]
    start_time: String,
}

/// The weekly schedule, grouped by day. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    days: HashMap<Weekday, Vec<ScheduleEntry>>,
}

impl Schedule {
    /// The schedule shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SCHEDULE)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let schedule = Self::from_json(&data)?;
        info!(path = %path.display(), days = schedule.day_count(), "schedule loaded");
        Ok(schedule)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let raw: RawSchedule = serde_json::from_str(data)?;
        let mut days: HashMap<Weekday, Vec<ScheduleEntry>> = HashMap::new();

        for (key, classes) in raw.days {
            let day = parse_day(&key).ok_or_else(|| ScheduleError::InvalidDay(key.clone()))?;
            days.entry(day).or_default().extend(
                classes
                    .into_iter()
                    .map(|c| ScheduleEntry::new(day, c.name, c.start_time)),
            );
        }

        Ok(Self { days })
    }

    /// Build from entries in timetable order. A day appears in the schedule
    /// only if at least one entry names it.
    pub fn from_entries(entries: impl IntoIterator<Item = ScheduleEntry>) -> Self {
        let mut days: HashMap<Weekday, Vec<ScheduleEntry>> = HashMap::new();
        for entry in entries {
            days.entry(entry.day).or_default().push(entry);
        }
        Self { days }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn entries_for(&self, day: Weekday) -> Result<&[ScheduleEntry]> {
        self.days
            .get(&day)
            .map(Vec::as_slice)
            .ok_or_else(|| ScheduleError::UnknownDay {
                day: day_name(day).to_string(),
            })
    }

    /// Distinct `"{name} at {time}"` labels for `day`, in first-seen order.
    pub fn class_labels(&self, day: Weekday) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .entries_for(day)?
            .iter()
            .map(ScheduleEntry::label)
            .filter(|label| seen.insert(label.clone()))
            .collect())
    }

    /// The spoken class list for `day`, e.g. `"Yoga at 6am, Spin at 7am"`.
    pub fn class_list(&self, day: Weekday) -> Result<String> {
        Ok(self.class_labels(day)?.join(", "))
    }
}
