use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    error::FeedError,
    time::{parse_minutes_lenient, MINUTES_PER_DAY},
};

pub type Sequence = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub sequence: Sequence,
    pub name: String,
    pub dwell_minutes: u32,
    pub note: Option<String>,
}

/// Stops of the shuttle line, kept in ascending `sequence` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(stops: Vec<Stop>) -> Result<Self, FeedError> {
        let stops: Vec<Stop> = stops
            .into_iter()
            .sorted_by_key(|stop| stop.sequence)
            .collect();

        if let Some((first, second)) = stops
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.sequence == b.sequence)
        {
            return Err(FeedError::DuplicateSequence {
                sequence: first.sequence,
                first: first.name.to_owned(),
                second: second.name.to_owned(),
            });
        }

        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in traversal order: ascending sequence going forward,
    /// descending going backward.
    pub fn ordered(&self, forward: bool) -> Vec<&Stop> {
        if forward {
            self.stops.iter().collect()
        } else {
            self.stops.iter().rev().collect()
        }
    }

    /// Position in ascending order of the first stop carrying `name`.
    pub fn position_by_name(&self, name: &str) -> Option<(usize, &Stop)> {
        self.stops
            .iter()
            .find_position(|stop| stop.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceWindow {
    pub start_time: String,
    pub end_time: String,
    pub from_location: String,
    pub to_location: String,
    pub note: Option<String>,
}

/// Window bounds are minutes since midnight clamped to `0..=1440`, so a
/// window may end at `24:00`.
impl ServiceWindow {
    pub fn start_minute(&self) -> u32 {
        parse_minutes_lenient(Some(&self.start_time)).min(MINUTES_PER_DAY)
    }

    pub fn end_minute(&self) -> u32 {
        parse_minutes_lenient(Some(&self.end_time)).min(MINUTES_PER_DAY)
    }
}

/// Published service windows for one day, in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    pub date: Option<NaiveDate>,
    pub label: Option<String>,
    pub note: Option<String>,
    pub slots: Vec<ServiceWindow>,
}

impl Calendar {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "forward" => Some(Direction::Forward),
            "backward" => Some(Direction::Backward),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mean_leg_minutes: u32,
    pub loop_enabled: bool,
    pub bidirectional_enabled: bool,
    pub display_direction: Direction,
    pub display_base_stop_sequence: Option<Sequence>,
    pub constrain_to_today_slots: bool,
}

pub const DEFAULT_MEAN_LEG_MINUTES: u32 = 5;

impl Default for Settings {
    fn default() -> Self {
        Self {
            mean_leg_minutes: DEFAULT_MEAN_LEG_MINUTES,
            loop_enabled: false,
            bidirectional_enabled: false,
            display_direction: Direction::Forward,
            display_base_stop_sequence: None,
            constrain_to_today_slots: false,
        }
    }
}
