use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    data::{Calendar, Direction, Route, ServiceWindow, Settings, Stop, DEFAULT_MEAN_LEG_MINUTES},
    error::FeedError,
};

/// One row of `route.csv`.
#[derive(Deserialize, Debug)]
pub struct StopRecord {
    pub sequence: Option<i64>,
    pub name: String,
    pub dwell_minutes: Option<u32>,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SettingsRecord {
    pub mean_leg_minutes: Option<u32>,
    pub loop_enabled: Option<bool>,
    pub bidirectional_enabled: Option<bool>,
    pub display_direction: Option<String>,
    pub display_base_stop_sequence: Option<i64>,
    pub constrain_to_today_slots: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct SlotRecord {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub from_location: String,
    #[serde(default)]
    pub to_location: String,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DayRecord {
    pub date: Option<String>,
    pub label: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

/// `calendar.json` holds either the day itself or the whole published schedule.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum CalendarDocument {
    Schedule(Vec<DayRecord>),
    Day(DayRecord),
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl From<StopRecord> for Stop {
    fn from(record: StopRecord) -> Self {
        Stop {
            sequence: record.sequence.unwrap_or(0),
            name: record.name,
            dwell_minutes: record.dwell_minutes.unwrap_or(0),
            note: non_blank(record.note),
        }
    }
}

impl From<SettingsRecord> for Settings {
    fn from(record: SettingsRecord) -> Self {
        let display_direction = match record.display_direction.as_deref() {
            None => Direction::Forward,
            Some(label) => Direction::from_label(label).unwrap_or_else(|| {
                log::warn!("unknown display direction {label:?}, showing forward");
                Direction::Forward
            }),
        };

        Settings {
            mean_leg_minutes: record
                .mean_leg_minutes
                .unwrap_or(DEFAULT_MEAN_LEG_MINUTES),
            loop_enabled: record.loop_enabled.unwrap_or(false),
            bidirectional_enabled: record.bidirectional_enabled.unwrap_or(false),
            display_direction,
            display_base_stop_sequence: record.display_base_stop_sequence,
            constrain_to_today_slots: record.constrain_to_today_slots.unwrap_or(false),
        }
    }
}

impl From<SlotRecord> for ServiceWindow {
    fn from(record: SlotRecord) -> Self {
        ServiceWindow {
            start_time: record.start_time.unwrap_or_default(),
            end_time: record.end_time.unwrap_or_default(),
            from_location: record.from_location,
            to_location: record.to_location,
            note: non_blank(record.note),
        }
    }
}

impl DayRecord {
    fn parsed_date(&self) -> Option<NaiveDate> {
        let text = self.date.as_deref()?;
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|e| log::warn!("ignoring unreadable calendar date {text:?}: {e}"))
            .ok()
    }
}

impl From<DayRecord> for Calendar {
    fn from(record: DayRecord) -> Self {
        Calendar {
            date: record.parsed_date(),
            label: non_blank(record.label),
            note: non_blank(record.note),
            slots: record.slots.into_iter().map(ServiceWindow::from).collect(),
        }
    }
}

impl CalendarDocument {
    /// Calendar for `date`. A single-day document is taken as is, the way the
    /// "today" endpoint answers; a full schedule is searched for the day.
    pub fn for_date(self, date: NaiveDate) -> Calendar {
        match self {
            CalendarDocument::Day(day) => Calendar::from(day),
            CalendarDocument::Schedule(days) => days
                .into_iter()
                .find(|day| day.parsed_date() == Some(date))
                .map(Calendar::from)
                .unwrap_or_else(|| Calendar::empty(date)),
        }
    }
}

pub fn read_route<R: Read>(reader: R) -> Result<Route, FeedError> {
    let stops = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<StopRecord>()
        .map(|parse_result| parse_result.map(Stop::from))
        .collect::<Result<Vec<Stop>, csv::Error>>()?;
    Route::new(stops)
}

pub fn read_settings<R: Read>(reader: R) -> Result<Settings, FeedError> {
    let record: SettingsRecord = serde_json::from_reader(reader)?;
    Ok(Settings::from(record))
}

pub fn read_calendar<R: Read>(reader: R, date: NaiveDate) -> Result<Calendar, FeedError> {
    let document: CalendarDocument = serde_json::from_reader(reader)?;
    Ok(document.for_date(date))
}
