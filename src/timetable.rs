use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::{
    data::{Calendar, Route, Settings},
    error::FeedError,
    feed,
};

pub const ROUTE_FILE: &str = "route.csv";
pub const SETTINGS_FILE: &str = "settings.json";
pub const CALENDAR_FILE: &str = "calendar.json";

/// Inputs of one session, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub route: Route,
    pub settings: Settings,
    pub calendar: Calendar,
}

fn open(path: &Path) -> Result<BufReader<File>, FeedError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| FeedError::Io {
            path: path.to_owned(),
            source,
        })
}

fn load_or<T>(
    path: PathBuf,
    fallback: T,
    read: impl FnOnce(BufReader<File>) -> Result<T, FeedError>,
) -> T {
    match open(&path).and_then(read) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{e}; using defaults instead of {path:?}");
            fallback
        }
    }
}

impl Timetable {
    /// Reads the three feeds from `dir`. Any feed that cannot be read is
    /// replaced by its default so the board can still be shown.
    pub fn load(dir: &Path, date: NaiveDate) -> Self {
        log::info!("Loading route");
        let route = load_or(dir.join(ROUTE_FILE), Route::default(), feed::read_route);

        log::info!("Loading settings");
        let settings = load_or(dir.join(SETTINGS_FILE), Settings::default(), feed::read_settings);

        log::info!("Loading calendar for {date}");
        let calendar = load_or(dir.join(CALENDAR_FILE), Calendar::empty(date), |reader| {
            feed::read_calendar(reader, date)
        });

        log::info!(
            "Loaded {} stops and {} service windows",
            route.len(),
            calendar.slots.len()
        );
        Self {
            route,
            settings,
            calendar,
        }
    }
}
