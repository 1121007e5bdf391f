use crate::{data::ServiceWindow, time::TimeOfDay};

/// A service window covering the queried time, with its bounds resolved to
/// minutes since midnight (`end` may be 1440 for a window closing at 24:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow<'a> {
    pub window: &'a ServiceWindow,
    pub start: u32,
    pub end: u32,
}

/// First window in calendar order whose `[start, end]` contains `t`, both
/// bounds inclusive.
pub fn find_active_window(slots: &[ServiceWindow], t: TimeOfDay) -> Option<ActiveWindow<'_>> {
    slots
        .iter()
        .map(|window| ActiveWindow {
            window,
            start: window.start_minute(),
            end: window.end_minute(),
        })
        .find(|active| active.start <= t.minutes() && t.minutes() <= active.end)
}
