use std::{str::FromStr, time::Duration};

use chrono::{NaiveTime, TimeDelta};

use crate::{
    board::{compute_board, BoardOutcome},
    direction,
    error::TimeParseError,
    position::{project_position, Position},
    time::TimeOfDay,
    timetable::Timetable,
    window::{find_active_window, ActiveWindow},
};

/// Cadence of the clock and marker refresh.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);
/// Cadence of full board recomputation.
pub const BOARD_REFRESH: TimeDelta = TimeDelta::seconds(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Board starting from the current clock.
    Live,
    /// Board starting from a chosen time of day.
    At(TimeOfDay),
}

impl FromStr for Target {
    type Err = TimeParseError;

    /// `now` (or `live`) follows the clock, `HH:MM` fixes the start time.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "now" | "live" => Ok(Target::Live),
            other => other.parse().map(Target::At),
        }
    }
}

/// Board computed for one start time, with the window it was checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub start: TimeOfDay,
    pub window: Option<ActiveWindow<'a>>,
    pub outcome: BoardOutcome<'a>,
}

/// Runs the whole estimation for a board starting at `start`.
pub fn estimate(timetable: &Timetable, start: TimeOfDay) -> Snapshot<'_> {
    let window = find_active_window(&timetable.calendar.slots, start);
    let resolution = direction::resolve(&timetable.settings, &timetable.route, window.as_ref());
    let outcome = compute_board(
        &timetable.route,
        resolution,
        &timetable.settings,
        window.as_ref(),
        start,
    );
    Snapshot {
        start,
        window,
        outcome,
    }
}

/// What changed on one tick. `board` is only set when it was recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub clock: NaiveTime,
    pub window_now: Option<ActiveWindow<'a>>,
    pub position: Option<Position>,
    pub board: Option<Snapshot<'a>>,
}

/// The current view of one session: what is being looked at and when its
/// board was last refreshed.
#[derive(Debug)]
pub struct View<'a> {
    timetable: &'a Timetable,
    target: Target,
    last_board: Option<NaiveTime>,
}

impl<'a> View<'a> {
    pub fn new(timetable: &'a Timetable, target: Target) -> Self {
        Self {
            timetable,
            target,
            last_board: None,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Switches to a new target; its board is computed on the next tick.
    pub fn retarget(&mut self, target: Target) {
        log::debug!("view retargeted from {:?} to {:?}", self.target, target);
        self.target = target;
        self.last_board = None;
    }

    fn board_due(&self, now: NaiveTime) -> bool {
        match self.last_board {
            None => true,
            // A clock that went backwards has crossed midnight.
            Some(last) => {
                let since = now.signed_duration_since(last);
                since < TimeDelta::zero() || since >= BOARD_REFRESH
            }
        }
    }

    pub fn tick(&mut self, now: NaiveTime) -> Frame<'a> {
        let timetable = self.timetable;
        let now_minute = TimeOfDay::from(now);

        let window_now = find_active_window(&timetable.calendar.slots, now_minute);
        let resolution_now =
            direction::resolve(&timetable.settings, &timetable.route, window_now.as_ref());
        let position = project_position(
            &timetable.route,
            resolution_now,
            &timetable.settings,
            window_now.as_ref(),
            TimeOfDay::fractional_minutes(now),
        );

        let board = if self.board_due(now) {
            self.last_board = Some(now);
            let start = match self.target {
                Target::Live => now_minute,
                Target::At(start) => start,
            };
            log::debug!("recomputing board from {start}");
            Some(estimate(timetable, start))
        } else {
            None
        };

        Frame {
            clock: now,
            window_now,
            position,
            board,
        }
    }
}
