use crate::{
    data::{Route, Sequence, Settings, Stop},
    direction::Resolution,
    time::TimeOfDay,
    window::ActiveWindow,
};

/// Projected arrival at one stop. `minute` counts from the midnight that
/// started the computation and may run past the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival<'a> {
    pub stop: &'a Stop,
    pub minute: u32,
}

impl Arrival<'_> {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.minute)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board<'a> {
    pub arrivals: Vec<Arrival<'a>>,
    /// Set when the board stopped early at the end of the running window.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardOutcome<'a> {
    /// Service is restricted to the day's windows and none is running.
    OutOfService,
    Ready(Board<'a>),
}

/// Index of `base_sequence` in `ordered`, falling back to the first stop.
pub fn start_index(ordered: &[&Stop], base_sequence: Option<Sequence>) -> usize {
    base_sequence
        .and_then(|seq| ordered.iter().position(|stop| stop.sequence == seq))
        .unwrap_or(0)
}

/// Walks the route from the resolved start, accumulating leg and dwell time
/// from `start`.
pub fn compute_board<'a>(
    route: &'a Route,
    resolution: Resolution,
    settings: &Settings,
    active: Option<&ActiveWindow>,
    start: TimeOfDay,
) -> BoardOutcome<'a> {
    if route.is_empty() {
        return BoardOutcome::Ready(Board::default());
    }

    let window_end = match active {
        Some(active) if settings.constrain_to_today_slots => Some(active.end),
        None if settings.constrain_to_today_slots => return BoardOutcome::OutOfService,
        _ => None,
    };

    let ordered = route.ordered(resolution.forward);
    let n = ordered.len();
    let start_idx = start_index(&ordered, resolution.base_sequence);

    let mut board = Board::default();
    let mut clock = start.minutes();

    for k in 0..n {
        let idx = if settings.loop_enabled {
            (start_idx + k) % n
        } else {
            start_idx + k
        };
        if idx >= n {
            break;
        }

        if k > 0 {
            clock = clock.saturating_add(settings.mean_leg_minutes);
        }
        let stop = ordered[idx];
        clock = clock.saturating_add(stop.dwell_minutes);

        if window_end.is_some_and(|end| clock > end) {
            log::debug!(
                "stopping board before {:?}: {} is past the window end",
                stop.name,
                TimeOfDay::from_minutes(clock)
            );
            board.truncated = true;
            break;
        }

        board.arrivals.push(Arrival {
            stop,
            minute: clock,
        });
    }

    BoardOutcome::Ready(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::fixtures::{route, window},
        window::find_active_window,
    };

    const FORWARD: Resolution = Resolution {
        forward: true,
        base_sequence: None,
    };

    fn ready(outcome: BoardOutcome<'_>) -> Board<'_> {
        match outcome {
            BoardOutcome::Ready(board) => board,
            BoardOutcome::OutOfService => panic!("expected a board, got out of service"),
        }
    }

    fn rows(board: &Board) -> Vec<(String, String)> {
        board
            .arrivals
            .iter()
            .map(|a| (a.stop.name.to_owned(), a.time_of_day().to_string()))
            .collect()
    }

    fn pair(name: &str, time: &str) -> (String, String) {
        (name.to_owned(), time.to_owned())
    }

    #[test]
    fn test_leg_and_dwell_accumulate() {
        let route = route(&[(1, "A", 0), (2, "B", 5)]);
        let settings = Settings {
            mean_leg_minutes: 10,
            ..Settings::default()
        };
        let board = ready(compute_board(
            &route,
            FORWARD,
            &settings,
            None,
            TimeOfDay::hm(8, 0),
        ));
        assert_eq!(rows(&board), [pair("A", "08:00"), pair("B", "08:15")]);
        assert!(!board.truncated);
    }

    #[test]
    fn test_truncates_at_window_end() {
        let route = route(&[(1, "A", 0), (2, "B", 5)]);
        let settings = Settings {
            mean_leg_minutes: 10,
            constrain_to_today_slots: true,
            ..Settings::default()
        };
        let slots = [window("08:00", "08:10", "X", "Y")];
        let active = find_active_window(&slots, TimeOfDay::hm(8, 0));
        let board = ready(compute_board(
            &route,
            FORWARD,
            &settings,
            active.as_ref(),
            TimeOfDay::hm(8, 0),
        ));
        assert_eq!(rows(&board), [pair("A", "08:00")]);
        assert!(board.truncated);
    }

    #[test]
    fn test_arrival_on_window_end_is_kept() {
        let route = route(&[(1, "A", 0), (2, "B", 0)]);
        let settings = Settings {
            mean_leg_minutes: 10,
            constrain_to_today_slots: true,
            ..Settings::default()
        };
        let slots = [window("08:00", "08:10", "X", "Y")];
        let active = find_active_window(&slots, TimeOfDay::hm(8, 0));
        let board = ready(compute_board(
            &route,
            FORWARD,
            &settings,
            active.as_ref(),
            TimeOfDay::hm(8, 0),
        ));
        assert_eq!(board.arrivals.len(), 2);
        assert!(!board.truncated);
    }

    #[test]
    fn test_huge_leg_and_dwell_saturate() {
        let route = route(&[(1, "A", 0), (2, "B", u32::MAX), (3, "C", u32::MAX)]);
        let settings = Settings {
            mean_leg_minutes: u32::MAX,
            ..Settings::default()
        };
        let board = ready(compute_board(
            &route,
            FORWARD,
            &settings,
            None,
            TimeOfDay::hm(8, 0),
        ));
        let minutes: Vec<u32> = board.arrivals.iter().map(|a| a.minute).collect();
        assert_eq!(minutes, [480, u32::MAX, u32::MAX]);

        let constrained = Settings {
            constrain_to_today_slots: true,
            ..settings
        };
        let slots = [window("08:00", "24:00", "X", "Y")];
        let active = find_active_window(&slots, TimeOfDay::hm(8, 0));
        let board = ready(compute_board(
            &route,
            FORWARD,
            &constrained,
            active.as_ref(),
            TimeOfDay::hm(8, 0),
        ));
        assert_eq!(rows(&board), [pair("A", "08:00")]);
        assert!(board.truncated);
    }

    #[test]
    fn test_window_ending_at_midnight_allows_last_minute() {
        let route = route(&[(1, "A", 0), (2, "B", 0), (3, "C", 0)]);
        let settings = Settings {
            mean_leg_minutes: 10,
            constrain_to_today_slots: true,
            ..Settings::default()
        };
        let slots = [window("20:00", "24:00", "X", "Y")];
        let active = find_active_window(&slots, TimeOfDay::hm(23, 40));
        let board = ready(compute_board(
            &route,
            FORWARD,
            &settings,
            active.as_ref(),
            TimeOfDay::hm(23, 40),
        ));
        assert_eq!(
            rows(&board),
            [pair("A", "23:40"), pair("B", "23:50"), pair("C", "00:00")]
        );
        assert!(!board.truncated);
    }

    #[test]
    fn test_out_of_service_when_constrained_without_window() {
        let route = route(&[(1, "A", 0)]);
        let settings = Settings {
            constrain_to_today_slots: true,
            ..Settings::default()
        };
        let outcome = compute_board(&route, FORWARD, &settings, None, TimeOfDay::hm(3, 0));
        assert_eq!(outcome, BoardOutcome::OutOfService);
    }

    #[test]
    fn test_window_ignored_without_constraint() {
        let route = route(&[(1, "A", 0), (2, "B", 30)]);
        let slots = [window("08:00", "08:10", "X", "Y")];
        let active = find_active_window(&slots, TimeOfDay::hm(8, 0));
        let board = ready(compute_board(
            &route,
            FORWARD,
            &Settings::default(),
            active.as_ref(),
            TimeOfDay::hm(8, 0),
        ));
        assert_eq!(board.arrivals.len(), 2);
        assert!(!board.truncated);
    }

    #[test]
    fn test_empty_route() {
        let route = route(&[]);
        let settings = Settings {
            constrain_to_today_slots: true,
            ..Settings::default()
        };
        let board = ready(compute_board(&route, FORWARD, &settings, None, TimeOfDay::hm(8, 0)));
        assert!(board.arrivals.is_empty());
        assert!(!board.truncated);
    }

    #[test]
    fn test_non_loop_stops_at_route_end() {
        let route = route(&[(1, "A", 1), (2, "B", 0), (4, "C", 2), (7, "D", 0)]);
        let settings = Settings::default();
        for (start_idx, seq) in [1, 2, 4, 7].into_iter().enumerate() {
            let resolution = Resolution {
                forward: true,
                base_sequence: Some(seq),
            };
            let board = ready(compute_board(
                &route,
                resolution,
                &settings,
                None,
                TimeOfDay::hm(23, 50),
            ));
            assert_eq!(board.arrivals.len(), route.len() - start_idx);
            assert!(board
                .arrivals
                .windows(2)
                .all(|pair| pair[0].minute <= pair[1].minute));
        }
    }

    #[test]
    fn test_loop_wraps_and_visits_each_stop_once() {
        let route = route(&[(1, "A", 0), (2, "B", 0), (3, "C", 0)]);
        let settings = Settings {
            loop_enabled: true,
            mean_leg_minutes: 0,
            ..Settings::default()
        };
        let resolution = Resolution {
            forward: true,
            base_sequence: Some(3),
        };
        let board = ready(compute_board(
            &route,
            resolution,
            &settings,
            None,
            TimeOfDay::hm(12, 0),
        ));
        let sequences: Vec<i64> = board.arrivals.iter().map(|a| a.stop.sequence).collect();
        assert_eq!(sequences, [3, 1, 2]);
        assert!(board.arrivals.iter().all(|a| a.minute == 720));
    }

    #[test]
    fn test_backward_with_unknown_base_starts_at_first_ordered_stop() {
        let route = route(&[(1, "A", 0), (2, "B", 0), (3, "C", 0)]);
        let resolution = Resolution {
            forward: false,
            base_sequence: Some(42),
        };
        let board = ready(compute_board(
            &route,
            resolution,
            &Settings::default(),
            None,
            TimeOfDay::hm(9, 0),
        ));
        assert_eq!(
            rows(&board),
            [pair("C", "09:00"), pair("B", "09:05"), pair("A", "09:10")]
        );
    }

    #[test]
    fn test_arrivals_run_past_midnight() {
        let route = route(&[(1, "A", 0), (2, "B", 0)]);
        let board = ready(compute_board(
            &route,
            FORWARD,
            &Settings::default(),
            None,
            TimeOfDay::hm(23, 58),
        ));
        assert_eq!(board.arrivals[1].minute, 1443);
        assert_eq!(board.arrivals[1].time_of_day().to_string(), "00:03");
    }

    #[test]
    fn test_idempotent() {
        let route = route(&[(1, "A", 2), (2, "B", 3), (3, "C", 1)]);
        let settings = Settings {
            loop_enabled: true,
            ..Settings::default()
        };
        let resolution = Resolution {
            forward: false,
            base_sequence: Some(2),
        };
        let first = compute_board(&route, resolution, &settings, None, TimeOfDay::hm(7, 7));
        let second = compute_board(&route, resolution, &settings, None, TimeOfDay::hm(7, 7));
        assert_eq!(first, second);
    }
}
