use crate::{
    board::start_index,
    data::{Route, Settings, Stop},
    direction::Resolution,
    window::ActiveWindow,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Restricted to the day's windows and none is running.
    Hidden,
    /// Fraction of the track in `[0, 1)`, measured from the start stop.
    Along(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Dwell { slot: usize, minutes: u32 },
    Leg { slot: usize, minutes: u32 },
}

impl Segment {
    fn minutes(&self) -> u32 {
        match self {
            Segment::Dwell { minutes, .. } | Segment::Leg { minutes, .. } => *minutes,
        }
    }
}

/// One full loop from `start_idx`: each stop's dwell (if any), then the leg
/// leaving it. `slot` is the stop's place in the walk.
fn loop_segments(ordered: &[&Stop], start_idx: usize, leg_minutes: u32) -> Vec<Segment> {
    let n = ordered.len();
    let mut segments = Vec::with_capacity(2 * n);
    for slot in 0..n {
        let stop = ordered[(start_idx + slot) % n];
        if stop.dwell_minutes > 0 {
            segments.push(Segment::Dwell {
                slot,
                minutes: stop.dwell_minutes,
            });
        }
        segments.push(Segment::Leg {
            slot,
            minutes: leg_minutes,
        });
    }
    segments
}

/// Stops sit evenly on the track; the marker holds still at a stop while
/// dwelling and moves linearly along each leg.
fn track_fraction(segments: &[Segment], stop_count: usize, t: f64) -> f64 {
    if stop_count == 0 {
        return 0.0;
    }
    let mut elapsed = 0.0;
    for segment in segments {
        let length = f64::from(segment.minutes());
        if length == 0.0 {
            continue;
        }
        if t < elapsed + length {
            let (slot, progress) = match *segment {
                Segment::Dwell { slot, .. } => (slot, 0.0),
                Segment::Leg { slot, .. } => (slot, (t - elapsed) / length),
            };
            return (slot as f64 + progress) / stop_count as f64;
        }
        elapsed += length;
    }
    0.0
}

/// Shuttle position for the track marker, or `None` outside loop mode.
/// `now` is minutes since midnight, fractions allowed.
pub fn project_position(
    route: &Route,
    resolution: Resolution,
    settings: &Settings,
    active: Option<&ActiveWindow>,
    now: f64,
) -> Option<Position> {
    if !settings.loop_enabled {
        return None;
    }
    if settings.constrain_to_today_slots && active.is_none() {
        return Some(Position::Hidden);
    }

    let ordered = route.ordered(resolution.forward);
    let start_idx = start_index(&ordered, resolution.base_sequence);
    let segments = loop_segments(&ordered, start_idx, settings.mean_leg_minutes);

    let cycle = segments
        .iter()
        .map(|segment| u64::from(segment.minutes()))
        .sum::<u64>()
        .max(1);
    let t = now.rem_euclid(cycle as f64);

    Some(Position::Along(track_fraction(&segments, ordered.len(), t)))
}
