use std::io::{self, Write};

use itertools::Itertools;

use crate::{
    board::BoardOutcome,
    data::{Calendar, Route, Settings},
    position::Position,
    time::clock_label,
    view::{Frame, Snapshot},
    window::ActiveWindow,
};

pub const TRUNCATED_NOTICE: &str = "Calculation limited to the end of the current window.";
pub const OUT_OF_SERVICE_NOTICE: &str =
    "The shuttle is out of service at this time (outside today's windows).";

pub fn route_listing(out: &mut impl Write, route: &Route, settings: &Settings) -> io::Result<()> {
    if route.is_empty() {
        return writeln!(out, "No stops configured.");
    }
    for stop in route.stops() {
        let badge = if settings.display_base_stop_sequence == Some(stop.sequence) {
            " [start]"
        } else {
            ""
        };
        writeln!(out, "{}{badge}  +{} min", stop.name, stop.dwell_minutes)?;
        if let Some(note) = &stop.note {
            writeln!(out, "    {note}")?;
        }
    }
    Ok(())
}

pub fn calendar_header(
    out: &mut impl Write,
    calendar: &Calendar,
    window_now: Option<&ActiveWindow>,
) -> io::Result<()> {
    let Some(date) = calendar.date else {
        return Ok(());
    };
    let mut header = calendar
        .label
        .clone()
        .unwrap_or_else(|| date.format("%d/%m/%Y").to_string());
    if let Some(note) = &calendar.note {
        header.push_str(&format!(" - {note}"));
    }
    if let Some(active) = window_now {
        header.push_str(&format!(
            " - service running: {} - {}",
            clock_label(active.start),
            clock_label(active.end)
        ));
    }
    writeln!(out, "{header}")?;

    for slot in &calendar.slots {
        write!(
            out,
            "  {} - {} · {} <-> {}",
            slot.start_time, slot.end_time, slot.from_location, slot.to_location
        )?;
        match &slot.note {
            Some(note) => writeln!(out, " [{note}]")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

pub fn settings_summary(settings: &Settings) -> String {
    let mut parts = vec![
        format!("~{} min between stops", settings.mean_leg_minutes),
        "dwell per stop".to_owned(),
        if settings.loop_enabled { "loop mode" } else { "no loop" }.to_owned(),
        if settings.bidirectional_enabled {
            "bidirectional"
        } else {
            "one way"
        }
        .to_owned(),
    ];
    if settings.bidirectional_enabled {
        parts.push(format!("showing {}", settings.display_direction));
    }
    if let Some(seq) = settings.display_base_stop_sequence {
        parts.push(format!("starting at sequence {seq}"));
    }
    if settings.constrain_to_today_slots {
        parts.push("limited to today's windows".to_owned());
    }
    format!("Settings: {}", parts.iter().join(", "))
}

pub fn board(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    let board = match &snapshot.outcome {
        BoardOutcome::OutOfService => return writeln!(out, "{OUT_OF_SERVICE_NOTICE}"),
        BoardOutcome::Ready(board) => board,
    };
    let width = board
        .arrivals
        .iter()
        .map(|arrival| arrival.stop.name.chars().count())
        .max()
        .unwrap_or(0);
    for arrival in &board.arrivals {
        writeln!(out, "{:<width$}  {}", arrival.stop.name, arrival.time_of_day())?;
    }
    if board.truncated {
        writeln!(out, "{TRUNCATED_NOTICE}")?;
    }
    Ok(())
}

/// Column of the marker on a track `track_width` wide.
pub fn marker_offset(fraction: f64, track_width: usize) -> usize {
    let x = (fraction.clamp(0.0, 1.0) * track_width as f64).floor() as usize;
    x.min(track_width.saturating_sub(1))
}

pub fn marker(out: &mut impl Write, position: Position, track_width: usize) -> io::Result<()> {
    match position {
        Position::Hidden => writeln!(out, "Shuttle not running."),
        Position::Along(fraction) => {
            let x = marker_offset(fraction, track_width);
            let track: String = (0..track_width)
                .map(|col| if col == x { '*' } else { '-' })
                .collect();
            writeln!(out, "[{track}]")
        }
    }
}

pub fn frame(out: &mut impl Write, frame: &Frame, track_width: usize) -> io::Result<()> {
    writeln!(out, "{}", frame.clock.format("%H:%M:%S"))?;
    if let Some(position) = frame.position {
        marker(out, position, track_width)?;
    }
    if let Some(snapshot) = &frame.board {
        match &snapshot.window {
            Some(active) => writeln!(
                out,
                "Board from {} (window {} - {})",
                snapshot.start,
                clock_label(active.start),
                clock_label(active.end)
            )?,
            None => writeln!(out, "Board from {}", snapshot.start)?,
        }
        board(out, snapshot)?;
    }
    Ok(())
}
