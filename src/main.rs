use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
};

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    time::TimeOfDay,
    timetable::Timetable,
    view::{Target, View, CLOCK_TICK},
};

mod board;
mod data;
mod direction;
mod error;
mod feed;
mod position;
mod render;
mod time;
mod timetable;
mod view;
mod window;

/// Projects arrival times along the shuttle route.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding route.csv, settings.json and calendar.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Start the board at this time (HH:MM) instead of now.
    #[arg(long)]
    at: Option<TimeOfDay>,
    /// Calendar day to use (YYYY-MM-DD), today by default.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Width of the position track, in columns.
    #[arg(long, default_value_t = 40)]
    track_width: usize,
    /// Keep refreshing the clock and board; typing HH:MM or `now` retargets it.
    #[arg(long)]
    watch: bool,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let started = Local::now();
    let date = args.date.unwrap_or_else(|| started.date_naive());
    let timetable = Timetable::load(&args.data_dir, date);

    let target = args.at.map_or(Target::Live, Target::At);
    let mut view = View::new(&timetable, target);

    let mut out = io::stdout().lock();
    render::route_listing(&mut out, &timetable.route, &timetable.settings)?;
    writeln!(out, "{}", render::settings_summary(&timetable.settings))?;

    let first = view.tick(Local::now().time());
    render::calendar_header(&mut out, &timetable.calendar, first.window_now.as_ref())?;
    render::frame(&mut out, &first, args.track_width)?;

    if !args.watch {
        return Ok(());
    }

    log::info!("Watching {:?} from {}", view.target(), started.to_rfc3339());
    let targets = spawn_target_reader();
    loop {
        match targets.recv_timeout(CLOCK_TICK) {
            Ok(line) => match line.parse::<Target>() {
                Ok(target) => view.retarget(target),
                Err(e) => log::warn!("{e}; type HH:MM or now"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            // stdin closed; keep ticking on the current target.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(CLOCK_TICK),
        }
        let frame = view.tick(Local::now().time());
        render::frame(&mut out, &frame, args.track_width)?;
        out.flush()?;
    }
}

/// Forwards each stdin line so a new board target can supersede the current one.
fn spawn_target_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}
