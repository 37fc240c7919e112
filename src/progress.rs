use colored::*;
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Receives progress ticks while a background operation is running.
pub trait ProgressSink {
    fn tick(&mut self);

    /// Called once, after the operation completed and before its result is returned.
    fn finish(&mut self) {}
}

/// Prints a label followed by one dot per tick.
pub struct DotProgress {
    started: bool,
    label: String,
}

impl DotProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            started: false,
            label: label.into(),
        }
    }

    fn ensure_started(&mut self) {
        if !self.started {
            print!("{}", self.label.cyan());
            self.started = true;
        }
    }
}

impl ProgressSink for DotProgress {
    fn tick(&mut self) {
        self.ensure_started();
        print!("{}", ".".cyan());
        let _ = io::stdout().flush();
    }

    fn finish(&mut self) {
        if self.started {
            println!();
        }
    }
}

/// Ticks nothing. Used when another channel already shows progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&mut self) {}
}

/// Drive `operation` to completion while ticking `sink` every `every`.
///
/// The first tick fires one interval after the start. Completion is checked
/// before each tick, so no tick is emitted once the operation has finished.
pub async fn with_progress<F, S>(operation: F, every: Duration, sink: &mut S) -> F::Output
where
    F: Future,
    S: ProgressSink + ?Sized,
{
    tokio::pin!(operation);
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let output = loop {
        tokio::select! {
            biased;
            output = &mut operation => break output,
            _ = ticker.tick() => sink.tick(),
        }
    };

    sink.finish();
    output
}
