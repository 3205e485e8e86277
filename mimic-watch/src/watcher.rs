//! The watch loop.

use std::path::Path;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::args::parse_list_line;
use crate::discover::watched_dirs;
use crate::list::ListFile;
use crate::regenerate::{Outcome, Regenerate};
use crate::target::WatchTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Scanning,
    Generating,
    Canceled,
}

/// Counts for one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub dirs: usize,
    pub lists_created: usize,
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Keeps the mocks of every watch target up to date.
pub struct Watcher<R> {
    targets: Vec<WatchTarget>,
    regenerator: R,
    state: WatchState,
}

impl<R: Regenerate> Watcher<R> {
    pub fn new(regenerator: R, targets: Vec<WatchTarget>) -> Self {
        Self {
            targets,
            regenerator,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Tick every `period` until `cancel` turns true or its sender is dropped.
    ///
    /// Cancellation is only observed between ticks.
    pub async fn run(&mut self, period: Duration, mut cancel: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            targets = self.targets.len(),
            period_ms = period.as_millis() as u64,
            "watching"
        );

        while !*cancel.borrow() {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.tick();
                }
            }
        }

        self.state = WatchState::Canceled;
        tracing::info!("watch stopped");
    }

    /// Scan every target and regenerate each listed entry.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let Self {
            targets,
            regenerator,
            state,
        } = self;

        for target in targets.iter_mut() {
            *state = WatchState::Scanning;
            let dirs = match watched_dirs(&target.path, target.recursive) {
                Ok(dirs) => dirs,
                Err(e) => {
                    tracing::warn!(path = %target.path.display(), error = %e, "cannot scan watch target");
                    continue;
                }
            };

            let mut seen = Vec::new();
            for dir in dirs {
                report.dirs += 1;
                let list = ListFile::new(&dir, &target.list_file);
                match list.ensure() {
                    Ok(true) => report.lists_created += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot create list file");
                        continue;
                    }
                }
                let entries = match list.read() {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot read list file");
                        continue;
                    }
                };

                *state = WatchState::Generating;
                for entry in entries {
                    regenerate_line(regenerator, target, &dir, &entry.text, &mut report);
                    seen.push((dir.clone(), entry.text));
                }
                *state = WatchState::Scanning;
            }
            target.retain_lines(&seen);
        }

        *state = WatchState::Idle;
        tracing::debug!(
            dirs = report.dirs,
            written = report.written,
            unchanged = report.unchanged,
            failed = report.failed,
            "tick finished"
        );
        report
    }
}

fn regenerate_line<R: Regenerate>(
    regenerator: &R,
    target: &mut WatchTarget,
    dir: &Path,
    line: &str,
    report: &mut TickReport,
) {
    let last = target
        .line_state(dir, line)
        .and_then(|s| s.last_signature);
    let result = parse_list_line(line)
        .and_then(|args| args.to_request(dir))
        .and_then(|request| regenerator.regenerate(&request, last));

    let state = target.line_state_mut(dir, line);
    match result {
        Ok(outcome) => {
            match outcome {
                Outcome::Written(_) => {
                    report.written += 1;
                    tracing::info!(dir = %dir.display(), line, "regenerated");
                }
                Outcome::Unchanged(_) => report.unchanged += 1,
            }
            state.last_signature = Some(outcome.signature());
            state.last_error = None;
        }
        Err(e) => {
            report.failed += 1;
            let message = e.to_string();
            if state.last_error.as_deref() != Some(message.as_str()) {
                tracing::error!(dir = %dir.display(), line, error = %message, "generation failed");
            }
            state.last_error = Some(message);
        }
    }
}
