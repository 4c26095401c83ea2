//! Single line progress display.
//!
//! The [`ProgressReporter`] redraws its line once per second and whenever an item completes.
//! Completions arriving faster than the terminal can keep up with are coalesced into a single
//! redraw, so bursts never tear the line and never slow the download tasks down.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;
use once_cell::sync::OnceCell;
use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::progress::ProgressListener;

const RENDER_TICK: Duration = Duration::from_secs(1);

const LINE_TEMPLATE: &str = "{msg}";

/// Lifecycle of a [`ProgressReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    Unstarted,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct ProgressReporter {
    total: AtomicU64,
    completed: AtomicU64,
    last_name: Mutex<String>,
    nudge: Notify,
    state: Mutex<ReporterState>,
    started_at: OnceCell<Instant>,
    redraws: AtomicU64,
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Creates a reporter drawing on stderr.
    pub fn new(total: u64) -> Self {
        Self::with_draw_target(total, ProgressDrawTarget::stderr())
    }

    /// Same as `new`, but draws to `target` instead. Tests use `ProgressDrawTarget::hidden()`.
    pub fn with_draw_target(total: u64, target: ProgressDrawTarget) -> Self {
        let style =
            ProgressStyle::with_template(LINE_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::with_draw_target(None, target).with_style(style);

        Self {
            total: AtomicU64::new(total),
            completed: AtomicU64::new(0),
            last_name: Mutex::new(String::new()),
            nudge: Notify::new(),
            state: Mutex::new(ReporterState::Unstarted),
            started_at: OnceCell::new(),
            redraws: AtomicU64::new(0),
            bar,
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn last_name(&self) -> String {
        self.lock_name().clone()
    }

    pub fn state(&self) -> ReporterState {
        *self.lock_state()
    }

    /// How many times the line was drawn so far.
    pub fn redraws(&self) -> u64 {
        self.redraws.load(Ordering::SeqCst)
    }

    /// Formats the status line: elapsed time, `completed/total` and the latest item.
    pub fn status_line(&self) -> String {
        let elapsed = self
            .started_at
            .get()
            .map(Instant::elapsed)
            .unwrap_or_default();

        format!(
            "{} {}/{} {}",
            format_elapsed(elapsed),
            self.completed(),
            self.total(),
            self.lock_name()
        )
    }

    /// Draws the status line over the previous one.
    pub fn render(&self) {
        self.bar.set_message(self.status_line());
        self.bar.tick();
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn lock_name(&self) -> MutexGuard<'_, String> {
        self.last_name.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_state(&self) -> MutexGuard<'_, ReporterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProgressListener for ProgressReporter {
    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn add(&self, name: &str) {
        {
            let mut last = self.lock_name();
            last.clear();
            last.push_str(name);
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        // Stores at most one pending permit, extra nudges are dropped.
        self.nudge.notify_one();
    }

    async fn start(&self, stop: CancellationToken) {
        {
            let mut state = self.lock_state();
            if *state != ReporterState::Unstarted {
                debug!("Progress reporter already started, ignoring");
                return;
            }
            *state = ReporterState::Running;
        }

        self.started_at.get_or_init(Instant::now);

        let mut ticker = interval(RENDER_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => self.render(),
                _ = self.nudge.notified() => self.render(),
            }
        }

        self.clear();
        *self.lock_state() = ReporterState::Stopped;
    }

    fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Formats `elapsed` rounded to the second, e.g. `45s`, `1m5s` or `2h0m13s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = (elapsed.as_millis() + 500) / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
