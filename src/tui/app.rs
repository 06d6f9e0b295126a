//! Application state for the live view.

use std::time::{Duration, Instant};

use crate::config::TrackerConfig;
use crate::core::Clock;
use crate::error::ReadtimeError;
use crate::features::tracker::{
    format_duration, ConfirmOutcome, DismissOutcome, Interval, Session, StartOutcome,
    StatusSnapshot, StopOutcome, TimerPhase, Tracker,
};
use crate::storage::KeyValueStore;

/// Checkbox list of break activities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakPrompt {
    /// Offered labels.
    pub options: Vec<String>,
    /// Checkbox state per label.
    pub checked: Vec<bool>,
    /// Highlighted row.
    pub selected: usize,
    /// Length of the break when the prompt opened.
    pub break_seconds: i64,
}

impl BreakPrompt {
    /// Open a prompt with nothing checked.
    #[must_use]
    pub fn new(options: Vec<String>, break_seconds: i64) -> Self {
        let checked = vec![false; options.len()];
        Self {
            options,
            checked,
            selected: 0,
            break_seconds,
        }
    }

    /// Move the highlight down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    /// Move the highlight up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Flip the highlighted checkbox.
    pub fn toggle(&mut self) {
        if let Some(checked) = self.checked.get_mut(self.selected) {
            *checked = !*checked;
        }
    }

    /// Checked labels in list order.
    #[must_use]
    pub fn chosen(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(label, _)| label.clone())
            .collect()
    }
}

/// Application state.
pub struct App<S, C> {
    tracker: Tracker<S, C>,
    /// Open break prompt.
    pub prompt: Option<BreakPrompt>,
    /// Feedback shown in the status bar.
    pub message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    activities: Vec<String>,
    bell_enabled: bool,
    bell_pending: bool,
    just_stopped: bool,
    tick: Interval,
    rollover: Interval,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    /// Create a new app around a loaded tracker.
    #[must_use]
    pub fn new(tracker: Tracker<S, C>, config: &TrackerConfig, bell: bool, now: Instant) -> Self {
        Self {
            tracker,
            prompt: None,
            message: Some("Press ? for help".to_string()),
            should_quit: false,
            activities: config.activities.clone(),
            bell_enabled: bell,
            bell_pending: false,
            just_stopped: false,
            tick: Interval::new(Duration::from_millis(config.tick_millis.max(1)), now),
            rollover: Interval::new(Duration::from_secs(config.rollover_poll_secs.max(1)), now),
        }
    }

    /// Current tracker status.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.tracker.status()
    }

    /// Today's history list.
    #[must_use]
    pub fn todays_sessions(&self) -> &[Session] {
        self.tracker.todays_sessions()
    }

    /// Headline for the current phase.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self.tracker.phase() {
            TimerPhase::Idle => "Ready",
            TimerPhase::Reading { .. } => "Reading in progress...",
            TimerPhase::OnBreakPendingConfirmation { .. } if self.just_stopped => {
                "Session completed"
            }
            TimerPhase::OnBreakPendingConfirmation { .. } => "On break",
        }
    }

    /// Start reading, or open the break prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn start(&mut self) -> Result<(), ReadtimeError> {
        match self.tracker.start()? {
            StartOutcome::Started { .. } => {
                self.just_stopped = false;
                self.message = None;
                self.ring();
            }
            StartOutcome::AlreadyReading { .. } => {
                self.message = Some("Already reading".to_string());
            }
            StartOutcome::BreakConfirmationRequired { break_seconds, .. } => {
                self.prompt = Some(BreakPrompt::new(self.activities.clone(), break_seconds));
                self.message = Some("What did you do during your break?".to_string());
            }
        }
        Ok(())
    }

    /// Stop reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn stop(&mut self) -> Result<(), ReadtimeError> {
        match self.tracker.stop()? {
            StopOutcome::Stopped { .. } => {
                self.just_stopped = true;
                self.message = None;
                self.ring();
            }
            StopOutcome::NotReading => {
                self.message = Some("Not reading".to_string());
            }
        }
        Ok(())
    }

    /// Record the break with the checked activities and resume reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn confirm_prompt(&mut self) -> Result<(), ReadtimeError> {
        let Some(prompt) = self.prompt.take() else {
            return Ok(());
        };

        if let ConfirmOutcome::Resumed { .. } = self.tracker.confirm_break(prompt.chosen())? {
            self.just_stopped = false;
            self.message = Some("Reading resumed...".to_string());
            self.ring();
        }
        Ok(())
    }

    /// Close the prompt and forget the selection.
    pub fn dismiss_prompt(&mut self) {
        if self.prompt.take().is_none() {
            return;
        }

        // Nothing is recorded; the break stays pending
        self.message = Some(match self.tracker.dismiss_break() {
            DismissOutcome::Dismissed { break_seconds } => format!(
                "Break not recorded yet ({} so far)",
                format_duration(break_seconds)
            ),
            DismissOutcome::NoBreakPending => "No break pending".to_string(),
        });
    }

    /// Run the periodic work due at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rollover cannot be persisted.
    pub fn on_tick(&mut self, now: Instant) -> Result<(), ReadtimeError> {
        // The display refreshes every pass; only restart the tick period
        self.tick.due(now);

        if self.rollover.due(now) && self.tracker.check_rollover()?.is_some() {
            self.message = Some("New day: totals reset".to_string());
        }
        Ok(())
    }

    /// How long the event loop may wait before the next periodic job.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.tick.remaining(now).min(self.rollover.remaining(now))
    }

    /// Take the pending bell, if any.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    fn ring(&mut self) {
        if self.bell_enabled {
            self.bell_pending = true;
        }
    }
}
