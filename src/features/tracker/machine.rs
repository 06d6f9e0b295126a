//! The reading/break state machine.
//!
//! A [`Tracker`] owns the record, the store it persists to and the clock it
//! reads. Every transition that changes the record writes it back with a
//! single `set`, so the store never holds a half-applied transition.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::rollover::{self, RolloverPolicy};
use super::session::{normalize_activities, truncate_to_millis, Session};
use super::state::{RunningTotals, SessionLog, TimerPhase, TrackerState, STATE_KEY};
use crate::core::{day_of, Clock};
use crate::error::ReadtimeError;
use crate::storage::KeyValueStore;

/// Result of [`Tracker::start`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    /// A reading session began.
    Started {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
    },
    /// A session was already running; nothing changed.
    AlreadyReading {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
    },
    /// A break from earlier today must be confirmed first.
    BreakConfirmationRequired {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
        break_seconds: i64,
    },
}

/// Result of [`Tracker::stop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StopOutcome {
    /// The session was recorded and the break clock started.
    Stopped {
        session: Session,
        totals: RunningTotals,
    },
    /// Nothing was running.
    NotReading,
}

/// Result of [`Tracker::confirm_break`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    /// The break was recorded and reading resumed.
    Resumed {
        session: Session,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
    },
    /// No break was waiting.
    NoBreakPending,
}

/// Result of [`Tracker::dismiss_break`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DismissOutcome {
    /// The prompt was closed; the break is still pending.
    Dismissed { break_seconds: i64 },
    /// No break was waiting.
    NoBreakPending,
}

/// What a daily reset cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    /// Day whose history list was cleared.
    pub previous: NaiveDate,
    /// Sessions removed from that list.
    pub cleared_sessions: usize,
    /// Reading total before the reset.
    pub reading_seconds: i64,
    /// Break total before the reset.
    pub break_seconds: i64,
}

/// Point-in-time view of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub phase: TimerPhase,
    /// Seconds into the running session.
    pub elapsed_seconds: i64,
    /// Seconds since reading stopped, while a break is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_break_seconds: Option<i64>,
    pub totals: RunningTotals,
    pub today: NaiveDate,
    /// Entries in today's history list.
    pub sessions_today: usize,
}

/// Reading/break tracker bound to a store and a clock.
pub struct Tracker<S, C> {
    store: S,
    clock: C,
    policy: RolloverPolicy,
    state: TrackerState,
}

impl<S: KeyValueStore, C: Clock> Tracker<S, C> {
    /// Load the record from `store` and apply any due rollover.
    ///
    /// A missing or unreadable record starts a fresh tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn load(store: S, clock: C, policy: RolloverPolicy) -> Result<Self, ReadtimeError> {
        let state = match store.get(STATE_KEY)? {
            Some(raw) => TrackerState::from_json(&raw),
            None => {
                debug!("no tracker record yet, starting fresh");
                TrackerState::default()
            }
        };

        let mut tracker = Self {
            store,
            clock,
            policy,
            state,
        };

        tracker.check_rollover()?;

        if let TimerPhase::Reading { since } = tracker.phase() {
            info!(
                since = %since.with_timezone(&Local),
                elapsed = tracker.elapsed(),
                "resuming reading session"
            );
        }

        Ok(tracker)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    /// Start reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn start(&mut self) -> Result<StartOutcome, ReadtimeError> {
        let now = self.now();
        let today = self.today();

        match self.phase() {
            TimerPhase::Reading { since } => {
                debug!("start ignored, already reading");
                Ok(StartOutcome::AlreadyReading { since })
            }
            TimerPhase::OnBreakPendingConfirmation { since }
                if self.state.first_start_today == Some(today) =>
            {
                let break_seconds = (now - since).num_seconds().max(0);
                info!(break_seconds, "start needs break confirmation");
                Ok(StartOutcome::BreakConfirmationRequired {
                    since,
                    break_seconds,
                })
            }
            TimerPhase::OnBreakPendingConfirmation { since } => {
                info!(stopped = %since.with_timezone(&Local), "first start of the day, dropping stale break");
                let mut next = self.state.clone();
                next.last_stop_time = None;
                begin_reading(&mut next, now, today);
                self.commit(next)?;
                info!(since = %now.with_timezone(&Local), "reading started");
                Ok(StartOutcome::Started { since: now })
            }
            TimerPhase::Idle => {
                let mut next = self.state.clone();
                begin_reading(&mut next, now, today);
                self.commit(next)?;
                info!(since = %now.with_timezone(&Local), "reading started");
                Ok(StartOutcome::Started { since: now })
            }
        }
    }

    /// Stop reading and start the break clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn stop(&mut self) -> Result<StopOutcome, ReadtimeError> {
        let TimerPhase::Reading { since } = self.phase() else {
            debug!("stop ignored, not reading");
            return Ok(StopOutcome::NotReading);
        };

        let now = self.now();
        let today = self.today();
        let session = Session::reading(since, now);

        let mut next = self.state.clone();
        next.log.record_reading(today, session.clone());
        next.total_reading_seconds += session.duration_seconds;
        next.is_reading = false;
        next.reading_start_time = None;
        next.last_stop_time = Some(now);
        self.commit(next)?;

        info!(seconds = session.duration_seconds, "reading session recorded");

        Ok(StopOutcome::Stopped {
            session,
            totals: self.totals(),
        })
    }

    /// Record the pending break with its activities and resume reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn confirm_break<I, A>(&mut self, activities: I) -> Result<ConfirmOutcome, ReadtimeError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let Some(stopped) = self.state.last_stop_time else {
            debug!("confirm ignored, no break pending");
            return Ok(ConfirmOutcome::NoBreakPending);
        };

        let now = self.now();
        let today = self.today();
        let session = Session::break_with(stopped, now, normalize_activities(activities));

        let mut next = self.state.clone();
        next.log.record_break(today, session.clone());
        next.total_break_seconds += session.duration_seconds;
        next.last_stop_time = None;
        begin_reading(&mut next, now, today);
        self.commit(next)?;

        info!(
            seconds = session.duration_seconds,
            activities = ?session.activities,
            "break recorded, reading resumed"
        );

        Ok(ConfirmOutcome::Resumed {
            session,
            since: now,
        })
    }

    /// Close the break prompt without recording anything.
    #[must_use]
    pub fn dismiss_break(&self) -> DismissOutcome {
        match self.pending_break_seconds() {
            Some(break_seconds) => {
                debug!(break_seconds, "break prompt dismissed");
                DismissOutcome::Dismissed { break_seconds }
            }
            None => DismissOutcome::NoBreakPending,
        }
    }

    /// Apply the daily reset if it is due.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn check_rollover(&mut self) -> Result<Option<RolloverReport>, ReadtimeError> {
        let mut next = self.state.clone();
        let report = self.apply_rollover(&mut next);
        if report.is_some() {
            self.commit(next)?;
        }
        Ok(report)
    }

    /// Seconds read in the running session, 0 when not reading.
    #[must_use]
    pub fn elapsed(&self) -> i64 {
        match self.phase() {
            TimerPhase::Reading { since } => (self.now() - since).num_seconds().max(0),
            _ => 0,
        }
    }

    /// Seconds since reading stopped, while a break is pending.
    #[must_use]
    pub fn pending_break_seconds(&self) -> Option<i64> {
        self.state
            .last_stop_time
            .map(|since| (self.now() - since).num_seconds().max(0))
    }

    /// Everything a status display needs.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            phase: self.phase(),
            elapsed_seconds: self.elapsed(),
            pending_break_seconds: self.pending_break_seconds(),
            totals: self.totals(),
            today: self.today(),
            sessions_today: self.todays_sessions().len(),
        }
    }

    /// Today's counters.
    #[must_use]
    pub const fn totals(&self) -> RunningTotals {
        self.state.totals()
    }

    /// Today's history list.
    #[must_use]
    pub fn todays_sessions(&self) -> &[Session] {
        self.state.log.day(self.today())
    }

    /// The history list of any day still kept.
    #[must_use]
    pub fn sessions_on(&self, date: NaiveDate) -> &[Session] {
        self.state.log.day(date)
    }

    /// All session logs.
    #[must_use]
    pub const fn log(&self) -> &SessionLog {
        &self.state.log
    }

    /// The whole record.
    #[must_use]
    pub const fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Local calendar date according to the tracker's clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        day_of(self.clock.now())
    }

    /// The active rollover policy.
    #[must_use]
    pub const fn policy(&self) -> RolloverPolicy {
        self.policy
    }

    /// The record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String, ReadtimeError> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    /// Replace the record wholesale, as an import does.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn replace_state(&mut self, mut state: TrackerState) -> Result<(), ReadtimeError> {
        state.normalize();
        self.apply_rollover(&mut state);
        self.commit(state)?;
        info!("tracker record replaced");
        Ok(())
    }

    /// Delete the record and start over.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn reset_all(&mut self) -> Result<(), ReadtimeError> {
        self.store.remove(STATE_KEY)?;
        self.state = TrackerState::default();
        info!("tracker data deleted");
        Ok(())
    }

    /// Give back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(self.clock.now().with_timezone(&Utc))
    }

    fn apply_rollover(&self, state: &mut TrackerState) -> Option<RolloverReport> {
        let now = self.clock.now();
        if !rollover::is_due(self.policy, state.last_reset_date, now) {
            return None;
        }

        let today = day_of(now);
        let previous = rollover::previous_day(state.last_reset_date, today);
        let report = RolloverReport {
            previous,
            cleared_sessions: state.log.clear_day(previous),
            reading_seconds: state.total_reading_seconds,
            break_seconds: state.total_break_seconds,
        };

        state.total_reading_seconds = 0;
        state.total_break_seconds = 0;
        state.first_start_today = None;
        state.last_reset_date = Some(today);

        info!(
            %previous,
            cleared = report.cleared_sessions,
            reading_seconds = report.reading_seconds,
            break_seconds = report.break_seconds,
            "daily rollover"
        );

        Some(report)
    }

    /// Write `next` and adopt it only once the store accepted it.
    fn commit(&mut self, next: TrackerState) -> Result<(), ReadtimeError> {
        let json = serde_json::to_string(&next)?;
        self.store.set(STATE_KEY, &json)?;
        self.state = next;
        Ok(())
    }
}

fn begin_reading(state: &mut TrackerState, now: DateTime<Utc>, today: NaiveDate) {
    state.is_reading = true;
    state.reading_start_time = Some(now);
    state.first_start_today = Some(today);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{local, ManualClock};
    use crate::features::tracker::session::SessionKind;
    use crate::storage::{MemoryStore, MockKeyValueStore};
    use chrono::Duration;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn fresh(clock: &ManualClock) -> Tracker<MemoryStore, ManualClock> {
        Tracker::load(MemoryStore::default(), clock.clone(), RolloverPolicy::CatchUp).unwrap()
    }

    fn with_record(
        state: &TrackerState,
        clock: &ManualClock,
        policy: RolloverPolicy,
    ) -> Tracker<MemoryStore, ManualClock> {
        let store = MemoryStore::default();
        store
            .set(STATE_KEY, &serde_json::to_string(state).unwrap())
            .unwrap();
        Tracker::load(store, clock.clone(), policy).unwrap()
    }

    fn utc(instant: DateTime<Local>) -> DateTime<Utc> {
        instant.with_timezone(&Utc)
    }

    #[test]
    fn test_fresh_tracker_is_idle() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let tracker = fresh(&clock);

        assert_eq!(tracker.phase(), TimerPhase::Idle);
        assert_eq!(tracker.totals(), RunningTotals::default());
        assert_eq!(tracker.elapsed(), 0);
        assert_eq!(tracker.state().last_reset_date, Some(date(10)));
    }

    #[test]
    fn test_reading_total_is_sum_of_sessions() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        for millis in [100_500, 59_999, 1_200_001] {
            clock.advance(Duration::milliseconds(millis));
            tracker.stop().unwrap();
            clock.advance(Duration::seconds(30));
            tracker.confirm_break(Vec::<String>::new()).unwrap();
        }
        tracker.stop().unwrap();

        let sessions = tracker.log().reading_on(date(10));
        let sum: i64 = sessions.iter().map(|s| s.duration_seconds).sum();

        assert_eq!(sessions.len(), 4);
        assert_eq!(tracker.totals().reading_seconds, sum);
        assert_eq!(sum, 100 + 59 + 1200);
        assert_eq!(tracker.totals().break_seconds, 90);
    }

    #[test]
    fn test_double_start_changes_nothing() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        let first = tracker.start().unwrap();
        let before = tracker.state().clone();
        clock.advance(Duration::seconds(10));
        let second = tracker.start().unwrap();

        let StartOutcome::Started { since } = first else {
            panic!("expected a start");
        };
        assert_eq!(second, StartOutcome::AlreadyReading { since });
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        assert_eq!(tracker.stop().unwrap(), StopOutcome::NotReading);
        assert!(tracker.log().reading_sessions.is_empty());
        assert!(tracker.todays_sessions().is_empty());
    }

    #[test]
    fn test_break_with_two_activities() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(30));
        tracker.stop().unwrap();
        clock.advance(Duration::seconds(300));

        let outcome = tracker.confirm_break(["walk", "snack"]).unwrap();

        let ConfirmOutcome::Resumed { session, since } = outcome else {
            panic!("expected resume");
        };
        assert_eq!(session.kind, SessionKind::Break);
        assert_eq!(session.duration_seconds, 300);
        assert_eq!(session.activities, vec!["walk", "snack"]);
        assert_eq!(tracker.phase(), TimerPhase::Reading { since });

        let activities = &tracker.log().break_activities[&date(10)];
        assert_eq!(activities["walk"], 300);
        assert_eq!(activities["snack"], 300);
        assert_eq!(tracker.totals().break_seconds, 300);

        let today = tracker.todays_sessions();
        assert_eq!(today.len(), 2);
        assert!(today[1].is_break());
        assert_eq!(tracker.log().reading_on(date(10)).len(), 1);
    }

    #[test]
    fn test_start_during_break_requires_confirmation() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(5));
        tracker.stop().unwrap();
        clock.advance(Duration::seconds(120));

        let outcome = tracker.start().unwrap();

        assert!(matches!(
            outcome,
            StartOutcome::BreakConfirmationRequired {
                break_seconds: 120,
                ..
            }
        ));
        assert!(matches!(
            tracker.phase(),
            TimerPhase::OnBreakPendingConfirmation { .. }
        ));
    }

    #[test]
    fn test_first_start_of_day_never_prompts() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 21, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(45));
        tracker.stop().unwrap();

        // Next morning, without a rollover check in between
        clock.set(local(2026, 6, 11, 8, 0, 0));
        let outcome = tracker.start().unwrap();

        assert_eq!(
            outcome,
            StartOutcome::Started {
                since: utc(local(2026, 6, 11, 8, 0, 0))
            }
        );
        assert_eq!(tracker.state().last_stop_time, None);
        assert_eq!(tracker.state().first_start_today, Some(date(11)));
        assert_eq!(tracker.totals().break_seconds, 0);
    }

    #[test]
    fn test_first_start_after_rollover_never_prompts() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 21, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(45));
        tracker.stop().unwrap();

        clock.set(local(2026, 6, 11, 8, 0, 0));
        assert!(tracker.check_rollover().unwrap().is_some());

        assert!(matches!(
            tracker.start().unwrap(),
            StartOutcome::Started { .. }
        ));
    }

    #[test]
    fn test_confirm_without_pending_break() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        assert_eq!(
            tracker.confirm_break(["walk"]).unwrap(),
            ConfirmOutcome::NoBreakPending
        );
        tracker.start().unwrap();
        assert_eq!(
            tracker.confirm_break(["walk"]).unwrap(),
            ConfirmOutcome::NoBreakPending
        );
        assert!(tracker.log().break_activities.is_empty());
    }

    #[test]
    fn test_dismiss_changes_nothing() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        assert_eq!(tracker.dismiss_break(), DismissOutcome::NoBreakPending);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(10));
        tracker.stop().unwrap();
        clock.advance(Duration::seconds(45));

        let before = tracker.state().clone();
        assert_eq!(
            tracker.dismiss_break(),
            DismissOutcome::Dismissed { break_seconds: 45 }
        );
        assert_eq!(tracker.state(), &before);
        assert_eq!(tracker.pending_break_seconds(), Some(45));
    }

    #[test]
    fn test_resume_after_reload() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let state = TrackerState {
            is_reading: true,
            reading_start_time: Some(utc(clock.now() - Duration::seconds(90))),
            first_start_today: Some(date(10)),
            last_reset_date: Some(date(10)),
            ..TrackerState::default()
        };

        let tracker = with_record(&state, &clock, RolloverPolicy::CatchUp);

        assert!(matches!(tracker.phase(), TimerPhase::Reading { .. }));
        assert!(tracker.elapsed() >= 90);
    }

    #[test]
    fn test_record_survives_reload() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(20));
        tracker.stop().unwrap();
        clock.advance(Duration::minutes(5));
        tracker.confirm_break(["tea"]).unwrap();

        let saved = tracker.state().clone();
        let reloaded =
            Tracker::load(tracker.into_store(), clock.clone(), RolloverPolicy::CatchUp).unwrap();

        assert_eq!(reloaded.state(), &saved);
    }

    #[test]
    fn test_rollover_resets_day() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 8, 0, 0);
        let yesterday = utc(local(2026, 6, 9, 10, 0, 0));
        let older = utc(local(2026, 6, 8, 10, 0, 0));

        let mut state = TrackerState {
            total_reading_seconds: 600,
            total_break_seconds: 60,
            first_start_today: Some(date(9)),
            last_reset_date: Some(date(9)),
            ..TrackerState::default()
        };
        state
            .log
            .record_reading(date(8), Session::reading(older, older + Duration::minutes(10)));
        state.log.record_reading(
            date(9),
            Session::reading(yesterday, yesterday + Duration::minutes(10)),
        );
        state.log.record_break(
            date(9),
            Session::break_with(
                yesterday + Duration::minutes(10),
                yesterday + Duration::minutes(11),
                vec!["walk".to_string()],
            ),
        );

        let tracker = with_record(&state, &clock, RolloverPolicy::CatchUp);

        assert_eq!(tracker.totals(), RunningTotals::default());
        assert!(tracker.sessions_on(date(9)).is_empty());
        assert_eq!(tracker.sessions_on(date(8)).len(), 1);
        assert_eq!(tracker.log().reading_on(date(9)).len(), 1);
        assert_eq!(tracker.log().break_activities[&date(9)]["walk"], 60);
        assert_eq!(tracker.state().first_start_today, None);
        assert_eq!(tracker.state().last_reset_date, Some(date(10)));
    }

    #[test]
    fn test_rollover_report_and_idempotence() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 22, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::minutes(30));
        tracker.stop().unwrap();

        clock.set(local(2026, 6, 11, 7, 0, 0));
        let report = tracker.check_rollover().unwrap();

        assert_eq!(
            report,
            Some(RolloverReport {
                previous: date(10),
                cleared_sessions: 1,
                reading_seconds: 1800,
                break_seconds: 0,
            })
        );
        assert_eq!(tracker.check_rollover().unwrap(), None);
    }

    #[test]
    fn test_rollover_keeps_running_session() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 23, 50, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        let running = tracker.phase();
        clock.set(local(2026, 6, 11, 0, 10, 0));

        assert!(tracker.check_rollover().unwrap().is_some());
        assert_eq!(tracker.phase(), running);
        assert_eq!(tracker.elapsed(), 20 * 60);

        tracker.stop().unwrap();
        assert_eq!(tracker.log().reading_on(date(11)).len(), 1);
        assert_eq!(tracker.totals().reading_seconds, 20 * 60);
    }

    #[test]
    fn test_midnight_policy_waits_for_midnight() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let state = TrackerState {
            total_reading_seconds: 120,
            last_reset_date: Some(date(9)),
            ..TrackerState::default()
        };

        let mut tracker = with_record(&state, &clock, RolloverPolicy::Midnight);
        assert_eq!(tracker.totals().reading_seconds, 120);

        clock.set(local(2026, 6, 10, 23, 59, 59));
        assert_eq!(tracker.check_rollover().unwrap(), None);

        clock.set(local(2026, 6, 11, 0, 0, 30));
        assert!(tracker.check_rollover().unwrap().is_some());
        assert_eq!(tracker.totals().reading_seconds, 0);
    }

    #[test]
    fn test_malformed_record_loads_as_default() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let store = MemoryStore::default();
        store.set(STATE_KEY, "{\"is_reading\": tru").unwrap();

        let tracker = Tracker::load(store, clock.clone(), RolloverPolicy::CatchUp).unwrap();

        assert_eq!(tracker.phase(), TimerPhase::Idle);
        assert_eq!(tracker.totals(), RunningTotals::default());

        // The rollover on load rewrote a valid record
        let store = tracker.into_store();
        let raw = store.get(STATE_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
    }

    #[test]
    fn test_replace_state_applies_rollover() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        let imported = TrackerState {
            total_reading_seconds: 500,
            last_reset_date: Some(date(3)),
            ..TrackerState::default()
        };
        tracker.replace_state(imported).unwrap();

        assert_eq!(tracker.totals().reading_seconds, 0);
        assert_eq!(tracker.state().last_reset_date, Some(date(10)));
    }

    #[test]
    fn test_reset_all_removes_record() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);
        tracker.start().unwrap();

        tracker.reset_all().unwrap();

        assert_eq!(tracker.phase(), TimerPhase::Idle);
        assert_eq!(tracker.into_store().get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn test_status_snapshot() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut tracker = fresh(&clock);

        tracker.start().unwrap();
        clock.advance(Duration::seconds(75));
        let reading = tracker.status();
        assert_eq!(reading.elapsed_seconds, 75);
        assert_eq!(reading.pending_break_seconds, None);

        tracker.stop().unwrap();
        clock.advance(Duration::seconds(20));
        let on_break = tracker.status();
        assert_eq!(on_break.elapsed_seconds, 0);
        assert_eq!(on_break.pending_break_seconds, Some(20));
        assert_eq!(on_break.totals.reading_seconds, 75);
        assert_eq!(on_break.sessions_today, 1);
        assert_eq!(on_break.today, date(10));

        let json = serde_json::to_value(&on_break).unwrap();
        assert_eq!(json["phase"]["phase"], "on_break_pending_confirmation");
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = StartOutcome::BreakConfirmationRequired {
            since: utc(local(2026, 6, 10, 9, 0, 0)),
            break_seconds: 12,
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["outcome"], "break_confirmation_required");
        assert_eq!(json["break_seconds"], 12);
        assert!(json["since"].is_i64());
    }

    fn quiet_mock() -> MockKeyValueStore {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
    }

    #[test]
    fn test_each_transition_writes_once() {
        // Midnight policy at 09:00 keeps load from writing
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut store = quiet_mock();
        store
            .expect_set()
            .withf(|key, value| key == STATE_KEY && value.contains("\"is_reading\":true"))
            .times(2)
            .returning(|_, _| Ok(()));
        store
            .expect_set()
            .withf(|key, value| key == STATE_KEY && value.contains("\"is_reading\":false"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut tracker = Tracker::load(store, clock.clone(), RolloverPolicy::Midnight).unwrap();

        tracker.start().unwrap();
        clock.advance(Duration::minutes(10));
        tracker.stop().unwrap();
        clock.advance(Duration::minutes(2));
        tracker.confirm_break(["walk"]).unwrap();
    }

    #[test]
    fn test_noops_never_write() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut store = quiet_mock();
        store.expect_set().times(0);
        store.expect_remove().times(0);

        let mut tracker = Tracker::load(store, clock.clone(), RolloverPolicy::Midnight).unwrap();

        assert_eq!(tracker.stop().unwrap(), StopOutcome::NotReading);
        assert_eq!(
            tracker.confirm_break(["walk"]).unwrap(),
            ConfirmOutcome::NoBreakPending
        );
        assert_eq!(tracker.dismiss_break(), DismissOutcome::NoBreakPending);
        assert_eq!(tracker.check_rollover().unwrap(), None);
        assert_eq!(tracker.elapsed(), 0);
    }

    #[test]
    fn test_store_errors_propagate() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(ReadtimeError::Database("disk I/O error".to_string())));

        let result = Tracker::load(store, clock, RolloverPolicy::CatchUp);

        assert!(matches!(result, Err(ReadtimeError::Database(_))));
    }

    #[test]
    fn test_failed_write_surfaces_on_start() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut store = quiet_mock();
        store
            .expect_set()
            .returning(|_, _| Err(ReadtimeError::Database("read-only".to_string())));

        let mut tracker = Tracker::load(store, clock, RolloverPolicy::Midnight).unwrap();

        assert!(tracker.start().is_err());
        assert_eq!(tracker.phase(), TimerPhase::Idle);
        assert_eq!(tracker.state().first_start_today, None);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let mut store = quiet_mock();
        store
            .expect_set()
            .withf(|_, value| value.contains("\"is_reading\":true"))
            .returning(|_, _| Ok(()));
        store
            .expect_set()
            .withf(|_, value| value.contains("\"is_reading\":false"))
            .returning(|_, _| Err(ReadtimeError::Database("disk full".to_string())));

        let mut tracker = Tracker::load(store, clock.clone(), RolloverPolicy::Midnight).unwrap();
        tracker.start().unwrap();
        let started = tracker.state().clone();

        clock.advance(Duration::minutes(5));
        assert!(matches!(tracker.stop(), Err(ReadtimeError::Database(_))));

        assert_eq!(tracker.state(), &started);
        assert!(matches!(tracker.phase(), TimerPhase::Reading { .. }));
        assert_eq!(tracker.totals().reading_seconds, 0);
        assert!(tracker.todays_sessions().is_empty());
    }

    #[test]
    fn test_failed_confirm_keeps_break_pending() {
        let clock = ManualClock::ymd_hms(2026, 6, 10, 9, 0, 0);
        let stopped = TrackerState {
            last_stop_time: Some(local(2026, 6, 10, 8, 55, 0).with_timezone(&Utc)),
            first_start_today: Some(date(10)),
            last_reset_date: Some(date(10)),
            ..TrackerState::default()
        };
        let raw = serde_json::to_string(&stopped).unwrap();

        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set()
            .returning(|_, _| Err(ReadtimeError::Database("disk full".to_string())));

        let mut tracker = Tracker::load(store, clock, RolloverPolicy::CatchUp).unwrap();
        assert!(tracker.confirm_break(["walk"]).is_err());

        assert!(matches!(
            tracker.phase(),
            TimerPhase::OnBreakPendingConfirmation { .. }
        ));
        assert_eq!(tracker.totals().break_seconds, 0);
        assert!(tracker.log().break_activities.is_empty());
    }
}
