//! Day planner: the allocation, the task ledger, the add-task form and the
//! latest clock reading behind one single-threaded state machine.
//!
//! Every command returns the [`Event`]s it produced. Derived values
//! (task total, remaining on-time, chart segments) are recomputed on each
//! query and never stored.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, Zone};
use crate::chart::{self, ChartSegment};
use crate::clock::ClockReading;
use crate::error::AdmissionError;
use crate::events::Event;
use crate::ledger::{Task, TaskId, TaskLedger};

/// Serializable snapshot of everything the view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub allocation: Allocation,
    pub tasks: Vec<Task>,
    pub total_task_duration: u64,
    pub remaining_on_time: i64,
    pub segments: Vec<ChartSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_minutes_today: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct DayPlanner {
    allocation: Allocation,
    ledger: TaskLedger,
    pending_name: String,
    pending_duration: u32,
    clock: Option<ClockReading>,
}

impl DayPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allocation(allocation: Allocation) -> Self {
        Self {
            allocation,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn tasks(&self) -> &[Task] {
        self.ledger.tasks()
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    pub fn pending_name(&self) -> &str {
        &self.pending_name
    }

    pub fn pending_duration(&self) -> u32 {
        self.pending_duration
    }

    pub fn total_task_duration(&self) -> u64 {
        self.ledger.total_duration()
    }

    pub fn remaining_on_time(&self) -> i64 {
        self.ledger.remaining(self.allocation.on_time())
    }

    pub fn remaining_minutes_today(&self) -> Option<i64> {
        self.clock.map(|c| c.remaining_minutes)
    }

    pub fn segments(&self) -> [ChartSegment; 4] {
        chart::segments(&self.allocation, &self.ledger)
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            allocation: self.allocation,
            tasks: self.ledger.tasks().to_vec(),
            total_task_duration: self.total_task_duration(),
            remaining_on_time: self.remaining_on_time(),
            segments: self.segments().to_vec(),
            remaining_minutes_today: self.remaining_minutes_today(),
        }
    }

    // ── Allocation ───────────────────────────────────────────────────

    /// Apply raw text from a zone input. Unparseable text counts as 0.
    pub fn edit_zone(&mut self, zone: Zone, raw: &str) -> Vec<Event> {
        self.set_zone(zone, parse_minutes(raw))
    }

    /// Rebalance around `zone`. Also reports when the new on-time budget
    /// falls below what tasks already claim; nothing is trimmed.
    pub fn set_zone(&mut self, zone: Zone, minutes: i64) -> Vec<Event> {
        let allocation = self.allocation.rebalance(zone, minutes);
        let mut events = vec![Event::ZoneRebalanced {
            zone,
            requested: minutes,
            allocation,
            at: Utc::now(),
        }];

        let committed = self.ledger.total_duration();
        if committed > allocation.on_time() as u64 {
            tracing::warn!(
                on_time = allocation.on_time(),
                committed,
                "on-time budget below committed task total"
            );
            events.push(Event::OverCommitted {
                on_time: allocation.on_time(),
                committed,
                at: Utc::now(),
            });
        }
        events
    }

    // ── Task form ────────────────────────────────────────────────────

    pub fn set_pending_name(&mut self, name: impl Into<String>) {
        self.pending_name = name.into();
    }

    /// Unparseable or negative text counts as 0, which admission refuses.
    pub fn set_pending_duration(&mut self, raw: &str) {
        self.pending_duration = parse_minutes(raw).clamp(0, u32::MAX as i64) as u32;
    }

    /// Try to admit the task described by the form. The form is cleared
    /// only on success.
    pub fn submit_pending_task(&mut self) -> Event {
        let name = self.pending_name.clone();
        let duration = self.pending_duration;
        match self.add_task(&name, duration) {
            Ok(id) => {
                self.pending_name.clear();
                self.pending_duration = 0;
                let task_name = self.ledger.get(id).map(|t| t.name.clone()).unwrap_or(name);
                Event::TaskAdded {
                    id,
                    name: task_name,
                    duration,
                    at: Utc::now(),
                }
            }
            Err(err) => Event::TaskRejected {
                name,
                duration,
                reason: err.to_string(),
                notice: err.notice().map(str::to_string),
                at: Utc::now(),
            },
        }
    }

    /// Admit a task against the current on-time budget.
    ///
    /// # Errors
    ///
    /// See [`TaskLedger::add_task`].
    pub fn add_task(&mut self, name: &str, duration: u32) -> Result<TaskId, AdmissionError> {
        self.ledger
            .add_task(name, duration, self.allocation.on_time())
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<Event> {
        let task = self.ledger.remove_task(id)?;
        Some(Event::TaskRemoved {
            id,
            name: task.name,
            at: Utc::now(),
        })
    }

    pub fn reset_task(&mut self, id: TaskId) -> Option<Event> {
        self.ledger.reset_task(id).then(|| Event::TaskReset {
            id,
            at: Utc::now(),
        })
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn apply_clock(&mut self, reading: ClockReading) -> Event {
        self.clock = Some(reading);
        Event::ClockTicked {
            remaining_minutes: reading.remaining_minutes,
            at: reading.at.with_timezone(&Utc),
        }
    }
}

/// Lenient integer parse for form fields: optional sign followed by the
/// leading run of digits. Anything else yields 0; overflow saturates.
pub fn parse_minutes(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let value = digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d as i64));
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minutes_is_lenient() {
        assert_eq!(parse_minutes("90"), 90);
        assert_eq!(parse_minutes(" 45 "), 45);
        assert_eq!(parse_minutes("30min"), 30);
        assert_eq!(parse_minutes("-12"), -12);
        assert_eq!(parse_minutes("abc"), 0);
        assert_eq!(parse_minutes(""), 0);
        assert_eq!(parse_minutes("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn non_numeric_zone_input_behaves_like_zero() {
        let mut a = DayPlanner::new();
        let mut b = DayPlanner::new();
        a.edit_zone(Zone::Sleep, "lots");
        b.set_zone(Zone::Sleep, 0);
        assert_eq!(a.allocation(), b.allocation());
    }

    #[test]
    fn successful_submit_clears_the_form() {
        let mut planner = DayPlanner::new();
        planner.set_pending_name("Read");
        planner.set_pending_duration("45");
        let event = planner.submit_pending_task();
        assert!(matches!(event, Event::TaskAdded { duration: 45, .. }));
        assert_eq!(planner.pending_name(), "");
        assert_eq!(planner.pending_duration(), 0);
    }

    #[test]
    fn rejected_submit_keeps_the_form_and_carries_a_notice() {
        let mut planner = DayPlanner::new();
        planner.set_pending_name("Marathon");
        planner.set_pending_duration("500");
        match planner.submit_pending_task() {
            Event::TaskRejected { notice, .. } => assert_eq!(
                notice.as_deref(),
                Some("Total task duration exceeds On-Time allocation!")
            ),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(planner.pending_name(), "Marathon");
        assert_eq!(planner.pending_duration(), 500);
        assert!(planner.tasks().is_empty());
    }

    #[test]
    fn incomplete_form_is_rejected_silently() {
        let mut planner = DayPlanner::new();
        planner.set_pending_name("Nap");
        planner.set_pending_duration("soon");
        match planner.submit_pending_task() {
            Event::TaskRejected { notice, .. } => assert!(notice.is_none()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn shrinking_on_time_reports_over_commitment() {
        let mut planner = DayPlanner::new();
        planner.add_task("Deep work", 300).unwrap();
        let events = planner.set_zone(Zone::Sleep, 1000);
        assert_eq!(planner.allocation().on_time(), 220);
        assert!(matches!(
            events.last(),
            Some(Event::OverCommitted {
                on_time: 220,
                committed: 300,
                ..
            })
        ));
        assert_eq!(planner.remaining_on_time(), -80);
        assert_eq!(planner.tasks().len(), 1);
    }

    #[test]
    fn clock_reading_feeds_summary() {
        let mut planner = DayPlanner::new();
        assert_eq!(planner.summary().remaining_minutes_today, None);
        let reading = ClockReading {
            remaining_minutes: 77,
            at: chrono::Local::now(),
        };
        let event = planner.apply_clock(reading);
        assert_eq!(planner.remaining_minutes_today(), Some(77));
        match event {
            Event::ClockTicked { remaining_minutes, at } => {
                assert_eq!(remaining_minutes, 77);
                assert_eq!(at, reading.at.with_timezone(&Utc));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn remove_and_reset_of_unknown_ids_emit_nothing() {
        let mut planner = DayPlanner::new();
        assert!(planner.remove_task(TaskId(1)).is_none());
        assert!(planner.reset_task(TaskId(1)).is_none());
    }
}
