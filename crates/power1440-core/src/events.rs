use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, Zone};
use crate::ledger::TaskId;

/// Every state change in the planner produces an Event.
/// The terminal UI shows the latest one in its status line; the headless
/// `plan` command prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ZoneRebalanced {
        zone: Zone,
        requested: i64,
        allocation: Allocation,
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: TaskId,
        name: String,
        duration: u32,
        at: DateTime<Utc>,
    },
    /// Admission refused. `notice` is set when the user must be blocked
    /// with a message.
    TaskRejected {
        name: String,
        duration: u32,
        reason: String,
        notice: Option<String>,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        id: TaskId,
        name: String,
        at: DateTime<Utc>,
    },
    TaskReset {
        id: TaskId,
        at: DateTime<Utc>,
    },
    /// The on-time budget now sits below what tasks already claim.
    OverCommitted {
        on_time: u32,
        committed: u64,
        at: DateTime<Utc>,
    },
    /// `at` is the reading's instant; the countdown itself was computed in
    /// local time.
    ClockTicked {
        remaining_minutes: i64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// One-line human description for status bars and logs.
    pub fn describe(&self) -> String {
        match self {
            Event::ZoneRebalanced {
                allocation, zone, ..
            } => format!(
                "{zone} set to {} min (sleep {} / livelihood {} / on-time {})",
                allocation.get(*zone),
                allocation.sleep(),
                allocation.livelihood(),
                allocation.on_time()
            ),
            Event::TaskAdded { name, duration, .. } => {
                format!("Added \"{name}\" ({duration} min)")
            }
            Event::TaskRejected { name, reason, .. } => {
                format!("Could not add \"{name}\": {reason}")
            }
            Event::TaskRemoved { name, .. } => format!("Removed \"{name}\""),
            Event::TaskReset { id, .. } => format!("Reset task {id} to 0 min"),
            Event::OverCommitted {
                on_time, committed, ..
            } => format!("Tasks claim {committed} min but On-Time is {on_time} min"),
            Event::ClockTicked {
                remaining_minutes, ..
            } => format!("{remaining_minutes} minutes remaining today"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::TaskReset {
            id: TaskId(7),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TaskReset");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn rebalance_description_lists_all_zones() {
        let mut allocation = Allocation::default();
        allocation.rebalance(Zone::OnTime, 1440);
        let event = Event::ZoneRebalanced {
            zone: Zone::OnTime,
            requested: 1440,
            allocation,
            at: Utc::now(),
        };
        assert_eq!(
            event.describe(),
            "On-Time set to 1440 min (sleep 0 / livelihood 0 / on-time 1440)"
        );
    }

    #[test]
    fn every_event_timestamp_is_utc() {
        let event = Event::ClockTicked {
            remaining_minutes: 61,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["at"].as_str().unwrap().ends_with('Z'));
    }
}
