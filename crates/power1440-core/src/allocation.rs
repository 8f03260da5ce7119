//! Day allocation model.
//!
//! The day is split into three zones whose budgets always sum to
//! [`MINUTES_PER_DAY`]. The only way to change a budget is
//! [`Allocation::rebalance`], which rewrites all three at once.
//!
//! ## Rebalancing
//!
//! ```text
//! edit(zone, v) -> zone = clamp(v, 0, 1440)
//!                  rest = 1440 - zone
//!                  first other  = rest / 2          (canonical order)
//!                  second other = rest - rest / 2
//! ```
//!
//! The previous ratio between the two untouched zones is not preserved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 1440;

/// One of the three top-level budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Sleep,
    Livelihood,
    OnTime,
}

impl Zone {
    /// Canonical ordering, used to decide which other zone gets the
    /// rounded-down half during a rebalance.
    pub const ALL: [Zone; 3] = [Zone::Sleep, Zone::Livelihood, Zone::OnTime];

    /// The two zones that are not `self`, in canonical order.
    pub fn others(self) -> [Zone; 2] {
        match self {
            Zone::Sleep => [Zone::Livelihood, Zone::OnTime],
            Zone::Livelihood => [Zone::Sleep, Zone::OnTime],
            Zone::OnTime => [Zone::Sleep, Zone::Livelihood],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Sleep => "Sleep",
            Zone::Livelihood => "Livelihood",
            Zone::OnTime => "On-Time",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Zone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sleep" => Ok(Zone::Sleep),
            "livelihood" => Ok(Zone::Livelihood),
            "on-time" | "on_time" | "ontime" => Ok(Zone::OnTime),
            other => Err(ValidationError::UnknownZone(other.to_string())),
        }
    }
}

/// Minute budgets for the three zones.
///
/// Fields are private so the sum invariant cannot be broken from outside;
/// deserialization goes through [`Allocation::from_parts`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllocationParts")]
pub struct Allocation {
    sleep: u32,
    livelihood: u32,
    on_time: u32,
}

/// Unchecked wire form of [`Allocation`].
#[derive(Deserialize)]
struct AllocationParts {
    sleep: u32,
    livelihood: u32,
    on_time: u32,
}

impl TryFrom<AllocationParts> for Allocation {
    type Error = ValidationError;

    fn try_from(parts: AllocationParts) -> Result<Self, Self::Error> {
        Allocation::from_parts(parts.sleep, parts.livelihood, parts.on_time)
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            sleep: 420,
            livelihood: 600,
            on_time: 420,
        }
    }
}

impl Allocation {
    /// Build an allocation from explicit budgets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DayNotCovered`] unless the three values sum
    /// to exactly [`MINUTES_PER_DAY`].
    pub fn from_parts(sleep: u32, livelihood: u32, on_time: u32) -> Result<Self, ValidationError> {
        let actual = sleep as u64 + livelihood as u64 + on_time as u64;
        if actual != MINUTES_PER_DAY as u64 {
            return Err(ValidationError::DayNotCovered {
                expected: MINUTES_PER_DAY,
                actual,
            });
        }
        Ok(Self {
            sleep,
            livelihood,
            on_time,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Sleep => self.sleep,
            Zone::Livelihood => self.livelihood,
            Zone::OnTime => self.on_time,
        }
    }

    pub fn sleep(&self) -> u32 {
        self.sleep
    }

    pub fn livelihood(&self) -> u32 {
        self.livelihood
    }

    pub fn on_time(&self) -> u32 {
        self.on_time
    }

    pub fn total(&self) -> u32 {
        self.sleep + self.livelihood + self.on_time
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set `zone` to `requested` (clamped to the day) and split the rest of
    /// the day evenly over the other two zones.
    ///
    /// Returns the new allocation; `self` is updated in place as well.
    pub fn rebalance(&mut self, zone: Zone, requested: i64) -> Allocation {
        let value = requested.clamp(0, MINUTES_PER_DAY as i64) as u32;
        let remaining = MINUTES_PER_DAY - value;
        let half = remaining / 2;
        let [first, second] = zone.others();

        *self.slot(zone) = value;
        *self.slot(first) = half;
        *self.slot(second) = remaining - half;

        debug_assert_eq!(self.total(), MINUTES_PER_DAY);
        tracing::debug!(
            zone = %zone,
            requested,
            sleep = self.sleep,
            livelihood = self.livelihood,
            on_time = self.on_time,
            "allocation rebalanced"
        );
        *self
    }

    fn slot(&mut self, zone: Zone) -> &mut u32 {
        match zone {
            Zone::Sleep => &mut self.sleep,
            Zone::Livelihood => &mut self.livelihood,
            Zone::OnTime => &mut self.on_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_cover_the_day() {
        let alloc = Allocation::default();
        assert_eq!(alloc.sleep(), 420);
        assert_eq!(alloc.livelihood(), 600);
        assert_eq!(alloc.on_time(), 420);
        assert_eq!(alloc.total(), MINUTES_PER_DAY);
    }

    #[test]
    fn full_sleep_empties_the_others() {
        let mut alloc = Allocation::default();
        alloc.rebalance(Zone::Sleep, 1440);
        assert_eq!(alloc.sleep(), 1440);
        assert_eq!(alloc.livelihood(), 0);
        assert_eq!(alloc.on_time(), 0);
    }

    #[test]
    fn zero_sleep_splits_the_day_in_half() {
        let mut alloc = Allocation::default();
        alloc.rebalance(Zone::Sleep, 0);
        assert_eq!(alloc.livelihood() + alloc.on_time(), 1440);
        assert!(alloc.livelihood().abs_diff(alloc.on_time()) <= 1);
    }

    #[test]
    fn odd_remainder_rounds_down_for_first_other_zone() {
        let mut alloc = Allocation::default();
        alloc.rebalance(Zone::Livelihood, 481);
        // 959 left: sleep comes first in canonical order.
        assert_eq!(alloc.sleep(), 479);
        assert_eq!(alloc.on_time(), 480);
        assert_eq!(alloc.livelihood(), 481);
    }

    #[test]
    fn rebalance_discards_previous_ratio() {
        let mut alloc = Allocation::from_parts(100, 900, 440).unwrap();
        alloc.rebalance(Zone::OnTime, 440);
        assert_eq!(alloc.sleep(), 500);
        assert_eq!(alloc.livelihood(), 500);
    }

    #[test]
    fn out_of_range_requests_are_clamped() {
        let mut low = Allocation::default();
        let mut zero = Allocation::default();
        assert_eq!(low.rebalance(Zone::OnTime, -30), zero.rebalance(Zone::OnTime, 0));

        let mut high = Allocation::default();
        let mut full = Allocation::default();
        assert_eq!(
            high.rebalance(Zone::Sleep, 5000),
            full.rebalance(Zone::Sleep, 1440)
        );
    }

    #[test]
    fn from_parts_rejects_partial_day() {
        let err = Allocation::from_parts(400, 600, 420).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DayNotCovered {
                expected: 1440,
                actual: 1420
            }
        );
    }

    #[test]
    fn deserialize_accepts_a_full_day() {
        let alloc: Allocation =
            serde_json::from_str(r#"{"sleep":480,"livelihood":540,"on_time":420}"#).unwrap();
        assert_eq!(alloc, Allocation::from_parts(480, 540, 420).unwrap());
    }

    #[test]
    fn deserialize_rejects_a_partial_day() {
        let err = serde_json::from_str::<Allocation>(r#"{"sleep":1,"livelihood":1,"on_time":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("must sum to 1440"), "{err}");

        let huge = format!(
            r#"{{"sleep":{m},"livelihood":{m},"on_time":{m}}}"#,
            m = u32::MAX
        );
        assert!(serde_json::from_str::<Allocation>(&huge).is_err());
    }

    #[test]
    fn zone_parses_user_spellings() {
        assert_eq!("Sleep".parse::<Zone>().unwrap(), Zone::Sleep);
        assert_eq!("on-time".parse::<Zone>().unwrap(), Zone::OnTime);
        assert_eq!("on_time".parse::<Zone>().unwrap(), Zone::OnTime);
        assert!("leisure".parse::<Zone>().is_err());
    }

    fn any_zone() -> impl Strategy<Value = Zone> {
        prop_oneof![Just(Zone::Sleep), Just(Zone::Livelihood), Just(Zone::OnTime)]
    }

    proptest! {
        #[test]
        fn rebalance_always_covers_the_day(
            edits in proptest::collection::vec((any_zone(), -3000i64..3000), 1..20)
        ) {
            let mut alloc = Allocation::default();
            for (zone, value) in edits {
                let after = alloc.rebalance(zone, value);
                prop_assert_eq!(after.total(), MINUTES_PER_DAY);
                prop_assert_eq!(after.get(zone) as i64, value.clamp(0, 1440));
                let [a, b] = zone.others();
                prop_assert!(after.get(a) <= after.get(b));
                prop_assert!(after.get(b) - after.get(a) <= 1);
            }
        }
    }
}
