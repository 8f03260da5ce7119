//! Pie chart projection of a plan.
//!
//! The chart always has four segments in a fixed order. This module only
//! computes values and slice geometry; drawing is left to the renderer,
//! which receives the segments plus a callback producing each slice's text.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::ledger::TaskLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Sleep,
    Livelihood,
    OnTimeAllocated,
    OnTimeRemaining,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::Sleep,
        SegmentKind::Livelihood,
        SegmentKind::OnTimeAllocated,
        SegmentKind::OnTimeRemaining,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Sleep => "Sleep",
            SegmentKind::Livelihood => "Livelihood",
            SegmentKind::OnTimeAllocated => "On-Time (Allocated)",
            SegmentKind::OnTimeRemaining => "On-Time (Remaining)",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            SegmentKind::Sleep => Rgb(0xFF, 0x63, 0x84),
            SegmentKind::Livelihood => Rgb(0x36, 0xA2, 0xEB),
            SegmentKind::OnTimeAllocated => Rgb(0xFF, 0xCE, 0x56),
            SegmentKind::OnTimeRemaining => Rgb(0x4B, 0xC0, 0xC0),
        }
    }
}

/// 24-bit slice color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let hex = s.strip_prefix('#').unwrap_or(&s);
        let parse = |i: usize| -> Result<u8, D::Error> {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
        };
        if hex.len() != 6 {
            return Err(serde::de::Error::custom(format!("invalid color '{s}'")));
        }
        Ok(Rgb(parse(0)?, parse(2)?, parse(4)?))
    }
}

/// One labelled value handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub kind: SegmentKind,
    pub label: String,
    /// Signed: on-time remaining is negative when tasks overrun the budget.
    pub minutes: i64,
    pub color: Rgb,
}

impl ChartSegment {
    fn new(kind: SegmentKind, minutes: i64) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            minutes,
            color: kind.color(),
        }
    }
}

/// Derive the four segments from the current allocation and ledger.
pub fn segments(allocation: &Allocation, ledger: &TaskLedger) -> [ChartSegment; 4] {
    let allocated = ledger.total_duration() as i64;
    let remaining = ledger.remaining(allocation.on_time());
    [
        ChartSegment::new(SegmentKind::Sleep, allocation.sleep() as i64),
        ChartSegment::new(SegmentKind::Livelihood, allocation.livelihood() as i64),
        ChartSegment::new(SegmentKind::OnTimeAllocated, allocated),
        ChartSegment::new(SegmentKind::OnTimeRemaining, remaining),
    ]
}

/// Geometry of one slice. Angles are in degrees, counter-clockwise from
/// the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub value: i64,
    pub start_angle: f64,
    pub sweep: f64,
    pub percent: f64,
}

impl PieSlice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep / 2.0
    }

    pub fn contains_angle(&self, degrees: f64) -> bool {
        self.sweep > 0.0 && degrees >= self.start_angle && degrees < self.end_angle()
    }

    /// Point halfway between the center and the rim along the mid angle,
    /// for a pie of the given radius centered on the origin.
    pub fn label_anchor(&self, radius: f64) -> (f64, f64) {
        let r = radius * 0.5;
        let theta = self.mid_angle() * PI / 180.0;
        (r * theta.cos(), r * theta.sin())
    }
}

/// Lay the segments out around a full circle.
///
/// Negative values get a zero sweep; if nothing is positive every slice is
/// empty.
pub fn pie_slices(segments: &[ChartSegment]) -> Vec<PieSlice> {
    let total: i64 = segments.iter().map(|s| s.minutes.max(0)).sum();
    let mut start = 0.0;
    segments
        .iter()
        .enumerate()
        .map(|(index, seg)| {
            let value = seg.minutes;
            let fraction = if total > 0 {
                value.max(0) as f64 / total as f64
            } else {
                0.0
            };
            let slice = PieSlice {
                index,
                value,
                start_angle: start,
                sweep: fraction * 360.0,
                percent: fraction,
            };
            start += slice.sweep;
            slice
        })
        .collect()
}

/// Slice text used by the planner: the raw minute value.
pub fn value_label(slice: &PieSlice) -> String {
    slice.value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_segments() {
        let segs = segments(&Allocation::default(), &TaskLedger::new());
        let values: Vec<_> = segs.iter().map(|s| s.minutes).collect();
        assert_eq!(values, [420, 600, 0, 420]);
        assert_eq!(segs[2].label, "On-Time (Allocated)");
        assert_eq!(segs[0].color.to_string(), "#FF6384");
    }

    #[test]
    fn slices_cover_the_circle() {
        let segs = segments(&Allocation::default(), &TaskLedger::new());
        let slices = pie_slices(&segs);
        let last = slices.last().unwrap();
        assert!((last.end_angle() - 360.0).abs() < 1e-9);
        assert_eq!(slices[2].sweep, 0.0);
        assert!((slices[0].sweep - 105.0).abs() < 1e-9);
    }

    #[test]
    fn negative_segment_gets_no_sweep_but_keeps_its_label() {
        let mut segs = segments(&Allocation::default(), &TaskLedger::new());
        segs[3].minutes = -50;
        let slices = pie_slices(&segs);
        assert_eq!(slices[3].sweep, 0.0);
        assert_eq!(value_label(&slices[3]), "-50");
    }

    #[test]
    fn all_zero_values_yield_empty_slices() {
        let segs = [ChartSegment::new(SegmentKind::Sleep, 0)];
        let slices = pie_slices(&segs);
        assert_eq!(slices[0].sweep, 0.0);
        assert!(!slices[0].contains_angle(0.0));
    }

    #[test]
    fn label_anchor_sits_at_half_radius() {
        let slice = PieSlice {
            index: 0,
            value: 1,
            start_angle: 0.0,
            sweep: 180.0,
            percent: 0.5,
        };
        let (x, y) = slice.label_anchor(10.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn color_round_trips_through_hex() {
        let json = serde_json::to_string(&SegmentKind::Livelihood.color()).unwrap();
        assert_eq!(json, "\"#36A2EB\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb(0x36, 0xA2, 0xEB));
    }
}
