//! # 1440 Power System Core Library
//!
//! Business logic for budgeting the 1440 minutes of a day across three
//! zones (sleep, livelihood, on-time) and spending the on-time zone on
//! named tasks. The terminal UI in `power1440-cli` is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Allocation**: three budgets kept at a combined 1440 minutes by a
//!   single rebalancing mutator
//! - **Ledger**: ordered on-time tasks with an admission check
//! - **Clock**: minutes left in the local day, refreshed by a cancellable
//!   periodic task
//! - **Chart**: the four pie segments and their slice geometry
//! - **Planner**: composition of the above, emitting [`Event`]s
//!
//! ## Key Components
//!
//! - [`DayPlanner`]: the state machine behind the view
//! - [`ClockTicker`]: periodic clock task owned by the view's scope
//! - [`Config`]: application configuration management

pub mod allocation;
pub mod chart;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod planner;
pub mod storage;

pub use allocation::{Allocation, Zone, MINUTES_PER_DAY};
pub use chart::{ChartSegment, PieSlice, Rgb, SegmentKind};
pub use clock::{ClockReading, ClockSource, ClockTicker, ManualClock, SystemClock};
pub use error::{AdmissionError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use ledger::{Task, TaskId, TaskLedger};
pub use planner::{DayPlanner, PlanSummary};
pub use storage::Config;
