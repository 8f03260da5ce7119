//! Headless planning: apply edits from flags, print the resulting plan.

use clap::Args;
use power1440_core::{ClockReading, Config, DayPlanner, Event, SystemClock, TaskId, Zone};
use serde::Serialize;

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Sleep minutes (applied first)
    #[arg(long, allow_hyphen_values = true)]
    pub sleep: Option<String>,
    /// Livelihood minutes (applied second)
    #[arg(long, allow_hyphen_values = true)]
    pub livelihood: Option<String>,
    /// On-time minutes (applied last)
    #[arg(long, allow_hyphen_values = true)]
    pub on_time: Option<String>,
    /// Task to add, repeatable
    #[arg(long = "task", value_name = "NAME:MINUTES")]
    pub tasks: Vec<String>,
    /// Reset the task at this 1-based position to 0 minutes
    #[arg(long = "reset", value_name = "POSITION")]
    pub resets: Vec<usize>,
    /// Remove the task at this 1-based position
    #[arg(long = "remove", value_name = "POSITION")]
    pub removals: Vec<usize>,
    /// Include the event log in the output
    #[arg(long)]
    pub events: bool,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    summary: power1440_core::PlanSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [Event]>,
}

/// Split `NAME:MINUTES` at the last colon so names may contain colons.
fn parse_task_spec(spec: &str) -> Result<(&str, &str), String> {
    spec.rsplit_once(':')
        .ok_or_else(|| format!("invalid task '{spec}': expected NAME:MINUTES"))
}

/// Resolve 1-based positions to ids before anything is removed, so later
/// positions do not shift.
fn ids_at(planner: &DayPlanner, positions: &[usize]) -> Result<Vec<TaskId>, String> {
    positions
        .iter()
        .map(|&pos| {
            pos.checked_sub(1)
                .and_then(|i| planner.tasks().get(i))
                .map(|t| t.id)
                .ok_or_else(|| format!("no task at position {pos}"))
        })
        .collect()
}

/// Apply the edits in `args` to `planner`, returning every event produced.
pub fn apply(planner: &mut DayPlanner, args: &PlanArgs) -> Result<Vec<Event>, String> {
    let mut events = Vec::new();

    let zone_edits = [
        (Zone::Sleep, &args.sleep),
        (Zone::Livelihood, &args.livelihood),
        (Zone::OnTime, &args.on_time),
    ];
    for (zone, raw) in zone_edits {
        if let Some(raw) = raw {
            events.extend(planner.edit_zone(zone, raw));
        }
    }

    for spec in &args.tasks {
        let (name, minutes) = parse_task_spec(spec)?;
        planner.set_pending_name(name);
        planner.set_pending_duration(minutes);
        let event = planner.submit_pending_task();
        if let Event::TaskRejected { reason, notice, .. } = &event {
            return Err(notice.clone().unwrap_or_else(|| reason.clone()));
        }
        events.push(event);
    }

    let reset_ids = ids_at(planner, &args.resets)?;
    let removal_ids = ids_at(planner, &args.removals)?;
    events.extend(reset_ids.into_iter().filter_map(|id| planner.reset_task(id)));
    events.extend(removal_ids.into_iter().filter_map(|id| planner.remove_task(id)));

    Ok(events)
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = DayPlanner::with_allocation(config.initial_allocation_or_default());
    planner.apply_clock(ClockReading::from_source(&SystemClock));

    let events = apply(&mut planner, &args)?;
    for event in &events {
        tracing::info!("{}", event.describe());
    }

    let output = PlanOutput {
        summary: planner.summary(),
        events: args.events.then_some(events.as_slice()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PlanArgs {
        PlanArgs::default()
    }

    #[test]
    fn zone_edits_apply_in_canonical_order() {
        let mut planner = DayPlanner::new();
        let a = PlanArgs {
            sleep: Some("480".into()),
            on_time: Some("300".into()),
            ..args()
        };
        apply(&mut planner, &a).unwrap();
        // The on-time edit runs last and re-splits the rest evenly.
        assert_eq!(planner.allocation().on_time(), 300);
        assert_eq!(planner.allocation().sleep(), 570);
        assert_eq!(planner.allocation().livelihood(), 570);
    }

    #[test]
    fn task_specs_allow_colons_in_names() {
        assert_eq!(parse_task_spec("Call: mom:30"), Ok(("Call: mom", "30")));
        assert!(parse_task_spec("nothing").is_err());
    }

    #[test]
    fn overflowing_task_reports_the_notice() {
        let mut planner = DayPlanner::new();
        let a = PlanArgs {
            tasks: vec!["Big:400".into(), "Bigger:21".into()],
            ..args()
        };
        let err = apply(&mut planner, &a).unwrap_err();
        assert_eq!(err, "Total task duration exceeds On-Time allocation!");
        assert_eq!(planner.tasks().len(), 1);
    }

    #[test]
    fn positions_resolve_before_removal() {
        let mut planner = DayPlanner::new();
        let a = PlanArgs {
            tasks: vec!["a:10".into(), "b:20".into(), "c:30".into()],
            resets: vec![3],
            removals: vec![1, 2],
            ..args()
        };
        apply(&mut planner, &a).unwrap();
        assert_eq!(planner.tasks().len(), 1);
        assert_eq!(planner.tasks()[0].name, "c");
        assert_eq!(planner.tasks()[0].duration, 0);
    }

    #[test]
    fn bad_position_is_an_error() {
        let mut planner = DayPlanner::new();
        let a = PlanArgs {
            removals: vec![0],
            ..args()
        };
        assert!(apply(&mut planner, &a).is_err());
    }
}
