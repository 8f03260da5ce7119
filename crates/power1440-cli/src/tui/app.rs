//! Dashboard state and key handling.
//!
//! Everything here is terminal-independent so key sequences can be tested
//! directly against the planner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use power1440_core::{ClockReading, DayPlanner, Event, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Zone(Zone),
    TaskName,
    TaskDuration,
    TaskList,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Zone(Zone::Sleep),
        Focus::Zone(Zone::Livelihood),
        Focus::Zone(Zone::OnTime),
        Focus::TaskName,
        Focus::TaskDuration,
        Focus::TaskList,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

pub struct App {
    pub planner: DayPlanner,
    pub focus: Focus,
    /// Text being typed into each zone field, indexed like `Zone::ALL`.
    pub zone_inputs: [String; 3],
    pub name_input: String,
    pub duration_input: String,
    pub selected: usize,
    /// Blocking notice; while set, only dismissal keys are handled.
    pub notice: Option<String>,
    pub status: Option<String>,
    pub show_legend: bool,
    pub should_quit: bool,
}

fn zone_index(zone: Zone) -> usize {
    match zone {
        Zone::Sleep => 0,
        Zone::Livelihood => 1,
        Zone::OnTime => 2,
    }
}

impl App {
    pub fn new(planner: DayPlanner, show_legend: bool) -> Self {
        let mut app = Self {
            planner,
            focus: Focus::Zone(Zone::Sleep),
            zone_inputs: Default::default(),
            name_input: String::new(),
            duration_input: String::new(),
            selected: 0,
            notice: None,
            status: None,
            show_legend,
            should_quit: false,
        };
        app.sync_zone_inputs();
        app
    }

    pub fn zone_input(&self, zone: Zone) -> &str {
        &self.zone_inputs[zone_index(zone)]
    }

    pub fn apply_clock(&mut self, reading: ClockReading) {
        let event = self.planner.apply_clock(reading);
        tracing::trace!("{}", event.describe());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.leave_field();
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.leave_field();
                self.focus = self.focus.prev();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Zone(zone) => self.handle_zone_key(zone, key.code),
            Focus::TaskName => self.handle_name_key(key.code),
            Focus::TaskDuration => self.handle_duration_key(key.code),
            Focus::TaskList => self.handle_list_key(key.code),
        }
    }

    // ── Fields ───────────────────────────────────────────────────────

    fn handle_zone_key(&mut self, zone: Zone, code: KeyCode) {
        let idx = zone_index(zone);
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => self.zone_inputs[idx].push(c),
            KeyCode::Backspace => {
                self.zone_inputs[idx].pop();
            }
            KeyCode::Enter => self.commit_zone(zone),
            KeyCode::Up => self.nudge_zone(zone, 5),
            KeyCode::Down => self.nudge_zone(zone, -5),
            _ => {}
        }
    }

    fn handle_name_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.name_input.push(c),
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Enter => self.submit_task(),
            _ => return,
        }
        self.planner.set_pending_name(self.name_input.clone());
    }

    fn handle_duration_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => self.duration_input.push(c),
            KeyCode::Backspace => {
                self.duration_input.pop();
            }
            KeyCode::Enter => {
                self.submit_task();
                return;
            }
            _ => return,
        }
        self.planner.set_pending_duration(&self.duration_input);
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.planner.tasks().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.selected_id() {
                    let event = self.planner.reset_task(id);
                    self.record(event);
                }
            }
            KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    let event = self.planner.remove_task(id);
                    self.record(event);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    fn commit_zone(&mut self, zone: Zone) {
        let raw = self.zone_inputs[zone_index(zone)].clone();
        let events = self.planner.edit_zone(zone, &raw);
        self.sync_zone_inputs();
        for event in events {
            self.record(Some(event));
        }
    }

    fn nudge_zone(&mut self, zone: Zone, delta: i64) {
        let current = self.planner.allocation().get(zone) as i64;
        let events = self.planner.set_zone(zone, current + delta);
        self.sync_zone_inputs();
        for event in events {
            self.record(Some(event));
        }
    }

    fn submit_task(&mut self) {
        let event = self.planner.submit_pending_task();
        if let Event::TaskRejected { notice, .. } = &event {
            self.notice = notice.clone();
        } else {
            self.name_input.clear();
            self.duration_input.clear();
            self.selected = self.planner.tasks().len().saturating_sub(1);
        }
        self.record(Some(event));
    }

    /// Leaving a zone field commits whatever was typed there, like a
    /// change event on blur.
    fn leave_field(&mut self) {
        if let Focus::Zone(zone) = self.focus {
            let typed = self.zone_input(zone);
            if typed != self.planner.allocation().get(zone).to_string() {
                self.commit_zone(zone);
            }
        }
    }

    fn sync_zone_inputs(&mut self) {
        for zone in Zone::ALL {
            self.zone_inputs[zone_index(zone)] = self.planner.allocation().get(zone).to_string();
        }
    }

    fn selected_id(&self) -> Option<power1440_core::TaskId> {
        self.planner.tasks().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.planner.tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn record(&mut self, event: Option<Event>) {
        if let Some(event) = event {
            tracing::debug!(?event, "planner event");
            self.status = Some(event.describe());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        App::new(DayPlanner::new(), true)
    }

    #[test]
    fn zone_edit_commits_on_enter_and_resyncs_all_fields() {
        let mut app = app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "1440");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.zone_input(Zone::Sleep), "1440");
        assert_eq!(app.zone_input(Zone::Livelihood), "0");
        assert_eq!(app.zone_input(Zone::OnTime), "0");
    }

    #[test]
    fn tabbing_away_commits_a_zone_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Zone(Zone::OnTime));
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "1440");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::TaskName);
        assert_eq!(app.planner.allocation().on_time(), 1440);
    }

    #[test]
    fn arrows_nudge_the_focused_zone() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.planner.allocation().sleep(), 425);
        assert_eq!(app.planner.allocation().total(), 1440);
    }

    #[test]
    fn add_task_through_the_form() {
        let mut app = app();
        app.focus = Focus::TaskName;
        type_text(&mut app, "Write report");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.planner.tasks().len(), 1);
        assert_eq!(app.planner.remaining_on_time(), 320);
        assert!(app.name_input.is_empty());
        assert!(app.duration_input.is_empty());
        assert!(app.notice.is_none());
    }

    #[test]
    fn overflow_shows_a_blocking_notice() {
        let mut app = app();
        app.focus = Focus::TaskName;
        type_text(&mut app, "Too much");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "421");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.notice.as_deref(),
            Some("Total task duration exceeds On-Time allocation!")
        );
        assert!(app.planner.tasks().is_empty());

        // Input is swallowed until the notice is dismissed.
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::TaskDuration);
        press(&mut app, KeyCode::Enter);
        assert!(app.notice.is_none());
        assert_eq!(app.duration_input, "421");
    }

    #[test]
    fn list_keys_reset_and_remove() {
        let mut app = app();
        app.planner.add_task("a", 30).unwrap();
        app.planner.add_task("b", 40).unwrap();
        app.focus = Focus::TaskList;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.planner.tasks()[1].duration, 0);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.planner.tasks().len(), 1);
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.planner.tasks().is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.focus = Focus::TaskName;
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.name_input, "q");

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
