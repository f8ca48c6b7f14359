//! Output formatting for the display layer
//!
//! Renders eligible tasks as titled urgency sections:
//!
//! ```text
//! = Late (1) =
//!   @ [P1:fix the roof:P1] (Late 3 days)
//!
//! = Ready (2) =
//!   ↺ [PX:water plants:PX]
//! ```

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{Task, TaskKind};
use crate::urgency::{group, Buckets, DateState};

/// Marker character shown in front of a task, by kind
fn kind_character(task: &Task) -> char {
    match task.kind {
        TaskKind::Recur => '\u{21ba}',
        TaskKind::NextAction => '@',
        TaskKind::Inbox | TaskKind::Reminder => '-',
    }
}

/// Task text wrapped in its priority decoration, `PX` when unset
pub fn priority_decorated(task: &Task) -> String {
    match task.priority {
        Some(p) => format!("[P{0}:{1}:P{0}]", p, task.name),
        None => format!("[PX:{}:PX]", task.name),
    }
}

/// Human-readable time difference: "3 days", "75 minutes"
///
/// Prefers smaller numbers (bigger units), moving up a unit only once at
/// least 2 of it fit.
pub fn pretty_relative_time(secs: f64) -> String {
    const WEEKS_PER_MONTH: f64 = 365.242 / 12.0 / 7.0;
    let intervals = [
        ("minute", 60.0),
        ("hour", 60.0),
        ("day", 24.0),
        ("week", 7.0),
        ("month", WEEKS_PER_MONTH),
        ("year", 12.0),
    ];

    let mut unit = "second";
    let mut number = secs.abs();
    for (next_unit, ratio) in intervals {
        let next_number = number / ratio;
        if next_number < 2.0 {
            break;
        }
        unit = next_unit;
        number = next_number;
    }
    quantity(number, unit)
}

fn quantity(number: f64, unit: &str) -> String {
    let n = number as i64;
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// " (Late 3 days)" / " (Due in 50 minutes)", empty without a due date
pub fn due_indication(task: &Task, now: NaiveDateTime) -> String {
    let due = match task.due_at {
        Some(due) => due,
        None => return String::new(),
    };
    let diff_secs = (now - due).num_seconds() as f64;
    let pretty = pretty_relative_time(diff_secs);
    if diff_secs < 0.0 {
        format!(" (Due in {})", pretty)
    } else {
        format!(" (Late {})", pretty)
    }
}

fn task_line(task: &Task, now: NaiveDateTime) -> String {
    format!(
        "  {} {}{}",
        kind_character(task),
        priority_decorated(task),
        due_indication(task, now)
    )
}

/// Render grouped sections as display text
pub fn render_sections(tasks: &[&Task], now: NaiveDateTime) -> String {
    let buckets = group(tasks.iter().copied(), now);
    if buckets.is_empty() {
        return "(nothing to show)".to_string();
    }
    let mut out = Vec::new();
    for (state, tasks) in buckets.sections() {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.push(format!("= {} ({}) =", state.title(), tasks.len()));
        for task in tasks {
            out.push(task_line(task, now));
        }
    }
    out.join("\n")
}

#[derive(Serialize)]
struct TaskView<'a> {
    state: DateState,
    task: &'a Task,
}

/// Render grouped sections as a JSON array
pub fn render_json(tasks: &[&Task], now: NaiveDateTime) -> Result<String> {
    let buckets: Buckets = group(tasks.iter().copied(), now);
    let mut views = Vec::new();
    for (state, tasks) in buckets.sections() {
        for &task in tasks {
            views.push(TaskView { state, task });
        }
    }
    Ok(serde_json::to_string_pretty(&views)?)
}

/// Summary line of section counts for one task kind
pub fn render_counts(kind: TaskKind, tasks: &[&Task], now: NaiveDateTime) -> String {
    let buckets = group(tasks.iter().copied(), now);
    format!(
        "{:<12} late {:>3}  due {:>3}  ready {:>3}",
        kind.as_str(),
        buckets.late.len(),
        buckets.due.len(),
        buckets.ready.len()
    )
}
