//! Urgency classification and ordering
//!
//! Buckets tasks by how their visible/warn/due timestamps compare to the
//! plate's `now` snapshot, and orders each bucket by priority then due
//! date. The sort is stable, so insertion order (document order) breaks
//! ties.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Task;

/// Temporal urgency of a task relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DateState {
    Late,
    Due,
    Ready,
    /// Not yet shown: `visible_at` is still in the future
    Invisible,
}

impl DateState {
    pub fn title(&self) -> &'static str {
        match self {
            DateState::Late => "Late",
            DateState::Due => "Due",
            DateState::Ready => "Ready",
            DateState::Invisible => "Invisible",
        }
    }
}

/// Classify one task against the current time
pub fn date_state(task: &Task, now: NaiveDateTime) -> DateState {
    if let Some(due) = task.due_at {
        if due < now {
            return DateState::Late;
        }
    }
    if let Some(warn) = task.warn_at {
        if warn < now {
            return DateState::Due;
        }
    }
    match task.visible_at {
        None => DateState::Ready,
        Some(visible) if visible < now => DateState::Ready,
        Some(_) => DateState::Invisible,
    }
}

/// Order a bucket by (priority ascending, due date ascending)
///
/// Tasks without a due date sort last within their priority; missing
/// priority sorts first, matching the original display ordering.
pub fn sort_bucket(tasks: &mut [&Task]) {
    tasks.sort_by_key(|task| {
        (
            task.priority.map(i64::from).unwrap_or(-1),
            task.due_at.unwrap_or(NaiveDateTime::MAX),
        )
    });
}

/// Shown buckets in display order: Late, then Due, then Ready
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    pub late: Vec<&'a Task>,
    pub due: Vec<&'a Task>,
    pub ready: Vec<&'a Task>,
}

impl<'a> Buckets<'a> {
    /// Sections with their titles, skipping empty buckets
    pub fn sections(&self) -> Vec<(DateState, &[&'a Task])> {
        [
            (DateState::Late, self.late.as_slice()),
            (DateState::Due, self.due.as_slice()),
            (DateState::Ready, self.ready.as_slice()),
        ]
        .into_iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.late.is_empty() && self.due.is_empty() && self.ready.is_empty()
    }
}

/// Group tasks into sorted Late/Due/Ready buckets; invisible tasks are
/// dropped
pub fn group<'a, I>(tasks: I, now: NaiveDateTime) -> Buckets<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut buckets = Buckets::default();
    for task in tasks {
        match date_state(task, now) {
            DateState::Late => buckets.late.push(task),
            DateState::Due => buckets.due.push(task),
            DateState::Ready => buckets.ready.push(task),
            DateState::Invisible => {}
        }
    }
    sort_bucket(&mut buckets.late);
    sort_bucket(&mut buckets.due);
    sort_bucket(&mut buckets.ready);
    buckets
}
