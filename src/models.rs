//! Data model for extracted tasks
//!
//! Tasks are built once per parse pass and never mutated afterwards; an
//! updated document is handled by re-parsing from scratch (see `Plate`).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which source document a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocId {
    Inboxes,
    Projects,
}

impl DocId {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocId::Inboxes => "inboxes",
            DocId::Projects => "projects",
        }
    }
}

/// Position of a task's source line, used for jump-to-source references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub doc: DocId,
    /// 1-based line number
    pub line: usize,
}

/// Task kind (which collection the task belongs to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Inbox,
    NextAction,
    Recur,
    Reminder,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Inbox => "inbox",
            TaskKind::NextAction => "next action",
            TaskKind::Recur => "recurring",
            TaskKind::Reminder => "reminder",
        }
    }

    /// Kinds that are shown even when no context tag matches
    pub fn include_anon(&self) -> bool {
        matches!(self, TaskKind::Inbox | TaskKind::Reminder)
    }
}

/// One extracted task
///
/// All timestamps are naive local wall-clock times, matching what users
/// write in the documents. Absent `visible_at` means "always visible";
/// absent `due_at` means "never due".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    /// Display text with tag annotations and list marker stripped;
    /// `#id` cross-reference tokens are kept
    pub name: String,
    pub source: SourceLocation,
    pub visible_at: Option<NaiveDateTime>,
    pub due_at: Option<NaiveDateTime>,
    pub warn_at: Option<NaiveDateTime>,
    pub last_completed_at: Option<NaiveDateTime>,
    pub tags: BTreeSet<String>,
    /// Subset of `tags` written in the `@@tag` form; carrying one makes the
    /// task eligible even when no context rule names it
    pub anon_tags: BTreeSet<String>,
    /// Priority 0 (highest) through 4, from an `@priority:N` annotation
    pub priority: Option<u8>,
    /// Cross-reference id this task waits on, from an `@after:ID` annotation
    pub after: Option<String>,
    pub done: bool,
}

impl Task {
    pub fn new(kind: TaskKind, name: String, source: SourceLocation) -> Self {
        Self {
            kind,
            name,
            source,
            visible_at: None,
            due_at: None,
            warn_at: None,
            last_completed_at: None,
            tags: BTreeSet::new(),
            anon_tags: BTreeSet::new(),
            priority: None,
            after: None,
            done: false,
        }
    }
}

/// Entry in the cross-reference id registry, introduced via `#id` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdEntry {
    pub done: bool,
    pub source: SourceLocation,
}

/// A recoverable per-line parse problem
///
/// Diagnostics never abort a parse; the offending line is skipped as a task
/// and the rest of the document is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub doc: DocId,
    pub line: usize,
    pub reason: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.doc.as_str(), self.line, self.reason)
    }
}
