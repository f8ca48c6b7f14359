//! The Plate: owner of all extracted tasks for one session
//!
//! A Plate tracks the two source documents, re-parses them when their
//! modification times move past the last successful parse, and exposes the
//! per-kind task collections plus the cross-reference id registry. A
//! refresh replaces all state at once; readers never observe a partially
//! rebuilt store, and a failed read leaves the last-known-good state in
//! place.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::filter::ContextRules;
use crate::models::{Diagnostic, DocId, IdEntry, Task, TaskKind};
use crate::outline::{parse_inboxes, parse_projects, Harvest};

/// Access to the raw source documents
///
/// The core never touches the filesystem directly; this seam keeps reading
/// and mtime detection outside the parser.
pub trait DocumentSource {
    /// Lines in order, original indentation preserved
    fn read_lines(&self, doc: DocId) -> Result<Vec<String>>;
    fn modification_time(&self, doc: DocId) -> Result<SystemTime>;
}

/// The usual source: one file per document
pub struct FsSource {
    inboxes: PathBuf,
    projects: PathBuf,
}

impl FsSource {
    pub fn new(inboxes: impl Into<PathBuf>, projects: impl Into<PathBuf>) -> Self {
        Self {
            inboxes: inboxes.into(),
            projects: projects.into(),
        }
    }

    fn path(&self, doc: DocId) -> &Path {
        match doc {
            DocId::Inboxes => &self.inboxes,
            DocId::Projects => &self.projects,
        }
    }
}

impl DocumentSource for FsSource {
    fn read_lines(&self, doc: DocId) -> Result<Vec<String>> {
        let path = self.path(doc);
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {} document {}", doc.as_str(), path.display()))?;
        Ok(text.lines().map(String::from).collect())
    }

    fn modification_time(&self, doc: DocId) -> Result<SystemTime> {
        let path = self.path(doc);
        let meta = fs::metadata(path)
            .with_context(|| format!("failed to stat {} document {}", doc.as_str(), path.display()))?;
        meta.modified()
            .with_context(|| format!("no modification time for {}", path.display()))
    }
}

const ALL_DOCS: [DocId; 2] = [DocId::Inboxes, DocId::Projects];

/// One session's task store
pub struct Plate<S: DocumentSource = FsSource> {
    source: S,
    rules: ContextRules,
    warn_days: f64,
    now: NaiveDateTime,
    last_parse: Option<SystemTime>,
    inboxes: Vec<Task>,
    next_actions: Vec<Task>,
    recurring: Vec<Task>,
    reminders: Vec<Task>,
    ids: HashMap<String, IdEntry>,
    diagnostics: Vec<Diagnostic>,
}

impl<S: DocumentSource> Plate<S> {
    pub fn new(source: S, rules: ContextRules, warn_days: f64) -> Self {
        Self {
            source,
            rules,
            warn_days,
            now: Local::now().naive_local(),
            last_parse: None,
            inboxes: Vec::new(),
            next_actions: Vec::new(),
            recurring: Vec::new(),
            reminders: Vec::new(),
            ids: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// True iff any tracked document changed since the last successful parse
    pub fn is_stale(&self) -> Result<bool> {
        let last = match self.last_parse {
            Some(ts) => ts,
            None => return Ok(true),
        };
        for doc in ALL_DOCS {
            if self.source.modification_time(doc)? > last {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Re-parse the documents if stale; returns true when a parse ran
    ///
    /// The `now` snapshot is retaken on every call, so urgency judgments
    /// stay current even when the documents have not changed. On a read
    /// failure the previous collections are kept.
    pub fn refresh(&mut self) -> Result<bool> {
        self.now = Local::now().naive_local();
        if !self.is_stale()? {
            debug!("plate is fresh, skipping parse");
            return Ok(false);
        }

        // Read everything before touching state; a failure here must not
        // clear the last-known-good collections.
        let parse_time = SystemTime::now();
        let inbox_lines = self.source.read_lines(DocId::Inboxes)?;
        let project_lines = self.source.read_lines(DocId::Projects)?;

        let mut harvest = parse_inboxes(&inbox_lines, self.warn_days);
        harvest.absorb(parse_projects(&project_lines, self.warn_days));

        self.replace(harvest);
        self.last_parse = Some(parse_time);
        info!(
            "plate refreshed: {} inboxes, {} next actions, {} recurring, {} reminders",
            self.inboxes.len(),
            self.next_actions.len(),
            self.recurring.len(),
            self.reminders.len()
        );
        Ok(true)
    }

    fn replace(&mut self, harvest: Harvest) {
        self.inboxes.clear();
        self.next_actions.clear();
        self.recurring.clear();
        self.reminders.clear();
        for task in harvest.tasks {
            match task.kind {
                TaskKind::Inbox => self.inboxes.push(task),
                TaskKind::NextAction => self.next_actions.push(task),
                TaskKind::Recur => self.recurring.push(task),
                TaskKind::Reminder => self.reminders.push(task),
            }
        }
        self.ids = harvest.ids;
        self.diagnostics = harvest.diagnostics;
    }

    /// The time snapshot used for all relative-time judgments
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn tasks(&self, kind: TaskKind) -> &[Task] {
        match kind {
            TaskKind::Inbox => &self.inboxes,
            TaskKind::NextAction => &self.next_actions,
            TaskKind::Recur => &self.recurring,
            TaskKind::Reminder => &self.reminders,
        }
    }

    /// Tasks of one kind that pass the user's context rules and whose
    /// `after:` dependency, if any, is satisfied
    ///
    /// A task tagged in the `@@tag` form is treated like the always-shown
    /// kinds: it passes without an include-list match, though exclusion
    /// still hides it.
    pub fn eligible(&self, kind: TaskKind) -> Vec<&Task> {
        self.tasks(kind)
            .iter()
            .filter(|task| {
                let include_anon = kind.include_anon() || !task.anon_tags.is_empty();
                self.rules.matches(task, &self.ids, include_anon)
            })
            .collect()
    }

    /// Cross-reference lookup for `#id` navigation
    pub fn lookup_id(&self, id: &str) -> Option<&IdEntry> {
        self.ids.get(id)
    }

    /// Per-line problems from the last parse
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
