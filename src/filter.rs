//! Context filtering
//!
//! Decides whether a task is shown under the user's current context rules.
//! Rules come from a plain-text file, one entry per line:
//!
//! ```text
//! # contexts I care about right now
//! home
//! phone
//! -work
//! ```
//!
//! A bare name includes a context, a leading `-` excludes one, `#` starts
//! a comment. With no rules configured at all, every task matches.

use std::collections::{HashMap, HashSet};

use crate::models::{IdEntry, Task};

/// Parsed include/exclude context lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextRules {
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl ContextRules {
    pub fn from_lists<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }

    /// Parse the context rules text format
    pub fn parse(text: &str) -> Self {
        let mut rules = Self::default();
        for line in text.lines() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('-') {
                rules.exclude.insert(name.trim().to_string());
            } else {
                rules.include.insert(line.to_string());
            }
        }
        rules
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Whether a task passes the dependency gate and the context lists
    ///
    /// An `after:` reference to an id that is not yet done hides the task
    /// unconditionally; an unknown id does not gate (fail open). Exclusion
    /// beats inclusion; a task matching neither list falls back to
    /// `include_anon`, which is true for kinds shown regardless of context.
    pub fn matches(
        &self,
        task: &Task,
        ids: &HashMap<String, IdEntry>,
        include_anon: bool,
    ) -> bool {
        if let Some(after) = &task.after {
            if let Some(entry) = ids.get(after) {
                if !entry.done {
                    return false;
                }
            }
        }
        if self.is_empty() {
            return true;
        }
        if task.tags.iter().any(|t| self.exclude.contains(t)) {
            return false;
        }
        if task.tags.iter().any(|t| self.include.contains(t)) {
            return true;
        }
        include_anon
    }
}
