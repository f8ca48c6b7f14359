//! Outline parser
//!
//! Recursive-descent walker that turns a flat sequence of indented lines
//! into extracted tasks. The walk is a single forward pass over a shared
//! cursor: once a line is consumed there is no backtracking.
//!
//! # Nesting rules
//!
//! - A block opened at indent M consumes lines until one appears at an
//!   indent below M, or until a blank line. A blank line closes every
//!   enclosing block, including one anchored at indent 0.
//! - A deeper line opens a nested block, parsed recursively before the
//!   current block resumes; a line at the block's own indent is a sibling.
//! - In an ordered (`#`) list, the first sibling not marked done becomes
//!   the blocker: later siblings are skipped (their subtrees are walked
//!   only to keep the id registry current). Comment (`*`) siblings are
//!   exempt.
//! - A sibling marked done suppresses extraction for its whole subtree.
//!
//! Recursion depth is bounded by outline nesting, which in practice stays
//! in the tens of levels.

use chrono::Duration;
use log::warn;
use std::collections::HashMap;

use crate::context;
use crate::lines::{
    id_tokens, indent, is_blank, is_done, is_recur, is_section_header, list_start, Marker,
};
use crate::models::{Diagnostic, DocId, IdEntry, SourceLocation, Task, TaskKind};
use crate::recur;

/// Everything one parse pass over a document produces
#[derive(Debug, Default, Clone)]
pub struct Harvest {
    pub tasks: Vec<Task>,
    pub ids: HashMap<String, IdEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Harvest {
    /// Fold another document's harvest into this one
    pub fn absorb(&mut self, other: Harvest) {
        self.tasks.extend(other.tasks);
        self.ids.extend(other.ids);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Forward-only position in a line sequence
struct Cursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    /// 1-based number of the line `peek` would return
    fn line_number(&self) -> usize {
        self.pos + 1
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// How qualifying lines in the current region become tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Projects document: `@` lines and `RECUR` lines are tasks
    Projects,
    /// A named section of the Inboxes document: every non-comment list
    /// item becomes a task of this kind
    Section(TaskKind),
    /// Outside any recognized section: walk for ids only
    Ignore,
}

struct Walker {
    doc: DocId,
    mode: Mode,
    warn_window: Duration,
    harvest: Harvest,
}

/// Parse the Projects document
pub fn parse_projects(lines: &[String], warn_days: f64) -> Harvest {
    let mut walker = Walker::new(DocId::Projects, Mode::Projects, warn_days);
    let mut cur = Cursor::new(lines);
    while let Some(line) = cur.peek() {
        if is_blank(line) || is_section_header(line) {
            cur.advance();
            continue;
        }
        walker.parse_block(&mut cur, -1, false);
    }
    walker.harvest
}

/// Parse the Inboxes document
///
/// Items under a `= Inboxes =` header become Inbox tasks, items under
/// `= Reminders =` become Reminder tasks. A missing section simply yields
/// nothing; lines outside both sections are still scanned for `#id` tokens.
pub fn parse_inboxes(lines: &[String], warn_days: f64) -> Harvest {
    let mut walker = Walker::new(DocId::Inboxes, Mode::Ignore, warn_days);
    let mut cur = Cursor::new(lines);
    while let Some(line) = cur.peek() {
        if is_blank(line) {
            cur.advance();
            continue;
        }
        if is_section_header(line) {
            walker.mode = match section_title(line).to_ascii_lowercase().as_str() {
                "inboxes" => Mode::Section(TaskKind::Inbox),
                "reminders" => Mode::Section(TaskKind::Reminder),
                _ => Mode::Ignore,
            };
            cur.advance();
            continue;
        }
        walker.parse_block(&mut cur, -1, false);
    }
    walker.harvest
}

/// Header text with the `=` fencing and surrounding whitespace removed
fn section_title(line: &str) -> &str {
    line.trim().trim_matches('=').trim()
}

impl Walker {
    fn new(doc: DocId, mode: Mode, warn_days: f64) -> Self {
        Self {
            doc,
            mode,
            warn_window: Duration::seconds((warn_days * 86_400.0) as i64),
            harvest: Harvest::default(),
        }
    }

    /// Parse one block of siblings; `master_indent` is the indent that
    /// opened the enclosing block (-1 at document top level).
    ///
    /// Leaves the closing line (dedent, blank, or header) unconsumed so
    /// every enclosing block sees it too.
    fn parse_block(&mut self, cur: &mut Cursor, master_indent: i64, suppress: bool) {
        let block_indent = match cur.peek() {
            Some(line) => indent(line) as i64,
            None => return,
        };
        let mut blocker_active = false;

        while let Some(line) = cur.peek() {
            if is_blank(line) || is_section_header(line) {
                return;
            }
            let ind = indent(line) as i64;
            if ind <= master_indent || ind < block_indent {
                return;
            }

            let line = line.to_string();
            let line_no = cur.line_number();
            cur.advance();

            let marker = list_start(&line);
            let done = is_done(&line);
            self.register_ids(&line, line_no, done);

            let is_comment = marker == Some(Marker::Comment);
            let blocked = blocker_active && !is_comment;
            if !suppress && !blocked && !done {
                self.dispatch(&line, line_no, marker);
            }
            if marker == Some(Marker::Ordered) && !done && !blocker_active {
                blocker_active = true;
            }

            // Consume the sibling's whole subtree before moving on: every
            // following line deeper than the sibling belongs to it and
            // inherits its suppression, even across partial dedents.
            let child_suppress = suppress || blocked || done;
            while let Some(next) = cur.peek() {
                if is_blank(next) || is_section_header(next) || indent(next) as i64 <= ind {
                    break;
                }
                self.parse_block(cur, ind, child_suppress);
            }
        }
    }

    fn register_ids(&mut self, line: &str, line_no: usize, done: bool) {
        for id in id_tokens(line) {
            self.harvest.ids.insert(
                id.to_string(),
                IdEntry {
                    done,
                    source: SourceLocation {
                        doc: self.doc,
                        line: line_no,
                    },
                },
            );
        }
    }

    fn dispatch(&mut self, line: &str, line_no: usize, marker: Option<Marker>) {
        let source = SourceLocation {
            doc: self.doc,
            line: line_no,
        };
        match self.mode {
            Mode::Ignore => {}
            Mode::Projects => {
                if marker == Some(Marker::Comment) {
                    return;
                }
                if is_recur(line) {
                    self.emit_recur(line, source, TaskKind::Recur);
                } else if marker == Some(Marker::Action) {
                    self.emit_plain(line, source, TaskKind::NextAction);
                }
            }
            Mode::Section(kind) => {
                if marker.is_none() || marker == Some(Marker::Comment) {
                    return;
                }
                if is_recur(line) {
                    self.emit_recur(line, source, kind);
                } else {
                    self.emit_plain(line, source, kind);
                }
            }
        }
    }

    fn emit_plain(&mut self, line: &str, source: SourceLocation, kind: TaskKind) {
        let extracted = context::extract(line);
        let mut task = Task::new(kind, extracted.text, source);
        task.tags = extracted.tags;
        task.anon_tags = extracted.anon_tags;
        task.priority = extracted.priority;
        task.after = extracted.after;
        self.harvest.tasks.push(task);
    }

    fn emit_recur(&mut self, line: &str, source: SourceLocation, kind: TaskKind) {
        let extracted = context::extract(line);
        let (spec, name) = match recur::parse_recur(&extracted.text) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("{}:{}: {}", source.doc.as_str(), source.line, err);
                self.harvest.diagnostics.push(Diagnostic {
                    doc: source.doc,
                    line: source.line,
                    reason: err.to_string(),
                });
                return;
            }
        };
        let (visible, due) = recur::resolve(&spec);
        let mut task = Task::new(kind, name, source);
        task.tags = extracted.tags;
        task.anon_tags = extracted.anon_tags;
        task.priority = extracted.priority;
        task.after = extracted.after;
        task.last_completed_at = Some(spec.last_completed);
        task.visible_at = Some(visible);
        task.due_at = Some(due);
        task.warn_at = Some(due - self.warn_window);
        self.harvest.tasks.push(task);
    }
}
