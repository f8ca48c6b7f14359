//! Configuration loading
//!
//! Settings live in a plain-text rc file, `~/.platerc` by default:
//!
//! ```text
//! # where the documents live
//! inboxes = ~/vtd/inboxes.vtd
//! projects = ~/vtd/projects.vtd
//! contexts = ~/vtd/contexts
//! warn_days = 1.5
//! ```
//!
//! `inboxes` and `projects` are required; `contexts` (the context rules
//! file) and `warn_days` (how long before the due time a task counts as
//! Due, default 1 day) are optional.

use anyhow::{bail, Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::ContextRules;

pub const DEFAULT_WARN_DAYS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inboxes: PathBuf,
    pub projects: PathBuf,
    pub contexts: Option<PathBuf>,
    pub warn_days: f64,
}

impl Config {
    /// Load from an explicit path, or from `~/.platerc`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_rc_path()?,
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text)
    }

    /// Parse rc text into a config
    pub fn parse(text: &str) -> Result<Self> {
        let mut inboxes = None;
        let mut projects = None;
        let mut contexts = None;
        let mut warn_days = DEFAULT_WARN_DAYS;

        for (num, line) in text.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .with_context(|| format!("config line {}: expected key = value", num + 1))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "inboxes" => inboxes = Some(expand_home(value)),
                "projects" => projects = Some(expand_home(value)),
                "contexts" => contexts = Some(expand_home(value)),
                "warn_days" => {
                    warn_days = value
                        .parse::<f64>()
                        .with_context(|| format!("config line {}: bad warn_days", num + 1))?;
                }
                other => bail!("config line {}: unknown key {:?}", num + 1, other),
            }
        }

        let inboxes = match inboxes {
            Some(p) => p,
            None => bail!("config is missing the inboxes path"),
        };
        let projects = match projects {
            Some(p) => p,
            None => bail!("config is missing the projects path"),
        };
        Ok(Self {
            inboxes,
            projects,
            contexts,
            warn_days,
        })
    }

    /// Context rules from the configured file, empty when unconfigured
    ///
    /// An unreadable rules file is not fatal; it logs and behaves as if no
    /// rules were set.
    pub fn context_rules(&self) -> ContextRules {
        let path = match &self.contexts {
            Some(p) => p,
            None => return ContextRules::default(),
        };
        match fs::read_to_string(path) {
            Ok(text) => ContextRules::parse(&text),
            Err(err) => {
                warn!("ignoring context rules {}: {}", path.display(), err);
                ContextRules::default()
            }
        }
    }
}

fn default_rc_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot locate home directory")?;
    Ok(home.join(".platerc"))
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(value)
}
