//! Context tag and annotation extraction
//!
//! Strips inline annotations from a line and returns the cleaned display
//! text plus the extracted tags and specials. Order matters: `@key:value`
//! specials are pulled out first so their key parts are never mistaken for
//! plain `@tag` contexts.
//!
//! # Annotation forms
//!
//! ```text
//! @home          context tag
//! @@errands      context tag that also satisfies the anonymous rule
//! @priority:2    special: priority 0-4
//! @after:tax23   special: dependency on a #tax23 cross-reference
//! ```

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*@(\w+):(\w+)").expect("special pattern")
});

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(@@?)(\w+)").expect("tag pattern")
});

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-*#@]\s+").expect("leading-marker pattern")
});

/// Result of stripping annotations from one line. Extraction never fails;
/// a line without annotations just yields empty collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    /// Text with tag annotations and the leading list marker removed.
    /// `#id` cross-reference tokens are not annotations and stay in place.
    pub text: String,
    pub tags: BTreeSet<String>,
    /// Subset of `tags` written in the `@@tag` form; a task carrying one
    /// is shown even when no context rule names it
    pub anon_tags: BTreeSet<String>,
    pub priority: Option<u8>,
    pub after: Option<String>,
}

/// Strip tag annotations and the leading list marker from a line
pub fn extract(line: &str) -> Extracted {
    let mut out = Extracted::default();

    // 1. Specials first, validated into the typed fields.
    for caps in SPECIAL.captures_iter(line) {
        let (key, value) = (&caps[1], &caps[2]);
        match key {
            "priority" => match value.parse::<u8>() {
                Ok(p) if p <= 4 => out.priority = Some(p),
                _ => debug!("ignoring priority annotation with value {:?}", value),
            },
            "after" => out.after = Some(value.to_string()),
            _ => debug!("ignoring unknown special @{}:{}", key, value),
        }
    }
    let text = SPECIAL.replace_all(line, "");

    // 2. Remaining @tag / @@tag occurrences become context tags; the
    //    double form is additionally remembered as anonymous.
    for caps in TAG.captures_iter(&text) {
        let name = caps[2].to_string();
        if &caps[1] == "@@" {
            out.anon_tags.insert(name.clone());
        }
        out.tags.insert(name);
    }

    // 3. Remove the tag tokens.
    let text = TAG.replace_all(&text, "");

    // 4. Strip one leading list marker plus its whitespace.
    let text = LEADING_MARKER.replace(&text, "");

    out.text = text.trim().to_string();
    out
}
