//! Line classification
//!
//! Stateless predicates over a single line of document text. These are total
//! functions: any input classifies one way or another, there are no error
//! states.
//!
//! # Line forms
//!
//! ```text
//! - unordered item
//! # ordered item
//! * comment
//! @ next action
//! = Section =
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-#*@])\s").expect("list-start pattern")
});

static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^=+\s\w").expect("section-header pattern")
});

static ID_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(\w+)").expect("id-token pattern")
});

/// List marker kind, determined by the first non-whitespace character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Unordered,
    Ordered,
    Comment,
    Action,
}

/// The marker that starts this line, if it starts a list item
pub fn list_start(line: &str) -> Option<Marker> {
    let caps = LIST_START.captures(line)?;
    match &caps[1] {
        "-" => Some(Marker::Unordered),
        "#" => Some(Marker::Ordered),
        "*" => Some(Marker::Comment),
        "@" => Some(Marker::Action),
        _ => None,
    }
}

pub fn is_next_action(line: &str) -> bool {
    list_start(line) == Some(Marker::Action)
}

pub fn is_recur(line: &str) -> bool {
    line.contains("RECUR")
}

pub fn is_done(line: &str) -> bool {
    line.contains("DONE") || line.contains("WONTDO")
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER.is_match(line)
}

/// Number of leading whitespace characters
pub fn indent(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// All `#id` cross-reference tokens on a line
///
/// An ordered-list marker (`# `) never matches because the marker is
/// followed by whitespace, and tag annotations (`@...`) cannot contain `#`.
pub fn id_tokens(line: &str) -> Vec<&str> {
    ID_TOKEN
        .captures_iter(line)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_start_markers() {
        assert_eq!(list_start("- buy milk"), Some(Marker::Unordered));
        assert_eq!(list_start("  # first step"), Some(Marker::Ordered));
        assert_eq!(list_start("* just a note"), Some(Marker::Comment));
        assert_eq!(list_start("@ call the plumber"), Some(Marker::Action));
        assert_eq!(list_start("plain text"), None);
        assert_eq!(list_start("-no space after marker"), None);
        assert_eq!(list_start("## two markers"), None);
    }

    #[test]
    fn test_is_next_action() {
        assert!(is_next_action("  @ water the plants"));
        assert!(!is_next_action("  - water the plants"));
        assert!(!is_next_action("water the plants"));
    }

    #[test]
    fn test_is_recur_and_done() {
        assert!(is_recur("@ RECUR 2023-06-01 +4 water plants"));
        assert!(!is_recur("@ water plants"));
        assert!(is_done("@ fix sink (DONE 2023-05-02)"));
        assert!(is_done("# paint fence WONTDO"));
        assert!(!is_done("@ fix sink"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t "));
        assert!(!is_blank("  x"));
    }

    #[test]
    fn test_is_section_header() {
        assert!(is_section_header("= Inboxes ="));
        assert!(is_section_header("== Deep section"));
        assert!(!is_section_header("=="));
        assert!(!is_section_header("Inboxes ="));
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("- top"), 0);
        assert_eq!(indent("  - nested"), 2);
        assert_eq!(indent("\t- tabbed"), 1);
    }

    #[test]
    fn test_id_tokens() {
        assert_eq!(id_tokens("@ file taxes #tax23"), vec!["tax23"]);
        assert_eq!(id_tokens("# step one"), Vec::<&str>::new());
        assert_eq!(id_tokens("- two #a1 refs #b2"), vec!["a1", "b2"]);
    }
}
