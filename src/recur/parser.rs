//! Recurrence rule parser
//!
//! Parses the compact recurrence grammar found on `RECUR` lines. After the
//! keyword and a last-completed timestamp, exactly one rule form follows:
//!
//! ```text
//! RECUR 2023-06-01 +4,2 water plants            fixed window: 4 days break, 2 days window
//! RECUR 2023-06-01 2*TUE mow lawn               every 2nd Tuesday-anchored week
//! RECUR 2023-06-01 TUE(2023-01-03 09:00-17:00)  anchored weekly with time overrides
//! RECUR 2023-06-01 M-1 reconcile accounts       last day of every month
//! RECUR 2023-06-01 3*M+15,5 quarterly estimate  15th, every 3 months, 5-day window
//! ```
//!
//! A line that fails to parse is a recoverable error: the caller skips the
//! item and keeps going.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurError {
    #[error("missing RECUR keyword")]
    MissingKeyword,
    #[error("missing last-completed timestamp after RECUR")]
    MissingTimestamp,
    #[error("invalid last-completed timestamp: {0}")]
    BadTimestamp(String),
    #[error("missing recurrence rule after timestamp")]
    MissingRule,
    #[error("unrecognized recurrence rule: {0}")]
    BadRule(String),
}

/// One recurrence rule, parsed from a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurRule {
    /// Visible `break_days` after last completion, due `window_days` later
    FixedWindow { break_days: u32, window_days: u32 },
    /// Anchored to a weekday, repeating every `every_n_weeks` weeks
    WeeklyAnchor {
        every_n_weeks: u32,
        weekday: Weekday,
        anchor_date: Option<NaiveDate>,
        visible_time: Option<NaiveTime>,
        due_time: Option<NaiveTime>,
    },
    /// A day-of-month (negative counts from month end), every `every_n_months`
    MonthlyOffset {
        every_n_months: u32,
        day_offset: i32,
        window_days: u32,
    },
}

/// A fully parsed `RECUR` annotation
#[derive(Debug, Clone, PartialEq)]
pub struct RecurSpec {
    pub last_completed: NaiveDateTime,
    pub rule: RecurRule,
}

/// Parse a cleaned line containing the `RECUR` keyword
///
/// Returns the parsed spec plus the residual display text (everything
/// around the consumed `RECUR <timestamp> <rule>` span).
pub fn parse_recur(text: &str) -> Result<(RecurSpec, String), RecurError> {
    let idx = text.find("RECUR").ok_or(RecurError::MissingKeyword)?;
    let prefix = &text[..idx];
    let rest = &text[idx + "RECUR".len()..];

    let mut tokens = rest.split_whitespace();

    let date_tok = tokens.next().ok_or(RecurError::MissingTimestamp)?;
    let date = NaiveDate::parse_from_str(date_tok, "%Y-%m-%d")
        .map_err(|_| RecurError::BadTimestamp(date_tok.to_string()))?;

    // An optional hh:mm token refines the completion time; default midnight.
    let mut pending: Option<&str> = None;
    let last_completed = match tokens.next() {
        Some(tok) => match NaiveTime::parse_from_str(tok, "%H:%M") {
            Ok(time) => date.and_time(time),
            Err(_) => {
                pending = Some(tok);
                date.and_time(NaiveTime::MIN)
            }
        },
        None => date.and_time(NaiveTime::MIN),
    };

    let mut rule_tok = match pending.or_else(|| tokens.next()) {
        Some(tok) => tok.to_string(),
        None => return Err(RecurError::MissingRule),
    };
    // A parenthesized anchor group may contain a space; glue tokens until
    // the group closes.
    while rule_tok.contains('(') && !rule_tok.contains(')') {
        match tokens.next() {
            Some(tok) => {
                rule_tok.push(' ');
                rule_tok.push_str(tok);
            }
            None => return Err(RecurError::BadRule(rule_tok)),
        }
    }

    let rule = parse_rule(&rule_tok)?;

    let trailing = tokens.collect::<Vec<_>>().join(" ");
    let residual = format!("{} {}", prefix.trim(), trailing.trim())
        .trim()
        .to_string();

    Ok((
        RecurSpec {
            last_completed,
            rule,
        },
        residual,
    ))
}

/// Dispatch one rule token to the three sub-grammars
fn parse_rule(tok: &str) -> Result<RecurRule, RecurError> {
    if let Some(rest) = tok.strip_prefix('+') {
        return parse_fixed_window(rest, tok);
    }

    // Optional N* multiplier in front of the weekly and monthly forms.
    let (every_n, rest) = match tok.split_once('*') {
        Some((count, rest)) => {
            let n = count
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| RecurError::BadRule(tok.to_string()))?;
            (n, rest)
        }
        None => (1, tok),
    };

    if let Some(body) = rest.strip_prefix('M') {
        if body.starts_with('+') || body.starts_with('-') {
            return parse_monthly(every_n, body, tok);
        }
    }
    parse_weekly(every_n, rest, tok)
}

fn parse_fixed_window(body: &str, tok: &str) -> Result<RecurRule, RecurError> {
    let bad = || RecurError::BadRule(tok.to_string());
    let (break_str, window_str) = match body.split_once(',') {
        Some((b, w)) => (b, Some(w)),
        None => (body, None),
    };
    let break_days = break_str.parse::<u32>().map_err(|_| bad())?;
    let window_days = match window_str {
        Some(w) => w.parse::<u32>().map_err(|_| bad())?,
        None => 1,
    };
    Ok(RecurRule::FixedWindow {
        break_days,
        window_days,
    })
}

fn parse_monthly(every_n: u32, body: &str, tok: &str) -> Result<RecurRule, RecurError> {
    let bad = || RecurError::BadRule(tok.to_string());
    let (offset_str, window_str) = match body.split_once(',') {
        Some((o, w)) => (o, Some(w)),
        None => (body, None),
    };
    let day_offset = offset_str.parse::<i32>().map_err(|_| bad())?;
    if day_offset == 0 {
        return Err(bad());
    }
    let window_days = match window_str {
        Some(w) => w.parse::<u32>().map_err(|_| bad())?,
        None => 1,
    };
    Ok(RecurRule::MonthlyOffset {
        every_n_months: every_n,
        day_offset,
        window_days,
    })
}

fn parse_weekly(every_n: u32, body: &str, tok: &str) -> Result<RecurRule, RecurError> {
    let bad = || RecurError::BadRule(tok.to_string());
    let (dow_str, group) = match body.split_once('(') {
        Some((d, g)) => (d, Some(g.strip_suffix(')').ok_or_else(bad)?)),
        None => (body, None),
    };
    let weekday = parse_weekday(dow_str).ok_or_else(bad)?;

    let mut anchor_date = None;
    let mut visible_time = None;
    let mut due_time = None;
    if let Some(group) = group {
        for part in group.split_whitespace() {
            if let Ok(date) = NaiveDate::parse_from_str(part, "%Y-%m-%d") {
                anchor_date = Some(date);
            } else if let Some((vis, due)) = part.split_once('-') {
                let vis = NaiveTime::parse_from_str(vis, "%H:%M").map_err(|_| bad())?;
                let due = NaiveTime::parse_from_str(due, "%H:%M").map_err(|_| bad())?;
                visible_time = Some(vis);
                due_time = Some(due);
            } else {
                return Err(bad());
            }
        }
    }

    Ok(RecurRule::WeeklyAnchor {
        every_n_weeks: every_n,
        weekday,
        anchor_date,
        visible_time,
        due_time,
    })
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "MON" => Some(Weekday::Mon),
        "TUE" => Some(Weekday::Tue),
        "WED" => Some(Weekday::Wed),
        "THU" => Some(Weekday::Thu),
        "FRI" => Some(Weekday::Fri),
        "SAT" => Some(Weekday::Sat),
        "SUN" => Some(Weekday::Sun),
        _ => None,
    }
}
