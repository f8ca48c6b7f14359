//! Recurrence schedule resolution
//!
//! Turns a parsed rule plus a last-completed timestamp into the next
//! `(visible_at, due_at)` pair. Every variant yields `due_at >= visible_at`
//! by construction: the fixed-window and monthly forms derive the due time
//! from visible plus a window, and the weekly form derives both from the
//! same anchored date.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::recur::dates::{closest_weekday, next_month_day};
use crate::recur::parser::{RecurRule, RecurSpec};

/// Default due time for anchored weekly rules without an override
const DEFAULT_DUE_TIME: (u32, u32) = (23, 59);

/// Next visible and due timestamps after the recorded completion
pub fn resolve(spec: &RecurSpec) -> (NaiveDateTime, NaiveDateTime) {
    let last = spec.last_completed;
    match &spec.rule {
        RecurRule::FixedWindow {
            break_days,
            window_days,
        } => {
            let visible = last + Duration::days(*break_days as i64);
            let due = visible + Duration::days(*window_days as i64);
            (visible, due)
        }
        RecurRule::WeeklyAnchor {
            every_n_weeks,
            weekday,
            anchor_date,
            visible_time,
            due_time,
        } => {
            let anchor = anchor_date.unwrap_or_else(|| last.date());
            let mut date = closest_weekday(*weekday, anchor);
            let step = Duration::days(7 * (*every_n_weeks).max(1) as i64);
            while date <= last.date() {
                date += step;
            }
            let due_t = due_time.unwrap_or_else(default_due_time);
            let due = date.and_time(due_t);
            let visible = date.and_time(visible_time.unwrap_or(due_t));
            // A visible time later than the due time would invert the
            // window; clamp to the due instant.
            (visible.min(due), due)
        }
        RecurRule::MonthlyOffset {
            every_n_months,
            day_offset,
            window_days,
        } => {
            let date = next_month_day(last.date(), *day_offset, *every_n_months);
            let visible = date.and_time(NaiveTime::MIN);
            let due = visible + Duration::days(*window_days as i64);
            (visible, due)
        }
    }
}

fn default_due_time() -> NaiveTime {
    let (h, m) = DEFAULT_DUE_TIME;
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recur::parser::parse_recur;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn resolve_line(line: &str) -> (NaiveDateTime, NaiveDateTime) {
        let (spec, _) = parse_recur(line).unwrap();
        resolve(&spec)
    }

    #[test]
    fn test_fixed_window() {
        let (visible, due) = resolve_line("RECUR 2023-06-01 +4,2 water plants");
        assert_eq!(visible, dt("2023-06-05 00:00"));
        assert_eq!(due, dt("2023-06-07 00:00"));
    }

    #[test]
    fn test_fixed_window_keeps_completion_time() {
        let (visible, due) = resolve_line("RECUR 2023-06-01 14:30 +1 empty inbox");
        assert_eq!(visible, dt("2023-06-02 14:30"));
        assert_eq!(due, dt("2023-06-03 14:30"));
    }

    #[test]
    fn test_weekly_anchor_fallback() {
        // 2023-06-01 is a Thursday; the closest Tuesday is 2023-05-30.
        // Stepping by 14 days, the first date strictly after completion
        // is 2023-06-13.
        let (visible, due) = resolve_line("RECUR 2023-06-01 2*TUE mow lawn");
        assert_eq!(due, dt("2023-06-13 23:59"));
        assert_eq!(visible, due);
    }

    #[test]
    fn test_weekly_explicit_anchor_and_times() {
        // Anchor 2023-01-03 is itself a Tuesday; weekly steps land on
        // 2023-06-06 as the first Tuesday after 2023-06-01.
        let (visible, due) =
            resolve_line("RECUR 2023-06-01 TUE(2023-01-03 09:00-17:00) standup");
        assert_eq!(visible, dt("2023-06-06 09:00"));
        assert_eq!(due, dt("2023-06-06 17:00"));
    }

    #[test]
    fn test_weekly_inverted_times_clamped() {
        let (visible, due) = resolve_line("RECUR 2023-06-01 FRI(18:00-06:00) odd hours");
        assert_eq!(due, dt("2023-06-02 06:00"));
        assert_eq!(visible, due);
    }

    #[test]
    fn test_monthly_last_day_leap_year() {
        let (visible, due) = resolve_line("RECUR 2024-02-20 M-1 reconcile");
        assert_eq!(visible, dt("2024-02-29 00:00"));
        assert_eq!(due, dt("2024-03-01 00:00"));
    }

    #[test]
    fn test_due_never_before_visible() {
        for line in [
            "RECUR 2023-06-01 +0,0 x",
            "RECUR 2023-06-01 SUN x",
            "RECUR 2023-06-01 M+15,3 x",
            "RECUR 2023-12-31 2*M-1 x",
        ] {
            let (visible, due) = resolve_line(line);
            assert!(due >= visible, "{}: {} < {}", line, due, visible);
        }
    }
}
