use chrono::{NaiveDate, NaiveDateTime};
use plate::recur::{parse_recur, resolve, RecurRule};

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn resolve_line(line: &str) -> (NaiveDateTime, NaiveDateTime) {
    let (spec, _) = parse_recur(line).unwrap();
    resolve(&spec)
}

#[test]
fn test_weekly_anchoring_example() {
    // Last completed 2023-06-01 (a Thursday), rule 2*TUE, no anchor date:
    // the anchor falls back to the completion date, whose closest Tuesday
    // is 2023-05-30; stepping by 14 days, the first date strictly after
    // 2023-06-01 is 2023-06-13.
    let (visible, due) = resolve_line("RECUR 2023-06-01 2*TUE mow lawn");
    assert_eq!(due.date(), NaiveDate::from_ymd_opt(2023, 6, 13).unwrap());
    assert_eq!(due, dt("2023-06-13 23:59"));
    assert_eq!(visible, due);
}

#[test]
fn test_month_end_offset_example() {
    // M-1 after 2024-02-20 resolves to the leap-year last day, not the 28th.
    let (visible, _) = resolve_line("RECUR 2024-02-20 M-1 reconcile");
    assert_eq!(visible.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn test_fixed_window_window_defaults_to_one_day() {
    let (visible, due) = resolve_line("RECUR 2023-06-01 +10 deep clean");
    assert_eq!(visible, dt("2023-06-11 00:00"));
    assert_eq!(due, dt("2023-06-12 00:00"));
}

#[test]
fn test_exactly_one_variant_matches() {
    let fixed = parse_recur("RECUR 2023-06-01 +4,2 x").unwrap().0.rule;
    assert!(matches!(fixed, RecurRule::FixedWindow { .. }));

    let weekly = parse_recur("RECUR 2023-06-01 WED x").unwrap().0.rule;
    assert!(matches!(weekly, RecurRule::WeeklyAnchor { .. }));

    let monthly = parse_recur("RECUR 2023-06-01 M+3 x").unwrap().0.rule;
    assert!(matches!(monthly, RecurRule::MonthlyOffset { .. }));

    assert!(parse_recur("RECUR 2023-06-01 FOO x").is_err());
}

#[test]
fn test_anchored_weekly_time_overrides() {
    let (visible, due) =
        resolve_line("RECUR 2023-06-01 MON(2023-05-01 08:00-18:00) weekly review");
    assert_eq!(visible, dt("2023-06-05 08:00"));
    assert_eq!(due, dt("2023-06-05 18:00"));
}

#[test]
fn test_monthly_offset_reresolves_per_month() {
    // Completing on the short month's last day lands on the next month's
    // own last day, not day 29 again.
    let (visible, _) = resolve_line("RECUR 2024-02-29 M-1 statements");
    assert_eq!(visible.date(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

    let (visible, _) = resolve_line("RECUR 2024-03-31 M-1 statements");
    assert_eq!(visible.date(), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
}
