use plate::lines::indent;
use plate::models::TaskKind;
use plate::outline::{parse_inboxes, parse_projects, Harvest};

fn lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}

fn names(harvest: &Harvest) -> Vec<&str> {
    harvest.tasks.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn test_reparse_is_idempotent() {
    let doc = lines(
        "\
- Garden work #grd1
  # buy seeds
    @ drive to nursery @errands
  # plant seeds
@ RECUR 2023-06-01 2*TUE mow lawn @outside
@ call landscaper @phone @priority:1",
    );
    let first = parse_projects(&doc, 1.0);
    let second = parse_projects(&doc, 1.0);
    assert_eq!(first.tasks, second.tasks);
    assert_eq!(first.ids.get("grd1"), second.ids.get("grd1"));
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_ordered_list_blocking_both_ways() {
    // B is blocked while A is undone.
    let blocked = parse_projects(
        &lines("- P\n  # A\n    @ act on A\n  # B\n    @ act on B"),
        1.0,
    );
    assert_eq!(names(&blocked), vec!["act on A"]);

    // Marking A done releases B.
    let released = parse_projects(
        &lines("- P\n  # A (DONE 2023-05-01)\n    @ act on A\n  # B\n    @ act on B"),
        1.0,
    );
    assert_eq!(names(&released), vec!["act on B"]);
}

#[test]
fn test_indentation_invariant_holds_for_every_task() {
    let doc = lines(
        "\
- Top project
  @ first action
    @ sub action
  - nested list
    @ nested action
@ toplevel action",
    );
    let harvest = parse_projects(&doc, 1.0);
    assert_eq!(harvest.tasks.len(), 4);
    for task in &harvest.tasks {
        let own = indent(&doc[task.source.line - 1]);
        // Every indented task must sit under an enclosing block opener:
        // an earlier line, past no blank, with strictly smaller indent.
        if own > 0 {
            let opener = doc[..task.source.line - 1]
                .iter()
                .rev()
                .take_while(|l| !l.trim().is_empty())
                .find(|l| indent(l) < own);
            assert!(opener.is_some(), "no opener for {:?}", task.name);
        }
    }
}

#[test]
fn test_due_never_before_visible_for_parsed_recurs() {
    let doc = lines(
        "\
@ RECUR 2023-06-01 +4,2 water plants
@ RECUR 2023-06-01 2*TUE mow lawn
@ RECUR 2023-06-01 TUE(2023-01-03 09:00-17:00) standup
@ RECUR 2024-02-20 M-1 reconcile accounts
@ RECUR 2023-12-15 3*M+15,5 estimated taxes",
    );
    let harvest = parse_projects(&doc, 1.0);
    assert_eq!(harvest.tasks.len(), 5);
    for task in &harvest.tasks {
        let visible = task.visible_at.expect("recur task has visible_at");
        let due = task.due_at.expect("recur task has due_at");
        assert!(due >= visible, "{}: {} < {}", task.name, due, visible);
    }
}

#[test]
fn test_malformed_recur_line_skipped_not_fatal() {
    let doc = lines(
        "\
@ RECUR not-a-date +4 broken one #brk1
@ RECUR 2023-06-01 ??? broken two
@ healthy action",
    );
    let harvest = parse_projects(&doc, 1.0);
    assert_eq!(names(&harvest), vec!["healthy action"]);
    assert_eq!(harvest.diagnostics.len(), 2);
    assert_eq!(harvest.diagnostics[0].line, 1);
    assert_eq!(harvest.diagnostics[1].line, 2);
    assert!(harvest.ids.contains_key("brk1"));
}

#[test]
fn test_inboxes_document_sections() {
    let doc = lines(
        "\
Some preamble that is not a section.

= Inboxes =
- RECUR 2023-06-01 +1,4 Email inbox
- paper tray

= Reminders =
- pick up dry cleaning",
    );
    let harvest = parse_inboxes(&doc, 1.0);
    let kinds: Vec<_> = harvest
        .tasks
        .iter()
        .map(|t| (t.kind, t.name.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (TaskKind::Inbox, "Email inbox"),
            (TaskKind::Inbox, "paper tray"),
            (TaskKind::Reminder, "pick up dry cleaning"),
        ]
    );
}

#[test]
fn test_missing_section_is_empty_not_error() {
    let harvest = parse_inboxes(&lines("= Inboxes =\n- only inbox item"), 1.0);
    assert!(harvest
        .tasks
        .iter()
        .all(|t| t.kind == TaskKind::Inbox));
    assert_eq!(harvest.tasks.len(), 1);
    assert!(harvest.diagnostics.is_empty());
}
