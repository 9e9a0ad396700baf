use chrono::{NaiveDate, Utc};
use rounds_collection::{incomplete_due_or_overdue_lists, is_list_available};
use rounds_storage::ReadingListRecord;
use std::collections::HashSet;

fn sample_list(list_id: &str, date: Option<&str>, point_ids: &[&str]) -> ReadingListRecord {
    ReadingListRecord {
        list_id: list_id.to_string(),
        name: format!("List {}", list_id),
        point_ids: point_ids.iter().map(|id| id.to_string()).collect(),
        expected_completion_date: date
            .map(|raw| domain::dates::parse_calendar_date(raw).expect("date")),
        created_by: "admin-1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_model: false,
    }
}

fn today() -> NaiveDate {
    domain::dates::parse_calendar_date("2026-08-06").expect("date")
}

#[test]
fn lists_without_dates_are_always_available() {
    let list = sample_list("list-1", None, &["point-1"]);
    assert!(is_list_available(&list, today()).available);
}

#[test]
fn due_and_overdue_lists_are_available() {
    let due = sample_list("list-1", Some("2026-08-06"), &["point-1"]);
    assert!(is_list_available(&due, today()).available);
    let overdue = sample_list("list-2", Some("2026-07-01"), &["point-1"]);
    assert!(is_list_available(&overdue, today()).available);
}

#[test]
fn future_lists_are_excluded_with_reason() {
    let future = sample_list("list-1", Some("2026-09-01"), &["point-1"]);
    let availability = is_list_available(&future, today());
    assert!(!availability.available);
    assert_eq!(
        availability.reason.as_deref(),
        Some("available on 2026-09-01")
    );
}

#[test]
fn selector_skips_models_futures_and_finished_lists() {
    let mut model = sample_list("list-model", None, &["point-1"]);
    model.is_model = true;
    let future = sample_list("list-future", Some("2026-09-01"), &["point-1"]);
    let finished = sample_list("list-done", Some("2026-08-01"), &["point-1", "point-2"]);
    let open = sample_list("list-open", Some("2026-08-06"), &["point-2", "point-3"]);
    let dateless = sample_list("list-dateless", None, &["point-9"]);
    let empty = sample_list("list-empty", None, &[]);

    let lists = vec![model, future, finished, open, dateless, empty];
    let completed: HashSet<String> = ["point-1", "point-2"]
        .iter()
        .map(|id| id.to_string())
        .collect();

    let selectable = incomplete_due_or_overdue_lists(&lists, &completed, today());
    let ids: Vec<&str> = selectable.iter().map(|l| l.list_id.as_str()).collect();
    assert_eq!(ids, vec!["list-open", "list-dateless"]);
}
