use chrono::Utc;
use domain::{Role, SessionContext, ValidationMode};
use rounds_collection::{CollectionError, CollectionSession};
use rounds_storage::ReadingPointRecord;

fn sample_point(
    point_id: &str,
    mode: ValidationMode,
    min: Option<f64>,
    max: Option<f64>,
) -> ReadingPointRecord {
    ReadingPointRecord {
        point_id: point_id.to_string(),
        name: "Chiller supply temp".to_string(),
        building: "B1".to_string(),
        floor: "2".to_string(),
        room: "201".to_string(),
        reading_type: "temperature".to_string(),
        component: Some("chiller".to_string()),
        unit: "C".to_string(),
        description: None,
        validation_mode: mode,
        min_value: min,
        max_value: max,
        active: true,
        created_at: Utc::now(),
    }
}

fn field_user() -> SessionContext {
    SessionContext::new("user-1", "Field User", None, vec![Role::User])
}

#[test]
fn out_of_range_entry_needs_note_before_completion() {
    let point = sample_point("point-1", ValidationMode::Range, Some(10.0), Some(20.0));
    let mut session = CollectionSession::new();

    session.update_entry("point-1", "25", "").expect("update");
    assert!(!session.can_mark_complete(&point));
    let err = session
        .mark_complete(&point, &field_user())
        .expect_err("blocked");
    assert!(matches!(err, CollectionError::NotCompletable(_)));

    session
        .update_entry("point-1", "25", "spike due to maintenance")
        .expect("update");
    assert!(session.can_mark_complete(&point));
    let completion = session
        .mark_complete(&point, &field_user())
        .expect("complete");
    assert_eq!(completion.value, "25");
    assert_eq!(
        completion.notes.as_deref(),
        Some("spike due to maintenance")
    );
    assert_eq!(completion.completed_by.as_deref(), Some("user-1"));
}

#[test]
fn unsat_requires_note_and_sat_does_not() {
    let point = sample_point("point-1", ValidationMode::SatUnsat, None, None);
    let mut session = CollectionSession::new();

    session.update_entry("point-1", "UNSAT", "").expect("update");
    assert!(!session.can_mark_complete(&point));
    session
        .update_entry("point-1", "UNSAT", "   ")
        .expect("update");
    assert!(!session.can_mark_complete(&point));
    session
        .update_entry("point-1", "UNSAT", "belt worn")
        .expect("update");
    assert!(session.can_mark_complete(&point));

    session.unmark_complete("point-1");
    session.update_entry("point-1", "SAT", "").expect("update");
    assert!(session.can_mark_complete(&point));
}

#[test]
fn completion_locks_entry_until_unmarked() {
    let point = sample_point("point-1", ValidationMode::Range, Some(10.0), Some(20.0));
    let mut session = CollectionSession::new();

    session.update_entry("point-1", "15", "").expect("update");
    session
        .mark_complete(&point, &field_user())
        .expect("complete");

    let err = session
        .update_entry("point-1", "16", "")
        .expect_err("locked");
    assert!(matches!(err, CollectionError::Locked(_)));
    assert_eq!(session.entry("point-1").expect("entry").value, "15");

    assert!(session.unmark_complete("point-1"));
    assert!(!session.is_complete("point-1"));
    assert_eq!(session.entry("point-1").expect("entry").value, "15");
    session.update_entry("point-1", "16", "").expect("editable");
    assert_eq!(session.entry("point-1").expect("entry").value, "16");
}

#[test]
fn unmark_is_always_permitted() {
    let mut session = CollectionSession::new();
    assert!(!session.unmark_complete("missing"));
}

#[test]
fn double_mark_is_rejected() {
    let point = sample_point("point-1", ValidationMode::Range, None, None);
    let mut session = CollectionSession::new();
    session.update_entry("point-1", "5", "").expect("update");
    session
        .mark_complete(&point, &field_user())
        .expect("complete");
    let err = session
        .mark_complete(&point, &field_user())
        .expect_err("locked");
    assert!(matches!(err, CollectionError::Locked(_)));
}

#[test]
fn completions_follow_requested_order() {
    let first = sample_point("point-1", ValidationMode::Range, None, None);
    let second = sample_point("point-2", ValidationMode::Range, None, None);
    let mut session = CollectionSession::new();
    session.update_entry("point-2", "2", "").expect("update");
    session.update_entry("point-1", "1", "").expect("update");
    session
        .mark_complete(&second, &field_user())
        .expect("complete");
    session
        .mark_complete(&first, &field_user())
        .expect("complete");

    let ordered = session.completions_in_order(&[
        "point-1".to_string(),
        "point-2".to_string(),
        "point-3".to_string(),
    ]);
    let ids: Vec<&str> = ordered.iter().map(|c| c.point_id.as_str()).collect();
    assert_eq!(ids, vec!["point-1", "point-2"]);
    assert_eq!(session.completed_point_ids().len(), 2);
}
