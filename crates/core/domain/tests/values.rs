use domain::dates::{format_calendar_date, parse_calendar_date};
use domain::{ReadingValue, ReviewStatus, Role, SessionContext};

#[test]
fn reading_value_parses_literals_and_numbers() {
    assert_eq!(ReadingValue::parse("SAT"), Some(ReadingValue::Sat));
    assert_eq!(ReadingValue::parse("UNSAT"), Some(ReadingValue::Unsat));
    assert_eq!(ReadingValue::parse(" 12.5 "), Some(ReadingValue::Number(12.5)));
    assert_eq!(ReadingValue::parse("sat"), None);
    assert_eq!(ReadingValue::parse("NaN"), None);
    assert_eq!(ReadingValue::parse("inf"), None);
    assert_eq!(ReadingValue::parse("12,5"), None);
}

#[test]
fn reading_value_round_trips_as_json() {
    let number = serde_json::to_string(&ReadingValue::Number(21.0)).expect("encode");
    assert_eq!(number, "21.0");
    let unsat = serde_json::to_string(&ReadingValue::Unsat).expect("encode");
    assert_eq!(unsat, "\"UNSAT\"");

    let decoded: ReadingValue = serde_json::from_str("\"SAT\"").expect("decode");
    assert_eq!(decoded, ReadingValue::Sat);
    let decoded: ReadingValue = serde_json::from_str("42").expect("decode");
    assert_eq!(decoded, ReadingValue::Number(42.0));
    assert!(serde_json::from_str::<ReadingValue>("\"ok\"").is_err());
}

#[test]
fn review_status_terminality() {
    assert!(!ReviewStatus::Pending.is_terminal());
    assert!(ReviewStatus::Approved.is_terminal());
    assert!(ReviewStatus::Rejected.is_terminal());
    assert!(ReviewStatus::NeedsRevision.is_terminal());
    assert_eq!(ReviewStatus::NeedsRevision.as_str(), "needs_revision");
}

#[test]
fn roles_parse_from_literals() {
    assert_eq!(Role::parse("superadmin"), Some(Role::SuperAdmin));
    assert_eq!(Role::parse("reviewer"), Some(Role::Reviewer));
    assert_eq!(Role::parse("operator"), None);
}

#[test]
fn session_context_applies_role_policy() {
    let field_user = SessionContext::new("u-1", "Field User", None, vec![Role::User]);
    assert!(!field_user.can_manage_catalog());
    assert!(!field_user.can_review());
    assert!(!field_user.bypasses_review());

    let reviewer = SessionContext::new("u-2", "Reviewer", None, vec![Role::Reviewer]);
    assert!(reviewer.can_review());
    assert!(!reviewer.bypasses_review());

    let admin = SessionContext::new("u-3", "Admin", None, vec![Role::User, Role::Admin]);
    assert!(admin.can_manage_catalog());
    assert!(admin.bypasses_review());
    assert!(!admin.can_review());
}

#[test]
fn calendar_dates_parse_strictly() {
    let date = parse_calendar_date("2026-08-06").expect("parse");
    assert_eq!(format_calendar_date(date), "2026-08-06");
    assert!(parse_calendar_date("2026-8-6").is_err());
    assert!(parse_calendar_date("06/08/2026").is_err());
    assert!(parse_calendar_date("2026-13-01").is_err());
    assert!(parse_calendar_date("").is_err());
}
